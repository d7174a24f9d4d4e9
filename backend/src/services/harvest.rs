//! Harvest evaluation pipeline
//!
//! One submission moves through `Received → Validated → MetricsComputed →
//! InsightsComputed → AuditLogged → Persisted → Acknowledged`, or stops at
//! `Rejected` when validation fails. Nothing is written before
//! validation succeeds. The audit log is written before the record store so a
//! trace of the computation survives a failed insert; an audit failure is
//! logged and tolerated, an insert failure fails the submission.

use std::sync::Arc;
use std::time::Duration;

use shared::{
    calculate_metrics, validate_harvest_event, AuditEntry, HarvestEvent, HarvestRecord,
    InsightEngine, PageRequest,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::stores::{with_timeout, AuditLog, RecordStore, StoreError};

/// Lifecycle stages of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validated,
    MetricsComputed,
    InsightsComputed,
    AuditLogged,
    Persisted,
    Acknowledged,
    Rejected,
}

/// Acknowledgment returned for an accepted submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub record: HarvestRecord,
    /// False when the audit mirror could not be written
    pub audit_logged: bool,
}

/// Orchestrates evaluation and persistence of harvest events
#[derive(Clone)]
pub struct HarvestPipeline {
    engine: Arc<InsightEngine>,
    audit_log: Arc<dyn AuditLog>,
    records: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl HarvestPipeline {
    pub fn new(
        engine: InsightEngine,
        audit_log: Arc<dyn AuditLog>,
        records: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            audit_log,
            records,
            clock,
            store_timeout,
        }
    }

    /// Evaluate and persist one harvest event
    pub async fn submit(&self, event: HarvestEvent) -> AppResult<SubmissionReceipt> {
        let submission_id = Uuid::new_v4();
        let span = tracing::info_span!("harvest_submission", %submission_id);
        self.process(submission_id, event).instrument(span).await
    }

    async fn process(
        &self,
        submission_id: Uuid,
        event: HarvestEvent,
    ) -> AppResult<SubmissionReceipt> {
        enter(SubmissionStage::Received);
        let event = event.normalized();

        if let Err(errors) = validate_harvest_event(&event, self.clock.today()) {
            tracing::info!(
                stage = ?SubmissionStage::Rejected,
                "Harvest event rejected: {}",
                errors
            );
            return Err(AppError::Validation(errors));
        }
        enter(SubmissionStage::Validated);

        let metrics = calculate_metrics(&event);
        enter(SubmissionStage::MetricsComputed);

        let insights = self.engine.evaluate(&event, &metrics);
        let fired: Vec<&str> = self
            .engine
            .fired_rules(&event, &metrics)
            .iter()
            .map(|kind| kind.label())
            .collect();
        tracing::debug!(
            stage = ?SubmissionStage::InsightsComputed,
            fired = ?fired,
            productivity_per_hour = metrics.productivity_per_hour,
            "Insights computed"
        );

        let entry = AuditEntry {
            submission_id,
            event,
            metrics,
            insights,
            created_at: self.clock.now(),
        };

        let appended = with_timeout(self.store_timeout, self.audit_log.append(&entry)).await;
        let audit_logged = match appended {
            Ok(()) => {
                enter(SubmissionStage::AuditLogged);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audit log append failed; continuing with record store");
                false
            }
        };

        let id = with_timeout(self.store_timeout, self.records.insert(&entry))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, audit_logged, "Record store insert failed");
                AppError::Storage(e)
            })?;
        enter(SubmissionStage::Persisted);

        let record = entry.into_record(id);
        tracing::info!(
            stage = ?SubmissionStage::Acknowledged,
            id,
            audit_logged,
            "Harvest submission completed"
        );

        Ok(SubmissionReceipt {
            record,
            audit_logged,
        })
    }

    /// All persisted records, newest first
    pub async fn list_all(&self, page: Option<PageRequest>) -> AppResult<Vec<HarvestRecord>> {
        with_timeout(self.store_timeout, self.records.query_ordered(page))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Record store query failed");
                AppError::Retrieval(e)
            })
    }

    /// Probe the record store for health checks
    pub async fn check_record_store(&self) -> Result<(), StoreError> {
        with_timeout(self.store_timeout, self.records.ping()).await
    }
}

fn enter(stage: SubmissionStage) {
    tracing::trace!(stage = ?stage, "Submission stage reached");
}

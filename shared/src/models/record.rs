//! Enriched harvest records as written to the audit log and the record store

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HarvestEvent;
use crate::insights::InsightResult;
use crate::metrics::DerivedMetrics;

/// A harvest event enriched with its metrics and insights, before the record
/// store has assigned an identity. This is the shape kept in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub submission_id: Uuid,
    #[serde(flatten)]
    pub event: HarvestEvent,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    #[serde(flatten)]
    pub insights: InsightResult,
    pub created_at: DateTime<FixedOffset>,
}

impl AuditEntry {
    /// Attach the identity assigned by the record store
    pub fn into_record(self, id: i64) -> HarvestRecord {
        HarvestRecord {
            id,
            submission_id: self.submission_id,
            event: self.event,
            metrics: self.metrics,
            insights: self.insights,
            created_at: self.created_at,
        }
    }
}

/// A persisted harvest record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub id: i64,
    pub submission_id: Uuid,
    #[serde(flatten)]
    pub event: HarvestEvent,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
    #[serde(flatten)]
    pub insights: InsightResult,
    pub created_at: DateTime<FixedOffset>,
}

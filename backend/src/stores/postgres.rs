//! PostgreSQL record store

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use shared::{
    AuditEntry, DerivedMetrics, HarvestEvent, HarvestMethod, HarvestRecord, InsightResult,
    PageRequest,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::{RecordStore, StoreError};

/// Record store backed by the `harvests` table
#[derive(Clone)]
pub struct PgRecordStore {
    db: PgPool,
    offset: FixedOffset,
}

/// Database row for a harvest record
#[derive(Debug, Clone, sqlx::FromRow)]
struct HarvestRow {
    pub id: i64,
    pub submission_id: Uuid,
    pub area: f64,
    pub production: f64,
    pub loss_percentage: f64,
    pub duration_hours: f64,
    pub harvest_method: String,
    pub moisture_percentage: f64,
    pub harvest_date: NaiveDate,
    pub operator_id: String,
    pub equipment_id: String,
    pub variety: String,
    pub ambient_temperature: f64,
    pub brix_percentage: f64,
    pub lost_tonnage: f64,
    pub net_production: f64,
    pub productivity_per_hour: f64,
    pub productivity_per_hectare: f64,
    pub alert: String,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

impl HarvestRow {
    fn into_record(self, offset: &FixedOffset) -> Result<HarvestRecord, StoreError> {
        let harvest_method = self
            .harvest_method
            .parse::<HarvestMethod>()
            .map_err(|e| StoreError::InvalidRow(format!("harvest {}: {}", self.id, e)))?;

        Ok(HarvestRecord {
            id: self.id,
            submission_id: self.submission_id,
            event: HarvestEvent {
                area: self.area,
                production: self.production,
                loss_percentage: self.loss_percentage,
                duration_hours: self.duration_hours,
                harvest_method,
                moisture_percentage: self.moisture_percentage,
                harvest_date: self.harvest_date,
                operator_id: self.operator_id,
                equipment_id: self.equipment_id,
                variety: self.variety,
                ambient_temperature: self.ambient_temperature,
                brix_percentage: self.brix_percentage,
            },
            metrics: DerivedMetrics {
                lost_tonnage: self.lost_tonnage,
                net_production: self.net_production,
                productivity_per_hour: self.productivity_per_hour,
                productivity_per_hectare: self.productivity_per_hectare,
            },
            insights: InsightResult {
                alert: self.alert,
                recommendation: self.recommendation,
            },
            created_at: self.created_at.with_timezone(offset),
        })
    }
}

impl PgRecordStore {
    /// Create a store that renders timestamps in the given offset
    pub fn new(db: PgPool, offset: FixedOffset) -> Self {
        Self { db, offset }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, entry: &AuditEntry) -> Result<i64, StoreError> {
        let event = &entry.event;
        let metrics = &entry.metrics;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO harvests (
                submission_id, area, production, loss_percentage, duration_hours,
                harvest_method, moisture_percentage, harvest_date,
                operator_id, equipment_id, variety,
                ambient_temperature, brix_percentage,
                lost_tonnage, net_production, productivity_per_hour, productivity_per_hectare,
                alert, recommendation, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            RETURNING id
            "#,
        )
        .bind(entry.submission_id)
        .bind(event.area)
        .bind(event.production)
        .bind(event.loss_percentage)
        .bind(event.duration_hours)
        .bind(event.harvest_method.as_str())
        .bind(event.moisture_percentage)
        .bind(event.harvest_date)
        .bind(&event.operator_id)
        .bind(&event.equipment_id)
        .bind(&event.variety)
        .bind(event.ambient_temperature)
        .bind(event.brix_percentage)
        .bind(metrics.lost_tonnage)
        .bind(metrics.net_production)
        .bind(metrics.productivity_per_hour)
        .bind(metrics.productivity_per_hectare)
        .bind(&entry.insights.alert)
        .bind(&entry.insights.recommendation)
        .bind(entry.created_at.with_timezone(&Utc))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(id, submission_id = %entry.submission_id, "Harvest record inserted");
        Ok(id)
    }

    async fn query_ordered(
        &self,
        page: Option<PageRequest>,
    ) -> Result<Vec<HarvestRecord>, StoreError> {
        // LIMIT NULL means no limit in PostgreSQL
        let limit = page.map(|p| p.limit() as i64);
        let offset = page.map(|p| p.offset() as i64).unwrap_or(0);

        let rows = sqlx::query_as::<_, HarvestRow>(
            r#"
            SELECT id, submission_id, area, production, loss_percentage, duration_hours,
                   harvest_method, moisture_percentage, harvest_date,
                   operator_id, equipment_id, variety,
                   ambient_temperature, brix_percentage,
                   lost_tonnage, net_production, productivity_per_hour, productivity_per_hectare,
                   alert, recommendation, created_at
            FROM harvests
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| row.into_record(&self.offset))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

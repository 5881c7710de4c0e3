//! Durable sales outbox.
//!
//! `enqueue` runs inside the same relational transaction as the
//! `order_equipment` procedure call, so an order commits with its staged
//! Sales document or not at all. A single background worker drains pending
//! rows into the document store with exponential backoff; rows that exhaust
//! their attempts are marked failed and stay queryable, never dropped.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, Unchanged,
};
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::entities::sales_outbox::{self, Entity as SalesOutbox, Model as OutboxRow};
use crate::errors::ServiceError;
use crate::sales_store::SalesStore;

const BATCH_SIZE: u64 = 50;
const BASE_BACKOFF_SECS: u64 = 2;
const MAX_BACKOFF_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Delivered,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Delivered => "delivered",
            OutboxStatus::Failed => "failed",
        }
    }
}

/// Stages a Sales document for delivery. Call inside the transaction that
/// performs the order write.
pub async fn enqueue<C: ConnectionTrait>(
    db: &C,
    equipment_id: i32,
    payload: JsonValue,
) -> Result<Uuid, DbErr> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    sales_outbox::ActiveModel {
        id: Set(id),
        equipment_id: Set(equipment_id),
        payload: Set(payload),
        status: Set(OutboxStatus::Pending.as_str().to_string()),
        attempts: Set(0),
        available_at: Set(now),
        last_error: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    info!(outbox_id = %id, equipment_id, "sales document staged");
    Ok(id)
}

/// Exponential backoff schedule for redelivery, capped at five minutes.
pub fn next_backoff(attempts: i32) -> Duration {
    let attempts = attempts.clamp(1, 16) as u32;
    let secs = BASE_BACKOFF_SECS
        .saturating_pow(attempts)
        .min(MAX_BACKOFF_SECS);
    Duration::from_secs(secs)
}

/// What happens to an outbox row after a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Store accepted the document; the row is done.
    Delivered,
    /// Store refused but the attempt budget remains; redeliver after
    /// the backoff delay.
    Retry { delay: Duration },
    /// Attempt budget exhausted. The row is kept with its last error,
    /// queryable and requeue-able, never dropped.
    Failed,
}

/// Pure attempt-outcome decision; `attempts` counts the attempt that just
/// finished.
pub fn transition_after(attempts: i32, max_attempts: i32, delivered: bool) -> Transition {
    if delivered {
        Transition::Delivered
    } else if attempts >= max_attempts {
        Transition::Failed
    } else {
        Transition::Retry {
            delay: next_backoff(attempts),
        }
    }
}

/// Single drainer of the sales outbox.
pub struct OutboxWorker {
    db: Arc<DatabaseConnection>,
    store: Arc<dyn SalesStore>,
    poll_interval: Duration,
    max_attempts: i32,
}

impl OutboxWorker {
    pub fn new(
        db: Arc<DatabaseConnection>,
        store: Arc<dyn SalesStore>,
        poll_interval: Duration,
        max_attempts: i32,
    ) -> Self {
        Self {
            db,
            store,
            poll_interval,
            max_attempts,
        }
    }

    /// Runs the polling loop until the process shuts down.
    pub fn spawn(self) {
        tokio::spawn(async move {
            info!("sales outbox worker started");
            loop {
                if let Err(e) = self.drain_once().await {
                    error!(error = %e, "outbox drain failed");
                }
                sleep(self.poll_interval).await;
            }
        });
    }

    /// Delivers one batch of due pending rows. Returns how many rows were
    /// successfully delivered.
    #[instrument(skip(self))]
    pub async fn drain_once(&self) -> Result<usize, ServiceError> {
        let due = SalesOutbox::find()
            .filter(sales_outbox::Column::Status.eq(OutboxStatus::Pending.as_str()))
            .filter(sales_outbox::Column::AvailableAt.lte(Utc::now()))
            .order_by_asc(sales_outbox::Column::CreatedAt)
            .limit(BATCH_SIZE)
            .all(&*self.db)
            .await
            .map_err(ServiceError::from_db)?;

        let mut delivered = 0;
        for row in due {
            if self.deliver(row).await? {
                delivered += 1;
            }
        }
        Ok(delivered)
    }

    async fn deliver(&self, row: OutboxRow) -> Result<bool, ServiceError> {
        let key = row.id.to_string();
        let attempts = row.attempts + 1;

        let result = self.store.upsert_sale(&key, &row.payload).await;
        let message = result.as_ref().err().map(|e| e.to_string());

        match transition_after(attempts, self.max_attempts, result.is_ok()) {
            Transition::Delivered => {
                self.mark(row, OutboxStatus::Delivered, attempts, None).await?;
                Ok(true)
            }
            Transition::Failed => {
                let message = message.unwrap_or_default();
                error!(outbox_id = %key, attempts, error = %message, "sales delivery gave up");
                self.mark(row, OutboxStatus::Failed, attempts, Some(message))
                    .await?;
                Ok(false)
            }
            Transition::Retry { delay } => {
                let message = message.unwrap_or_default();
                warn!(outbox_id = %key, attempts, error = %message, "sales delivery failed, will retry");
                self.reschedule(row, attempts, message, delay).await?;
                Ok(false)
            }
        }
    }

    async fn mark(
        &self,
        row: OutboxRow,
        status: OutboxStatus,
        attempts: i32,
        last_error: Option<String>,
    ) -> Result<(), ServiceError> {
        sales_outbox::ActiveModel {
            id: Unchanged(row.id),
            status: Set(status.as_str().to_string()),
            attempts: Set(attempts),
            last_error: Set(last_error),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&*self.db)
        .await
        .map_err(ServiceError::from_db)?;
        Ok(())
    }

    async fn reschedule(
        &self,
        row: OutboxRow,
        attempts: i32,
        message: String,
        delay: Duration,
    ) -> Result<(), ServiceError> {
        sales_outbox::ActiveModel {
            id: Unchanged(row.id),
            attempts: Set(attempts),
            available_at: Set(Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default()),
            last_error: Set(Some(message)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&*self.db)
        .await
        .map_err(ServiceError::from_db)?;
        Ok(())
    }
}

/// Rows awaiting delivery, oldest first. Used by the admin surface.
pub async fn pending_rows(db: &DatabaseConnection) -> Result<Vec<OutboxRow>, ServiceError> {
    rows_with_status(db, OutboxStatus::Pending).await
}

/// Rows that exhausted their delivery attempts.
pub async fn failed_rows(db: &DatabaseConnection) -> Result<Vec<OutboxRow>, ServiceError> {
    rows_with_status(db, OutboxStatus::Failed).await
}

async fn rows_with_status(
    db: &DatabaseConnection,
    status: OutboxStatus,
) -> Result<Vec<OutboxRow>, ServiceError> {
    SalesOutbox::find()
        .filter(sales_outbox::Column::Status.eq(status.as_str()))
        .order_by_asc(sales_outbox::Column::CreatedAt)
        .all(db)
        .await
        .map_err(ServiceError::from_db)
}

/// Requeues a failed row for immediate redelivery with a fresh attempt
/// budget.
pub async fn requeue(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let row = SalesOutbox::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::from_db)?
        .ok_or_else(|| ServiceError::NotFound(format!("outbox row {} not found", id)))?;

    if row.status != OutboxStatus::Failed.as_str() {
        return Err(ServiceError::InvalidOperation(format!(
            "outbox row {} is {}, only failed rows can be requeued",
            id, row.status
        )));
    }

    sales_outbox::ActiveModel {
        id: Unchanged(id),
        status: Set(OutboxStatus::Pending.as_str().to_string()),
        attempts: Set(0),
        available_at: Set(Utc::now()),
        last_error: Set(None),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .update(db)
    .await
    .map_err(ServiceError::from_db)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_exponentially() {
        assert_eq!(next_backoff(1), Duration::from_secs(2));
        assert_eq!(next_backoff(2), Duration::from_secs(4));
        assert_eq!(next_backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(next_backoff(10), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(next_backoff(100), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[test]
    fn backoff_tolerates_non_positive_attempts() {
        assert_eq!(next_backoff(0), Duration::from_secs(2));
        assert_eq!(next_backoff(-3), Duration::from_secs(2));
    }

    #[test]
    fn status_round_trips_as_str() {
        assert_eq!(OutboxStatus::Pending.as_str(), "pending");
        assert_eq!(OutboxStatus::Delivered.as_str(), "delivered");
        assert_eq!(OutboxStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn successful_attempt_transitions_to_delivered() {
        assert_eq!(transition_after(1, 8, true), Transition::Delivered);
        // even the final attempt delivers when the store accepts
        assert_eq!(transition_after(8, 8, true), Transition::Delivered);
    }

    #[test]
    fn failure_with_budget_left_reschedules_with_backoff() {
        for attempts in 1..8 {
            assert_eq!(
                transition_after(attempts, 8, false),
                Transition::Retry {
                    delay: next_backoff(attempts)
                }
            );
        }
    }

    #[test]
    fn exhausted_budget_transitions_to_failed_not_dropped() {
        assert_eq!(transition_after(8, 8, false), Transition::Failed);
        assert_eq!(transition_after(9, 8, false), Transition::Failed);
    }

    #[test]
    fn requeued_row_redelivers_with_a_fresh_budget() {
        // a row that exhausted its budget...
        assert_eq!(transition_after(8, 8, false), Transition::Failed);
        // ...is requeued with attempts reset to 0, so its next attempt
        // retries instead of failing terminally
        let first_attempt_after_requeue = 1;
        assert_eq!(
            transition_after(first_attempt_after_requeue, 8, false),
            Transition::Retry {
                delay: next_backoff(1)
            }
        );
        assert_eq!(transition_after(first_attempt_after_requeue, 8, true), Transition::Delivered);
    }
}

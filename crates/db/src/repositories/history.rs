//! Change history and undo for assignments.
//!
//! Every assignment write stores a row snapshot before and after the
//! change. Undo replays the newest entry of a production backwards.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;

use crate::entities::{assignments, functions, history, resources};

/// Table name recorded for assignment changes.
pub const ASSIGNMENTS_TABLE: &str = "assignments";

/// Default number of entries returned by [`HistoryRepository::list`].
pub const DEFAULT_HISTORY_LIMIT: u64 = 50;

/// Kind of change recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    /// Row inserted.
    Create,
    /// Row changed.
    Update,
    /// Row removed.
    Delete,
}

impl HistoryAction {
    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Errors that can occur while undoing a change.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Stored snapshot could not be read back.
    #[error("Corrupt history snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of an undo request.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// No entry to revert.
    Nothing,
    /// The newest entry was reverted.
    Undone {
        /// Snapshot put back, for updates and deletes.
        restored: Option<serde_json::Value>,
    },
    /// The newest entry referenced a function or resource that no longer
    /// exists. It was dropped without restoring anything.
    Skipped {
        /// ID of the dropped entry.
        history_id: i32,
    },
}

/// History repository.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    /// Creates a new history repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes one history entry on the given connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or the insert fails.
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        production_id: i32,
        action: HistoryAction,
        old: Option<&assignments::Model>,
        new: Option<&assignments::Model>,
        user_id: Option<i32>,
    ) -> Result<history::Model, HistoryError> {
        let record_id = new.or(old).map(|m| m.id);
        let old_data = old.map(serde_json::to_string).transpose()?;
        let new_data = new.map(serde_json::to_string).transpose()?;

        Ok(history::ActiveModel {
            production_id: Set(production_id),
            table_name: Set(ASSIGNMENTS_TABLE.to_string()),
            record_id: Set(record_id),
            action: Set(action.as_str().to_string()),
            old_data: Set(old_data),
            new_data: Set(new_data),
            user_id: Set(user_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?)
    }

    /// Lists a production's newest entries first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, production_id: i32, limit: u64) -> Result<Vec<history::Model>, DbErr> {
        history::Entity::find()
            .filter(history::Column::ProductionId.eq(production_id))
            .order_by_desc(history::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Reverts the newest assignment entry of a production.
    ///
    /// The current row is removed, the old snapshot of an update or delete
    /// is re-inserted under its original ID, and the entry is dropped.
    /// A snapshot whose function or resource has since been deleted cannot
    /// be restored; its entry is dropped and reported as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot is unreadable or a database write fails.
    pub async fn undo_latest(&self, production_id: i32) -> Result<UndoOutcome, HistoryError> {
        let txn = self.db.begin().await?;

        let Some(entry) = history::Entity::find()
            .filter(history::Column::ProductionId.eq(production_id))
            .filter(history::Column::TableName.eq(ASSIGNMENTS_TABLE))
            .order_by_desc(history::Column::Id)
            .one(&txn)
            .await?
        else {
            return Ok(UndoOutcome::Nothing);
        };

        let reverts_old = entry.action == HistoryAction::Update.as_str()
            || entry.action == HistoryAction::Delete.as_str();
        let snapshot = match entry.old_data.as_deref() {
            Some(old) if reverts_old => Some(serde_json::from_str::<assignments::Model>(old)?),
            _ => None,
        };

        if let Some(snapshot) = &snapshot
            && !references_exist(&txn, snapshot).await?
        {
            history::Entity::delete_by_id(entry.id).exec(&txn).await?;
            txn.commit().await?;
            tracing::warn!(
                production_id,
                history_id = entry.id,
                function_id = snapshot.function_id,
                resource_id = ?snapshot.resource_id,
                "Stale history entry skipped"
            );
            return Ok(UndoOutcome::Skipped {
                history_id: entry.id,
            });
        }

        if let Some(record_id) = entry.record_id {
            assignments::Entity::delete_by_id(record_id)
                .exec(&txn)
                .await?;
        }

        let mut restored = None;
        if let (Some(snapshot), Some(old)) = (&snapshot, entry.old_data.as_deref()) {
            restore_snapshot(snapshot).insert(&txn).await?;
            restored = Some(serde_json::from_str(old)?);
        }

        history::Entity::delete_by_id(entry.id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            production_id,
            history_id = entry.id,
            action = %entry.action,
            "Assignment change undone"
        );
        Ok(UndoOutcome::Undone { restored })
    }
}

/// Checks that the function and resource a snapshot points at still exist.
async fn references_exist<C: ConnectionTrait>(
    conn: &C,
    snapshot: &assignments::Model,
) -> Result<bool, DbErr> {
    if functions::Entity::find_by_id(snapshot.function_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Ok(false);
    }
    match snapshot.resource_id {
        Some(resource_id) => Ok(resources::Entity::find_by_id(resource_id)
            .one(conn)
            .await?
            .is_some()),
        None => Ok(true),
    }
}

fn restore_snapshot(m: &assignments::Model) -> assignments::ActiveModel {
    assignments::ActiveModel {
        id: Set(m.id),
        production_id: Set(m.production_id),
        kind: Set(m.kind.clone()),
        function_id: Set(m.function_id),
        resource_id: Set(m.resource_id),
        name_override: Set(m.name_override.clone()),
        start_date: Set(m.start_date.clone()),
        end_date: Set(m.end_date.clone()),
        price_override: Set(m.price_override),
        notes: Set(m.notes.clone()),
        assignment_status: Set(m.assignment_status.clone()),
        day_overrides: Set(m.day_overrides.clone()),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

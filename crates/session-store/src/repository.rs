//! Repository Implementation

use crate::StoreError;
use chrono::{DateTime, Utc};
use fatigue_core::{FinalReport, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Periodic snapshot record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub session_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub snapshot: MetricsSnapshot,
}

/// Final session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRecord {
    pub session_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub report: FinalReport,
}

#[derive(Debug, Default)]
struct SessionLog {
    snapshots: Vec<SnapshotRecord>,
    final_record: Option<FinalRecord>,
}

/// Repository for session metrics (in-memory implementation for now)
pub struct SessionRepository {
    sessions: Mutex<HashMap<Uuid, SessionLog>>,
    /// Cap on periodic snapshots retained per session
    max_snapshots_per_session: usize,
}

impl SessionRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory session repository");
        Self {
            sessions: Mutex::new(HashMap::new()),
            // A 5s cadence over an 8-hour session stays well under this
            max_snapshots_per_session: 10_000,
        }
    }

    /// Create a new repository backed by SQLite (placeholder)
    pub async fn with_sqlite(_db_path: &str) -> Result<Self, StoreError> {
        // In real implementation, we would use sqlx here:
        // let pool = SqlitePool::connect(db_path).await?;
        // Run migrations, setup WAL mode, etc.

        Ok(Self::new())
    }

    /// Register a new session and return its identifier
    pub fn create_session(&self) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut sessions = self.lock()?;
        sessions.insert(id, SessionLog::default());
        info!(session_id = %id, "Session created");
        Ok(id)
    }

    /// Append a periodic snapshot to a session's log
    pub fn insert_snapshot(
        &self,
        session_id: Uuid,
        snapshot: MetricsSnapshot,
    ) -> Result<(), StoreError> {
        let mut sessions = self.lock()?;
        let log = sessions
            .get_mut(&session_id)
            .ok_or(StoreError::UnknownSession(session_id))?;

        // Enforce retention
        while log.snapshots.len() >= self.max_snapshots_per_session {
            log.snapshots.remove(0);
        }

        log.snapshots.push(SnapshotRecord {
            session_id,
            recorded_at: Utc::now(),
            snapshot,
        });
        debug!(session_id = %session_id, count = log.snapshots.len(), "Snapshot stored");
        Ok(())
    }

    /// Store a session's final report, exactly once
    pub fn insert_final(&self, session_id: Uuid, report: FinalReport) -> Result<(), StoreError> {
        let mut sessions = self.lock()?;
        let log = sessions
            .get_mut(&session_id)
            .ok_or(StoreError::UnknownSession(session_id))?;

        if log.final_record.is_some() {
            return Err(StoreError::AlreadyFinalized(session_id));
        }

        log.final_record = Some(FinalRecord {
            session_id,
            recorded_at: Utc::now(),
            report,
        });
        info!(session_id = %session_id, "Final report stored");
        Ok(())
    }

    /// All periodic snapshots for a session, oldest first
    pub fn get_snapshots(&self, session_id: Uuid) -> Result<Vec<SnapshotRecord>, StoreError> {
        let sessions = self.lock()?;
        sessions
            .get(&session_id)
            .map(|log| log.snapshots.clone())
            .ok_or(StoreError::UnknownSession(session_id))
    }

    /// A session's final report, if flushed
    pub fn get_final(&self, session_id: Uuid) -> Result<Option<FinalRecord>, StoreError> {
        let sessions = self.lock()?;
        sessions
            .get(&session_id)
            .map(|log| log.final_record.clone())
            .ok_or(StoreError::UnknownSession(session_id))
    }

    /// A session's final report serialized as a JSON document
    pub fn export_final_json(&self, session_id: Uuid) -> Result<Option<String>, StoreError> {
        match self.get_final(session_id)? {
            Some(record) => serde_json::to_string(&record)
                .map(Some)
                .map_err(|e| StoreError::DatabaseError(e.to_string())),
            None => Ok(None),
        }
    }

    /// Number of registered sessions
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.clear();
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, SessionLog>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|e| StoreError::DatabaseError(format!("Lock error: {}", e)))
    }
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

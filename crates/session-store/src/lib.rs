//! Session Store
//!
//! Persistence for periodic and final session metric snapshots, keyed by
//! session identifier. A push failure is reported to the caller but never
//! rolls back or corrupts the monitoring session's live accumulators;
//! callers hand over owned snapshot copies.

pub mod repository;

pub use repository::{FinalRecord, SessionRepository, SnapshotRecord};

use thiserror::Error;
use uuid::Uuid;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown session: {0}")]
    UnknownSession(Uuid),

    #[error("Session {0} already has a final report")]
    AlreadyFinalized(Uuid),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

//! Shared state for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};

/// Shared context for all API routes.
///
/// Holds only the database path. A connection is opened per request
/// and dropped unconditionally when the handler returns; no
/// connection outlives its unit of work.
#[derive(Clone)]
pub struct ApiContext {
    db_path: Arc<PathBuf>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
        }
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::sqlite::open_database(&self.db_path)
    }
}

//! SQLite persistence for the document store.
//!
//! Documents live in a single `documents` table keyed by `(collection, id)`
//! with the fields serialized as a JSON body. Queries use SQLite's JSON
//! functions, so predicates are evaluated by the database rather than in
//! memory.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod documents;
pub mod filters;
pub mod schema;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

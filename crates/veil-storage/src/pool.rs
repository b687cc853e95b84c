//! Database connection pool.
//!
//! One SQLite connection behind a mutex. Every submission is a single short
//! write, so requests simply take turns.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::Result;
use crate::schema::run_migrations;

/// How long a write waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Thread-safe handle to the submission database.
#[derive(Clone)]
pub struct ConnectionPool {
    conn: Arc<Mutex<Connection>>,
}

impl ConnectionPool {
    /// Open (or create) a file-based database and migrate it.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        configure(&conn)?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Borrow the connection.
    ///
    /// A panic in another request leaves SQLite itself consistent, so a
    /// poisoned lock is recovered rather than taking the gate down.
    pub fn get(&self) -> Result<PooledConnection<'_>> {
        let guard = self.conn.lock().unwrap_or_else(|poisoned| {
            warn!("Recovering database connection after a panic");
            self.conn.clear_poison();
            poisoned.into_inner()
        });

        Ok(PooledConnection { guard })
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", true)?;

    // In-memory databases report "memory" and stay that way
    let journal: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    debug!(journal = %journal, "Configured database connection");
    Ok(())
}

/// A connection borrowed from the pool.
pub struct PooledConnection<'a> {
    guard: MutexGuard<'a, Connection>,
}

impl std::ops::Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

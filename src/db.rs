use rusqlite::Connection;
use std::sync::{Mutex, PoisonError};

const SCHEMA: &str = include_str!("schema.sql");

/// Session history lives for the life of the process only.
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Db {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }
}

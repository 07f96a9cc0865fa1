//! SQLite-backed customer table.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::{
    customer::{Customer, CustomerDraft, CustomerPatch},
    types::CustomerId,
};

use super::{RecordStore, StoreError, StoreResult};

const COLUMNS: &str = "id, first_name, last_name, email, date_of_birth";

/// SQLite implementation of [`crate::store::RecordStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a SQLite database at `path` and ensures the schema.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`. The parent directory
    /// must already exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.is_dir() {
                return Err(StoreError::Unavailable(format!(
                    "database directory {} does not exist",
                    dir.display()
                )));
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Number of rows in the table.
    pub fn count(&self) -> StoreResult<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    fn query_all<P: rusqlite::Params>(&self, sql: &str, args: P) -> StoreResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, read_customer)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn query_one<P: rusqlite::Params>(&self, sql: &str, args: P) -> StoreResult<Option<Customer>> {
        Ok(self.conn.query_row(sql, args, read_customer).optional()?)
    }
}

impl RecordStore for SqliteStore {
    fn insert(&mut self, draft: &CustomerDraft) -> StoreResult<CustomerId> {
        self.conn
            .execute(
                "INSERT INTO customers(first_name, last_name, email, date_of_birth)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    draft.first_name,
                    draft.last_name,
                    draft.email,
                    draft.date_of_birth
                ],
            )
            .map_err(|err| unique_violation(err, &draft.email))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        self.query_one(
            &format!("SELECT {COLUMNS} FROM customers WHERE id = ?1"),
            params![id],
        )
    }

    fn get_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        self.query_one(
            &format!("SELECT {COLUMNS} FROM customers WHERE email = ?1"),
            params![email],
        )
    }

    fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<Customer>> {
        self.query_all(
            &format!("SELECT {COLUMNS} FROM customers ORDER BY id ASC LIMIT ?1 OFFSET ?2"),
            params![to_sql_int(limit), to_sql_int(offset)],
        )
    }

    fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<Customer>> {
        self.query_all(
            &format!(
                "SELECT {COLUMNS} FROM customers
                 WHERE date_of_birth BETWEEN ?1 AND ?2 ORDER BY id ASC"
            ),
            params![start, end],
        )
    }

    fn update(&mut self, id: CustomerId, patch: &CustomerPatch) -> StoreResult<()> {
        // Absent slots bind NULL and keep the stored column.
        let changed = self
            .conn
            .execute(
                "UPDATE customers SET
                    first_name = COALESCE(?1, first_name),
                    last_name = COALESCE(?2, last_name),
                    email = COALESCE(?3, email),
                    date_of_birth = COALESCE(?4, date_of_birth)
                 WHERE id = ?5",
                params![
                    patch.first_name,
                    patch.last_name,
                    patch.email,
                    patch.date_of_birth,
                    id
                ],
            )
            .map_err(|err| unique_violation(err, patch.email.as_deref().unwrap_or_default()))?;
        if changed == 0 {
            return Err(StoreError::MissingRow(id));
        }
        Ok(())
    }

    fn delete(&mut self, id: CustomerId) -> StoreResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::MissingRow(id));
        }
        Ok(())
    }
}

fn read_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        date_of_birth: row.get(4)?,
    })
}

fn unique_violation(err: rusqlite::Error, email: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == ErrorCode::ConstraintViolation
                && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::UniqueViolation {
                field: "email",
                value: email.to_string(),
            }
        }
        _ => StoreError::Sqlite(err),
    }
}

fn to_sql_int(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

//! Schema versioning for the donor store.
//!
//! The version is kept in `PRAGMA user_version`. A file at version 0 gets
//! the whole schema in one transaction; a file stamped by a newer release is
//! refused without being touched.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// Schema version written by this release.
pub const CURRENT_VERSION: i32 = 1;

/// Bring `conn` to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] if the file carries a version this
/// release does not understand, or a database error if creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let version = user_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {version} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if version < 0 {
        return Err(Error::DatabaseMigration {
            message: format!("invalid schema version: {version}"),
        });
    }
    if version == 0 {
        create_schema(conn)?;
    }
    Ok(())
}

fn user_version(conn: &Connection) -> Result<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn create_schema(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for statement in SCHEMA_STATEMENTS {
        tx.execute(statement, [])?;
    }
    tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    tx.commit()?;
    debug!("Created donor schema version {CURRENT_VERSION}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn objects(conn: &Connection, kind: &str) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type = ?1 ORDER BY name")
            .unwrap()
            .query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_fresh_database_is_version_zero() {
        assert_eq!(user_version(&create_test_db()).unwrap(), 0);
    }

    #[test]
    fn test_initialize_creates_donor_schema() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        assert_eq!(objects(&conn, "table"), ["donors", "sqlite_sequence"]);
        assert_eq!(
            objects(&conn, "index"),
            ["idx_donors_created", "idx_donors_lookup"]
        );
        assert_eq!(user_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_initialize_keeps_existing_rows() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO donors (full_name, blood_group, mobile_number, district, created_at)
             VALUES ('Asha', 'O+', '9876543210', 'Pune', '2025-03-01T10:00:00Z')",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM donors", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = create_test_db();
        conn.pragma_update(None, "user_version", CURRENT_VERSION + 1)
            .unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
        assert!(objects(&conn, "table").is_empty());
    }

    #[test]
    fn test_negative_version_is_rejected() {
        let conn = create_test_db();
        conn.pragma_update(None, "user_version", -1).unwrap();

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }
}

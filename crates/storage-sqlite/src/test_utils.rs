//! Temp-dir database fixtures for repository tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use tempfile::TempDir;

use crate::db::{create_pool, get_connection, run_migrations, spawn_writer, DbPool, WriteHandle};

pub(crate) struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    // Keeps the database file alive for the test.
    _dir: TempDir,
}

/// Migrated database with a running writer. Needs a Tokio runtime.
pub(crate) fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

impl TestDb {
    pub fn execute(&self, sql: &str) {
        let mut conn = get_connection(&self.pool).expect("Failed to get connection");
        conn.batch_execute(sql).expect("Failed to execute SQL");
    }

    /// Seeds the catalog, an approved and an unapproved company, and a few
    /// enrollments.
    pub fn seed_platform(&self) {
        self.execute(
            "INSERT INTO careers (id, name) VALUES (5, 'Software Engineer'), (7, 'Data Analyst');
             INSERT INTO companies (id, name, is_approved) VALUES
                 ('acme', 'Acme Corp', 1), ('shady', 'Shady LLC', 0);
             INSERT INTO career_selections (id, student_id, career_id, career_name, selected_at, is_active) VALUES
                 ('sel-1', 'alice', 5, NULL, '2024-01-01 09:00:00', 1),
                 ('sel-2', 'carol', 7, NULL, '2024-01-01 09:00:00', 1),
                 ('sel-3', 'dave', 5, NULL, '2024-01-01 09:00:00', 0),
                 ('sel-4', 'erin', NULL, ' software ENGINEER ', '2024-01-02 09:00:00', 1);
             INSERT INTO student_profiles (student_id, full_name, career) VALUES
                 ('bob', 'Bob', 'Software Engineer'),
                 ('alice', 'Alice', 'software engineer'),
                 ('frank', 'Frank', '   ');",
        );
    }
}

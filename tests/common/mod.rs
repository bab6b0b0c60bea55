#![allow(dead_code)]

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use hubcrm::db::{DbPool, establish_connection_pool};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite file living in a temporary directory that is removed on drop.
pub struct TestDb {
    _dir: TempDir,
    url: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir.path().join(name).to_string_lossy().into_owned();

        let mut conn = SqliteConnection::establish(&url).expect("open test database");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        let pool = establish_connection_pool(&url).expect("build pool");
        Self {
            _dir: dir,
            url,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

//! SQLite persistence gateway.
//!
//! One [`PackageStore`] value owns the single connection for a run and is
//! held by the consuming task only; worker tasks never see it. Inserts run
//! inside one explicit transaction per run: nothing is durable until
//! [`PackageStore::commit`], and dropping the store without committing
//! rolls everything back.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{App, Package};

/// Relational store for the `packages` and `apps` relations.
pub struct PackageStore {
    conn: Connection,
}

impl PackageStore {
    /// Open (creating if absent) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Delete the backing database file if it exists.
    ///
    /// Destructive; only called when a run is configured to start clean.
    pub fn reset(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("removing existing database at {}", path.display());
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Create the two relations if they are absent. Idempotent.
    ///
    /// `apps.package_id` references `packages.id` without any ON DELETE
    /// rule; app rows are unique on `(id, package_id)`, not on the app id
    /// alone.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS packages (
                id INTEGER PRIMARY KEY,
                price_currency TEXT,
                price_initial INTEGER,
                price_final INTEGER,
                price_discount_percent INTEGER,
                price_individual INTEGER,
                platforms_windows BOOLEAN,
                platforms_mac BOOLEAN,
                platforms_linux BOOLEAN,
                release_date_coming_soon BOOLEAN,
                release_date DATE,
                error BOOLEAN NOT NULL DEFAULT FALSE
            );
            CREATE TABLE IF NOT EXISTS apps (
                id INTEGER NOT NULL,
                name TEXT,
                package_id INTEGER NOT NULL,
                UNIQUE (id, package_id),
                FOREIGN KEY (package_id) REFERENCES packages(id)
            );",
        )?;
        Ok(())
    }

    /// Start the run transaction.
    pub fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    /// Make every insert since `begin` durable. Called once per run.
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Append one package row. Does not commit.
    pub fn insert_package(&self, package: &Package) -> Result<()> {
        self.conn.execute(
            "INSERT INTO packages (
                id, price_currency, price_initial, price_final,
                price_discount_percent, price_individual, platforms_windows,
                platforms_mac, platforms_linux, release_date_coming_soon,
                release_date, error
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                package.id,
                package.price_currency,
                package.price_initial,
                package.price_final,
                package.price_discount_percent,
                package.price_individual,
                package.platforms_windows,
                package.platforms_mac,
                package.platforms_linux,
                package.release_date_coming_soon,
                package.release_date,
                package.error,
            ],
        )?;
        Ok(())
    }

    /// Append one app row. The owning package must already be inserted in
    /// this run. Does not commit.
    pub fn insert_app(&self, app: &App) -> Result<()> {
        self.conn.execute(
            "INSERT INTO apps (id, name, package_id) VALUES (?1, ?2, ?3)",
            params![app.id, app.name, app.package_id],
        )?;
        Ok(())
    }

    pub fn package_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn app_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM apps", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Read back every package row, ordered by id.
    pub fn packages(&self) -> Result<Vec<Package>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, price_currency, price_initial, price_final,
                    price_discount_percent, price_individual, platforms_windows,
                    platforms_mac, platforms_linux, release_date_coming_soon,
                    release_date, error
             FROM packages ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Package {
                id: row.get(0)?,
                price_currency: row.get(1)?,
                price_initial: row.get(2)?,
                price_final: row.get(3)?,
                price_discount_percent: row.get(4)?,
                price_individual: row.get(5)?,
                platforms_windows: row.get(6)?,
                platforms_mac: row.get(7)?,
                platforms_linux: row.get(8)?,
                release_date_coming_soon: row.get(9)?,
                release_date: row.get(10)?,
                error: row.get(11)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Read back every app row in insertion order.
    pub fn apps(&self) -> Result<Vec<App>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, package_id FROM apps ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(App {
                id: row.get(0)?,
                name: row.get(1)?,
                package_id: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Apps belonging to one package, in insertion order.
    pub fn apps_for_package(&self, package_id: u32) -> Result<Vec<App>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, package_id FROM apps WHERE package_id = ?1 ORDER BY rowid")?;
        let rows = stmt.query_map([package_id], |row| {
            Ok(App {
                id: row.get(0)?,
                name: row.get(1)?,
                package_id: row.get(2)?,
            })
        })?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

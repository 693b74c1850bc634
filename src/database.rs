use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Row};
use std::path::Path;

use crate::observer::Observer;

/// A named observer position stored in the database
#[derive(Debug, Clone, PartialEq)]
pub struct SavedLocation {
    pub id: Option<i64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub saved_at: DateTime<Utc>,
}

impl SavedLocation {
    pub fn new(name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id: None,
            name,
            latitude,
            longitude,
            saved_at: Utc::now(),
        }
    }

    pub fn to_observer(&self) -> Result<Observer> {
        Ok(Observer::new(self.name.clone(), self.latitude, self.longitude)?)
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<(Option<i64>, String, f64, f64, String)> {
        Ok((
            Some(row.get(0)?),
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    }

    fn from_columns(columns: (Option<i64>, String, f64, f64, String)) -> Result<Self> {
        let (id, name, latitude, longitude, saved_at) = columns;
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)
            .with_context(|| format!("bad timestamp for location '{}'", name))?
            .with_timezone(&Utc);
        Ok(Self {
            id,
            name,
            latitude,
            longitude,
            saved_at,
        })
    }
}

/// Database manager for saved observer locations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let conn = Connection::open(path)?;
        log::debug!("Opened location database {}", path.display());
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE SEQUENCE IF NOT EXISTS saved_locations_id_seq;
            CREATE TABLE IF NOT EXISTS saved_locations (
                id INTEGER PRIMARY KEY DEFAULT nextval('saved_locations_id_seq'),
                name VARCHAR NOT NULL UNIQUE,
                latitude DOUBLE NOT NULL,
                longitude DOUBLE NOT NULL,
                saved_at VARCHAR NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert a new location, returning its id. The coordinates are checked
    /// before anything is written.
    pub fn create(&self, location: &SavedLocation) -> Result<i64> {
        location.to_observer()?;
        let id: i64 = self.conn.query_row(
            r#"
            INSERT INTO saved_locations (name, latitude, longitude, saved_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
            params![
                location.name,
                location.latitude,
                location.longitude,
                location.saved_at.to_rfc3339(),
            ],
            |row| row.get(0),
        )?;
        log::info!("Saved location {} (id {})", location.name, id);
        Ok(id)
    }

    pub fn read_by_name(&self, name: &str) -> Result<Option<SavedLocation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, latitude, longitude, saved_at
            FROM saved_locations
            WHERE name = ?
            "#,
        )?;

        match stmt.query_row(params![name], SavedLocation::from_row) {
            Ok(columns) => Ok(Some(SavedLocation::from_columns(columns)?)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_all(&self) -> Result<Vec<SavedLocation>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, latitude, longitude, saved_at
            FROM saved_locations
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], SavedLocation::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(SavedLocation::from_columns(row?)?);
        }
        Ok(results)
    }

    /// Updates coordinates and timestamp by id. The unique name column is
    /// never rewritten.
    pub fn update(&self, location: &SavedLocation) -> Result<bool> {
        let id = match location.id {
            Some(id) => id,
            None => return Ok(false),
        };
        location.to_observer()?;

        let affected = self.conn.execute(
            r#"
            UPDATE saved_locations SET
                latitude = ?,
                longitude = ?,
                saved_at = ?
            WHERE id = ?
            "#,
            params![
                location.latitude,
                location.longitude,
                location.saved_at.to_rfc3339(),
                id,
            ],
        )?;

        Ok(affected > 0)
    }

    /// Insert or update (upsert) a location by name
    pub fn upsert(&self, location: &SavedLocation) -> Result<i64> {
        match self.read_by_name(&location.name)?.and_then(|existing| existing.id) {
            Some(id) => {
                let mut updated = location.clone();
                updated.id = Some(id);
                self.update(&updated)?;
                Ok(id)
            }
            None => self.create(location),
        }
    }

    pub fn delete_by_name(&self, name: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM saved_locations WHERE name = ?",
            params![name],
        )?;
        Ok(affected > 0)
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM saved_locations",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

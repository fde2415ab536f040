use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

use crate::error::{Result, WeatherError};
use crate::model::WeatherRecord;

const COLUMNS: &str = "id, location, date_range_start, date_range_end, temperature, weather_description";

/// Column values for a record about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub location: String,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub temperature: f64,
    pub weather_description: String,
}

/// SQLite-backed record store, one table.
///
/// Each instance owns a single connection. The server opens a fresh store
/// per request, so connections are never shared across requests; all
/// mutations commit synchronously before returning. Concurrent updates to
/// the same id race, last write wins.
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) the database at `path` and create the table if it
    /// doesn't exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read performance
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weather_records (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                location            TEXT NOT NULL,
                date_range_start    TEXT,
                date_range_end      TEXT,
                temperature         REAL NOT NULL,
                weather_description TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn })
    }

    /// Insert a new record and return it with its assigned id.
    pub fn insert(&self, new: &NewRecord) -> Result<WeatherRecord> {
        self.conn.execute(
            "INSERT INTO weather_records \
             (location, date_range_start, date_range_end, temperature, weather_description) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.location,
                new.date_range_start,
                new.date_range_end,
                new.temperature,
                new.weather_description
            ],
        )?;
        self.get(self.conn.last_insert_rowid())
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<WeatherRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM weather_records ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn get(&self, id: i64) -> Result<WeatherRecord> {
        self.conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM weather_records WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?
            .ok_or(WeatherError::NotFound)
    }

    /// Rewrite all mutable columns of `record` by id.
    pub fn update(&self, record: &WeatherRecord) -> Result<WeatherRecord> {
        let changed = self.conn.execute(
            "UPDATE weather_records \
             SET location = ?1, date_range_start = ?2, date_range_end = ?3, \
                 temperature = ?4, weather_description = ?5 \
             WHERE id = ?6",
            params![
                record.location,
                record.date_range_start,
                record.date_range_end,
                record.temperature,
                record.weather_description,
                record.id
            ],
        )?;
        if changed == 0 {
            return Err(WeatherError::NotFound);
        }
        self.get(record.id)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM weather_records WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(WeatherError::NotFound);
        }
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<WeatherRecord> {
    Ok(WeatherRecord {
        id: row.get(0)?,
        location: row.get(1)?,
        date_range_start: row.get(2)?,
        date_range_end: row.get(3)?,
        temperature: row.get(4)?,
        weather_description: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_store() -> (tempfile::TempDir, RecordStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RecordStore::open(dir.path().join("records.db")).expect("open store");
        (dir, store)
    }

    fn sample(location: &str) -> NewRecord {
        NewRecord {
            location: location.to_string(),
            date_range_start: None,
            date_range_end: None,
            temperature: 21.5,
            weather_description: "clear sky".to_string(),
        }
    }

    #[test]
    fn insert_assigns_unique_stable_ids() {
        let (_dir, store) = open_temp_store();

        let first = store.insert(&sample("Paris")).unwrap();
        let second = store.insert(&sample("Oslo")).unwrap();
        assert_ne!(first.id, second.id);

        // Stable across subsequent reads.
        assert_eq!(store.get(first.id).unwrap(), first);
        assert_eq!(store.get(second.id).unwrap(), second);
    }

    #[test]
    fn list_returns_insertion_order() {
        let (_dir, store) = open_temp_store();

        store.insert(&sample("A")).unwrap();
        store.insert(&sample("B")).unwrap();
        store.insert(&sample("C")).unwrap();

        let locations: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.location)
            .collect();
        assert_eq!(locations, ["A", "B", "C"]);
    }

    #[test]
    fn date_range_round_trips_through_the_table() {
        let (_dir, store) = open_temp_store();

        let record = store
            .insert(&NewRecord {
                date_range_start: Some("2024-01-01".parse().unwrap()),
                date_range_end: Some("2024-01-05".parse().unwrap()),
                ..sample("Paris")
            })
            .unwrap();

        let loaded = store.get(record.id).unwrap();
        assert_eq!(loaded.date_range_start, Some("2024-01-01".parse().unwrap()));
        assert_eq!(loaded.date_range_end, Some("2024-01-05".parse().unwrap()));
    }

    #[test]
    fn get_missing_id_is_not_found() {
        let (_dir, store) = open_temp_store();
        assert!(matches!(store.get(42), Err(WeatherError::NotFound)));
    }

    #[test]
    fn update_rewrites_columns_and_keeps_id() {
        let (_dir, store) = open_temp_store();

        let mut record = store.insert(&sample("Paris")).unwrap();
        record.location = "Lyon".to_string();
        record.temperature = -3.0;

        let updated = store.update(&record).unwrap();
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.location, "Lyon");
        assert_eq!(updated.temperature, -3.0);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let (_dir, store) = open_temp_store();

        let record = WeatherRecord {
            id: 99,
            location: "Nowhere".to_string(),
            date_range_start: None,
            date_range_end: None,
            temperature: 0.0,
            weather_description: "void".to_string(),
        };
        assert!(matches!(store.update(&record), Err(WeatherError::NotFound)));
    }

    #[test]
    fn delete_removes_the_row() {
        let (_dir, store) = open_temp_store();

        let record = store.insert(&sample("Paris")).unwrap();
        store.delete(record.id).unwrap();

        assert!(matches!(store.get(record.id), Err(WeatherError::NotFound)));
        assert!(matches!(store.delete(record.id), Err(WeatherError::NotFound)));
    }
}

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

impl Database {
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns whether a value was present.
    pub fn remove_value(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn test_set_get_overwrite_remove() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_value("token").unwrap(), None);

        db.set_value("token", "a").unwrap();
        db.set_value("token", "b").unwrap();
        assert_eq!(db.get_value("token").unwrap().as_deref(), Some("b"));

        assert!(db.remove_value("token").unwrap());
        assert!(!db.remove_value("token").unwrap());
        assert_eq!(db.get_value("token").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::open_in_dir(dir.path()).unwrap();
            db.set_value("token", "persisted").unwrap();
        }
        let db = Database::open_in_dir(dir.path()).unwrap();
        assert_eq!(db.get_value("token").unwrap().as_deref(), Some("persisted"));
    }
}

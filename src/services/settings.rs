use crate::Database;
use anyhow::Result;
use rusqlite::OptionalExtension;

/// Get a setting value by key
pub fn get_setting(db: &Database, key: &str) -> Result<Option<String>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?")?;
    let result = stmt.query_row([key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a setting value (insert or update)
pub fn set_setting(db: &Database, key: &str, value: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = CURRENT_TIMESTAMP",
        [key, value],
    )?;
    Ok(())
}

/// Delete a setting
pub fn delete_setting(db: &Database, key: &str) -> Result<()> {
    let conn = db.get()?;
    conn.execute("DELETE FROM settings WHERE key = ?", [key])?;
    Ok(())
}

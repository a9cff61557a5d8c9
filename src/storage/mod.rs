use crate::backend::models::{PaletteDraft, SavedPalette};
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS palettes (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  owner_id TEXT NOT NULL,
  name TEXT NOT NULL,
  colors_json TEXT NOT NULL,
  created_at INTEGER NOT NULL,
  updated_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_palettes_owner ON palettes(owner_id, created_at DESC);

CREATE TABLE IF NOT EXISTS staged_palette (
  slot INTEGER PRIMARY KEY CHECK (slot = 0),
  name TEXT NOT NULL,
  colors_json TEXT NOT NULL,
  staged_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Palettes owned by `owner`, most recent first.
    pub fn list_palettes(&self, owner: &str) -> anyhow::Result<Vec<SavedPalette>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
SELECT id, owner_id, name, colors_json, created_at, updated_at
FROM palettes
WHERE owner_id=?1
ORDER BY created_at DESC, id DESC
"#,
            )
            .context("prepare list palettes")?;
        let rows = stmt
            .query_map(params![owner], row_to_palette)
            .context("query palettes")?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.context("read palette row")?);
        }
        Ok(out)
    }

    pub fn latest_palette(&self, owner: &str) -> anyhow::Result<Option<SavedPalette>> {
        self.conn
            .query_row(
                r#"
SELECT id, owner_id, name, colors_json, created_at, updated_at
FROM palettes
WHERE owner_id=?1
ORDER BY created_at DESC, id DESC
LIMIT 1
"#,
                params![owner],
                row_to_palette,
            )
            .optional()
            .context("query latest palette")
    }

    pub fn get_palette(&self, owner: &str, id: i64) -> anyhow::Result<Option<SavedPalette>> {
        self.conn
            .query_row(
                r#"
SELECT id, owner_id, name, colors_json, created_at, updated_at
FROM palettes
WHERE id=?1 AND owner_id=?2
"#,
                params![id, owner],
                row_to_palette,
            )
            .optional()
            .context("query palette")
    }

    pub fn create_palette(
        &self,
        owner: &str,
        draft: &PaletteDraft,
        now_unix: i64,
    ) -> anyhow::Result<SavedPalette> {
        let colors_json = serde_json::to_string(&draft.colors).context("encode colors")?;
        self.conn
            .execute(
                r#"
INSERT INTO palettes(owner_id, name, colors_json, created_at)
VALUES(?1, ?2, ?3, ?4)
"#,
                params![owner, draft.name, colors_json, now_unix],
            )
            .context("insert palette")?;
        let id = self.conn.last_insert_rowid();
        self.get_palette(owner, id)?
            .context("palette vanished after insert")
    }

    /// Returns `None` when no palette with `id` belongs to `owner`.
    pub fn update_palette(
        &self,
        owner: &str,
        id: i64,
        draft: &PaletteDraft,
        now_unix: i64,
    ) -> anyhow::Result<Option<SavedPalette>> {
        let colors_json = serde_json::to_string(&draft.colors).context("encode colors")?;
        let changed = self
            .conn
            .execute(
                r#"
UPDATE palettes SET name=?1, colors_json=?2, updated_at=?3
WHERE id=?4 AND owner_id=?5
"#,
                params![draft.name, colors_json, now_unix, id, owner],
            )
            .context("update palette")?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_palette(owner, id)
    }

    pub fn delete_palette(&self, owner: &str, id: i64) -> anyhow::Result<bool> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM palettes WHERE id=?1 AND owner_id=?2",
                params![id, owner],
            )
            .context("delete palette")?;
        Ok(changed > 0)
    }

    pub fn stage_palette(&self, draft: &PaletteDraft, now_unix: i64) -> anyhow::Result<()> {
        let colors_json = serde_json::to_string(&draft.colors).context("encode colors")?;
        self.conn
            .execute(
                r#"
INSERT INTO staged_palette(slot, name, colors_json, staged_at)
VALUES(0, ?1, ?2, ?3)
ON CONFLICT(slot) DO UPDATE SET
  name=excluded.name,
  colors_json=excluded.colors_json,
  staged_at=excluded.staged_at
"#,
                params![draft.name, colors_json, now_unix],
            )
            .context("stage palette")?;
        Ok(())
    }

    pub fn staged_palette(&self) -> anyhow::Result<Option<PaletteDraft>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, colors_json FROM staged_palette WHERE slot=0",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .context("query staged palette")?;
        match row {
            Some((name, colors_json)) => {
                let colors =
                    serde_json::from_str(&colors_json).context("decode staged colors")?;
                Ok(Some(PaletteDraft { name, colors }))
            }
            None => Ok(None),
        }
    }

    pub fn clear_staged_palette(&self) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM staged_palette", [])
            .context("clear staged palette")?;
        Ok(())
    }
}

fn row_to_palette(row: &Row<'_>) -> rusqlite::Result<SavedPalette> {
    let colors_json: String = row.get(3)?;
    let colors = serde_json::from_str(&colors_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(SavedPalette {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        colors,
        created_at: from_unix(row.get(4)?),
        updated_at: row.get::<_, Option<i64>>(5)?.map(from_unix),
    })
}

fn from_unix(ts: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(ts).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Per-call handle: each operation opens its own connection so it can run on a
/// blocking thread without sharing a `Connection` across tasks.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    pub path: PathBuf,
}

impl StorageHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, colors: &[&str]) -> PaletteDraft {
        PaletteDraft {
            name: name.into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_create_and_list_most_recent_first() {
        let s = Storage::open_in_memory().unwrap();
        s.create_palette("local", &draft("One", &["#FF0000"]), 100).unwrap();
        s.create_palette("local", &draft("Two", &["#00FF00", "#0000FF"]), 200).unwrap();
        s.create_palette("other", &draft("Theirs", &["#000000"]), 300).unwrap();

        let list = s.list_palettes("local").unwrap();
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Two", "One"]);
        assert_eq!(list[0].colors, vec!["#00FF00".to_string(), "#0000FF".to_string()]);
        assert_eq!(list[0].created_at.unix_timestamp(), 200);
        assert!(list[0].updated_at.is_none());

        assert_eq!(s.latest_palette("local").unwrap().unwrap().name, "Two");
        assert!(s.latest_palette("nobody").unwrap().is_none());
    }

    #[test]
    fn test_update_checks_owner() {
        let s = Storage::open_in_memory().unwrap();
        let p = s.create_palette("local", &draft("One", &["#FF0000"]), 100).unwrap();

        assert!(s
            .update_palette("other", p.id, &draft("Stolen", &["#000000"]), 150)
            .unwrap()
            .is_none());

        let updated = s
            .update_palette("local", p.id, &draft("Renamed", &["#ABCDEF"]), 150)
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.colors, vec!["#ABCDEF".to_string()]);
        assert_eq!(updated.updated_at.map(|t| t.unix_timestamp()), Some(150));
        assert!(s.update_palette("local", 999, &draft("x", &["#000000"]), 1).unwrap().is_none());
    }

    #[test]
    fn test_delete_checks_owner() {
        let s = Storage::open_in_memory().unwrap();
        let p = s.create_palette("local", &draft("One", &["#FF0000"]), 100).unwrap();
        assert!(!s.delete_palette("other", p.id).unwrap());
        assert!(s.delete_palette("local", p.id).unwrap());
        assert!(!s.delete_palette("local", p.id).unwrap());
        assert!(s.list_palettes("local").unwrap().is_empty());
    }

    #[test]
    fn test_staged_palette_single_slot() {
        let s = Storage::open_in_memory().unwrap();
        assert!(s.staged_palette().unwrap().is_none());

        s.stage_palette(&draft("First", &["#111111"]), 1).unwrap();
        s.stage_palette(&draft("Second", &["#222222"]), 2).unwrap();
        assert_eq!(s.staged_palette().unwrap(), Some(draft("Second", &["#222222"])));

        s.clear_staged_palette().unwrap();
        assert!(s.staged_palette().unwrap().is_none());
    }
}

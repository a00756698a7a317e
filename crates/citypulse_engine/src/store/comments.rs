use citypulse_core::RawRecord;
use rusqlite::{params, OptionalExtension};

use super::{Store, StoreError};

impl Store {
    /// Oldest stored creation time, the extremum the harvest cursor resumes from.
    pub fn oldest_comment_key(&self) -> Result<Option<i64>, StoreError> {
        let oldest = self
            .conn
            .query_row("select min(created_utc) from comments_raw", [], |row| {
                row.get(0)
            })?;
        Ok(oldest)
    }

    /// Primary-key point lookup.
    pub fn comment_exists(&self, id: &str) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("select 1 from comments_raw where id = ?1")?;
        Ok(stmt.exists(params![id])?)
    }

    /// Insert-or-ignore; returns whether a row was added.
    pub fn insert_comment(&self, record: &RawRecord) -> Result<bool, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "insert or ignore into comments_raw (id, created_utc, response) values (?1, ?2, ?3)",
        )?;
        let changed = stmt.execute(params![record.id, record.sort_key, record.payload])?;
        Ok(changed == 1)
    }

    /// Comment text, empty when the payload has none; `None` for an unknown id.
    pub fn comment_body(&self, id: &str) -> Result<Option<String>, StoreError> {
        let body = self
            .conn
            .query_row(
                "
                select coalesce(json_extract(response, '$.body'), '')
                from comments_raw
                where id = ?1
                ",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    pub fn count_comments(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from comments_raw", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Stored comment ids, newest first.
    pub fn comment_ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("select id from comments_raw order by created_utc desc, id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

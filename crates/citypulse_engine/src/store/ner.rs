use chrono::Utc;
use citypulse_core::Entity;
use rusqlite::params;
use uuid::Uuid;

use super::{Store, StoreError};

impl Store {
    /// Record a new entity-extraction run and return its identity.
    pub fn create_ner_run(
        &self,
        model: &str,
        description: Option<&str>,
    ) -> Result<Uuid, StoreError> {
        let run = Uuid::new_v4();
        self.conn.execute(
            "insert into ner_models (id, model, description, created_at) values (?1, ?2, ?3, ?4)",
            params![run.to_string(), model, description, Utc::now().to_rfc3339()],
        )?;
        Ok(run)
    }

    /// Comments no run of `model` has scanned yet, newest first.
    pub fn unscanned_comment_ids(&self, model: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            select c.id
            from comments_raw c
            where not exists (
                select 1
                from ner_scans s
                join ner_models m on m.id = s.ner_model_id
                where s.comment_id = c.id and m.model = ?1
            )
            order by c.created_utc desc, c.id
            ",
        )?;
        let ids = stmt
            .query_map(params![model], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    pub fn insert_entity(
        &self,
        run: &Uuid,
        comment_id: &str,
        entity: &Entity,
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "
            insert into ner_results (comment_id, ner_model_id, label, text, start_char, end_char)
            values (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                comment_id,
                run.to_string(),
                entity.label,
                entity.text,
                entity.start as i64,
                entity.end as i64
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Mark `comment_id` as fully scanned by `run`, removing it from the frontier.
    pub fn mark_scanned(&self, run: &Uuid, comment_id: &str) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "insert or ignore into ner_scans (comment_id, ner_model_id) values (?1, ?2)",
            params![comment_id, run.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Entities stored for `comment_id` by `run`, in text order.
    pub fn entities_for(&self, run: &Uuid, comment_id: &str) -> Result<Vec<Entity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            select label, text, start_char, end_char
            from ner_results
            where ner_model_id = ?1 and comment_id = ?2
            order by start_char
            ",
        )?;
        let entities = stmt
            .query_map(params![run.to_string(), comment_id], |row| {
                Ok(Entity {
                    label: row.get(0)?,
                    text: row.get(1)?,
                    start: row.get::<_, i64>(2)? as usize,
                    end: row.get::<_, i64>(3)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entities)
    }
}

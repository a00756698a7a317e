use citypulse_core::GeocodeHit;
use rusqlite::params;

use super::{Store, StoreError};

impl Store {
    /// Extracted location texts without a resolution, most mentioned first.
    pub fn ungeocoded_texts(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            select text
            from ner_results
            where text not in (select location_text from geocode)
            group by text
            order by count(*) desc, text
            ",
        )?;
        let texts = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(texts)
    }

    /// Store the provider payload (once per provider id) and the text's
    /// resolution as one transaction. Returns the number of rows written.
    pub fn insert_geocode(
        &self,
        location_text: &str,
        hit: &GeocodeHit,
    ) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let payload = tx.execute(
            "insert or ignore into locations_raw (id, response) values (?1, ?2)",
            params![hit.id, hit.raw],
        )?;
        let resolution = tx.execute(
            "insert into geocode (location_text, location_id) values (?1, ?2)",
            params![location_text, hit.id],
        )?;
        tx.commit()?;
        Ok(payload + resolution)
    }

    pub fn count_locations(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from locations_raw", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Provider ids `location_text` resolves to.
    pub fn resolutions_for(&self, location_text: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "select location_id from geocode where location_text = ?1 order by location_id",
        )?;
        let ids = stmt
            .query_map(params![location_text], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

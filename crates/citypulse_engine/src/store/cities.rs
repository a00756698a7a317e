use citypulse_core::Summary;
use rusqlite::{params, OptionalExtension, Row};

use super::{Store, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub id: String,
    pub city: String,
    pub country_name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub mentions: u64,
    pub wiki_summary: Option<String>,
    pub wiki_link: Option<String>,
}

impl City {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            city: row.get(1)?,
            country_name: row.get(2)?,
            lat: row.get(3)?,
            lng: row.get(4)?,
            mentions: row.get::<_, i64>(5)? as u64,
            wiki_summary: row.get(6)?,
            wiki_link: row.get(7)?,
        })
    }
}

impl Store {
    /// Recount mentions per populated place and upsert the `cities` table.
    ///
    /// A city's mentions are the distinct comments naming any text resolved to
    /// it. Summary columns of existing rows are left untouched.
    pub fn rebuild_cities(&self) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "
            insert into cities (id, city, country_name, lat, lng, mentions)
            select
                l.id,
                json_extract(l.response, '$.name'),
                json_extract(l.response, '$.countryName'),
                cast(json_extract(l.response, '$.lat') as real),
                cast(json_extract(l.response, '$.lng') as real),
                count(distinct r.comment_id)
            from locations_raw l
            join geocode g on g.location_id = l.id
            join ner_results r on r.text = g.location_text
            where json_extract(l.response, '$.fcl') = 'P'
                and json_extract(l.response, '$.name') is not null
            group by l.id
            on conflict (id) do update set
                city = excluded.city,
                country_name = excluded.country_name,
                lat = excluded.lat,
                lng = excluded.lng,
                mentions = excluded.mentions
            ",
            [],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    /// Cities still lacking a summary link, most mentioned first.
    pub fn cities_without_summary(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "select id from cities where wiki_link is null order by mentions desc, id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    pub fn city_name(&self, id: &str) -> Result<Option<String>, StoreError> {
        let name = self
            .conn
            .query_row("select city from cities where id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(name)
    }

    /// Fill the derived summary columns; returns whether the city exists.
    pub fn set_summary(&self, id: &str, summary: &Summary) -> Result<bool, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "update cities set wiki_summary = ?1, wiki_link = ?2 where id = ?3",
            params![summary.html, summary.link, id],
        )?;
        tx.commit()?;
        Ok(changed == 1)
    }

    pub fn list_cities(&self) -> Result<Vec<City>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            select id, city, country_name, lat, lng, mentions, wiki_summary, wiki_link
            from cities
            order by mentions desc, id
            ",
        )?;
        let cities = stmt
            .query_map([], City::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cities)
    }
}

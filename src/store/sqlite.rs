use anyhow::{Context, Result};
use itertools::Itertools;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::model::{
    edges_to_json, Evolution, Pokemon, PokemonFilter, PokemonRecord, Sorting,
};
use crate::store::traits::{PokemonReader, PokemonWriter};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given database URL
    /// (e.g. `sqlite://./data/db.sqlite3?mode=rwc`).
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// Create the pokemon table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pokemon (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                num TEXT NOT NULL UNIQUE,
                img TEXT NOT NULL,
                type TEXT NOT NULL,
                height REAL NOT NULL,
                weight REAL NOT NULL,
                candy TEXT NOT NULL,
                candy_count INTEGER,
                egg REAL,
                spawn_chance REAL NOT NULL,
                avg_spawns REAL NOT NULL,
                spawn_time TEXT NOT NULL,
                multipliers TEXT,
                weaknesses TEXT NOT NULL,
                prev_evolution TEXT,
                next_evolution TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to run pokemon table migration")?;

        Ok(())
    }

    /// Whether the table holds no rows yet. Used to decide seeding.
    pub async fn is_empty(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pokemon")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count pokemon")?;
        Ok(count == 0)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn record_from_row(row: &SqliteRow) -> PokemonRecord {
    PokemonRecord {
        id: row.get("id"),
        num: row.get("num"),
        name: row.get("name"),
        img: row.get("img"),
        types: row.get("type"),
        height: row.get("height"),
        weight: row.get("weight"),
        candy: row.get("candy"),
        candy_count: row.get("candy_count"),
        egg: row.get("egg"),
        spawn_chance: row.get("spawn_chance"),
        avg_spawns: row.get("avg_spawns"),
        spawn_time: row.get("spawn_time"),
        multipliers: row.get("multipliers"),
        weaknesses: row.get("weaknesses"),
        prev_evolution: row.get("prev_evolution"),
        next_evolution: row.get("next_evolution"),
    }
}

fn pokemon_from_row(row: &SqliteRow) -> Result<Pokemon> {
    record_from_row(row)
        .into_pokemon()
        .context("Failed to decode pokemon row")
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

/// Build the list query. Integer ids are inlined (no injection surface),
/// LIKE patterns are returned as bind parameters in order.
fn build_list_sql(filter: &PokemonFilter, sorting: &Sorting) -> (String, Vec<String>) {
    let mut sql = String::from("SELECT * FROM pokemon");
    let mut params = Vec::new();
    let mut clauses = Vec::new();

    if let Some(ids) = &filter.ids {
        if ids.is_empty() {
            // an empty id set matches nothing, not everything
            clauses.push("0 = 1".to_string());
        } else {
            clauses.push(format!("id IN ({})", ids.iter().join(", ")));
        }
    }
    if let Some(types) = &filter.types {
        if !types.is_empty() {
            clauses.push(format!(
                "({})",
                types.iter().map(|_| "type LIKE ?").join(" OR ")
            ));
            params.extend(types.iter().map(|t| like_pattern(t)));
        }
    }
    if let Some(names) = &filter.names {
        if !names.is_empty() {
            clauses.push(format!(
                "({})",
                names.iter().map(|_| "name LIKE ?").join(" OR ")
            ));
            params.extend(names.iter().map(|n| like_pattern(n)));
        }
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let default_sorting = Sorting::default();
    let sorting = if sorting.keys.is_empty() {
        &default_sorting
    } else {
        sorting
    };
    let order = sorting
        .keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            if i == 0 {
                format!("{} {}", key.column(), sorting.direction.as_sql())
            } else {
                key.column().to_string()
            }
        })
        .join(", ");
    sql.push_str(" ORDER BY ");
    sql.push_str(&order);

    (sql, params)
}

/// Build the weakness-suggestion scan: exclude every pokemon whose type
/// overlaps `excluded_types`, keep those whose weaknesses overlap
/// `weak_to`.
fn build_weak_sql(excluded_types: &[String], weak_to: &[String]) -> (String, Vec<String>) {
    let mut params = Vec::new();
    let mut groups = Vec::new();

    if !excluded_types.is_empty() {
        groups.push(format!(
            "({})",
            excluded_types.iter().map(|_| "type NOT LIKE ?").join(" AND ")
        ));
        params.extend(excluded_types.iter().map(|t| like_pattern(t)));
    }
    if weak_to.is_empty() {
        groups.push("0 = 1".to_string());
    } else {
        groups.push(format!(
            "({})",
            weak_to.iter().map(|_| "weaknesses LIKE ?").join(" OR ")
        ));
        params.extend(weak_to.iter().map(|t| like_pattern(t)));
    }

    let sql = format!("SELECT * FROM pokemon WHERE {}", groups.join(" AND "));
    (sql, params)
}

#[async_trait::async_trait]
impl PokemonReader for SqliteStore {
    async fn list(&self, filter: &PokemonFilter, sorting: &Sorting) -> Result<Vec<Pokemon>> {
        let (sql, params) = build_list_sql(filter, sorting);
        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list pokemon")?;

        rows.iter().map(pokemon_from_row).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Pokemon>> {
        let row = sqlx::query("SELECT * FROM pokemon WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch pokemon by id")?;

        row.as_ref().map(pokemon_from_row).transpose()
    }

    async fn get_by_num(&self, num: &str) -> Result<Option<Pokemon>> {
        let row = sqlx::query("SELECT * FROM pokemon WHERE num = ?")
            .bind(num)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch pokemon by pokedex number")?;

        row.as_ref().map(pokemon_from_row).transpose()
    }

    async fn list_weak_candidates(
        &self,
        excluded_types: &[String],
        weak_to: &[String],
    ) -> Result<Vec<Pokemon>> {
        let (sql, params) = build_weak_sql(excluded_types, weak_to);
        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to scan weak candidates")?;

        rows.iter().map(pokemon_from_row).collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Storage ping failed")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PokemonWriter for SqliteStore {
    async fn insert(&self, record: &PokemonRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO pokemon (
                num, name, img, type, height, weight, candy, candy_count, egg,
                spawn_chance, avg_spawns, spawn_time, multipliers, weaknesses,
                prev_evolution, next_evolution
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.num)
        .bind(&record.name)
        .bind(&record.img)
        .bind(&record.types)
        .bind(record.height)
        .bind(record.weight)
        .bind(&record.candy)
        .bind(record.candy_count)
        .bind(record.egg)
        .bind(record.spawn_chance)
        .bind(record.avg_spawns)
        .bind(&record.spawn_time)
        .bind(&record.multipliers)
        .bind(&record.weaknesses)
        .bind(&record.prev_evolution)
        .bind(&record.next_evolution)
        .execute(&self.pool)
        .await
        .context("Failed to insert pokemon")?;

        Ok(result.last_insert_rowid())
    }

    async fn update_evolutions(
        &self,
        num: &str,
        prev: &[Evolution],
        next: &[Evolution],
    ) -> Result<()> {
        let prev_json = edges_to_json(prev).context("Failed to encode prev_evolution")?;
        let next_json = edges_to_json(next).context("Failed to encode next_evolution")?;

        sqlx::query("UPDATE pokemon SET prev_evolution = ?, next_evolution = ? WHERE num = ?")
            .bind(&prev_json)
            .bind(&next_json)
            .bind(num)
            .execute(&self.pool)
            .await
            .context("Failed to update evolution edges")?;

        Ok(())
    }
}

use std::cmp::Ordering;

use anyhow::Result;
use parking_lot::RwLock;

use crate::model::{
    edges_to_json, Evolution, Pokemon, PokemonFilter, PokemonRecord, SortDirection, SortKey,
    Sorting,
};
use crate::store::traits::{PokemonReader, PokemonWriter};

/// In-memory store mirroring the observable semantics of [`SqliteStore`],
/// including substring matching over the serialized JSON columns. Exists
/// so logic-layer tests run against the trait without a database file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<PokemonRecord>,
    next_id: i64,
}

// SQLite LIKE is case-insensitive for ASCII; mirror that here.
fn like(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn compare_by_key(a: &PokemonRecord, b: &PokemonRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Num => a.num.cmp(&b.num),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Img => a.img.cmp(&b.img),
        SortKey::Type => a.types.cmp(&b.types),
        SortKey::Height => a.height.partial_cmp(&b.height).unwrap_or(Ordering::Equal),
        SortKey::Weight => a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal),
        SortKey::Candy => a.candy.cmp(&b.candy),
        SortKey::CandyCount => a.candy_count.cmp(&b.candy_count),
        SortKey::Egg => a.egg.partial_cmp(&b.egg).unwrap_or(Ordering::Equal),
        SortKey::SpawnChance => a
            .spawn_chance
            .partial_cmp(&b.spawn_chance)
            .unwrap_or(Ordering::Equal),
        SortKey::AvgSpawns => a
            .avg_spawns
            .partial_cmp(&b.avg_spawns)
            .unwrap_or(Ordering::Equal),
        SortKey::SpawnTime => a.spawn_time.cmp(&b.spawn_time),
        SortKey::Weaknesses => a.weaknesses.cmp(&b.weaknesses),
    }
}

fn matches(record: &PokemonRecord, filter: &PokemonFilter) -> bool {
    if let Some(ids) = &filter.ids {
        if !ids.contains(&record.id) {
            return false;
        }
    }
    if let Some(types) = &filter.types {
        if !types.is_empty() && !types.iter().any(|t| like(&record.types, t)) {
            return false;
        }
    }
    if let Some(names) = &filter.names {
        if !names.is_empty() && !names.iter().any(|n| like(&record.name, n)) {
            return false;
        }
    }
    true
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PokemonReader for MemoryStore {
    async fn list(&self, filter: &PokemonFilter, sorting: &Sorting) -> Result<Vec<Pokemon>> {
        let mut rows: Vec<PokemonRecord> = self
            .inner
            .read()
            .rows
            .iter()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect();

        let default_sorting = Sorting::default();
        let sorting = if sorting.keys.is_empty() {
            &default_sorting
        } else {
            sorting
        };
        rows.sort_by(|a, b| {
            for (i, key) in sorting.keys.iter().enumerate() {
                let mut ord = compare_by_key(a, b, *key);
                if i == 0 && sorting.direction == SortDirection::Desc {
                    ord = ord.reverse();
                }
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        rows.into_iter()
            .map(|r| r.into_pokemon().map_err(Into::into))
            .collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Pokemon>> {
        let record = self
            .inner
            .read()
            .rows
            .iter()
            .find(|r| r.id == id)
            .cloned();
        record
            .map(|r| r.into_pokemon().map_err(Into::into))
            .transpose()
    }

    async fn get_by_num(&self, num: &str) -> Result<Option<Pokemon>> {
        let record = self
            .inner
            .read()
            .rows
            .iter()
            .find(|r| r.num == num)
            .cloned();
        record
            .map(|r| r.into_pokemon().map_err(Into::into))
            .transpose()
    }

    async fn list_weak_candidates(
        &self,
        excluded_types: &[String],
        weak_to: &[String],
    ) -> Result<Vec<Pokemon>> {
        let rows: Vec<PokemonRecord> = self
            .inner
            .read()
            .rows
            .iter()
            .filter(|r| {
                excluded_types.iter().all(|t| !like(&r.types, t))
                    && weak_to.iter().any(|t| like(&r.weaknesses, t))
            })
            .cloned()
            .collect();

        rows.into_iter()
            .map(|r| r.into_pokemon().map_err(Into::into))
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl PokemonWriter for MemoryStore {
    async fn insert(&self, record: &PokemonRecord) -> Result<i64> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(PokemonRecord {
            id,
            ..record.clone()
        });
        Ok(id)
    }

    async fn update_evolutions(
        &self,
        num: &str,
        prev: &[Evolution],
        next: &[Evolution],
    ) -> Result<()> {
        let prev_json = edges_to_json(prev)?;
        let next_json = edges_to_json(next)?;
        let mut inner = self.inner.write();
        if let Some(row) = inner.rows.iter_mut().find(|r| r.num == num) {
            row.prev_evolution = Some(prev_json);
            row.next_evolution = Some(next_json);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(num: &str, name: &str, types: &[&str], spawn_chance: f64) -> PokemonRecord {
        PokemonRecord {
            id: 0,
            num: num.to_string(),
            name: name.to_string(),
            img: format!("http://img/{}.png", num),
            types: serde_json::to_string(types).unwrap(),
            height: 1.0,
            weight: 10.0,
            candy: "None".to_string(),
            candy_count: None,
            egg: None,
            spawn_chance,
            avg_spawns: 1.0,
            spawn_time: "12:00".to_string(),
            multipliers: None,
            weaknesses: "[]".to_string(),
            prev_evolution: None,
            next_evolution: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert(&record("001", "Bulbasaur", &["Grass"], 0.69)).await.unwrap();
        let b = store.insert(&record("002", "Ivysaur", &["Grass"], 0.04)).await.unwrap();
        assert_eq!((a, b), (1, 2));
    }

    #[tokio::test]
    async fn type_matching_is_case_insensitive_like_sqlite() {
        let store = MemoryStore::new();
        store.insert(&record("004", "Charmander", &["Fire"], 0.25)).await.unwrap();

        let filter = PokemonFilter {
            types: Some(vec!["fire".to_string()]),
            ..Default::default()
        };
        let found = store.list(&filter, &Sorting::default()).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn sorting_applies_direction_to_first_key_only() {
        let store = MemoryStore::new();
        store.insert(&record("001", "Bulbasaur", &["Grass"], 0.69)).await.unwrap();
        store.insert(&record("004", "Charmander", &["Fire"], 0.25)).await.unwrap();
        store.insert(&record("007", "Squirtle", &["Water"], 0.58)).await.unwrap();

        let sorting = Sorting {
            keys: vec![SortKey::SpawnChance],
            direction: SortDirection::Desc,
        };
        let listed = store.list(&PokemonFilter::default(), &sorting).await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bulbasaur", "Squirtle", "Charmander"]);
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Evolution, Pokemon};

/// A pokemon as stored in the `pokemon` table. List-valued attributes
/// (`type`, `weaknesses`, `multipliers`, evolution edges) are serialized
/// JSON text, measurements are bare numbers without unit suffixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: i64,
    pub num: String,
    pub name: String,
    pub img: String,
    pub types: String,
    pub height: f64,
    pub weight: f64,
    pub candy: String,
    pub candy_count: Option<i64>,
    pub egg: Option<f64>,
    pub spawn_chance: f64,
    pub avg_spawns: f64,
    pub spawn_time: String,
    pub multipliers: Option<String>,
    pub weaknesses: String,
    pub prev_evolution: Option<String>,
    pub next_evolution: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid measurement {0:?}: expected a leading number")]
    Measurement(String),
    #[error("corrupt json in column {column}")]
    Json {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Egg distance sentinel for pokemon that never hatch.
pub const NOT_IN_EGGS: &str = "Not in Eggs";

fn parse_measurement(value: &str) -> Result<f64, RecordError> {
    value
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| RecordError::Measurement(value.to_string()))
}

fn to_json<T: Serialize>(column: &'static str, value: &T) -> Result<String, RecordError> {
    serde_json::to_string(value).map_err(|source| RecordError::Json { column, source })
}

fn from_json<T: serde::de::DeserializeOwned>(
    column: &'static str,
    value: &str,
) -> Result<T, RecordError> {
    serde_json::from_str(value).map_err(|source| RecordError::Json { column, source })
}

impl PokemonRecord {
    /// Convert a stored row into the wire shape, attaching unit suffixes
    /// and mapping the egg sentinel.
    pub fn into_pokemon(self) -> Result<Pokemon, RecordError> {
        let egg = match self.egg {
            Some(km) if km > 0.0 => format!("{} km", km),
            _ => NOT_IN_EGGS.to_string(),
        };
        Ok(Pokemon {
            id: self.id,
            pokedex_number: self.num,
            name: self.name,
            img: self.img,
            types: from_json("type", &self.types)?,
            height: format!("{} m", self.height),
            weight: format!("{} kg", self.weight),
            candy: self.candy,
            candy_count: self.candy_count,
            egg,
            spawn_chance: self.spawn_chance,
            avg_spawns: self.avg_spawns,
            spawn_time: self.spawn_time,
            multipliers: self
                .multipliers
                .as_deref()
                .map(|m| from_json("multipliers", m))
                .transpose()?,
            weaknesses: from_json("weaknesses", &self.weaknesses)?,
            prev_evolution: self
                .prev_evolution
                .as_deref()
                .map(|p| from_json("prev_evolution", p))
                .transpose()?,
            next_evolution: self
                .next_evolution
                .as_deref()
                .map(|n| from_json("next_evolution", n))
                .transpose()?,
        })
    }
}

impl Pokemon {
    /// Convert the wire shape into a storable row. Fails when a
    /// measurement string has no leading number.
    pub fn to_record(&self) -> Result<PokemonRecord, RecordError> {
        let egg = if self.egg == NOT_IN_EGGS {
            None
        } else {
            Some(parse_measurement(&self.egg)?)
        };
        Ok(PokemonRecord {
            id: self.id,
            num: self.pokedex_number.clone(),
            name: self.name.clone(),
            img: self.img.clone(),
            types: to_json("type", &self.types)?,
            height: parse_measurement(&self.height)?,
            weight: parse_measurement(&self.weight)?,
            candy: self.candy.clone(),
            candy_count: self.candy_count,
            egg,
            spawn_chance: self.spawn_chance,
            avg_spawns: self.avg_spawns,
            spawn_time: self.spawn_time.clone(),
            multipliers: self
                .multipliers
                .as_ref()
                .map(|m| to_json("multipliers", m))
                .transpose()?,
            weaknesses: to_json("weaknesses", &self.weaknesses)?,
            prev_evolution: self
                .prev_evolution
                .as_ref()
                .map(|p| to_json("prev_evolution", p))
                .transpose()?,
            next_evolution: self
                .next_evolution
                .as_ref()
                .map(|n| to_json("next_evolution", n))
                .transpose()?,
        })
    }
}

/// Serialize an edge list for the evolution columns. An empty list is
/// written as `[]`, not NULL, matching how edge patches behave.
pub fn edges_to_json(edges: &[Evolution]) -> Result<String, RecordError> {
    to_json("evolution", &edges)
}

use serde::{Deserialize, Serialize};

/// A directed evolution-chain reference. Edges are keyed by the pokedex
/// number (the natural key), never by the storage-assigned `id`, because
/// the same pokedex can be re-imported with different surrogate ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    pub num: String,
    pub name: String,
}

impl Evolution {
    pub fn new(num: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            name: name.into(),
        }
    }
}

/// A pokemon as it appears on the wire. Physical measurements carry their
/// unit suffix ("0.71 m", "6.9 kg", "2 km"); `egg` uses the sentinel
/// "Not in Eggs" for pokemon that never hatch. The bare numbers live in
/// [`PokemonRecord`](crate::model::PokemonRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    /// Storage-assigned surrogate key. Absent on create requests.
    #[serde(default)]
    pub id: i64,
    /// Zero-padded pokedex number, unique. The natural key used by
    /// evolution edges.
    pub pokedex_number: String,
    pub name: String,
    pub img: String,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub height: String,
    pub weight: String,
    pub candy: String,
    pub candy_count: Option<i64>,
    pub egg: String,
    pub spawn_chance: f64,
    pub avg_spawns: f64,
    pub spawn_time: String,
    pub multipliers: Option<Vec<f64>>,
    pub weaknesses: Vec<String>,
    pub prev_evolution: Option<Vec<Evolution>>,
    pub next_evolution: Option<Vec<Evolution>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pokemon_serializes_with_camel_case_field_names() {
        let pokemon = Pokemon {
            id: 1,
            pokedex_number: "001".to_string(),
            name: "Bulbasaur".to_string(),
            img: "http://img/001.png".to_string(),
            types: vec!["Grass".to_string(), "Poison".to_string()],
            height: "0.71 m".to_string(),
            weight: "6.9 kg".to_string(),
            candy: "Bulbasaur Candy".to_string(),
            candy_count: Some(25),
            egg: "2 km".to_string(),
            spawn_chance: 0.69,
            avg_spawns: 69.0,
            spawn_time: "20:00".to_string(),
            multipliers: Some(vec![1.58]),
            weaknesses: vec!["Fire".to_string()],
            prev_evolution: None,
            next_evolution: Some(vec![Evolution::new("002", "Ivysaur")]),
        };

        let json = serde_json::to_value(&pokemon).unwrap();
        assert_eq!(json["pokedexNumber"], "001");
        assert_eq!(json["type"][0], "Grass");
        assert_eq!(json["candyCount"], 25);
        assert_eq!(json["spawnChance"], 0.69);
        assert_eq!(json["nextEvolution"][0]["num"], "002");
        assert_eq!(json["prevEvolution"], serde_json::Value::Null);
    }

    #[test]
    fn create_request_body_deserializes_without_id() {
        let json = r#"{
            "pokedexNumber": "152",
            "name": "Chikorita",
            "img": "http://img/152.png",
            "type": ["Grass"],
            "height": "0.89 m",
            "weight": "6.4 kg",
            "candy": "Chikorita Candy",
            "candyCount": 25,
            "egg": "5 km",
            "spawnChance": 0.1,
            "avgSpawns": 10,
            "spawnTime": "12:00",
            "multipliers": null,
            "weaknesses": ["Fire", "Ice"],
            "prevEvolution": null,
            "nextEvolution": null
        }"#;

        let pokemon: Pokemon = serde_json::from_str(json).unwrap();
        assert_eq!(pokemon.id, 0);
        assert_eq!(pokemon.pokedex_number, "152");
        assert_eq!(pokemon.multipliers, None);
    }
}

use serde::{Deserialize, Serialize};

/// Read-path filter over the pokemon table. Clauses combine with AND;
/// the lists inside `types` and `names` combine with OR. Type and name
/// matching is substring-based (LIKE over the serialized column), which
/// can false-positive when one tag name is a substring of another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonFilter {
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<i64>>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl PokemonFilter {
    pub fn by_ids(ids: Vec<i64>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sortable columns, closed so arbitrary strings never reach ORDER BY.
/// Accepts both the column name and the camelCase wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Num,
    Name,
    Img,
    Type,
    Height,
    Weight,
    Candy,
    CandyCount,
    Egg,
    SpawnChance,
    AvgSpawns,
    SpawnTime,
    Weaknesses,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "num" | "pokedexNumber" => Some(Self::Num),
            "name" => Some(Self::Name),
            "img" => Some(Self::Img),
            "type" => Some(Self::Type),
            "height" => Some(Self::Height),
            "weight" => Some(Self::Weight),
            "candy" => Some(Self::Candy),
            "candy_count" | "candyCount" => Some(Self::CandyCount),
            "egg" => Some(Self::Egg),
            "spawn_chance" | "spawnChance" => Some(Self::SpawnChance),
            "avg_spawns" | "avgSpawns" => Some(Self::AvgSpawns),
            "spawn_time" | "spawnTime" => Some(Self::SpawnTime),
            "weaknesses" => Some(Self::Weaknesses),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Num => "num",
            Self::Name => "name",
            Self::Img => "img",
            Self::Type => "type",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Candy => "candy",
            Self::CandyCount => "candy_count",
            Self::Egg => "egg",
            Self::SpawnChance => "spawn_chance",
            Self::AvgSpawns => "avg_spawns",
            Self::SpawnTime => "spawn_time",
            Self::Weaknesses => "weaknesses",
        }
    }
}

/// Sort order for list queries. The direction applies to the first key
/// only; later keys break ties in storage-default order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sorting {
    pub keys: Vec<SortKey>,
    pub direction: SortDirection,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            keys: vec![SortKey::Id],
            direction: SortDirection::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_accepts_column_and_wire_names() {
        assert_eq!(SortKey::parse("spawn_chance"), Some(SortKey::SpawnChance));
        assert_eq!(SortKey::parse("spawnChance"), Some(SortKey::SpawnChance));
        assert_eq!(SortKey::parse("pokedexNumber"), Some(SortKey::Num));
        assert_eq!(SortKey::parse("num"), Some(SortKey::Num));
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        assert_eq!(SortKey::parse("id; DROP TABLE pokemon"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn default_sorting_is_id_ascending() {
        let sorting = Sorting::default();
        assert_eq!(sorting.keys, vec![SortKey::Id]);
        assert_eq!(sorting.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_direction_parses_lowercase_only() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("DESC"), None);
    }
}

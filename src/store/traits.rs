use crate::model::{Evolution, Pokemon, PokemonFilter, PokemonRecord, Sorting};
use anyhow::Result;

/// Read side of the storage boundary: filtered/sorted listing, point
/// lookups by surrogate id and by natural key, and the LIKE-based
/// candidate scan backing weakness suggestions.
#[async_trait::async_trait]
pub trait PokemonReader: Send + Sync {
    async fn list(&self, filter: &PokemonFilter, sorting: &Sorting) -> Result<Vec<Pokemon>>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Pokemon>>;
    async fn get_by_num(&self, num: &str) -> Result<Option<Pokemon>>;
    /// All pokemon whose `type` column matches none of `excluded_types`
    /// and whose `weaknesses` column matches at least one of `weak_to`.
    /// Matching is substring-based over the serialized JSON text.
    async fn list_weak_candidates(
        &self,
        excluded_types: &[String],
        weak_to: &[String],
    ) -> Result<Vec<Pokemon>>;
    /// Storage liveness probe for the healthcheck endpoint.
    async fn ping(&self) -> Result<()>;
}

/// Write side of the storage boundary. `update_evolutions` replaces both
/// edge columns wholesale; merging and deduplication happen in the
/// evolution maintainer, not here.
#[async_trait::async_trait]
pub trait PokemonWriter: Send + Sync {
    /// Insert a record and return the storage-assigned id. The record's
    /// own `id` field is ignored.
    async fn insert(&self, record: &PokemonRecord) -> Result<i64>;
    async fn update_evolutions(
        &self,
        num: &str,
        prev: &[Evolution],
        next: &[Evolution],
    ) -> Result<()>;
}

pub trait Store: PokemonReader + PokemonWriter + Send + Sync {}
impl<T: PokemonReader + PokemonWriter + Send + Sync> Store for T {}

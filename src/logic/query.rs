use crate::logic::PokedexError;
use crate::model::{Pokemon, PokemonFilter, Sorting};
use crate::store::traits::Store;

/// Fetch pokemon matching the filter, in the requested sort order. No
/// matches is an empty list, never an error.
pub async fn list<S: Store + ?Sized>(
    store: &S,
    filter: &PokemonFilter,
    sorting: &Sorting,
) -> Result<Vec<Pokemon>, PokedexError> {
    Ok(store.list(filter, sorting).await?)
}

/// Fetch a pokemon by id, optionally expanded with the full records of
/// its evolution-chain relatives. Returns `[primary, ...evolutions]`
/// with evolutions in ascending id order.
pub async fn get_by_id<S: Store + ?Sized>(
    store: &S,
    id: i64,
    include_evolutions: bool,
) -> Result<Vec<Pokemon>, PokedexError> {
    let primary = store
        .get_by_id(id)
        .await?
        .ok_or(PokedexError::NotFound)?;

    if !include_evolutions {
        return Ok(vec![primary]);
    }

    // Edges carry the pokedex number; resolving them coerces that natural
    // key to an id, which only lines up while the table is seeded in
    // pokedex order. Unparseable nums match nothing and are dropped.
    let ids: Vec<i64> = primary
        .prev_evolution
        .iter()
        .flatten()
        .chain(primary.next_evolution.iter().flatten())
        .filter_map(|edge| edge.num.parse().ok())
        .collect();

    let evolutions = if ids.is_empty() {
        Vec::new()
    } else {
        store
            .list(&PokemonFilter::by_ids(ids), &Sorting::default())
            .await?
    };

    let mut result = vec![primary];
    result.extend(evolutions);
    Ok(result)
}

/// Suggest pokemon that are weak against the subject: every candidate is
/// weak to at least one of the subject's types, and none of the
/// candidate's own types appear in the subject's weaknesses.
pub async fn suggest_weak<S: Store + ?Sized>(
    store: &S,
    id: i64,
) -> Result<Vec<Pokemon>, PokedexError> {
    let subject = store
        .get_by_id(id)
        .await?
        .ok_or(PokedexError::NotFound)?;

    if subject.types.is_empty() {
        return Ok(Vec::new());
    }

    Ok(store
        .list_weak_candidates(&subject.weaknesses, &subject.types)
        .await?)
}

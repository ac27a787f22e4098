use anyhow::anyhow;
use itertools::Itertools;

use crate::logic::PokedexError;
use crate::model::{Evolution, Pokemon, RecordError};
use crate::store::traits::Store;

/// Which side of an adjacency a submitted edge list describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Prev,
    Next,
}

fn dedup_edges(edges: Option<&Vec<Evolution>>) -> Vec<Evolution> {
    edges
        .into_iter()
        .flatten()
        .cloned()
        .unique_by(|e| e.num.clone())
        .collect()
}

/// Create a pokemon and propagate its evolution edges across the chain.
///
/// The record is persisted first; afterwards every creature referenced in
/// `prevEvolution` gets the new creature appended to its `nextEvolution`,
/// and every creature referenced in `nextEvolution` gets it appended to
/// its `prevEvolution`. While walking a side, edges found on referenced
/// creatures but missing from the submitted list are merged in, so a
/// chain whose earlier members carry complete lists is repaired
/// transitively (creating C at the end of A -> B updates A as well, even
/// when only B was submitted).
///
/// There is no transaction around the walk: a failure partway leaves the
/// already-updated creatures persisted and surfaces as
/// [`PokedexError::Propagation`]. The widened chain view is only used to
/// decide which creatures receive edge updates; it is not written back to
/// the new record, which is returned as submitted with the assigned id.
pub async fn create<S: Store + ?Sized>(
    store: &S,
    pokemon: &Pokemon,
) -> Result<Pokemon, PokedexError> {
    let record = pokemon.to_record().map_err(|e| match e {
        RecordError::Measurement(_) => PokedexError::Validation(e.to_string()),
        other => PokedexError::Storage(other.into()),
    })?;
    let id = store.insert(&record).await?;

    let edge = Evolution::new(pokemon.pokedex_number.clone(), pokemon.name.clone());
    let mut prev_chain = dedup_edges(pokemon.prev_evolution.as_ref());
    let mut next_chain = dedup_edges(pokemon.next_evolution.as_ref());

    let mut applied = 0;
    if let Err(source) =
        propagate(store, &mut prev_chain, Direction::Prev, &edge, &mut applied).await
    {
        return Err(PokedexError::Propagation {
            applied,
            total: prev_chain.len() + next_chain.len(),
            source,
        });
    }
    if let Err(source) =
        propagate(store, &mut next_chain, Direction::Next, &edge, &mut applied).await
    {
        return Err(PokedexError::Propagation {
            applied,
            total: prev_chain.len() + next_chain.len(),
            source,
        });
    }

    Ok(Pokemon {
        id,
        ..pokemon.clone()
    })
}

/// Walk one side of the submitted chain, appending `edge` onto the
/// opposite list of every referenced creature. The chain widens in place
/// as referenced creatures reveal further members.
async fn propagate<S: Store + ?Sized>(
    store: &S,
    chain: &mut Vec<Evolution>,
    direction: Direction,
    edge: &Evolution,
    applied: &mut usize,
) -> anyhow::Result<()> {
    let mut i = 0;
    while i < chain.len() {
        let num = chain[i].num.clone();
        let referenced = store
            .get_by_num(&num)
            .await?
            .ok_or_else(|| anyhow!("referenced pokemon {} does not exist", num))?;

        let further = match direction {
            Direction::Prev => referenced.prev_evolution.as_ref(),
            Direction::Next => referenced.next_evolution.as_ref(),
        };
        for entry in further.into_iter().flatten() {
            if !chain.iter().any(|e| e.num == entry.num) {
                chain.push(entry.clone());
            }
        }

        let new_edge = std::slice::from_ref(edge);
        match direction {
            Direction::Prev => add_evolutions(store, &num, &[], new_edge).await?,
            Direction::Next => add_evolutions(store, &num, new_edge, &[]).await?,
        };
        *applied += 1;
        i += 1;
    }
    Ok(())
}

/// Merge new edges onto a creature's evolution lists and persist. The
/// merge deduplicates by `num`, so repeating a call with the same edge is
/// a no-op rather than an accumulating duplicate. Returns the re-fetched
/// post-write state.
pub async fn add_evolutions<S: Store + ?Sized>(
    store: &S,
    pokedex_number: &str,
    new_prev: &[Evolution],
    new_next: &[Evolution],
) -> Result<Pokemon, PokedexError> {
    let current = store
        .get_by_num(pokedex_number)
        .await?
        .ok_or(PokedexError::NotFound)?;

    let prev = merge_edges(current.prev_evolution.unwrap_or_default(), new_prev);
    let next = merge_edges(current.next_evolution.unwrap_or_default(), new_next);
    store.update_evolutions(pokedex_number, &prev, &next).await?;

    store
        .get_by_num(pokedex_number)
        .await?
        .ok_or(PokedexError::NotFound)
}

fn merge_edges(existing: Vec<Evolution>, new: &[Evolution]) -> Vec<Evolution> {
    existing
        .into_iter()
        .chain(new.iter().cloned())
        .unique_by(|e| e.num.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::query;
    use crate::store::{MemoryStore, PokemonReader, PokemonWriter};

    fn pokemon(num: &str, name: &str) -> Pokemon {
        Pokemon {
            id: 0,
            pokedex_number: num.to_string(),
            name: name.to_string(),
            img: format!("http://img/{}.png", num),
            types: vec!["Grass".to_string()],
            height: "1.0 m".to_string(),
            weight: "10.0 kg".to_string(),
            candy: format!("{} Candy", name),
            candy_count: Some(25),
            egg: "2 km".to_string(),
            spawn_chance: 0.1,
            avg_spawns: 10.0,
            spawn_time: "12:00".to_string(),
            multipliers: Some(vec![1.5]),
            weaknesses: vec!["Fire".to_string()],
            prev_evolution: None,
            next_evolution: None,
        }
    }

    async fn insert(store: &MemoryStore, pokemon: &Pokemon) -> i64 {
        store.insert(&pokemon.to_record().unwrap()).await.unwrap()
    }

    fn nums(edges: &Option<Vec<Evolution>>) -> Vec<&str> {
        edges
            .iter()
            .flatten()
            .map(|e| e.num.as_str())
            .collect()
    }

    #[tokio::test]
    async fn create_assigns_id_and_round_trips() {
        let store = MemoryStore::new();
        let submitted = pokemon("152", "Chikorita");

        let created = create(&store, &submitted).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(
            created,
            Pokemon {
                id: 1,
                ..submitted
            }
        );

        let fetched = query::get_by_id(&store, created.id, false).await.unwrap();
        assert_eq!(fetched, vec![created]);
    }

    #[tokio::test]
    async fn create_appends_new_edge_to_predecessor_without_disturbing_it() {
        let store = MemoryStore::new();
        let mut bulbasaur = pokemon("001", "Bulbasaur");
        bulbasaur.next_evolution = Some(vec![Evolution::new("002", "Ivysaur")]);
        insert(&store, &bulbasaur).await;

        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.prev_evolution = Some(vec![Evolution::new("001", "Bulbasaur")]);
        create(&store, &newcomer).await.unwrap();

        let updated = store.get_by_num("001").await.unwrap().unwrap();
        assert_eq!(nums(&updated.next_evolution), vec!["002", "152"]);
        assert_eq!(nums(&updated.prev_evolution), Vec::<&str>::new());
    }

    #[tokio::test]
    async fn create_with_next_reference_appends_to_far_side_prev() {
        let store = MemoryStore::new();
        insert(&store, &pokemon("003", "Venusaur")).await;

        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.next_evolution = Some(vec![Evolution::new("003", "Venusaur")]);
        create(&store, &newcomer).await.unwrap();

        let updated = store.get_by_num("003").await.unwrap().unwrap();
        assert_eq!(nums(&updated.prev_evolution), vec!["152"]);
        assert_eq!(nums(&updated.next_evolution), Vec::<&str>::new());
    }

    #[tokio::test]
    async fn create_repairs_chain_transitively() {
        let store = MemoryStore::new();
        insert(&store, &pokemon("001", "Bulbasaur")).await;
        let mut ivysaur = pokemon("002", "Ivysaur");
        ivysaur.prev_evolution = Some(vec![Evolution::new("001", "Bulbasaur")]);
        insert(&store, &ivysaur).await;

        // only 002 is submitted; 001 is discovered through 002's own list
        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.prev_evolution = Some(vec![Evolution::new("002", "Ivysaur")]);
        create(&store, &newcomer).await.unwrap();

        let bulbasaur = store.get_by_num("001").await.unwrap().unwrap();
        let ivysaur = store.get_by_num("002").await.unwrap().unwrap();
        assert_eq!(nums(&bulbasaur.next_evolution), vec!["152"]);
        assert_eq!(nums(&ivysaur.next_evolution), vec!["152"]);
    }

    #[tokio::test]
    async fn duplicate_submitted_edges_do_not_duplicate_far_side_entries() {
        let store = MemoryStore::new();
        insert(&store, &pokemon("001", "Bulbasaur")).await;

        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.prev_evolution = Some(vec![
            Evolution::new("001", "Bulbasaur"),
            Evolution::new("001", "Bulbasaur"),
        ]);
        create(&store, &newcomer).await.unwrap();

        let updated = store.get_by_num("001").await.unwrap().unwrap();
        assert_eq!(nums(&updated.next_evolution), vec!["152"]);
    }

    #[tokio::test]
    async fn create_does_not_write_widened_chain_back_to_new_record() {
        let store = MemoryStore::new();
        insert(&store, &pokemon("001", "Bulbasaur")).await;
        let mut ivysaur = pokemon("002", "Ivysaur");
        ivysaur.prev_evolution = Some(vec![Evolution::new("001", "Bulbasaur")]);
        insert(&store, &ivysaur).await;

        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.prev_evolution = Some(vec![Evolution::new("002", "Ivysaur")]);
        let created = create(&store, &newcomer).await.unwrap();

        // the returned and persisted record keep the submitted list
        assert_eq!(nums(&created.prev_evolution), vec!["002"]);
        let stored = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(nums(&stored.prev_evolution), vec!["002"]);
    }

    #[tokio::test]
    async fn missing_reference_surfaces_as_propagation_error() {
        let store = MemoryStore::new();
        insert(&store, &pokemon("001", "Bulbasaur")).await;

        let mut newcomer = pokemon("152", "Chikorita");
        newcomer.prev_evolution = Some(vec![
            Evolution::new("001", "Bulbasaur"),
            Evolution::new("999", "Missingno"),
        ]);
        match create(&store, &newcomer).await {
            Err(PokedexError::Propagation { applied, total, .. }) => {
                assert_eq!(applied, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected propagation error, got {:?}", other),
        }

        // the edge update that happened before the failure is persisted
        let updated = store.get_by_num("001").await.unwrap().unwrap();
        assert_eq!(nums(&updated.next_evolution), vec!["152"]);
    }

    #[tokio::test]
    async fn add_evolutions_is_idempotent() {
        let store = MemoryStore::new();
        let mut bulbasaur = pokemon("001", "Bulbasaur");
        bulbasaur.next_evolution = Some(vec![Evolution::new("002", "Ivysaur")]);
        insert(&store, &bulbasaur).await;

        let edge = [Evolution::new("152", "Chikorita")];
        add_evolutions(&store, "001", &[], &edge).await.unwrap();
        let updated = add_evolutions(&store, "001", &[], &edge).await.unwrap();

        assert_eq!(nums(&updated.next_evolution), vec!["002", "152"]);
    }

    #[tokio::test]
    async fn add_evolutions_unknown_num_is_not_found() {
        let store = MemoryStore::new();
        match add_evolutions(&store, "999", &[], &[]).await {
            Err(PokedexError::NotFound) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}

pub mod data;

use anyhow::{Context, Result};

use crate::store::traits::Store;

/// Insert the starter dataset in pokedex order, so storage-assigned ids
/// line up with pokedex numbers (evolution expansion resolves edge nums
/// through that alignment).
pub async fn load_seed_data<S: Store + ?Sized>(store: &S) -> Result<()> {
    for pokemon in data::starter_pokemon() {
        let record = pokemon
            .to_record()
            .context("Failed to encode seed pokemon")?;
        store.insert(&record).await?;
    }
    Ok(())
}

pub mod error;
pub mod evolution;
pub mod query;

pub use error::PokedexError;
pub use evolution::{add_evolutions, create};
pub use query::{get_by_id, list, suggest_weak};

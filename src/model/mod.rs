pub mod filter;
pub mod pokemon;
pub mod record;

pub use filter::{PokemonFilter, SortDirection, SortKey, Sorting};
pub use pokemon::{Evolution, Pokemon};
pub use record::{edges_to_json, PokemonRecord, RecordError, NOT_IN_EGGS};

use thiserror::Error;

/// Error taxonomy for the query and evolution-maintenance paths. None of
/// these are retried anywhere; storage failures propagate to the caller
/// on the first occurrence.
#[derive(Debug, Error)]
pub enum PokedexError {
    /// Requested id or pokedex number has no matching record.
    #[error("pokemon not found")]
    NotFound,

    /// Malformed filter, sort, or request-body input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A multi-step evolution-edge update stopped partway. The edge lists
    /// of creatures updated before the failure have been persisted; the
    /// rest have not, so the chain may be inconsistent.
    #[error(
        "evolution propagation incomplete: {applied} of {total} edge updates applied, \
         chain may be inconsistent"
    )]
    Propagation {
        applied: usize,
        total: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Underlying driver or I/O failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic::{self, PokedexError};
use crate::model::{Pokemon, PokemonFilter, SortDirection, SortKey, Sorting};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_reply(err: PokedexError) -> ApiError {
    let status = match &err {
        PokedexError::NotFound => StatusCode::NOT_FOUND,
        PokedexError::Validation(_) => StatusCode::BAD_REQUEST,
        PokedexError::Propagation { .. } | PokedexError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        log::error!("request failed: {}", err);
    }
    (status, Json(ErrorResponse::new(&err.to_string())))
}

fn split_csv(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.split(',').map(|s| s.to_string()).collect())
}

/// Name filter entries shorter than 3 characters are rejected at the
/// boundary; a one-letter LIKE pattern would match most of the table.
fn parse_name_filter(raw: Option<&str>) -> Result<Option<Vec<String>>, PokedexError> {
    let names = split_csv(raw);
    if let Some(names) = &names {
        if let Some(short) = names.iter().find(|n| n.chars().count() < 3) {
            return Err(PokedexError::Validation(format!(
                "name filter entry {:?} is shorter than 3 characters",
                short
            )));
        }
    }
    Ok(names)
}

fn parse_sorting(keys: Option<&str>, direction: Option<&str>) -> Result<Sorting, PokedexError> {
    let mut sorting = Sorting::default();
    if let Some(raw_keys) = split_csv(keys) {
        sorting.keys = raw_keys
            .iter()
            .map(|k| {
                SortKey::parse(k)
                    .ok_or_else(|| PokedexError::Validation(format!("unknown sort key {:?}", k)))
            })
            .collect::<Result<Vec<SortKey>, PokedexError>>()?;
    }
    if let Some(raw) = direction {
        sorting.direction = SortDirection::parse(raw).ok_or_else(|| {
            PokedexError::Validation(format!("sortDirection must be asc or desc, got {:?}", raw))
        })?;
    }
    Ok(sorting)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Name substrings to search for. Comma separated values.
    pub name: Option<String>,
    /// Type tags to filter by. Comma separated values.
    #[serde(rename = "type")]
    pub type_tags: Option<String>,
    /// Columns to sort by. Comma separated values.
    pub sorting: Option<String>,
    #[serde(rename = "sortDirection")]
    pub sort_direction: Option<String>,
}

pub async fn list_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    let filter = PokemonFilter {
        ids: None,
        types: split_csv(query.type_tags.as_deref()),
        names: parse_name_filter(query.name.as_deref()).map_err(error_reply)?,
    };
    let sorting = parse_sorting(query.sorting.as_deref(), query.sort_direction.as_deref())
        .map_err(error_reply)?;

    logic::list(&*store, &filter, &sorting)
        .await
        .map(Json)
        .map_err(error_reply)
}

pub async fn get_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    logic::get_by_id(&*store, id, true)
        .await
        .map(Json)
        .map_err(error_reply)
}

pub async fn suggest_weak_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Pokemon>>, ApiError> {
    logic::suggest_weak(&*store, id)
        .await
        .map(Json)
        .map_err(error_reply)
}

#[derive(Debug, Deserialize)]
pub struct FilterByTypeQuery {
    #[serde(rename = "type")]
    pub type_tag: Option<String>,
    pub sorting: Option<String>,
    #[serde(rename = "sortDirection")]
    pub sort_direction: Option<String>,
}

/// Single-type convenience lookup returning only the first match, or
/// `null` when nothing matches.
pub async fn filter_by_type<S: Store>(
    State(store): State<AppState<S>>,
    Query(query): Query<FilterByTypeQuery>,
) -> Result<Json<Option<Pokemon>>, ApiError> {
    let filter = PokemonFilter {
        types: query.type_tag.map(|t| vec![t]),
        ..Default::default()
    };
    let sorting = parse_sorting(query.sorting.as_deref(), query.sort_direction.as_deref())
        .map_err(error_reply)?;

    let results = logic::list(&*store, &filter, &sorting)
        .await
        .map_err(error_reply)?;
    Ok(Json(results.into_iter().next()))
}

pub async fn create_pokemon<S: Store>(
    State(store): State<AppState<S>>,
    Json(body): Json<Pokemon>,
) -> Result<Json<Pokemon>, ApiError> {
    log::debug!("creating pokemon {} ({})", body.name, body.pokedex_number);
    logic::create(&*store, &body)
        .await
        .map(Json)
        .map_err(error_reply)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn healthcheck<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<HealthResponse>, ApiError> {
    if let Err(e) = store.ping().await {
        return Err(error_reply(PokedexError::Storage(e)));
    }
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

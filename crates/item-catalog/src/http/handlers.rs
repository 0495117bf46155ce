use crate::comparison::ItemComparison;
use crate::http::ApiError;
use crate::model::{Item, ItemCreate, ItemId, ItemUpdate};
use crate::services::ItemService;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use record_framework::EntityService;
use serde_json::{json, Value};

/// `GET /health_check`
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /items[?ids=..]`
pub async fn list_items(
    State(service): State<ItemService>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Item>>, ApiError> {
    let ids = parse_ids(query.as_deref())?;
    Ok(Json(service.list_items(ids).await?))
}

/// `GET /items/compare?ids=..`
pub async fn compare_items(
    State(service): State<ItemService>,
    RawQuery(query): RawQuery,
) -> Result<Json<ItemComparison>, ApiError> {
    let ids = parse_ids(query.as_deref())?.unwrap_or_default();
    Ok(Json(service.compare_items(ids).await?))
}

/// `GET /items/:item_id`
pub async fn get_item(
    State(service): State<ItemService>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(item_id) = path?;
    let id = ItemId(item_id);
    service.get(id).await?.map(Json).ok_or_else(|| not_found(id))
}

/// `POST /items`
pub async fn create_item(
    State(service): State<ItemService>,
    payload: Result<Json<ItemCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(params) = payload?;
    let item = service.create_item(params).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /items/:item_id`
pub async fn replace_item(
    State(service): State<ItemService>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<ItemCreate>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(item_id) = path?;
    let Json(params) = payload?;
    let id = ItemId(item_id);
    service
        .replace_item(id, params)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// `PATCH /items/:item_id`
pub async fn update_item(
    State(service): State<ItemService>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(item_id) = path?;
    let Json(update) = payload?;
    let id = ItemId(item_id);
    service
        .update_item(id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// `DELETE /items/:item_id`
pub async fn delete_item(
    State(service): State<ItemService>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(item_id) = path?;
    let id = ItemId(item_id);
    if service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

fn not_found(id: ItemId) -> ApiError {
    ApiError::NotFound(format!("Item {id} not found"))
}

/// Collects every `ids` value in a query string.
///
/// Accepts repeated keys (`ids=1&ids=2`), comma-separated lists (`ids=1,2`) and any
/// mix of the two. Returns `None` when no `ids` key is present.
pub fn parse_ids(query: Option<&str>) -> Result<Option<Vec<ItemId>>, ApiError> {
    let Some(query) = query else {
        return Ok(None);
    };

    let mut ids: Option<Vec<ItemId>> = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "ids" {
            continue;
        }
        let found = ids.get_or_insert_with(Vec::new);
        for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let id = part
                .parse::<u64>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid item id: {part:?}")))?;
            found.push(ItemId(id));
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId).collect()
    }

    #[test]
    fn test_parse_ids_absent() {
        assert_eq!(parse_ids(None).unwrap(), None);
        assert_eq!(parse_ids(Some("")).unwrap(), None);
        assert_eq!(parse_ids(Some("other=1")).unwrap(), None);
    }

    #[test]
    fn test_parse_ids_repeated_and_comma_separated() {
        assert_eq!(
            parse_ids(Some("ids=1&ids=2")).unwrap(),
            Some(ids(&[1, 2]))
        );
        assert_eq!(
            parse_ids(Some("ids=3,1&ids=2")).unwrap(),
            Some(ids(&[3, 1, 2]))
        );
        assert_eq!(
            parse_ids(Some("ids=4%2C5")).unwrap(),
            Some(ids(&[4, 5]))
        );
    }

    #[test]
    fn test_parse_ids_keeps_duplicates() {
        assert_eq!(
            parse_ids(Some("ids=1&ids=1")).unwrap(),
            Some(ids(&[1, 1]))
        );
    }

    #[test]
    fn test_parse_ids_rejects_non_numbers() {
        assert!(matches!(
            parse_ids(Some("ids=abc")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_ids(Some("ids=-1")),
            Err(ApiError::BadRequest(_))
        ));
    }
}

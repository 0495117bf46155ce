//! # Item Service
//!
//! The business rules that sit between the HTTP layer and the item repository:
//!
//! - requested id lists are de-duplicated (first occurrence wins) and results come back
//!   sorted by id
//! - specification keys are lower-cased and values trimmed before anything is stored
//! - replace and update confirm the item exists before sending the mutation
//! - comparisons are limited to 2..=5 distinct, existing ids

use crate::comparison::{self, ItemComparison};
use crate::item_repository::ItemError;
use crate::model::{
    normalize_specification, Item, ItemCreate, ItemId, ItemUpdate, Specifications,
};
use crate::services::ComparisonError;
use async_trait::async_trait;
use record_framework::{EntityService, FrameworkError, RepositoryClient};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};

/// Fewest ids a comparison accepts.
pub const MIN_COMPARE_IDS: usize = 2;
/// Most ids a comparison accepts.
pub const MAX_COMPARE_IDS: usize = 5;

/// Service for the item resource.
#[derive(Clone)]
pub struct ItemService {
    client: RepositoryClient<Item>,
}

#[async_trait]
impl EntityService<Item> for ItemService {
    type Error = ItemError;

    fn client(&self) -> &RepositoryClient<Item> {
        &self.client
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ItemError::Framework(e)
    }
}

impl ItemService {
    pub fn new(client: RepositoryClient<Item>) -> Self {
        Self { client }
    }

    /// Lists items sorted by id, optionally restricted to `ids`.
    #[instrument(skip(self))]
    pub async fn list_items(&self, ids: Option<Vec<ItemId>>) -> Result<Vec<Item>, ItemError> {
        let ids = ids.map(dedupe);
        let mut items = self.client.list(ids).await?;
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    #[instrument(skip(self, params))]
    pub async fn create_item(&self, mut params: ItemCreate) -> Result<Item, ItemError> {
        debug!(?params, "create_item called");
        params.validate()?;
        params.specifications = normalize_specifications(params.specifications);
        Ok(self.client.create(params).await?)
    }

    /// Replaces an existing item. `None` when `id` does not exist.
    #[instrument(skip(self, params))]
    pub async fn replace_item(
        &self,
        id: ItemId,
        mut params: ItemCreate,
    ) -> Result<Option<Item>, ItemError> {
        params.validate()?;
        if self.get(id).await?.is_none() {
            debug!("Item not found");
            return Ok(None);
        }
        params.specifications = normalize_specifications(params.specifications);
        Ok(self.client.replace(id, params).await?)
    }

    /// Applies a partial update. `None` when `id` does not exist.
    #[instrument(skip(self, update))]
    pub async fn update_item(
        &self,
        id: ItemId,
        mut update: ItemUpdate,
    ) -> Result<Option<Item>, ItemError> {
        update.validate()?;
        if self.get(id).await?.is_none() {
            debug!("Item not found");
            return Ok(None);
        }
        update.specifications = update.specifications.map(normalize_specifications);
        Ok(self.client.update(id, update).await?)
    }

    /// Compares 2 to 5 distinct, existing items.
    ///
    /// Checks run in order: id count, duplicates, existence. The first failing check
    /// decides the error.
    #[instrument(skip(self))]
    pub async fn compare_items(&self, ids: Vec<ItemId>) -> Result<ItemComparison, ComparisonError> {
        if !(MIN_COMPARE_IDS..=MAX_COMPARE_IDS).contains(&ids.len()) {
            return Err(ComparisonError::InvalidIdCount {
                count: ids.len(),
                min: MIN_COMPARE_IDS,
                max: MAX_COMPARE_IDS,
            });
        }

        let unique = dedupe(ids.clone());
        if unique.len() != ids.len() {
            return Err(ComparisonError::DuplicateIds);
        }

        let items = self.list_items(Some(unique.clone())).await?;
        let found: HashSet<ItemId> = items.iter().map(|item| item.id).collect();
        let missing: BTreeSet<ItemId> = unique
            .into_iter()
            .filter(|id| !found.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(ComparisonError::ItemsNotFound(missing.into_iter().collect()));
        }

        Ok(comparison::compare_items(items))
    }
}

/// Lower-cases keys and trims values.
///
/// The input is already key-ordered, so keys that collide once lower-cased resolve in
/// byte order. Payloads read from JSON are normalized during deserialization instead,
/// where the last key in the payload wins.
pub fn normalize_specifications(specifications: Specifications) -> Specifications {
    specifications
        .iter()
        .map(|(key, value)| normalize_specification(key, value))
        .collect()
}

fn dedupe(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_framework::mock::{
        create_mock_client, expect_create, expect_get, expect_list, expect_update, MockClient,
    };
    use record_framework::RepositoryError;
    use url::Url;

    fn params(name: &str, specs: &[(&str, &str)]) -> ItemCreate {
        ItemCreate {
            name: name.to_string(),
            image_url: Url::parse("https://example.com/item.png").unwrap(),
            description: format!("{name} description"),
            price: 100.0,
            rating: 4.0,
            specifications: specs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn item(id: u64, name: &str) -> Item {
        let p = params(name, &[]);
        Item {
            id: ItemId(id),
            name: p.name,
            image_url: p.image_url,
            description: p.description,
            price: p.price,
            rating: p.rating,
            specifications: p.specifications,
        }
    }

    fn ids(raw: &[u64]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId).collect()
    }

    #[test]
    fn test_normalize_specifications() {
        let specs = params("x", &[("COR", "  Azul  "), ("Peso", "1kg")]).specifications;
        let normalized = normalize_specifications(specs);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized["cor"], "Azul");
        assert_eq!(normalized["peso"], "1kg");
    }

    #[tokio::test]
    async fn test_list_dedupes_request_and_sorts_result() {
        let (client, mut receiver) = create_mock_client::<Item>(10);
        let service = ItemService::new(client);

        let task =
            tokio::spawn(async move { service.list_items(Some(ids(&[3, 1, 3]))).await });

        let (requested, responder) = expect_list(&mut receiver)
            .await
            .expect("Expected List request");
        assert_eq!(requested, Some(ids(&[3, 1])));
        responder.send(Ok(vec![item(3, "C"), item(1, "A")])).unwrap();

        let listed = task.await.unwrap().unwrap();
        assert_eq!(
            listed.iter().map(|i| i.id).collect::<Vec<_>>(),
            ids(&[1, 3])
        );
    }

    #[tokio::test]
    async fn test_create_sends_normalized_specifications() {
        let (client, mut receiver) = create_mock_client::<Item>(10);
        let service = ItemService::new(client);

        let task = tokio::spawn(async move {
            service
                .create_item(params("Phone", &[("COR", "  Azul  ")]))
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.specifications.len(), 1);
        assert_eq!(payload.specifications["cor"], "Azul");
        responder.send(Ok(item(1, "Phone"))).unwrap();

        assert_eq!(task.await.unwrap().unwrap().id, ItemId(1));
    }

    #[tokio::test]
    async fn test_invalid_create_never_reaches_repository() {
        let mock = MockClient::<Item>::new();
        let service = ItemService::new(mock.client());

        let mut bad = params("Phone", &[]);
        bad.price = 0.0;
        let result = service.create_item(bad).await;

        assert!(matches!(result, Err(ItemError::Validation(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_replace_missing_item_returns_none() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_get(ItemId(9)).return_ok(None);
        let service = ItemService::new(mock.client());

        let result = service.replace_item(ItemId(9), params("X", &[])).await;

        assert!(matches!(result, Ok(None)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_replace_existing_item() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_get(ItemId(1)).return_ok(Some(item(1, "Old")));
        mock.expect_replace(ItemId(1)).return_ok(Some(item(1, "New")));
        let service = ItemService::new(mock.client());

        let replaced = service
            .replace_item(ItemId(1), params("New", &[]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(replaced.name, "New");
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_checks_existence_then_normalizes() {
        let (client, mut receiver) = create_mock_client::<Item>(10);
        let service = ItemService::new(client);

        let task = tokio::spawn(async move {
            let update = ItemUpdate {
                specifications: Some(params("x", &[("Tamanho", " M ")]).specifications),
                ..Default::default()
            };
            service.update_item(ItemId(2), update).await
        });

        let (id, responder) = expect_get(&mut receiver)
            .await
            .expect("Expected Get request");
        assert_eq!(id, ItemId(2));
        responder.send(Ok(Some(item(2, "Shirt")))).unwrap();

        let (id, update, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, ItemId(2));
        let specs = update.specifications.expect("specifications were set");
        assert_eq!(specs["tamanho"], "M");
        assert!(update.name.is_none());
        responder.send(Ok(Some(item(2, "Shirt")))).unwrap();

        assert!(task.await.unwrap().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_uses_default_service_method() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_delete(ItemId(4)).return_ok(false);
        let service = ItemService::new(mock.client());

        assert!(!service.delete(ItemId(4)).await.unwrap());
        mock.verify();
    }

    #[tokio::test]
    async fn test_framework_errors_are_wrapped() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_get(ItemId(1))
            .return_err(FrameworkError::ActorClosed);
        let service = ItemService::new(mock.client());

        let result = service.get(ItemId(1)).await;
        assert!(matches!(
            result,
            Err(ItemError::Framework(FrameworkError::ActorClosed))
        ));
    }

    #[tokio::test]
    async fn test_compare_rejects_bad_id_counts() {
        let mock = MockClient::<Item>::new();
        let service = ItemService::new(mock.client());

        for raw in [&[1][..], &[1, 2, 3, 4, 5, 6][..]] {
            let result = service.compare_items(ids(raw)).await;
            assert!(
                matches!(result, Err(ComparisonError::InvalidIdCount { count, .. }) if count == raw.len())
            );
        }
        mock.verify();
    }

    #[tokio::test]
    async fn test_compare_count_check_comes_before_duplicates() {
        let mock = MockClient::<Item>::new();
        let service = ItemService::new(mock.client());

        let result = service.compare_items(ids(&[1, 1, 1, 1, 1, 1])).await;
        assert!(matches!(result, Err(ComparisonError::InvalidIdCount { .. })));
    }

    #[tokio::test]
    async fn test_compare_rejects_duplicates() {
        let mock = MockClient::<Item>::new();
        let service = ItemService::new(mock.client());

        let result = service.compare_items(ids(&[1, 2, 1])).await;
        assert!(matches!(result, Err(ComparisonError::DuplicateIds)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_compare_reports_missing_ids_ascending() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_list(Some(ids(&[5, 1, 3])))
            .return_ok(vec![item(1, "A")]);
        let service = ItemService::new(mock.client());

        let result = service.compare_items(ids(&[5, 1, 3])).await;
        match result {
            Err(ComparisonError::ItemsNotFound(missing)) => assert_eq!(missing, ids(&[3, 5])),
            other => panic!("expected ItemsNotFound, got {other:?}"),
        }
        mock.verify();
    }

    #[tokio::test]
    async fn test_compare_returns_items_sorted_by_id() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_list(Some(ids(&[2, 1])))
            .return_ok(vec![item(1, "A"), item(2, "B")]);
        let service = ItemService::new(mock.client());

        let comparison = service.compare_items(ids(&[2, 1])).await.unwrap();
        assert_eq!(
            comparison.items.iter().map(|i| i.id).collect::<Vec<_>>(),
            ids(&[1, 2])
        );
        assert!(comparison.price_analysis.is_some());
        mock.verify();
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_through_compare() {
        let mut mock = MockClient::<Item>::new();
        mock.expect_list(Some(ids(&[1, 2]))).return_err(FrameworkError::Repository(
            RepositoryError::Entity(Box::new(std::io::Error::other("disk gone"))),
        ));
        let service = ItemService::new(mock.client());

        let result = service.compare_items(ids(&[1, 2])).await;
        assert!(matches!(
            result,
            Err(ComparisonError::Item(ItemError::Framework(_)))
        ));
    }
}

//! # Repository Contract
//!
//! [`Repository`] is the synchronous data-access contract callers depend on.
//! [`FileRepository`] implements it on top of a [`JsonFileStore`]: every operation
//! reads the whole array, works on it in memory and (for mutations) writes the whole
//! array back.
//!
//! ## Id assignment
//!
//! A new id is `1 + max(stored ids)`, or `1` for an empty store. Ids are derived from
//! what is stored *now*, so deleting the entity holding the highest id makes that id
//! available again for the next create.

use crate::entity::RecordEntity;
use crate::error::RepositoryError;
use crate::store::{record_id, JsonFileStore, Record};
use std::collections::HashSet;
use std::marker::PhantomData;
use tracing::{debug, info};

/// CRUD over entities of one type.
///
/// Absence is reported as `None` (or `false` for delete), never as an error.
pub trait Repository: Send + Sync + 'static {
    type Entity: RecordEntity;

    /// All entities, or only those whose id is in `ids`, in store order.
    /// An empty filter means no filter.
    fn list_items(
        &self,
        ids: Option<&[<Self::Entity as RecordEntity>::Id]>,
    ) -> Result<Vec<Self::Entity>, RepositoryError>;

    fn get_item(
        &self,
        id: <Self::Entity as RecordEntity>::Id,
    ) -> Result<Option<Self::Entity>, RepositoryError>;

    fn create_item(
        &self,
        params: <Self::Entity as RecordEntity>::Create,
    ) -> Result<Self::Entity, RepositoryError>;

    /// Replaces every field except the id. Nothing of the old entity survives.
    fn replace_item(
        &self,
        id: <Self::Entity as RecordEntity>::Id,
        params: <Self::Entity as RecordEntity>::Create,
    ) -> Result<Option<Self::Entity>, RepositoryError>;

    /// Overwrites only the fields set in `update`.
    fn update_item(
        &self,
        id: <Self::Entity as RecordEntity>::Id,
        update: <Self::Entity as RecordEntity>::Update,
    ) -> Result<Option<Self::Entity>, RepositoryError>;

    /// Returns whether an entity was removed.
    fn delete_item(&self, id: <Self::Entity as RecordEntity>::Id)
        -> Result<bool, RepositoryError>;
}

/// A [`Repository`] persisted in a single JSON file.
pub struct FileRepository<T> {
    store: JsonFileStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T: RecordEntity> FileRepository<T> {
    pub fn new(store: JsonFileStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    fn next_id(records: &[Record]) -> Result<T::Id, RepositoryError> {
        let max = records.iter().filter_map(record_id).max().unwrap_or(0);
        max.checked_add(1)
            .map(T::Id::from)
            .ok_or(RepositoryError::IdSpaceExhausted)
    }

    fn position(records: &[Record], id: T::Id) -> Option<usize> {
        let id: u64 = id.into();
        records.iter().position(|r| record_id(r) == Some(id))
    }

    fn to_entity(record: Record) -> Result<T, RepositoryError> {
        T::from_record(record).map_err(entity_error)
    }

    fn to_record(entity: &T) -> Result<Record, RepositoryError> {
        entity.to_record().map_err(entity_error)
    }
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> RepositoryError {
    RepositoryError::Entity(Box::new(e))
}

impl<T: RecordEntity> Repository for FileRepository<T> {
    type Entity = T;

    fn list_items(&self, ids: Option<&[T::Id]>) -> Result<Vec<T>, RepositoryError> {
        let wanted: Option<HashSet<u64>> = ids
            .filter(|ids| !ids.is_empty())
            .map(|ids| ids.iter().map(|&id| id.into()).collect());

        let records = self.store.read_all()?;
        let items = records
            .into_iter()
            .filter(|record| match &wanted {
                Some(wanted) => record_id(record).is_some_and(|id| wanted.contains(&id)),
                None => true,
            })
            .map(Self::to_entity)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = items.len(), filtered = wanted.is_some(), "Listed");
        Ok(items)
    }

    fn get_item(&self, id: T::Id) -> Result<Option<T>, RepositoryError> {
        let mut records = self.store.read_all()?;
        match Self::position(&records, id) {
            Some(idx) => Self::to_entity(records.swap_remove(idx)).map(Some),
            None => Ok(None),
        }
    }

    fn create_item(&self, params: T::Create) -> Result<T, RepositoryError> {
        let mut records = self.store.read_all()?;
        let id = Self::next_id(&records)?;

        let item = T::from_create_params(id, params).map_err(entity_error)?;
        records.push(Self::to_record(&item)?);
        self.store.write_all(&records)?;

        info!(%id, size = records.len(), "Created");
        Ok(item)
    }

    fn replace_item(&self, id: T::Id, params: T::Create) -> Result<Option<T>, RepositoryError> {
        let mut records = self.store.read_all()?;
        let Some(idx) = Self::position(&records, id) else {
            debug!(%id, "Replace target not found");
            return Ok(None);
        };

        let item = T::from_create_params(id, params).map_err(entity_error)?;
        records[idx] = Self::to_record(&item)?;
        self.store.write_all(&records)?;

        info!(%id, "Replaced");
        Ok(Some(item))
    }

    fn update_item(&self, id: T::Id, update: T::Update) -> Result<Option<T>, RepositoryError> {
        let mut records = self.store.read_all()?;
        let Some(idx) = Self::position(&records, id) else {
            debug!(%id, "Update target not found");
            return Ok(None);
        };

        let mut merged = records[idx].clone();
        T::merge_update(&mut merged, update).map_err(entity_error)?;
        let item = Self::to_entity(merged)?;
        records[idx] = Self::to_record(&item)?;
        self.store.write_all(&records)?;

        info!(%id, "Updated");
        Ok(Some(item))
    }

    fn delete_item(&self, id: T::Id) -> Result<bool, RepositoryError> {
        let mut records = self.store.read_all()?;
        let before = records.len();
        let target: u64 = id.into();
        records.retain(|r| record_id(r) != Some(target));

        if records.len() == before {
            debug!(%id, "Delete target not found");
            return Ok(false);
        }

        self.store.write_all(&records)?;
        info!(%id, size = records.len(), "Deleted");
        Ok(true)
    }
}

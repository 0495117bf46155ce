//! # RecordEntity Trait
//!
//! The `RecordEntity` trait is the contract every stored resource implements so the
//! generic [`FileRepository`](crate::repository::FileRepository) can manage it. It names
//! the identifier, the create and update payloads and the error type, and it owns the
//! translation between a raw [`Record`] and a validated entity.
//!
//! # Records vs Entities
//! A *record* is whatever sits in the store file: a JSON object with an `id` field.
//! An *entity* is the validated in-memory value. Every read goes through
//! [`RecordEntity::from_record`], so an entity type that validates there guarantees
//! that no invalid value ever leaves the repository.
//!
//! # Provided Methods
//! `from_record`, `to_record` and `merge_update` have serde-based defaults. Override
//! `from_record` to add validation.

use crate::store::{Record, ID_FIELD};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any stored resource must implement to be managed by a repository.
pub trait RecordEntity:
    Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The identifier type. Ids are positive integers assigned by the repository.
    type Id: Copy
        + Eq
        + Hash
        + Display
        + Debug
        + From<u64>
        + Into<u64>
        + Send
        + Sync
        + 'static;

    /// The data required to create (or fully replace) an instance.
    type Create: Serialize + Debug + Send + Sync + 'static;

    /// A partial payload. Fields that serialize as absent or `null` are left untouched.
    type Update: Serialize + Debug + Send + Sync + 'static;

    /// The error type for this entity.
    type Error: std::error::Error + From<serde_json::Error> + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Construct the full entity from its assigned id and a create payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Rebuild an entity from a stored record.
    fn from_record(record: Record) -> Result<Self, Self::Error> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }

    /// Turn an entity into the record that gets stored.
    fn to_record(&self) -> Result<Record, Self::Error> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            _ => Err(Self::Error::from(<serde_json::Error as serde::ser::Error>::custom(
                "entity must serialize to a JSON object",
            ))),
        }
    }

    /// Overlay the explicitly set fields of `update` onto a stored record.
    ///
    /// The `id` field is never overwritten.
    fn merge_update(record: &mut Record, update: Self::Update) -> Result<(), Self::Error> {
        if let Value::Object(fields) = serde_json::to_value(update)? {
            for (key, value) in fields {
                if key != ID_FIELD && !value.is_null() {
                    record.insert(key, value);
                }
            }
        }
        Ok(())
    }
}

use crate::item_repository::ItemError;
use crate::model::{Item, ItemCreate, ItemId, ItemUpdate};
use record_framework::{Record, RecordEntity};
use serde_json::Value;

/// `Item` validates on both paths into memory: from a create payload and from a
/// stored record. A record edited by hand into an invalid state fails the read with
/// [`ItemError::Validation`] instead of leaking out.
impl RecordEntity for Item {
    type Id = ItemId;
    type Create = ItemCreate;
    type Update = ItemUpdate;
    type Error = ItemError;

    fn id(&self) -> ItemId {
        self.id
    }

    fn from_create_params(id: ItemId, params: ItemCreate) -> Result<Self, Self::Error> {
        params.validate()?;
        let item = Self {
            id,
            name: params.name,
            image_url: params.image_url,
            description: params.description,
            price: params.price,
            rating: params.rating,
            specifications: params.specifications,
        };
        item.validate()?;
        Ok(item)
    }

    fn from_record(record: Record) -> Result<Self, Self::Error> {
        let item: Item = serde_json::from_value(Value::Object(record))?;
        item.validate()?;
        Ok(item)
    }
}

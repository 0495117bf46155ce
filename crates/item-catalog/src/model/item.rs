//! Catalog items and their payloads.
//!
//! [`Item`] implements [`RecordEntity`](record_framework::RecordEntity) (see
//! [`item_repository`](crate::item_repository)), so it can be stored by a
//! [`FileRepository`](record_framework::FileRepository). Creation and full replacement
//! take an [`ItemCreate`]; partial updates take an [`ItemUpdate`].

use crate::item_repository::ItemError;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use url::Url;

/// Free-form attributes of an item, e.g. `"color" -> "blue"`.
pub type Specifications = BTreeMap<String, String>;

/// Type-safe identifier for Items. Always positive once assigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored item. Every value of this type that leaves the repository has passed
/// [`Item::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub image_url: Url,
    pub description: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default)]
    pub specifications: Specifications,
}

impl Item {
    /// Checks every invariant, including `id > 0`.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.id.0 == 0 {
            return Err(ItemError::Validation("id must be a positive integer".into()));
        }
        check_text("name", &self.name)?;
        check_text("description", &self.description)?;
        check_image_url(&self.image_url)?;
        check_price(self.price)?;
        check_rating(self.rating)
    }
}

/// Payload for creating an item, or fully replacing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub image_url: Url,
    pub description: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default, deserialize_with = "normalized_specifications")]
    pub specifications: Specifications,
}

impl ItemCreate {
    pub fn validate(&self) -> Result<(), ItemError> {
        check_text("name", &self.name)?;
        check_text("description", &self.description)?;
        check_image_url(&self.image_url)?;
        check_price(self.price)?;
        check_rating(self.rating)
    }
}

/// Partial update. Only the fields that are set are applied; `null` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_normalized_specifications"
    )]
    pub specifications: Option<Specifications>,
}

impl ItemUpdate {
    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<(), ItemError> {
        if let Some(name) = &self.name {
            check_text("name", name)?;
        }
        if let Some(description) = &self.description {
            check_text("description", description)?;
        }
        if let Some(url) = &self.image_url {
            check_image_url(url)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }
}

/// Lower-cases a specification key and trims its value.
pub fn normalize_specification(key: &str, value: &str) -> (String, String) {
    (key.to_lowercase(), value.trim().to_string())
}

/// Specifications normalized while they are read, in payload order.
///
/// Keys that collide once lower-cased (`"Cor"` and `"COR"`) keep the value that
/// appears last in the payload.
struct NormalizedSpecifications(Specifications);

impl<'de> Deserialize<'de> for NormalizedSpecifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecificationsVisitor;

        impl<'de> Visitor<'de> for SpecificationsVisitor {
            type Value = Specifications;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of string values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut specifications = Specifications::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    let (key, value) = normalize_specification(&key, &value);
                    specifications.insert(key, value);
                }
                Ok(specifications)
            }
        }

        deserializer
            .deserialize_map(SpecificationsVisitor)
            .map(NormalizedSpecifications)
    }
}

fn normalized_specifications<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Specifications, D::Error> {
    NormalizedSpecifications::deserialize(deserializer).map(|specs| specs.0)
}

fn optional_normalized_specifications<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Specifications>, D::Error> {
    Option::<NormalizedSpecifications>::deserialize(deserializer)
        .map(|specs| specs.map(|specs| specs.0))
}

fn check_text(field: &str, value: &str) -> Result<(), ItemError> {
    if value.trim().is_empty() {
        return Err(ItemError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn check_image_url(url: &Url) -> Result<(), ItemError> {
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ItemError::Validation(format!(
            "image_url must be an http(s) URL with a host, got {url}"
        )));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ItemError> {
    // NaN fails the comparison too.
    if !(price.is_finite() && price > 0.0) {
        return Err(ItemError::Validation(format!(
            "price must be greater than 0, got {price}"
        )));
    }
    Ok(())
}

fn check_rating(rating: f64) -> Result<(), ItemError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(ItemError::Validation(format!(
            "rating must be between 0 and 5, got {rating}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> ItemCreate {
        ItemCreate {
            name: "Phone".to_string(),
            image_url: Url::parse("https://example.com/phone.png").unwrap(),
            description: "A phone".to_string(),
            price: 999.9,
            rating: 4.5,
            specifications: Specifications::new(),
        }
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(create().validate().is_ok());
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let mut params = create();
        params.name = "   ".to_string();
        assert!(matches!(params.validate(), Err(ItemError::Validation(_))));

        let mut params = create();
        params.description = String::new();
        assert!(matches!(params.validate(), Err(ItemError::Validation(_))));
    }

    #[test]
    fn test_price_must_be_positive_and_finite() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut params = create();
            params.price = price;
            assert!(params.validate().is_err(), "price {price} accepted");
        }
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        for rating in [0.0, 5.0] {
            let mut params = create();
            params.rating = rating;
            assert!(params.validate().is_ok());
        }
        for rating in [-0.1, 5.1, f64::NAN] {
            let mut params = create();
            params.rating = rating;
            assert!(params.validate().is_err(), "rating {rating} accepted");
        }
    }

    #[test]
    fn test_image_url_scheme() {
        let mut params = create();
        params.image_url = Url::parse("ftp://example.com/phone.png").unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_item_requires_positive_id() {
        let params = create();
        let item = Item {
            id: ItemId(0),
            name: params.name,
            image_url: params.image_url,
            description: params.description,
            price: params.price,
            rating: params.rating,
            specifications: params.specifications,
        };
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        assert!(ItemUpdate::default().validate().is_ok());

        let update = ItemUpdate {
            rating: Some(7.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_null_fields_deserialize_as_unset() {
        let update: ItemUpdate =
            serde_json::from_str(r#"{"name": null, "price": 10.0}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.price, Some(10.0));

        let wire = serde_json::to_value(&update).unwrap();
        assert_eq!(wire, serde_json::json!({"price": 10.0}));
    }

    #[test]
    fn test_payload_specifications_normalize_in_payload_order() {
        let body = r#"{
            "name": "Phone",
            "image_url": "https://example.com/phone.png",
            "description": "A phone",
            "price": 10.0,
            "rating": 4.0,
            "specifications": {"cor": "verde", "COR": " azul ", "Cor": "  preto"}
        }"#;
        let params: ItemCreate = serde_json::from_str(body).unwrap();
        assert_eq!(params.specifications.len(), 1);
        assert_eq!(params.specifications["cor"], "preto");

        let update: ItemUpdate =
            serde_json::from_str(r#"{"specifications": {"Cor": "azul", "cor": "verde"}}"#)
                .unwrap();
        assert_eq!(update.specifications.unwrap()["cor"], "verde");

        let update: ItemUpdate = serde_json::from_str(r#"{"specifications": null}"#).unwrap();
        assert_eq!(update.specifications, None);
    }

    #[test]
    fn test_item_id_is_a_bare_number() {
        assert_eq!(ItemId(7).to_string(), "7");
        assert_eq!(serde_json::to_string(&ItemId(7)).unwrap(), "7");
    }
}

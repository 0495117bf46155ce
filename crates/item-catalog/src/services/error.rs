use crate::item_repository::ItemError;
use crate::model::ItemId;

/// Why a comparison request was refused.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("Between {min} and {max} ids are required for a comparison, got {count}")]
    InvalidIdCount { count: usize, min: usize, max: usize },
    #[error("Duplicate ids are not allowed in a comparison")]
    DuplicateIds,
    #[error("Items not found: {}", join_ids(.0))]
    ItemsNotFound(Vec<ItemId>),
    #[error(transparent)]
    Item(#[from] ItemError),
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ItemId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

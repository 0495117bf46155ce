//! # Comparison Engine
//!
//! Side-by-side aggregation over items that have already been fetched. Nothing here
//! touches storage; [`compare_items`] is a pure function of its input.
//!
//! The specifications table is keyed by spec key, then by item *name*. Two items with
//! the same name collapse into one column and the later item wins.

use crate::model::Item;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for an item that lacks a specification key.
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAnalysis {
    pub lowest: f64,
    pub highest: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingAnalysis {
    pub lowest: f64,
    pub highest: f64,
    /// Arithmetic mean, not rounded.
    pub average: f64,
}

/// The result of comparing a set of items.
///
/// With no items the analyses are absent and are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemComparison {
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_analysis: Option<PriceAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_analysis: Option<RatingAnalysis>,
    /// specification key -> item name -> value
    pub specifications_comparison: BTreeMap<String, BTreeMap<String, String>>,
}

/// Compares `items`, keeping them in the given order.
pub fn compare_items(items: Vec<Item>) -> ItemComparison {
    let price_analysis = min_max(items.iter().map(|item| item.price)).map(|(lowest, highest)| {
        PriceAnalysis {
            lowest,
            highest,
            difference: highest - lowest,
        }
    });

    let rating_analysis =
        min_max(items.iter().map(|item| item.rating)).map(|(lowest, highest)| RatingAnalysis {
            lowest,
            highest,
            average: items.iter().map(|item| item.rating).sum::<f64>() / items.len() as f64,
        });

    let keys: BTreeSet<&String> = items
        .iter()
        .flat_map(|item| item.specifications.keys())
        .collect();

    let specifications_comparison = keys
        .into_iter()
        .map(|key| {
            let row = items
                .iter()
                .map(|item| {
                    let value = item
                        .specifications
                        .get(key)
                        .map_or(NOT_SPECIFIED, String::as_str);
                    (item.name.clone(), value.to_string())
                })
                .collect();
            (key.clone(), row)
        })
        .collect();

    ItemComparison {
        items,
        price_analysis,
        rating_analysis,
        specifications_comparison,
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

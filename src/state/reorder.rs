//! Field reordering.

use crate::model::Field;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens to fields that the new order does not mention.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPolicy {
    /// Unlisted fields are removed from the form.
    #[default]
    Filter,
    /// Unlisted fields are kept after the listed ones, in their previous
    /// relative order.
    Preserve,
}

impl fmt::Display for ReorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderPolicy::Filter => f.write_str("filter"),
            ReorderPolicy::Preserve => f.write_str("preserve"),
        }
    }
}

impl FromStr for ReorderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "filter" => Ok(ReorderPolicy::Filter),
            "preserve" => Ok(ReorderPolicy::Preserve),
            other => Err(format!("unknown reorder policy '{}'", other)),
        }
    }
}

/// Arrange `fields` in the order given by `order`.
///
/// Ids that match no field are ignored, as is every repeat of an id after
/// its first appearance. Field contents are never altered.
pub fn reorder(fields: Vec<Field>, order: &[String], policy: ReorderPolicy) -> Vec<Field> {
    let mut remaining: Vec<Option<Field>> = fields.into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(remaining.len());
    for id in order {
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().map_or(false, |field| &field.id == id));
        if let Some(field) = slot.and_then(Option::take) {
            reordered.push(field);
        }
    }
    if policy == ReorderPolicy::Preserve {
        reordered.extend(remaining.into_iter().flatten());
    }
    reordered
}

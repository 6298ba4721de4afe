//! First-round action order derived from resolved speed

use crate::stats::Character;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// One entry of the derived turn order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSlot {
    pub name: String,
    pub speed: f64,
}

/// Sort characters strictly by descending resolved speed
///
/// Equal speeds keep their roster order. Recomputed on every call.
pub fn turn_order(characters: &[Character]) -> Vec<TurnSlot> {
    order_by_speed(
        characters
            .iter()
            .map(|c| (c.name.clone(), c.effective().spd)),
    )
}

/// Same ordering over raw `(name, speed)` pairs
pub fn order_by_speed(entries: impl IntoIterator<Item = (String, f64)>) -> Vec<TurnSlot> {
    let mut slots: Vec<TurnSlot> = entries
        .into_iter()
        .map(|(name, speed)| TurnSlot { name, speed })
        .collect();
    // sort_by is stable
    slots.sort_by(|a, b| OrderedFloat(b.speed).cmp(&OrderedFloat(a.speed)));
    slots
}

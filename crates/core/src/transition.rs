//! Bowl state transitions and feeding-area counter deltas.
//!
//! A feeding area carries one aggregate counter per bowl kind, counting the
//! bowls directly parented to it that are currently active and full. Every
//! mutation of a bowl maps to exactly one [`BowlTransition`], and
//! [`bowl_delta`] is the single place that turns a transition into a
//! counter adjustment.

use crate::types::{TYPE_FOOD_BOWL, TYPE_WATER_BOWL};

/// The two bowl kinds a feeding area aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlKind {
    Food,
    Water,
}

impl BowlKind {
    /// The element `type` tag for this bowl kind.
    pub fn element_type(&self) -> &'static str {
        match self {
            BowlKind::Food => TYPE_FOOD_BOWL,
            BowlKind::Water => TYPE_WATER_BOWL,
        }
    }
}

/// A state change observed on a single bowl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowlTransition {
    /// A bowl was created under a feeding area.
    Created { full: bool },
    /// An existing bowl was refilled (its attributes replaced).
    Refilled { was_full: bool, now_full: bool },
    /// A bowl was soft-deactivated.
    Removed { was_full: bool },
}

/// Counter delta for a bowl transition.
///
/// Create contributes +1 only for an initially full bowl; refill
/// contributes only when the full/empty state actually flipped; remove
/// takes back the contribution of a full bowl. The caller clamps the
/// resulting counter at zero.
pub fn bowl_delta(transition: BowlTransition) -> i64 {
    match transition {
        BowlTransition::Created { full } => {
            if full {
                1
            } else {
                0
            }
        }
        BowlTransition::Refilled { was_full, now_full } => {
            if was_full == now_full {
                0
            } else if now_full {
                1
            } else {
                -1
            }
        }
        BowlTransition::Removed { was_full } => {
            if was_full {
                -1
            } else {
                0
            }
        }
    }
}

/// Apply a delta to a counter, floored at zero.
pub fn apply_to_counter(counter: i64, delta: i64) -> i64 {
    (counter + delta).max(0)
}

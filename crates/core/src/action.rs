//! Action kinds and their validated payloads.
//!
//! Incoming actions carry a free-form attribute map plus a `type` string.
//! The type string resolves to a closed [`ActionKind`]; each kind requires
//! its attributes to match a payload schema before the processor touches
//! any element. Schema validation is structural and lenient in the same
//! way the clients are: booleans and integers may arrive as JSON strings.

use serde_json::{Map, Value};

use crate::datetime::is_date;
use crate::error::CoreError;
use crate::transition::BowlKind;

/// A JSON attribute map as carried by actions and elements.
pub type Attributes = Map<String, Value>;

pub const ACTION_ADD_FOOD_BOWL: &str = "add-food_bowl";
pub const ACTION_ADD_WATER_BOWL: &str = "add-water_bowl";
pub const ACTION_ADD_FEEDING_AREA: &str = "add-feeding_area";
pub const ACTION_REFILL_FOOD_BOWL: &str = "refill-food_bowl";
pub const ACTION_REFILL_WATER_BOWL: &str = "refill-water_bowl";
pub const ACTION_REMOVE_FOOD_BOWL: &str = "remove-food_bowl";
pub const ACTION_REMOVE_WATER_BOWL: &str = "remove-water_bowl";
pub const ACTION_REMOVE_FEEDING_AREA: &str = "remove-feeding_area";

/// The eight recognized action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    AddFoodBowl,
    AddWaterBowl,
    AddFeedingArea,
    RefillFoodBowl,
    RefillWaterBowl,
    RemoveFoodBowl,
    RemoveWaterBowl,
    RemoveFeedingArea,
}

impl ActionKind {
    /// Resolve an action `type` string. Unrecognized types are a distinct
    /// `InvalidAction` error, never a role mismatch.
    pub fn parse(action_type: &str) -> Result<ActionKind, CoreError> {
        match action_type {
            ACTION_ADD_FOOD_BOWL => Ok(ActionKind::AddFoodBowl),
            ACTION_ADD_WATER_BOWL => Ok(ActionKind::AddWaterBowl),
            ACTION_ADD_FEEDING_AREA => Ok(ActionKind::AddFeedingArea),
            ACTION_REFILL_FOOD_BOWL => Ok(ActionKind::RefillFoodBowl),
            ACTION_REFILL_WATER_BOWL => Ok(ActionKind::RefillWaterBowl),
            ACTION_REMOVE_FOOD_BOWL => Ok(ActionKind::RemoveFoodBowl),
            ACTION_REMOVE_WATER_BOWL => Ok(ActionKind::RemoveWaterBowl),
            ACTION_REMOVE_FEEDING_AREA => Ok(ActionKind::RemoveFeedingArea),
            other => Err(CoreError::InvalidAction(format!(
                "unrecognized action type '{other}'"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::AddFoodBowl => ACTION_ADD_FOOD_BOWL,
            ActionKind::AddWaterBowl => ACTION_ADD_WATER_BOWL,
            ActionKind::AddFeedingArea => ACTION_ADD_FEEDING_AREA,
            ActionKind::RefillFoodBowl => ACTION_REFILL_FOOD_BOWL,
            ActionKind::RefillWaterBowl => ACTION_REFILL_WATER_BOWL,
            ActionKind::RemoveFoodBowl => ACTION_REMOVE_FOOD_BOWL,
            ActionKind::RemoveWaterBowl => ACTION_REMOVE_WATER_BOWL,
            ActionKind::RemoveFeedingArea => ACTION_REMOVE_FEEDING_AREA,
        }
    }

    /// The bowl kind this action operates on, if it targets a bowl.
    pub fn bowl_kind(&self) -> Option<BowlKind> {
        match self {
            ActionKind::AddFoodBowl | ActionKind::RefillFoodBowl | ActionKind::RemoveFoodBowl => {
                Some(BowlKind::Food)
            }
            ActionKind::AddWaterBowl
            | ActionKind::RefillWaterBowl
            | ActionKind::RemoveWaterBowl => Some(BowlKind::Water),
            ActionKind::AddFeedingArea | ActionKind::RemoveFeedingArea => None,
        }
    }

    /// Validate the action attributes against this kind's payload schema.
    pub fn payload(&self, attributes: &Attributes) -> Result<ActionPayload, CoreError> {
        match self.bowl_kind() {
            Some(BowlKind::Food) => FoodBowlSpec::from_attributes(attributes).map(ActionPayload::FoodBowl),
            Some(BowlKind::Water) => {
                WaterBowlSpec::from_attributes(attributes).map(ActionPayload::WaterBowl)
            }
            None => FeedingAreaSpec::from_attributes(attributes).map(ActionPayload::FeedingArea),
        }
    }
}

/// The validated payload of a recognized action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    FoodBowl(FoodBowlSpec),
    WaterBowl(WaterBowlSpec),
    FeedingArea(FeedingAreaSpec),
}

impl ActionPayload {
    /// Whether the bowl described by this payload is full. Feeding areas
    /// have no own full/empty state.
    pub fn bowl_is_full(&self) -> Option<bool> {
        match self {
            ActionPayload::FoodBowl(spec) => Some(spec.state),
            ActionPayload::WaterBowl(spec) => Some(spec.state),
            ActionPayload::FeedingArea(_) => None,
        }
    }
}

/// Schema for food-bowl actions.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodBowlSpec {
    /// true = full, false = empty.
    pub state: bool,
    pub animal: String,
    pub brand: String,
    pub weight: i64,
    pub last_fill_date: String,
}

impl FoodBowlSpec {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self, CoreError> {
        let state = coerce_bool(attributes, "state")?;
        let animal = coerce_string(attributes, "animal")?;
        let brand = coerce_string(attributes, "brand")?;
        let weight = coerce_int(attributes, "weight")?;
        let last_fill_date = coerce_string(attributes, "lastFillDate")?;
        if !is_date(&last_fill_date) {
            return Err(invalid("lastFillDate", "a parseable date"));
        }
        Ok(Self {
            state,
            animal,
            brand,
            weight,
            last_fill_date,
        })
    }
}

/// Schema for water-bowl actions.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterBowlSpec {
    /// true = full, false = empty.
    pub state: bool,
    pub water_quality: String,
}

impl WaterBowlSpec {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self, CoreError> {
        Ok(Self {
            state: coerce_bool(attributes, "state")?,
            water_quality: coerce_string(attributes, "waterQuality")?,
        })
    }
}

/// Schema for feeding-area actions.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedingAreaSpec {
    pub full_food_bowl: i64,
    pub full_water_bowl: i64,
}

impl FeedingAreaSpec {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self, CoreError> {
        Ok(Self {
            full_food_bowl: coerce_int(attributes, "fullFoodBowl")?,
            full_water_bowl: coerce_int(attributes, "fullWaterBowl")?,
        })
    }
}

/// Element-routing fields every `add-*` action must carry alongside its
/// payload: the manager identity that will own the created element, its
/// display name, and its location.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingFields {
    pub element_name: String,
    pub manager_domain: String,
    pub manager_email: String,
    pub lat: f64,
    pub lng: f64,
}

/// Attribute keys consumed by [`RoutingFields`]; they never land in the
/// created element's own attribute map.
const ROUTING_KEYS: [&str; 5] = [
    "elementName",
    "managerDomain",
    "managerEmail",
    "elementLat",
    "elementLng",
];

impl RoutingFields {
    pub fn from_attributes(attributes: &Attributes) -> Result<Self, CoreError> {
        Ok(Self {
            element_name: coerce_string(attributes, "elementName")?,
            manager_domain: coerce_string(attributes, "managerDomain")?,
            manager_email: coerce_string(attributes, "managerEmail")?,
            lat: coerce_float(attributes, "elementLat")?,
            lng: coerce_float(attributes, "elementLng")?,
        })
    }

    /// The manager identity alone, for refill/remove actions that carry no
    /// name or location.
    pub fn manager_identity(attributes: &Attributes) -> Result<(String, String), CoreError> {
        Ok((
            coerce_string(attributes, "managerDomain")?,
            coerce_string(attributes, "managerEmail")?,
        ))
    }
}

/// Read a stored bowl's full/empty state from its attribute map. A bowl
/// with no readable `state` counts as empty.
pub fn bowl_state(attributes: &Attributes) -> bool {
    match attributes.get("state") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// The action attributes minus the routing keys: this is what becomes the
/// element's own attribute map on create and refill.
pub fn residual_attributes(attributes: &Attributes) -> Attributes {
    let mut residual = attributes.clone();
    for key in ROUTING_KEYS {
        residual.remove(key);
    }
    residual
}

// ---------------------------------------------------------------------------
// Lenient attribute coercion
// ---------------------------------------------------------------------------

fn invalid(key: &str, expected: &str) -> CoreError {
    CoreError::InvalidAction(format!("attribute '{key}' must be {expected}"))
}

fn get<'a>(attributes: &'a Attributes, key: &str) -> Result<&'a Value, CoreError> {
    match attributes.get(key) {
        Some(Value::Null) | None => Err(invalid(key, "present")),
        Some(value) => Ok(value),
    }
}

fn coerce_bool(attributes: &Attributes, key: &str) -> Result<bool, CoreError> {
    match get(attributes, key)? {
        Value::Bool(b) => Ok(*b),
        // Clients routinely send "true"/"false" as strings; any other
        // string reads as false.
        Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        _ => Err(invalid(key, "a boolean")),
    }
}

fn coerce_string(attributes: &Attributes, key: &str) -> Result<String, CoreError> {
    match get(attributes, key)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(invalid(key, "a string")),
    }
}

fn coerce_int(attributes: &Attributes, key: &str) -> Result<i64, CoreError> {
    match get(attributes, key)? {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid(key, "an integer")),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(key, "an integer")),
        _ => Err(invalid(key, "an integer")),
    }
}

fn coerce_float(attributes: &Attributes, key: &str) -> Result<f64, CoreError> {
    match get(attributes, key)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| invalid(key, "a number")),
        Value::String(s) => s.trim().parse().map_err(|_| invalid(key, "a number")),
        _ => Err(invalid(key, "a number")),
    }
}

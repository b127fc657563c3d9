//! Element entity model and DTOs.
//!
//! Elements are the hierarchy nodes (feeding areas and bowls). The row
//! keeps the feeding-area counters as typed columns; the boundary folds
//! them back into `elementAttributes` for wire compatibility.

use feedgrid_core::action::Attributes;
use feedgrid_core::types::{Timestamp, TYPE_FEEDING_AREA};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserId;

/// An element row from the `elements` table.
#[derive(Debug, Clone, FromRow)]
pub struct ElementRow {
    pub domain: String,
    pub id: Uuid,
    pub element_type: String,
    pub name: String,
    pub active: bool,
    pub lat: f64,
    pub lng: f64,
    pub created_by_domain: String,
    pub created_by_email: String,
    pub created_at: Timestamp,
    pub attributes: serde_json::Value,
    pub parent_domain: Option<String>,
    pub parent_id: Option<Uuid>,
    pub full_food_bowls: i64,
    pub full_water_bowls: i64,
}

impl ElementRow {
    /// The element's own attribute map. A non-object value in the column
    /// reads as empty.
    pub fn attribute_map(&self) -> Attributes {
        self.attributes.as_object().cloned().unwrap_or_default()
    }
}

/// An element's composite identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementId {
    pub domain: String,
    pub id: Uuid,
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Creator reference: `{userId: {domain, email}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    pub user_id: UserId,
}

/// Wire shape:
/// `{elementId, type, name, active, createdBy, createdTimestamp, location,
///   elementAttributes}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBoundary {
    pub element_id: ElementId,
    #[serde(rename = "type")]
    pub element_type: String,
    pub name: String,
    pub active: bool,
    pub created_by: CreatedBy,
    pub created_timestamp: Timestamp,
    pub location: Location,
    pub element_attributes: Attributes,
}

impl From<ElementRow> for ElementBoundary {
    fn from(row: ElementRow) -> Self {
        let mut element_attributes = row.attribute_map();
        // Counters live in typed columns; feeding areas surface them to
        // clients as attribute entries.
        if row.element_type == TYPE_FEEDING_AREA {
            element_attributes.insert("fullFoodBowl".into(), json!(row.full_food_bowls));
            element_attributes.insert("fullWaterBowl".into(), json!(row.full_water_bowls));
        }
        ElementBoundary {
            element_id: ElementId {
                domain: row.domain,
                id: row.id,
            },
            element_type: row.element_type,
            name: row.name,
            active: row.active,
            created_by: CreatedBy {
                user_id: UserId {
                    domain: row.created_by_domain,
                    email: row.created_by_email,
                },
            },
            created_timestamp: row.created_at,
            location: Location {
                lat: row.lat,
                lng: row.lng,
            },
            element_attributes,
        }
    }
}

/// DTO for element creation. `elementId` must be absent; identities are
/// always server-assigned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElement {
    pub element_id: Option<ElementId>,
    #[serde(rename = "type")]
    pub element_type: String,
    pub name: String,
    pub active: Option<bool>,
    pub location: Location,
    #[serde(default)]
    pub element_attributes: Attributes,
}

/// Partial element patch; `None` fields are no-ops, not clears.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub location: Option<Location>,
    pub element_attributes: Option<Attributes>,
}

/// Fully-resolved values for an element INSERT. Built by the service
/// layer once identity, creator, and counters are decided.
#[derive(Debug, Clone)]
pub struct InsertElement {
    pub domain: String,
    pub id: Uuid,
    pub element_type: String,
    pub name: String,
    pub active: bool,
    pub lat: f64,
    pub lng: f64,
    pub created_by_domain: String,
    pub created_by_email: String,
    pub attributes: Attributes,
    pub parent_domain: Option<String>,
    pub parent_id: Option<Uuid>,
    pub full_food_bowls: i64,
    pub full_water_bowls: i64,
}

/// Request body for binding a child to a parent element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindChild {
    pub element_id: ElementId,
}

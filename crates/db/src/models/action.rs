//! Action log entity model and DTOs.
//!
//! Actions are immutable once recorded; there is no update DTO.

use feedgrid_core::action::Attributes;
use feedgrid_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::element::ElementId;
use super::user::UserId;

/// An action row from the `actions` table.
#[derive(Debug, Clone, FromRow)]
pub struct ActionRow {
    pub domain: String,
    pub id: Uuid,
    pub action_type: String,
    pub element_domain: String,
    pub element_id: Uuid,
    pub invoked_by_domain: String,
    pub invoked_by_email: String,
    pub attributes: serde_json::Value,
    pub created_at: Timestamp,
}

/// An action's composite identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionId {
    pub domain: String,
    pub id: Uuid,
}

/// Target element reference: `{elementId: {domain, id}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub element_id: ElementId,
}

/// Invoker reference: `{userId: {domain, email}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokedBy {
    pub user_id: UserId,
}

/// Wire shape:
/// `{actionId, type, element, invokedBy, createdTimestamp,
///   actionAttributes}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBoundary {
    pub action_id: ActionId,
    #[serde(rename = "type")]
    pub action_type: String,
    pub element: ElementRef,
    pub invoked_by: InvokedBy,
    pub created_timestamp: Timestamp,
    pub action_attributes: Attributes,
}

impl From<ActionRow> for ActionBoundary {
    fn from(row: ActionRow) -> Self {
        ActionBoundary {
            action_id: ActionId {
                domain: row.domain,
                id: row.id,
            },
            action_type: row.action_type,
            element: ElementRef {
                element_id: ElementId {
                    domain: row.element_domain,
                    id: row.element_id,
                },
            },
            invoked_by: InvokedBy {
                user_id: UserId {
                    domain: row.invoked_by_domain,
                    email: row.invoked_by_email,
                },
            },
            created_timestamp: row.created_at,
            action_attributes: row.attributes.as_object().cloned().unwrap_or_default(),
        }
    }
}

/// DTO for action invocation. `actionId` must be absent; the server
/// assigns identities on acceptance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeAction {
    pub action_id: Option<ActionId>,
    #[serde(rename = "type")]
    pub action_type: String,
    pub element: ElementRef,
    pub invoked_by: InvokedBy,
    #[serde(default)]
    pub action_attributes: Attributes,
}

//! CVP inventory API models
//!
//! These models match the JSON emitted by the CVP inventory endpoints.
//! Every response struct embeds [`ErrorEnvelope`]: CVP signals application
//! errors inside an otherwise well-formed 200 response, so a reply is only
//! valid once the envelope has been checked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error descriptor embedded in every CVP response
///
/// A populated `errorCode` marks the response as failed regardless of the
/// HTTP status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorEnvelope {
    /// Server error code; empty on success
    pub error_code: String,
    /// Human-readable error message
    pub error_message: String,
}

impl ErrorEnvelope {
    /// Whether the envelope reports a server-side failure
    pub fn is_error(&self) -> bool {
        !self.error_code.is_empty()
    }
}

/// A managed network device as returned by inventory queries
///
/// Immutable snapshot of server state; the client never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetElement {
    pub ip_address: String,
    pub model_name: String,
    pub internal_version: String,
    pub system_mac_address: String,
    pub mem_total: u64,
    pub bootup_time_stamp: f64,
    pub mem_free: u64,
    pub architecture: String,
    pub internal_build_id: String,
    pub hardware_revision: String,
    pub fqdn: String,
    pub ztp_mode: String,
    pub version: String,
    pub serial_number: String,
    pub key: String,
    pub r#type: String,
    /// Queued change-management actions pending against this device
    #[serde(rename = "tempAction")]
    pub temp_action_list: Vec<TempAction>,
    #[serde(rename = "isDANZEnabled")]
    pub is_danz_enabled: String,
    #[serde(rename = "isMLAGEnabled")]
    pub is_mlag_enabled: String,
    pub compliance_indication: String,
    pub compliance_code: String,
    pub last_sync_up: i64,
    pub un_authorized: bool,
    pub device_info: String,
    pub device_status: String,
    pub parent_container_id: String,
    pub container_name: String,

    #[serde(flatten)]
    pub error: ErrorEnvelope,
}

/// A queued change-management task tied to a device or container
///
/// Read-only projection of server state; the ids link the action to
/// configlets, image bundles, and node relationships.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TempAction {
    pub cc_id: String,
    pub session_id: String,
    pub container_key: String,
    pub task_id: i64,
    pub info: String,
    pub info_preview: String,
    pub note: String,
    pub action: String,
    pub node_type: String,
    pub node_id: String,
    pub to_id: String,
    pub from_id: String,
    pub node_name: String,
    pub to_name: String,
    pub from_name: String,
    pub child_tasks: Vec<String>,
    pub parent_task: String,
    pub old_node_name: String,
    pub to_id_type: String,
    pub configlet_list: Vec<String>,
    pub ignore_configlet_list: Vec<String>,
    pub configlet_names_list: Vec<String>,
    pub ignore_configlet_names_list: Vec<String>,
    pub node_list: Vec<String>,
    pub ignore_node_list: Vec<String>,
    pub node_names_list: Vec<String>,
    pub ignore_node_names_list: Vec<String>,
    pub node_ip_address: String,
    pub node_target_ip_address: String,
    pub key: String,
    pub ignore_node_id: String,
    pub ignore_node_name: String,
    pub image_bundle_id: String,
    pub mode: String,
    pub timestamp: i64,
    pub configlet_builder_list: Vec<String>,
    pub configlet_builder_names_list: Vec<String>,
    pub ignore_configlet_builder_list: Vec<String>,
    pub ignore_configlet_builder_names_list: Vec<String>,
    pub page_type: String,
    pub via_container: bool,
    pub best_image_container_id: String,
    pub user: String,
    pub factory_id: i64,
    pub id: i64,
}

/// A grouping node in the management hierarchy
///
/// Containers form a tree via `parent_id`; the client does not validate
/// tree integrity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub child_container_id: bool,
    pub factory_id: i64,
    pub id: i64,
    pub key: String,
    pub name: String,
    pub parent_id: String,
    pub r#type: String,
    pub user_id: String,
}

/// Result envelope for paged inventory queries
///
/// `container_list` maps a device key to the name of the container it is
/// assigned to. A failed search returns an empty page, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryPage {
    pub total: u64,
    pub container_list: HashMap<String, String>,
    pub net_element_list: Vec<NetElement>,

    #[serde(flatten)]
    pub error: ErrorEnvelope,
}

/// Result envelope for paged container searches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerPage {
    pub total: u64,
    #[serde(rename = "data")]
    pub containers: Vec<Container>,

    #[serde(flatten)]
    pub error: ErrorEnvelope,
}

/// Running configuration and compliance warnings for a device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfiguration {
    pub output: String,
    pub warnings: Vec<String>,

    #[serde(flatten)]
    pub error: ErrorEnvelope,
}

/// Outcome summary returned by the save-inventory endpoint
///
/// Counts arrive as strings keyed by the server's display labels and are
/// passed through verbatim, not normalized to integers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveInventoryData {
    pub total: String,
    #[serde(rename = "Upgrade required")]
    pub upgrade_required: String,
    #[serde(rename = "Invalid-Container")]
    pub invalid_container: String,
    #[serde(rename = "Connected")]
    pub connected: String,
    #[serde(rename = "Registration in process by other user")]
    pub registration_in_process_by_other_user: String,
    #[serde(rename = "Duplicate")]
    pub duplicate: String,
    #[serde(rename = "Retry")]
    pub retry: String,
    #[serde(rename = "Unauthorized access")]
    pub unauthorized_access: String,
    pub message: String,
    #[serde(rename = "Connecting")]
    pub connecting: String,
}

/// Wire wrapper around [`SaveInventoryData`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveInventoryResponse {
    pub data: SaveInventoryData,

    #[serde(flatten)]
    pub error: ErrorEnvelope,
}

//! Mock CVP transport for unit testing
//!
//! An in-memory stand-in for a CVP instance that implements [`Transport`]
//! directly, so the real decode and filtering code runs against it. It
//! routes on the request path, renders the exact wire JSON the server
//! would, records every request for request-shape assertions, and can be
//! told to answer with a populated error envelope.
//!
//! The container search mirrors the server contract of never returning the
//! "Undefined" container.

use crate::error::TransportError;
use crate::models::*;
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request seen by the mock, in arrival order
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path
    pub path: String,
    /// Query parameters, in the order they were passed
    pub query: Vec<(String, String)>,
    /// JSON body for POSTs
    pub body: Option<serde_json::Value>,
}

/// In-memory mock CVP instance
#[derive(Clone, Default)]
pub struct MockCvp {
    devices: Arc<Mutex<Vec<NetElement>>>,
    containers: Arc<Mutex<Vec<Container>>>,
    // device key -> container name, the page's containerList mapping
    container_map: Arc<Mutex<HashMap<String, String>>>,
    configuration: Arc<Mutex<DeviceConfiguration>>,
    save_summary: Arc<Mutex<SaveInventoryData>>,
    non_connected_count: Arc<Mutex<u64>>,
    failure: Arc<Mutex<Option<ErrorEnvelope>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockCvp {
    /// Create an empty mock instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device to the inventory (for test setup)
    pub fn add_device(&self, device: NetElement) {
        self.devices.lock().unwrap().push(device);
    }

    /// Add a container to the hierarchy (for test setup)
    pub fn add_container(&self, container: Container) {
        self.containers.lock().unwrap().push(container);
    }

    /// Record a device-key to container-name mapping for inventory pages
    pub fn map_device_to_container(&self, device_key: &str, container_name: &str) {
        self.container_map
            .lock()
            .unwrap()
            .insert(device_key.to_string(), container_name.to_string());
    }

    /// Set the reply for configuration lookups
    pub fn set_configuration(&self, output: &str, warnings: &[&str]) {
        *self.configuration.lock().unwrap() = DeviceConfiguration {
            output: output.to_string(),
            warnings: warnings.iter().map(|w| (*w).to_string()).collect(),
            ..DeviceConfiguration::default()
        };
    }

    /// Set the summary returned by the save endpoint
    pub fn set_save_summary(&self, summary: SaveInventoryData) {
        *self.save_summary.lock().unwrap() = summary;
    }

    /// Set the non-connected device count
    pub fn set_non_connected_count(&self, count: u64) {
        *self.non_connected_count.lock().unwrap() = count;
    }

    /// Answer every subsequent request with a populated error envelope
    pub fn fail_with(&self, code: &str, message: &str) {
        *self.failure.lock().unwrap() = Some(ErrorEnvelope {
            error_code: code.to_string(),
            error_message: message.to_string(),
        });
    }

    /// Requests seen so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, path: &str, query: &[(&str, String)], body: Option<serde_json::Value>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            body,
        });
    }

    fn injected_failure(&self) -> Option<Vec<u8>> {
        self.failure
            .lock()
            .unwrap()
            .as_ref()
            .map(|envelope| serde_json::to_vec(envelope).unwrap())
    }

    fn inventory_page(&self, querystr: &str) -> InventoryPage {
        let devices = self.devices.lock().unwrap();
        let matched: Vec<NetElement> = devices
            .iter()
            .filter(|d| {
                querystr.is_empty()
                    || d.fqdn.contains(querystr)
                    || d.system_mac_address.contains(querystr)
                    || d.parent_container_id.contains(querystr)
            })
            .cloned()
            .collect();
        InventoryPage {
            total: matched.len() as u64,
            container_list: self.container_map.lock().unwrap().clone(),
            net_element_list: matched,
            error: ErrorEnvelope::default(),
        }
    }

    fn container_page(&self, querystr: &str) -> ContainerPage {
        let containers = self.containers.lock().unwrap();
        // searchContainers.do never returns the Undefined container
        let matched: Vec<Container> = containers
            .iter()
            .filter(|c| c.name != "Undefined")
            .filter(|c| querystr.is_empty() || c.name.contains(querystr))
            .cloned()
            .collect();
        ContainerPage {
            total: matched.len() as u64,
            containers: matched,
            error: ErrorEnvelope::default(),
        }
    }
}

fn query_value(query: &[(&str, String)], key: &str) -> String {
    query
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

fn not_found(path: &str) -> TransportError {
    TransportError::Status {
        status: reqwest::StatusCode::NOT_FOUND,
        body: format!("no mock route for {path}"),
    }
}

#[async_trait]
impl Transport for MockCvp {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, TransportError> {
        self.record(path, query, None);
        if let Some(body) = self.injected_failure() {
            return Ok(body);
        }

        match path {
            "/inventory/getInventory.do" => {
                let page = self.inventory_page(&query_value(query, "queryparam"));
                Ok(serde_json::to_vec(&page).unwrap())
            }
            "/inventory/add/searchContainers.do" => {
                let page = self.container_page(&query_value(query, "queryparam"));
                Ok(serde_json::to_vec(&page).unwrap())
            }
            "/inventory/getInventoryConfiguration.do" => {
                let config = self.configuration.lock().unwrap().clone();
                Ok(serde_json::to_vec(&config).unwrap())
            }
            "/inventory/add/getNonConnectedDeviceCount.do" => {
                let count = *self.non_connected_count.lock().unwrap();
                Ok(serde_json::to_vec(&json!({ "data": count })).unwrap())
            }
            _ => Err(not_found(path)),
        }
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, TransportError> {
        self.record(path, query, body);
        if let Some(body) = self.injected_failure() {
            return Ok(body);
        }

        match path {
            "/inventory/v2/saveInventory.do" => {
                let reply = SaveInventoryResponse {
                    data: self.save_summary.lock().unwrap().clone(),
                    error: ErrorEnvelope::default(),
                };
                Ok(serde_json::to_vec(&reply).unwrap())
            }
            "/inventory/add/addToInventory.do" | "/inventory/deleteDevices.do" => {
                Ok(b"{}".to_vec())
            }
            _ => Err(not_found(path)),
        }
    }
}

//! CVP inventory API client
//!
//! Implements the CVP inventory REST operations: paged device and container
//! queries, convenience lookups by name/container/MAC, and inventory
//! mutation (save, add, delete). Each operation is a single request/response
//! round trip over the [`Transport`] plus a thin post-processing filter;
//! there is no retry, caching, or session state here.

use crate::error::CvpError;
use crate::models::*;
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Parent-container id CVP assigns to devices not yet placed in a container
const UNDEFINED_CONTAINER_ID: &str = "undefined_container";

/// CVP inventory API client
///
/// Stateless: every call is an independent round trip, and concurrent use is
/// as safe as the underlying transport.
#[derive(Clone)]
pub struct CvpClient {
    transport: Arc<dyn Transport>,
}

impl CvpClient {
    /// Create a client over the given transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client over a shared transport
    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn get_decoded<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CvpError> {
        let body = self
            .transport
            .get(path, query)
            .await
            .map_err(|source| CvpError::Transport { method, source })?;
        serde_json::from_slice(&body).map_err(|source| CvpError::Decode { method, source })
    }

    /// Query the device inventory by search string and index range
    ///
    /// The three parameters are passed through verbatim as `queryparam`,
    /// `startIndex`, and `endIndex`. A failed search returns an empty page,
    /// not an error.
    pub async fn get_inventory(
        &self,
        querystr: &str,
        start: u32,
        end: u32,
    ) -> Result<InventoryPage, CvpError> {
        const METHOD: &str = "get_inventory";
        debug!("querying inventory for {:?} [{}..{}]", querystr, start, end);

        let page: InventoryPage = self
            .get_decoded(
                METHOD,
                "/inventory/getInventory.do",
                &range_query(querystr, start, end),
            )
            .await?;
        check_envelope(METHOD, &page.error)?;
        Ok(page)
    }

    /// Get the running configuration and warnings for a device by MAC address
    pub async fn get_inventory_configuration(
        &self,
        mac_address: &str,
    ) -> Result<DeviceConfiguration, CvpError> {
        const METHOD: &str = "get_inventory_configuration";
        debug!("fetching configuration for {}", mac_address);

        let config: DeviceConfiguration = self
            .get_decoded(
                METHOD,
                "/inventory/getInventoryConfiguration.do",
                &[("netElementId", mac_address.to_string())],
            )
            .await?;
        check_envelope(METHOD, &config.error)?;
        Ok(config)
    }

    /// List every device in the inventory
    ///
    /// An empty inventory yields an empty vec, not an error.
    pub async fn get_all_devices(&self) -> Result<Vec<NetElement>, CvpError> {
        let page = self.get_inventory("", 0, 0).await?;
        Ok(page.net_element_list)
    }

    /// Look a device up by its fully qualified name
    ///
    /// The server search may return partial matches; only a device whose
    /// `fqdn` equals `fqdn` exactly is returned.
    pub async fn get_device_by_name(&self, fqdn: &str) -> Result<Option<NetElement>, CvpError> {
        let page = self.get_inventory(fqdn, 0, 0).await?;
        Ok(page.net_element_list.into_iter().find(|d| d.fqdn == fqdn))
    }

    /// List the devices assigned to the named container
    ///
    /// Resolves the container first, then lists the whole inventory and
    /// filters by parent-container key client-side, so cost grows with total
    /// inventory size. An unknown container yields an empty vec, not an
    /// error.
    pub async fn get_devices_in_container(
        &self,
        name: &str,
    ) -> Result<Vec<NetElement>, CvpError> {
        let Some(container) = self.get_container_by_name(name).await? else {
            return Ok(Vec::new());
        };

        let devices = self.get_all_devices().await?;
        Ok(devices
            .into_iter()
            .filter(|d| d.parent_container_id == container.key)
            .collect())
    }

    /// List the devices that have not yet been assigned to a container
    pub async fn get_undefined_devices(&self) -> Result<Vec<NetElement>, CvpError> {
        let page = self.get_inventory("undefined", 0, 0).await?;
        Ok(page
            .net_element_list
            .into_iter()
            .filter(|d| d.parent_container_id == UNDEFINED_CONTAINER_ID)
            .collect())
    }

    /// Get the container a device is assigned to, by device MAC address
    ///
    /// Returns `Ok(None)` when the MAC matches no device. A device whose key
    /// has no entry in the page's container map is a hard
    /// [`CvpError::NotFound`].
    pub async fn get_device_container(&self, mac: &str) -> Result<Option<Container>, CvpError> {
        const METHOD: &str = "get_device_container";

        let page = self.get_inventory(mac, 0, 0).await?;
        if page.net_element_list.is_empty() {
            return Ok(None);
        }

        let device_key = page
            .net_element_list
            .iter()
            .find(|d| d.system_mac_address == mac)
            .map(|d| d.key.clone())
            .unwrap_or_default();

        let container_name =
            page.container_list
                .get(&device_key)
                .ok_or_else(|| CvpError::NotFound {
                    method: METHOD,
                    message: format!("device [{mac}] not of any container"),
                })?;
        self.get_container_by_name(container_name).await
    }

    /// Search containers by search string and index range
    ///
    /// The server never includes the "Undefined" container in these results;
    /// callers that care about unplaced devices must special-case it (see
    /// [`Self::get_undefined_devices`]).
    pub async fn search_containers(
        &self,
        querystr: &str,
        start: u32,
        end: u32,
    ) -> Result<ContainerPage, CvpError> {
        const METHOD: &str = "search_containers";
        debug!("searching containers for {:?} [{}..{}]", querystr, start, end);

        let page: ContainerPage = self
            .get_decoded(
                METHOD,
                "/inventory/add/searchContainers.do",
                &range_query(querystr, start, end),
            )
            .await?;
        check_envelope(METHOD, &page.error)?;
        Ok(page)
    }

    /// List every container in the hierarchy
    pub async fn get_all_containers(&self) -> Result<ContainerPage, CvpError> {
        self.search_containers("", 0, 0).await
    }

    /// Look a container up by exact name
    pub async fn get_container_by_name(&self, name: &str) -> Result<Option<Container>, CvpError> {
        let page = self.search_containers(name, 0, 0).await?;
        Ok(page.containers.into_iter().find(|c| c.name == name))
    }

    /// Count the devices that are known but not connected
    pub async fn get_non_connected_device_count(&self) -> Result<u64, CvpError> {
        const METHOD: &str = "get_non_connected_device_count";

        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct CountReply {
            data: u64,
            #[serde(flatten)]
            error: ErrorEnvelope,
        }

        let reply: CountReply = self
            .get_decoded(
                METHOD,
                "/inventory/add/getNonConnectedDeviceCount.do",
                &[],
            )
            .await?;
        check_envelope(METHOD, &reply.error)?;
        Ok(reply.data)
    }

    /// Commit the current inventory and return the per-outcome summary
    pub async fn save_inventory(&self) -> Result<SaveInventoryData, CvpError> {
        const METHOD: &str = "save_inventory";
        debug!("saving inventory");

        let body = self
            .transport
            .post("/inventory/v2/saveInventory.do", &[], Some(json!([])))
            .await
            .map_err(|source| CvpError::Transport {
                method: METHOD,
                source,
            })?;
        let reply: SaveInventoryResponse = serde_json::from_slice(&body)
            .map_err(|source| CvpError::Decode {
                method: METHOD,
                source,
            })?;
        check_envelope(METHOD, &reply.error)?;
        Ok(reply.data)
    }

    /// Attach a new device to the inventory under an existing container
    ///
    /// The parent container is named twice (name and id) because the
    /// endpoint wants both. The existence of the parent container is NOT
    /// verified here; that is the caller's contract.
    pub async fn add_to_inventory(
        &self,
        device_ip_address: &str,
        parent_container_name: &str,
        parent_container_id: &str,
    ) -> Result<(), CvpError> {
        const METHOD: &str = "add_to_inventory";
        debug!(
            "adding {} under container {}",
            device_ip_address, parent_container_name
        );

        let query = [
            ("startIndex", "0".to_string()),
            ("endIndex", "0".to_string()),
        ];
        let data = json!({
            "data": [{
                "containerName": parent_container_name,
                "containerId": parent_container_id,
                "containerType": "Existing",
                "ipAddress": device_ip_address,
                "containerList": [],
            }]
        });

        self.transport
            .post("/inventory/add/addToInventory.do", &query, Some(data))
            .await
            .map_err(|source| CvpError::Transport {
                method: METHOD,
                source,
            })?;
        Ok(())
    }

    /// Remove a single device from the inventory
    ///
    /// Convenience wrapper over [`Self::delete_devices`]; produces the
    /// identical request.
    pub async fn delete_device(&self, device_mac: &str) -> Result<(), CvpError> {
        self.delete_devices(&[device_mac]).await
    }

    /// Remove devices from the inventory by MAC address
    pub async fn delete_devices(&self, device_macs: &[&str]) -> Result<(), CvpError> {
        const METHOD: &str = "delete_devices";
        debug!("deleting {} device(s)", device_macs.len());

        self.transport
            .post(
                "/inventory/deleteDevices.do",
                &[],
                Some(json!({ "data": device_macs })),
            )
            .await
            .map_err(|source| CvpError::Transport {
                method: METHOD,
                source,
            })?;
        Ok(())
    }
}

fn range_query(querystr: &str, start: u32, end: u32) -> [(&'static str, String); 3] {
    [
        ("queryparam", querystr.to_string()),
        ("startIndex", start.to_string()),
        ("endIndex", end.to_string()),
    ]
}

fn check_envelope(method: &'static str, envelope: &ErrorEnvelope) -> Result<(), CvpError> {
    if envelope.is_error() {
        return Err(CvpError::Server {
            method,
            code: envelope.error_code.clone(),
            message: envelope.error_message.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::mock::MockCvp;
    use async_trait::async_trait;

    /// Transport that returns the same canned bytes for every request
    struct StaticTransport(&'static str);

    #[async_trait]
    impl Transport for StaticTransport {
        async fn get(
            &self,
            _path: &str,
            _query: &[(&str, String)],
        ) -> Result<Vec<u8>, TransportError> {
            Ok(self.0.as_bytes().to_vec())
        }

        async fn post(
            &self,
            _path: &str,
            _query: &[(&str, String)],
            _body: Option<serde_json::Value>,
        ) -> Result<Vec<u8>, TransportError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    fn device(fqdn: &str, mac: &str, key: &str, parent: &str) -> NetElement {
        NetElement {
            fqdn: fqdn.to_string(),
            system_mac_address: mac.to_string(),
            key: key.to_string(),
            parent_container_id: parent.to_string(),
            ..NetElement::default()
        }
    }

    fn container(name: &str, key: &str) -> Container {
        Container {
            key: key.to_string(),
            name: name.to_string(),
            parent_id: "root".to_string(),
            r#type: "container".to_string(),
            ..Container::default()
        }
    }

    #[tokio::test]
    async fn get_all_devices_on_empty_inventory_is_empty() {
        let client = CvpClient::new(MockCvp::new());
        let devices = client.get_all_devices().await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn get_device_by_name_requires_exact_fqdn() {
        let mock = MockCvp::new();
        mock.add_device(device("leaf1.pod1.example.com", "00:1c:73:aa:bb:cc", "k1", "c1"));
        let client = CvpClient::new(mock);

        // The search matches by substring, so the page is non-empty, but no
        // device has this exact fqdn.
        assert!(client.get_device_by_name("leaf1").await.unwrap().is_none());

        let found = client
            .get_device_by_name("leaf1.pod1.example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.key, "k1");
    }

    #[tokio::test]
    async fn get_devices_in_unknown_container_is_empty() {
        let mock = MockCvp::new();
        mock.add_device(device("leaf1.pod1.example.com", "00:1c:73:aa:bb:cc", "k1", "c1"));
        let client = CvpClient::new(mock);

        let devices = client.get_devices_in_container("NoSuchPod").await.unwrap();
        assert!(devices.is_empty());
    }

    #[tokio::test]
    async fn get_devices_in_container_filters_by_parent_key() {
        let mock = MockCvp::new();
        mock.add_container(container("Leaf-Pod1", "c1"));
        mock.add_container(container("Spine-Pod1", "c2"));
        mock.add_device(device("leaf1.pod1.example.com", "00:1c:73:aa:bb:01", "k1", "c1"));
        mock.add_device(device("leaf2.pod1.example.com", "00:1c:73:aa:bb:02", "k2", "c1"));
        mock.add_device(device("spine1.pod1.example.com", "00:1c:73:aa:bb:03", "k3", "c2"));
        let client = CvpClient::new(mock);

        let devices = client.get_devices_in_container("Leaf-Pod1").await.unwrap();
        let mut keys: Vec<_> = devices.iter().map(|d| d.key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["k1", "k2"]);
    }

    #[tokio::test]
    async fn get_undefined_devices_keeps_only_sentinel_parent() {
        let mock = MockCvp::new();
        mock.add_device(device(
            "new-switch.example.com",
            "00:1c:73:aa:bb:04",
            "k4",
            "undefined_container",
        ));
        // Matches the "undefined" search by name but lives in a real
        // container, so the client-side filter must drop it.
        mock.add_device(device(
            "undefined-imposter.example.com",
            "00:1c:73:aa:bb:05",
            "k5",
            "c1",
        ));
        let client = CvpClient::new(mock);

        let devices = client.get_undefined_devices().await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].key, "k4");
    }

    #[tokio::test]
    async fn get_device_container_without_mapping_is_hard_error() {
        let mock = MockCvp::new();
        mock.add_device(device("leaf1.pod1.example.com", "00:1c:73:aa:bb:01", "k1", "c1"));
        let client = CvpClient::new(mock);

        let err = client
            .get_device_container("00:1c:73:aa:bb:01")
            .await
            .unwrap_err();
        match err {
            CvpError::NotFound { method, message } => {
                assert_eq!(method, "get_device_container");
                assert!(message.contains("not of any container"), "{message}");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_device_container_with_no_match_is_none() {
        let client = CvpClient::new(MockCvp::new());
        let found = client
            .get_device_container("00:1c:73:aa:bb:01")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn get_device_container_resolves_through_page_mapping() {
        let mock = MockCvp::new();
        mock.add_container(container("Leaf-Pod1", "c1"));
        mock.add_device(device("leaf1.pod1.example.com", "00:1c:73:aa:bb:01", "k1", "c1"));
        mock.map_device_to_container("k1", "Leaf-Pod1");
        let client = CvpClient::new(mock);

        let found = client
            .get_device_container("00:1c:73:aa:bb:01")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.key, "c1");
        assert_eq!(found.name, "Leaf-Pod1");
    }

    #[tokio::test]
    async fn delete_device_posts_same_body_as_bulk_delete() {
        let mock = MockCvp::new();
        let client = CvpClient::new(mock.clone());

        client.delete_device("00:1c:73:aa:bb:01").await.unwrap();
        client.delete_devices(&["00:1c:73:aa:bb:01"]).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "/inventory/deleteDevices.do");
        assert_eq!(requests[0].path, requests[1].path);
        assert_eq!(requests[0].body, requests[1].body);
        assert_eq!(
            requests[0].body,
            Some(json!({ "data": ["00:1c:73:aa:bb:01"] }))
        );
    }

    #[tokio::test]
    async fn populated_envelope_surfaces_as_server_error() {
        let mock = MockCvp::new();
        mock.fail_with("112498", "Unauthorized User");
        let client = CvpClient::new(mock);

        let err = client.get_inventory("", 0, 0).await.unwrap_err();
        match err {
            CvpError::Server { method, code, message } => {
                assert_eq!(method, "get_inventory");
                assert_eq!(code, "112498");
                assert_eq!(message, "Unauthorized User");
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let client = CvpClient::new(StaticTransport("this is not json"));
        let err = client.get_inventory("", 0, 0).await.unwrap_err();
        assert!(matches!(
            err,
            CvpError::Decode { method: "get_inventory", .. }
        ));
    }

    #[tokio::test]
    async fn inventory_query_passes_range_params_through() {
        let mock = MockCvp::new();
        let client = CvpClient::new(mock.clone());

        client.get_inventory("leaf", 5, 25).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/inventory/getInventory.do");
        assert_eq!(
            requests[0].query,
            [
                ("queryparam".to_string(), "leaf".to_string()),
                ("startIndex".to_string(), "5".to_string()),
                ("endIndex".to_string(), "25".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn add_to_inventory_posts_descriptor_without_container_check() {
        // No containers configured in the mock: the call must still succeed,
        // because parent-container existence is the caller's contract.
        let mock = MockCvp::new();
        let client = CvpClient::new(mock.clone());

        client
            .add_to_inventory("10.0.0.9", "Leaf-Pod1", "container-42")
            .await
            .unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/inventory/add/addToInventory.do");
        assert_eq!(
            requests[0].query,
            [
                ("startIndex".to_string(), "0".to_string()),
                ("endIndex".to_string(), "0".to_string()),
            ]
        );
        assert_eq!(
            requests[0].body,
            Some(json!({
                "data": [{
                    "containerName": "Leaf-Pod1",
                    "containerId": "container-42",
                    "containerType": "Existing",
                    "ipAddress": "10.0.0.9",
                    "containerList": [],
                }]
            }))
        );
    }

    #[tokio::test]
    async fn save_inventory_returns_string_counts_verbatim() {
        let mock = MockCvp::new();
        mock.set_save_summary(SaveInventoryData {
            total: "2".to_string(),
            connected: "1".to_string(),
            duplicate: "1".to_string(),
            message: "Added to inventory".to_string(),
            ..SaveInventoryData::default()
        });
        let client = CvpClient::new(mock.clone());

        let summary = client.save_inventory().await.unwrap();
        assert_eq!(summary.total, "2");
        assert_eq!(summary.connected, "1");
        assert_eq!(summary.duplicate, "1");
        assert_eq!(summary.message, "Added to inventory");

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/inventory/v2/saveInventory.do");
        assert_eq!(requests[0].body, Some(json!([])));
    }

    #[tokio::test]
    async fn non_connected_count_decodes_scalar_data() {
        let mock = MockCvp::new();
        mock.set_non_connected_count(7);
        let client = CvpClient::new(mock);

        assert_eq!(client.get_non_connected_device_count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn container_search_never_includes_undefined() {
        let mock = MockCvp::new();
        mock.add_container(container("Undefined", "undefined_container"));
        mock.add_container(container("Leaf-Pod1", "c1"));
        let client = CvpClient::new(mock);

        let page = client.get_all_containers().await.unwrap();
        assert_eq!(page.containers.len(), 1);
        assert_eq!(page.containers[0].name, "Leaf-Pod1");

        // Consequence of the server contract: the sentinel container cannot
        // be resolved by name.
        assert!(client
            .get_container_by_name("Undefined")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn get_container_by_name_requires_exact_match() {
        let mock = MockCvp::new();
        mock.add_container(container("Leaf-Pod1", "c1"));
        let client = CvpClient::new(mock);

        assert!(client.get_container_by_name("Leaf").await.unwrap().is_none());
        let found = client
            .get_container_by_name("Leaf-Pod1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.key, "c1");
    }

    #[tokio::test]
    async fn configuration_lookup_sends_net_element_id() {
        let mock = MockCvp::new();
        mock.set_configuration("hostname leaf1\n", &["mismatch: ntp"]);
        let client = CvpClient::new(mock.clone());

        let config = client
            .get_inventory_configuration("00:1c:73:aa:bb:01")
            .await
            .unwrap();
        assert_eq!(config.output, "hostname leaf1\n");
        assert_eq!(config.warnings, ["mismatch: ntp"]);

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/inventory/getInventoryConfiguration.do");
        assert_eq!(
            requests[0].query,
            [("netElementId".to_string(), "00:1c:73:aa:bb:01".to_string())]
        );
    }
}

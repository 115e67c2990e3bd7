//! Integration tests for the CVP client
//!
//! These tests require a reachable CVP instance.
//! Set CVP_URL and CVP_TOKEN environment variables to run.

use cvp_client::{CvpClient, HttpTransport};

fn live_client() -> CvpClient {
    let url = std::env::var("CVP_URL")
        .unwrap_or_else(|_| "https://localhost/cvpservice".to_string());
    let token = std::env::var("CVP_TOKEN").expect("CVP_TOKEN environment variable must be set");

    let transport = HttpTransport::new(url, token).expect("Failed to create transport");
    CvpClient::new(transport)
}

#[tokio::test]
#[ignore] // Requires a running CVP instance
async fn test_inventory_connectivity() {
    let client = live_client();

    let page = client.get_inventory("", 0, 0).await;
    assert!(page.is_ok(), "Failed to query inventory");
}

#[tokio::test]
#[ignore]
async fn test_list_all_devices() {
    let client = live_client();

    let devices = client
        .get_all_devices()
        .await
        .expect("Failed to list devices");

    println!("Found {} devices", devices.len());
}

#[tokio::test]
#[ignore]
async fn test_list_all_containers() {
    let client = live_client();

    let page = client
        .get_all_containers()
        .await
        .expect("Failed to list containers");

    println!("Found {} containers", page.containers.len());
}

#[tokio::test]
#[ignore]
async fn test_non_connected_device_count() {
    let client = live_client();

    let count = client
        .get_non_connected_device_count()
        .await
        .expect("Failed to get non-connected device count");

    println!("{} devices not connected", count);
}

//! Inventory report example
//!
//! Walks the inventory API of a live CVP instance and prints a short
//! report: devices with their container assignment, the container
//! hierarchy, and the non-connected device count.
//!
//! Configuration comes from the environment: CVP_URL and CVP_TOKEN.

use cvp_client::{CvpClient, HttpTransport};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cvp_url =
        env::var("CVP_URL").unwrap_or_else(|_| "https://localhost/cvpservice".to_string());
    let cvp_token =
        env::var("CVP_TOKEN").map_err(|_| anyhow::anyhow!("CVP_TOKEN must be set"))?;

    info!("Connecting to {}", cvp_url);
    let transport = HttpTransport::new(cvp_url, cvp_token)?;
    let client = CvpClient::new(transport);

    let devices = client.get_all_devices().await?;
    println!("{} devices in inventory:", devices.len());
    for device in &devices {
        println!(
            "  {:<40} {:<20} container={}",
            device.fqdn, device.system_mac_address, device.container_name
        );
    }

    let containers = client.get_all_containers().await?;
    println!("{} containers:", containers.containers.len());
    for container in &containers.containers {
        println!("  {:<30} parent={}", container.name, container.parent_id);
    }

    let unplaced = client.get_undefined_devices().await?;
    if !unplaced.is_empty() {
        println!("{} devices awaiting container assignment", unplaced.len());
    }

    let non_connected = client.get_non_connected_device_count().await?;
    println!("{non_connected} devices not connected");

    Ok(())
}

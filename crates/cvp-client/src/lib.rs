//! CloudVision Portal inventory REST API client
//!
//! A Rust client library for the CVP inventory API. Provides type-safe
//! models and methods for device and container queries, lookups by
//! name/container/MAC, and inventory mutation (save, add, delete).
//!
//! # Example
//!
//! ```no_run
//! use cvp_client::{CvpClient, HttpTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client over the reqwest-backed transport
//! let transport = HttpTransport::new(
//!     "https://cvp.example.com/cvpservice".to_string(),
//!     "your-service-token".to_string(),
//! )?;
//! let client = CvpClient::new(transport);
//!
//! // List every known device
//! let devices = client.get_all_devices().await?;
//! for device in &devices {
//!     println!("{} ({})", device.fqdn, device.system_mac_address);
//! }
//!
//! // Resolve the container a device is assigned to
//! let container = client.get_device_container("00:1c:73:aa:bb:cc").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//!
//! - **One round trip per call**: no retries, pagination loops, or caching;
//!   start/end indices pass through to the server verbatim.
//! - **Transport seam**: the client drives a [`Transport`] trait object;
//!   [`HttpTransport`] is the reqwest implementation, and the `test-util`
//!   feature exposes an in-memory mock.
//! - **Envelope checking**: CVP embeds an error descriptor in every JSON
//!   response; each operation checks it after decode and surfaces it as
//!   [`CvpError::Server`].

pub mod client;
pub mod error;
pub mod models;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod transport;

pub use client::CvpClient;
pub use error::{CvpError, TransportError};
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockCvp;
pub use models::*;
pub use transport::{HttpTransport, Transport};

//! DriveMirror Graph - Microsoft Graph adapter
//!
//! Provides the read-only async operations the sync engine needs against
//! SharePoint document libraries and OneDrive drives:
//! - App-only OAuth2 authentication (client credentials)
//! - Paginated child listings
//! - Streamed content downloads
//! - Task root resolution (site + library, or user drive)
//!
//! ## Modules
//!
//! - [`auth`] - Client-credentials token acquisition
//! - [`client`] - Microsoft Graph HTTP client and status normalization
//! - [`paths`] - Typed, percent-encoded Graph path builder
//! - [`children`] - Child listings and the driveItem parser
//! - [`download`] - Streamed content download into place
//! - [`resolve`] - Site, drive and folder resolution
//! - [`throttle`] - `Retry-After` parsing
//! - [`provider`] - [`ICloudProvider`](drivemirror_core::ports::ICloudProvider) implementation

pub mod auth;
pub mod children;
pub mod client;
pub mod download;
pub mod paths;
pub mod provider;
pub mod resolve;
pub mod throttle;

pub use client::GraphClient;
pub use provider::GraphCloudProvider;

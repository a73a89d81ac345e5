//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the sync engine depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ICloudProvider`] - Read-only remote store operations (SharePoint, OneDrive)

pub mod cloud_provider;

pub use cloud_provider::{ChildrenPage, ICloudProvider, RemoteError, RemoteRoot, RootSpec};

//! DriveMirror Core - Domain types, ports and configuration
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `RemoteItem`, `Decision`, `UpdatePolicy`, `TaskResult`, `RunResult`
//! - **Port definitions** - `ICloudProvider` and the normalized `RemoteError`
//! - **Configuration** - YAML config with task definitions and validation
//!
//! # Architecture
//!
//! The domain module contains pure types with no I/O. Ports define the trait
//! interface that the Graph adapter implements and the sync engine consumes.

pub mod config;
pub mod domain;
pub mod ports;

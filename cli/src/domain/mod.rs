//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod catalog;
pub mod error;
pub mod invocation;
pub mod port_map;
pub mod settings;
pub mod transfer;

pub use catalog::{AliasMap, Catalog, KnownServices, Topology};
pub use error::{CatalogError, DockerApiError, SettingsError, TransferError, UpdateError};
pub use invocation::{Invocation, classify};
pub use port_map::{ContainerSummary, PortBinding, PortReport, service_name};
pub use settings::{ComposeTarget, Mode, Settings, UserConfig};
pub use transfer::{Direction, TransferPlan};

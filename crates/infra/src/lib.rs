//! Infrastructure layer: persistence port, workflow service, configuration.

pub mod config;
pub mod service;
pub mod store;


pub use config::{ConfigError, EngineConfig};
pub use service::{BlockFigures, PolishingSheet, ServiceError, WorkflowService};
pub use store::{ChildStore, EntityStore, InMemoryEntityStore, StoreError};

//! Configuration loading and persistence.
mod loader;
pub mod types;


pub use loader::{load_config, store_config};
pub use types::{
    AsynchronousConfig, BackendConfig, ConfigFile, ExperimentConfig, LimitsConfig,
    SynchronicityConfig,
};

#[cfg(test)]
pub(crate) use loader::load_config_file;

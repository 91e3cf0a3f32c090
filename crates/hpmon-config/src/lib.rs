pub mod global;
pub mod loader;
pub mod logging;

pub use global::{GlobalConfig, LoggingConfig, ServerConfig, StorageConfig};
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use logging::init_tracing;

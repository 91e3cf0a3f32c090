pub mod api;
pub mod fault_codes;
pub mod handlers;
pub mod models;
pub mod service;
pub mod source;
pub mod state;
pub mod synthetic;

pub use api::create_router;
pub use fault_codes::FaultCodeTable;
pub use models::{LatestResponse, MetadataResponse};
pub use service::QueryService;
pub use source::SnapshotSource;
pub use state::AppState;

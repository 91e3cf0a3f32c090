pub mod error;
pub mod history;
pub mod record;
pub mod store;

pub use error::StorageError;
pub use history::append_bounded;
pub use record::{DeviceIdentity, DeviceRecord, Metadata};
pub use store::{HistoryStore, DEFAULT_CAPACITY};

pub mod assembler;
pub mod error;
pub mod schema;
pub mod snapshot;
pub mod status;
pub mod value;

pub use assembler::{Assembly, FieldFailure, SnapshotAssembler};
pub use error::TelemetryError;
pub use schema::{Decode, FieldSpec, Snapshot, SCHEMA};
pub use status::{StatusWord, LOAD_OUTPUT_FLAGS, OPERATING_FLAGS};
pub use value::{FieldKind, FieldValue};

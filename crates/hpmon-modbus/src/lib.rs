pub mod client;
pub mod decoder;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ModbusClient;
pub use decoder::{compose_wide32, to_int16, RegisterDecoder};
pub use error::TransportError;
pub use transport::{RegisterBank, RegisterTransport};
pub use types::{LinkKind, ModbusConfig, Parity};

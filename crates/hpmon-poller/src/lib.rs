pub mod cycle;
pub mod error;

pub use cycle::{CycleReport, Poller};
pub use error::PollError;

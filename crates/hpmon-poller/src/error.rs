use hpmon_modbus::TransportError;
use hpmon_storage::StorageError;
use hpmon_telemetry::TelemetryError;
use thiserror::Error;

/// 采集周期错误类型
#[derive(Error, Debug)]
pub enum PollError {
    /// 无法建立链路
    #[error("Failed to connect to controller: {0}")]
    Connect(#[source] TransportError),

    /// 快照组装失败（链路中断）
    #[error("Snapshot assembly failed: {0}")]
    Telemetry(#[from] TelemetryError),

    /// 持久化失败
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, PollError>;

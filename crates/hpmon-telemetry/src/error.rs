use hpmon_modbus::TransportError;
use thiserror::Error;

/// 快照组装错误类型
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// 链路整体失效，本周期不产生快照
    #[error("Transport link lost while reading {field}: {source}")]
    LinkLost {
        field: &'static str,
        #[source]
        source: TransportError,
    },

    /// 链路虽已打开，但没有任何字段读取成功（如 RS-485 线路断开）
    #[error("Controller did not answer any of {fields} fields: {source}")]
    NoResponse {
        fields: usize,
        #[source]
        source: TransportError,
    },

    /// 解码结果与字段类型不符
    #[error("Field {field} decoded to a value of the wrong kind")]
    KindMismatch { field: &'static str },

    /// 未知字段
    #[error("Unknown snapshot field: {0}")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;

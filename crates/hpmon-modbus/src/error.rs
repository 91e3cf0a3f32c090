use std::io;
use thiserror::Error;

/// 寄存器传输错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// 尚未建立连接
    #[error("Not connected")]
    NotConnected,

    /// 建立连接失败
    #[error("Failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    /// 链路中断（断开、复位、EOF）
    #[error("Link failure: {0}")]
    Link(String),

    /// 读取超时
    #[error("Read of register {address} timed out after {timeout_ms}ms")]
    Timeout { address: u16, timeout_ms: u64 },

    /// 从站返回异常码
    #[error("Modbus exception at register {address}: {code}")]
    Exception { address: u16, code: String },

    /// 协议错误
    #[error("Modbus protocol error: {0}")]
    Protocol(String),

    /// 返回的寄存器数量不足
    #[error("Short response at register {address}: expected {expected}, got {actual}")]
    ShortResponse {
        address: u16,
        expected: u16,
        actual: usize,
    },
}

impl TransportError {
    /// 是否为整条链路失效（整个采集周期作废）
    pub fn is_link_failure(&self) -> bool {
        matches!(
            self,
            TransportError::NotConnected
                | TransportError::Connect { .. }
                | TransportError::Link(_)
        )
    }

    /// 按 IO 错误种类分类
    pub(crate) fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof => TransportError::Link(err.to_string()),
            _ => TransportError::Protocol(err.to_string()),
        }
    }
}

impl From<tokio_modbus::Error> for TransportError {
    fn from(err: tokio_modbus::Error) -> Self {
        match err {
            tokio_modbus::Error::Transport(io_err) => TransportError::from_io(&io_err),
            other => TransportError::Protocol(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_classification() {
        assert!(TransportError::NotConnected.is_link_failure());
        assert!(TransportError::Link("reset".into()).is_link_failure());
        assert!(!TransportError::Timeout {
            address: 100,
            timeout_ms: 1000
        }
        .is_link_failure());
        assert!(!TransportError::Exception {
            address: 100,
            code: "IllegalDataAddress".into()
        }
        .is_link_failure());
    }

    #[test]
    fn test_io_error_mapping() {
        let broken = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(TransportError::from_io(&broken).is_link_failure());

        let invalid = io::Error::new(io::ErrorKind::InvalidData, "bad crc");
        assert!(!TransportError::from_io(&invalid).is_link_failure());
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 链路类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// RS-485 串口（Modbus RTU）
    #[default]
    Rtu,

    /// Modbus TCP（网关或模拟器）
    Tcp,
}

/// 串口校验位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Modbus 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModbusConfig {
    /// 链路类型
    pub link: LinkKind,

    /// 串口设备路径
    pub serial_port: String,

    /// 波特率
    pub baud_rate: u32,

    pub parity: Parity,
    pub data_bits: u8,
    pub stop_bits: u8,

    /// TCP 服务器地址
    pub host: String,

    /// TCP 端口
    pub port: u16,

    /// 从站 ID
    pub slave_id: u8,

    /// 单次读取超时（毫秒）
    pub timeout_ms: u64,
}

impl ModbusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 链路描述，用于日志
    pub fn endpoint(&self) -> String {
        match self.link {
            LinkKind::Rtu => format!("{}@{}", self.serial_port, self.baud_rate),
            LinkKind::Tcp => format!("{}:{}", self.host, self.port),
        }
    }
}

impl Default for ModbusConfig {
    fn default() -> Self {
        Self {
            link: LinkKind::Rtu,
            serial_port: "/dev/ttyAMA0".to_string(),
            baud_rate: 9600,
            parity: Parity::None,
            data_bits: 8,
            stop_bits: 1,
            host: "localhost".to_string(),
            port: 502,
            slave_id: 1,
            timeout_ms: 1000,
        }
    }
}

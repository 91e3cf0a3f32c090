use anyhow::{anyhow, Result};
use hpmon_modbus::ModbusConfig;
use hpmon_storage::{DeviceIdentity, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub device: DeviceIdentity,
    pub modbus: ModbusConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// 持久化配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 设备记录文件，默认放在内存文件系统
    pub path: PathBuf,
    /// 历史条数上限
    pub capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/dev/shm/kaisai.json"),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 故障码说明表
    pub fault_codes_path: PathBuf,
    /// 静态看板目录
    pub dashboard_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            fault_codes_path: PathBuf::from("errorcodes.json"),
            dashboard_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GlobalConfig {
    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.storage.capacity == 0 {
            return Err(anyhow!("storage.capacity must be greater than 0"));
        }

        if self.device.data_interval_minutes == 0 {
            return Err(anyhow!("device.data_interval_minutes must be greater than 0"));
        }

        if self.modbus.timeout_ms == 0 {
            return Err(anyhow!("modbus.timeout_ms must be greater than 0"));
        }

        if self.device.id.trim().is_empty() {
            return Err(anyhow!("device.id must not be empty"));
        }

        Ok(())
    }
}

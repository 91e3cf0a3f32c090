use hpmon_telemetry::Snapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 设备描述信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub description: String,
    pub location: String,
    pub system_status: String,
    pub total_duration_minutes: u64,

    /// 其他自由字段，原样保留
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// 持久化的设备记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceRecord {
    pub device: String,

    /// 标称采样间隔（分钟）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_interval_minutes: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    pub metadata: Metadata,

    /// 滚动历史，最旧在前
    pub timeseries: Vec<Snapshot>,
}

/// 设备身份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceIdentity {
    pub id: String,
    pub description: String,
    pub location: String,
    pub data_interval_minutes: u32,
    pub unit: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            id: "KAISAI KHC-08RY3-B".to_string(),
            description: String::new(),
            location: String::new(),
            data_interval_minutes: 1,
            unit: "kW".to_string(),
        }
    }
}

impl DeviceRecord {
    /// 最新快照
    pub fn latest(&self) -> Option<&Snapshot> {
        self.timeseries.last()
    }

    pub fn is_blank(&self) -> bool {
        self.device.is_empty()
    }

    /// 首次写入时补全设备身份；已有身份的记录保持不变
    pub fn initialize_identity(&mut self, identity: &DeviceIdentity, capacity: usize) -> bool {
        if !self.is_blank() {
            return false;
        }

        self.device = identity.id.clone();
        self.data_interval_minutes = Some(identity.data_interval_minutes);
        self.unit = Some(identity.unit.clone());
        self.metadata.description = identity.description.clone();
        self.metadata.location = identity.location.clone();
        self.metadata.total_duration_minutes =
            capacity as u64 * u64::from(identity.data_interval_minutes);
        true
    }
}

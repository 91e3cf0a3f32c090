use hpmon_storage::Metadata;
use hpmon_telemetry::Snapshot;
use serde::Serialize;

/// 最新快照响应；尚无数据时为 `{}`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LatestResponse {
    Snapshot(Box<Snapshot>),
    Empty {},
}

impl From<Option<Snapshot>> for LatestResponse {
    fn from(snapshot: Option<Snapshot>) -> Self {
        match snapshot {
            Some(snapshot) => LatestResponse::Snapshot(Box::new(snapshot)),
            None => LatestResponse::Empty {},
        }
    }
}

/// 设备身份响应
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataResponse {
    pub device: String,
    pub metadata: Metadata,
}

use crate::fault_codes::FaultCodeTable;
use crate::models::MetadataResponse;
use crate::source::SnapshotSource;
use hpmon_telemetry::Snapshot;
use tracing::debug;

/// 只读查询服务
///
/// 每次查询都重新读取记录，与采集进程之间没有共享内存；
/// 所有接口在没有数据时返回空结果而不是错误。
pub struct QueryService {
    source: SnapshotSource,
    fault_codes: FaultCodeTable,
}

impl QueryService {
    pub fn new(source: SnapshotSource, fault_codes: FaultCodeTable) -> Self {
        Self {
            source,
            fault_codes,
        }
    }

    /// 最新快照
    pub async fn latest(&self) -> Option<Snapshot> {
        let mut record = self.source.record().await;
        let latest = record.timeseries.pop();
        debug!(found = latest.is_some(), "Latest snapshot requested");
        latest
    }

    /// 完整历史，最旧在前
    pub async fn history(&self) -> Vec<Snapshot> {
        self.source.record().await.timeseries
    }

    /// 设备身份与描述
    pub async fn metadata(&self) -> MetadataResponse {
        let record = self.source.record().await;
        MetadataResponse {
            device: record.device,
            metadata: record.metadata,
        }
    }

    pub fn fault_codes(&self) -> &FaultCodeTable {
        &self.fault_codes
    }
}

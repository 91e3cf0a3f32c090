use crate::synthetic;
use chrono::Utc;
use hpmon_storage::{DeviceRecord, HistoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// 设备记录来源
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    /// 采集器写入的持久化文件
    Durable(HistoryStore),
    /// 测试模式合成数据，每次读取重新生成
    Synthetic,
}

impl SnapshotSource {
    /// 读取当前记录，任何失败都退化为空记录
    pub async fn record(&self) -> DeviceRecord {
        match self {
            SnapshotSource::Durable(store) => store.load().await,
            SnapshotSource::Synthetic => {
                let mut rng = StdRng::from_entropy();
                synthetic::generate(Utc::now(), &mut rng)
            }
        }
    }
}

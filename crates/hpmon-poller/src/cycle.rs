use crate::error::Result;
use chrono::{DateTime, Utc};
use hpmon_modbus::{RegisterDecoder, RegisterTransport};
use hpmon_storage::{DeviceIdentity, HistoryStore};
use hpmon_telemetry::{Assembly, Snapshot, SnapshotAssembler};
use tracing::{debug, info, warn};

/// 一次采集周期的摘要
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub snapshot: Snapshot,
    /// 解码失败、被置为默认值的字段
    pub failed_fields: Vec<&'static str>,
    /// 保存后的历史长度
    pub history_len: usize,
    /// 本周期是否写入了设备身份
    pub identity_initialized: bool,
}

/// 采集器
///
/// 每次调用完成 读取 → 组装 → 追加 → 持久化。进程内不保留状态，
/// 历史始终以持久化文件为准。
pub struct Poller {
    store: HistoryStore,
    identity: DeviceIdentity,
    assembler: SnapshotAssembler,
}

impl Poller {
    pub fn new(store: HistoryStore, identity: DeviceIdentity) -> Self {
        Self {
            store,
            identity,
            assembler: SnapshotAssembler::new(),
        }
    }

    /// 只读取并组装快照，不落盘
    pub async fn collect<T: RegisterTransport>(
        &self,
        transport: T,
        timestamp: DateTime<Utc>,
    ) -> Result<Assembly> {
        let mut decoder = RegisterDecoder::new(transport);
        let assembly = self.assembler.assemble(&mut decoder, timestamp).await?;

        if !assembly.is_complete() {
            warn!(
                failed = assembly.failures.len(),
                "Snapshot assembled with defaulted fields"
            );
        }
        Ok(assembly)
    }

    /// 完整执行一个采集周期
    ///
    /// 链路中断时直接返回错误，持久化文件保持原样。
    pub async fn run_cycle<T: RegisterTransport>(
        &self,
        transport: T,
        timestamp: DateTime<Utc>,
    ) -> Result<CycleReport> {
        let assembly = self.collect(transport, timestamp).await?;

        let mut record = self.store.load().await;
        let identity_initialized =
            record.initialize_identity(&self.identity, self.store.capacity());
        if identity_initialized {
            debug!(device = %record.device, "Initialized device identity");
        }

        let record = self.store.append(record, assembly.snapshot.clone());
        self.store.save(&record).await?;

        let report = CycleReport {
            snapshot: assembly.snapshot,
            failed_fields: assembly.failures.iter().map(|f| f.field).collect(),
            history_len: record.timeseries.len(),
            identity_initialized,
        };

        info!(
            device = %record.device,
            path = ?self.store.path(),
            timestamp = %report.snapshot.timestamp,
            history = report.history_len,
            failed_fields = report.failed_fields.len(),
            active_flags = ?report.snapshot.active_flags(),
            "Acquisition cycle complete"
        );
        if report.snapshot.has_fault() {
            warn!(
                current_fault = report.snapshot.current_fault,
                faults = ?report.snapshot.fault_codes(),
                "Controller reports an active fault"
            );
        }

        Ok(report)
    }
}

use crate::error::{Result, StorageError};
use crate::history::append_bounded;
use crate::record::DeviceRecord;
use hpmon_telemetry::Snapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// 生产环境默认容量：每分钟一条，保留一小时
pub const DEFAULT_CAPACITY: usize = 60;

/// 设备记录存储
///
/// 整个记录以单个 JSON 文件保存。写入先落到同目录的临时文件并 fsync，
/// 再原子重命名覆盖目标，读者只会看到完整的旧版本或完整的新版本。
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 读取记录；文件缺失或损坏时返回空记录
    pub async fn load(&self) -> DeviceRecord {
        match self.try_load().await {
            Ok(record) => record,
            Err(StorageError::NotFound(path)) => {
                debug!(path = ?path, "No stored record yet, starting fresh");
                DeviceRecord::default()
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Stored record unreadable, starting fresh");
                DeviceRecord::default()
            }
        }
    }

    /// 读取记录，保留失败原因
    pub async fn try_load(&self) -> Result<DeviceRecord> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 追加快照并按容量淘汰最旧条目
    pub fn append(&self, mut record: DeviceRecord, snapshot: Snapshot) -> DeviceRecord {
        if let Some(last) = record.timeseries.last() {
            if snapshot.timestamp < last.timestamp {
                warn!(
                    previous = %last.timestamp,
                    incoming = %snapshot.timestamp,
                    "Snapshot timestamp goes backwards"
                );
            }
        }

        let evicted = append_bounded(&mut record.timeseries, snapshot, self.capacity);
        if evicted > 0 {
            debug!(evicted, capacity = self.capacity, "Evicted oldest snapshots");
        }
        record
    }

    /// 原子保存整个记录
    pub async fn save(&self, record: &DeviceRecord) -> Result<()> {
        let json = serde_json::to_vec(record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }

        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, &json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::io(&self.path, e));
        }

        // rename 本身需要落盘，否则掉电后目录项可能回退
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        sync_dir(parent).await?;

        info!(
            path = ?self.path,
            snapshots = record.timeseries.len(),
            bytes = json.len(),
            "Device record saved"
        );
        Ok(())
    }

    /// 与目标同目录的临时文件，保证 rename 不跨文件系统
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "record".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    file.write_all(data)
        .await
        .map_err(|e| StorageError::io(path, e))?;
    file.sync_all()
        .await
        .map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> Result<()> {
    let handle = fs::File::open(dir)
        .await
        .map_err(|e| StorageError::io(dir, e))?;
    handle
        .sync_all()
        .await
        .map_err(|e| StorageError::io(dir, e))
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

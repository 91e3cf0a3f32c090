use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// 故障码说明表
///
/// 启动时加载一次，之后只读。条目内容原样透传给客户端。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaultCodeTable(BTreeMap<i64, Value>);

impl FaultCodeTable {
    /// 加载说明表；文件缺失或格式错误时返回空表
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path).await {
            Ok(table) => {
                info!(path = ?path, entries = table.len(), "Fault code table loaded");
                table
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Fault code table unavailable, serving empty table");
                Self::default()
            }
        }
    }

    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {:?}", path))?;
        serde_json::from_slice(&bytes).with_context(|| format!("Invalid fault code table {:?}", path))
    }

    pub fn get(&self, code: i64) -> Option<&Value> {
        self.0.get(&code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(i64, Value)> for FaultCodeTable {
    fn from_iter<I: IntoIterator<Item = (i64, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_keys_by_integer_code() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("errorcodes.json");
        std::fs::write(
            &path,
            r#"{"21": {"code": "P3", "description": "Compressor overcurrent"}, "0": "No fault"}"#,
        )
        .unwrap();

        let table = FaultCodeTable::load(&path).await;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(21).unwrap()["code"], "P3");
        assert_eq!(table.get(0), Some(&json!("No fault")));
        assert_eq!(table.get(7), None);
    }

    #[tokio::test]
    async fn test_missing_or_corrupt_file_is_empty() {
        let temp_dir = tempdir().unwrap();
        assert!(FaultCodeTable::load(temp_dir.path().join("absent.json")).await.is_empty());

        let path = temp_dir.path().join("errorcodes.json");
        std::fs::write(&path, "{\"21\": ").unwrap();
        assert!(FaultCodeTable::load(&path).await.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let table: FaultCodeTable = [(21, json!("E1"))].into_iter().collect();
        assert_eq!(serde_json::to_value(&table).unwrap(), json!({"21": "E1"}));
    }
}

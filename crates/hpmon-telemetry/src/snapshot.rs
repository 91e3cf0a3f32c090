use crate::schema::{Decode, Snapshot, SCHEMA};
use crate::value::FieldValue;
use chrono::{DateTime, Utc};

impl Snapshot {
    /// 指定时间戳的空快照
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// 当前置位的状态/负载标志，按字段表顺序
    pub fn active_flags(&self) -> Vec<&'static str> {
        SCHEMA
            .iter()
            .filter(|spec| matches!(spec.decode, Decode::Flag(..)))
            .filter(|spec| self.value(spec.name) == Some(FieldValue::Bool(true)))
            .map(|spec| spec.name)
            .collect()
    }

    /// 非零故障码（当前故障与三条历史故障）
    pub fn fault_codes(&self) -> Vec<i32> {
        [self.current_fault, self.fault_1, self.fault_2, self.fault_3]
            .into_iter()
            .filter(|code| *code != 0)
            .collect()
    }

    pub fn has_fault(&self) -> bool {
        self.current_fault != 0
    }
}

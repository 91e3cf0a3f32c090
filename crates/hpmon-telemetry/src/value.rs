use serde::Serialize;

/// 字段值类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
    Bool,
}

impl FieldKind {
    /// 供编译期 schema 校验使用
    pub const fn same_as(self, other: FieldKind) -> bool {
        matches!(
            (self, other),
            (FieldKind::Int, FieldKind::Int)
                | (FieldKind::Float, FieldKind::Float)
                | (FieldKind::Bool, FieldKind::Bool)
        )
    }
}

/// 解码后的字段值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Bool(_) => FieldKind::Bool,
        }
    }
}

/// 可作为快照字段类型的 Rust 类型
pub trait SchemaValue: Sized {
    const KIND: FieldKind;

    fn from_value(value: FieldValue) -> Option<Self>;

    fn to_value(&self) -> FieldValue;
}

impl SchemaValue for i32 {
    const KIND: FieldKind = FieldKind::Int;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Int(i64::from(*self))
    }
}

impl SchemaValue for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl SchemaValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

/// 按小数位四舍五入
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

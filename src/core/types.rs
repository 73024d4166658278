//! 列类型与类型化值
//!
//! 数据集只包含五种值域：标识符、整数、日期、双精度浮点数和文本。
//! `ValueKind` 是封闭的五路标签，所有按类型分派的逻辑都对它做穷尽匹配；
//! `ColumnType` 额外保留一个 `Other` 分支，用来承载无法识别的声明类型。

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::str::FromStr;

use super::murmur::murmurhash64a;

/// 值域标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Identifier,
    Integer,
    Date,
    Double,
    Varchar,
}

impl ValueKind {
    /// 哈希编码时使用的类型前缀，保证不同值域的相同字节不会被视为同一个值
    fn tag(self) -> u8 {
        match self {
            ValueKind::Identifier => 1,
            ValueKind::Integer => 2,
            ValueKind::Date => 3,
            ValueKind::Double => 4,
            ValueKind::Varchar => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Identifier => "identifier",
            ValueKind::Integer => "integer",
            ValueKind::Date => "date",
            ValueKind::Double => "double",
            ValueKind::Varchar => "varchar",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 列声明类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Identifier,
    Integer,
    Date,
    Double,
    /// 文本类型，长度上限仅作为声明信息保留
    Varchar { length: Option<u32> },
    /// 无法识别的类型名
    Other(String),
}

impl ColumnType {
    pub fn varchar(length: u32) -> Self {
        ColumnType::Varchar {
            length: Some(length),
        }
    }

    /// 返回对应的值域，`Other` 返回 None
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            ColumnType::Identifier => Some(ValueKind::Identifier),
            ColumnType::Integer => Some(ValueKind::Integer),
            ColumnType::Date => Some(ValueKind::Date),
            ColumnType::Double => Some(ValueKind::Double),
            ColumnType::Varchar { .. } => Some(ValueKind::Varchar),
            ColumnType::Other(_) => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Varchar { length: Some(len) } => write!(f, "varchar({})", len),
            ColumnType::Other(name) => f.write_str(name),
            other => match other.kind() {
                Some(kind) => f.write_str(kind.as_str()),
                None => Ok(()),
            },
        }
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    /// 解析类型名；无法识别的名字解析为 `Other`，由扫描阶段报告
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let lower = name.to_ascii_lowercase();
        let parsed = match lower.as_str() {
            "identifier" => ColumnType::Identifier,
            "integer" => ColumnType::Integer,
            "date" => ColumnType::Date,
            "double" => ColumnType::Double,
            "varchar" => ColumnType::Varchar { length: None },
            _ => lower
                .strip_prefix("varchar(")
                .and_then(|rest| rest.strip_suffix(')'))
                .and_then(|len| len.trim().parse::<u32>().ok())
                .map(ColumnType::varchar)
                .unwrap_or_else(|| ColumnType::Other(name.to_string())),
        };
        Ok(parsed)
    }
}

/// 类型化值
///
/// 空值不属于任何值域，用 `Option<TypedValue>` 的 `None` 表示。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypedValue {
    Identifier(i64),
    Integer(i32),
    Date(NaiveDate),
    Double(f64),
    Varchar(String),
}

impl TypedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Identifier(_) => ValueKind::Identifier,
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Date(_) => ValueKind::Date,
            TypedValue::Double(_) => ValueKind::Double,
            TypedValue::Varchar(_) => ValueKind::Varchar,
        }
    }

    /// 文本值的字节宽度，非文本值返回 None
    pub fn text_width(&self) -> Option<usize> {
        match self {
            TypedValue::Varchar(s) => Some(s.len()),
            _ => None,
        }
    }

    /// 计算稳定的 64 位哈希
    ///
    /// 编码为 `类型前缀 + 小端字节`，`-0.0` 与 `0.0`、所有 NaN 分别归一，
    /// 与 `Eq` 的语义保持一致。
    pub fn hash64(&self) -> u64 {
        let mut buf = Vec::with_capacity(9);
        buf.push(self.kind().tag());
        match self {
            TypedValue::Identifier(v) => buf.extend_from_slice(&v.to_le_bytes()),
            TypedValue::Integer(v) => buf.extend_from_slice(&v.to_le_bytes()),
            TypedValue::Date(d) => buf.extend_from_slice(&d.num_days_from_ce().to_le_bytes()),
            TypedValue::Double(v) => buf.extend_from_slice(&canonical_f64_bits(*v).to_le_bytes()),
            TypedValue::Varchar(s) => buf.extend_from_slice(s.as_bytes()),
        }
        murmurhash64a(&buf, HASH_SEED)
    }

    /// 同一值域内的比较
    ///
    /// 跨值域比较属于编程错误，会直接 panic。
    pub fn cmp_same_kind(&self, other: &Self) -> CmpOrdering {
        match (self, other) {
            (TypedValue::Identifier(a), TypedValue::Identifier(b)) => a.cmp(b),
            (TypedValue::Integer(a), TypedValue::Integer(b)) => a.cmp(b),
            (TypedValue::Date(a), TypedValue::Date(b)) => a.cmp(b),
            (TypedValue::Double(a), TypedValue::Double(b)) => cmp_f64(*a, *b),
            (TypedValue::Varchar(a), TypedValue::Varchar(b)) => a.as_bytes().cmp(b.as_bytes()),
            (a, b) => panic!("无法比较不同值域的值: {} 与 {}", a.kind(), b.kind()),
        }
    }
}

const HASH_SEED: u64 = 0x9747_b28c;

fn canonical_f64_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn cmp_f64(a: f64, b: f64) -> CmpOrdering {
    // NaN 小于任何非 NaN 值
    match (a.is_nan(), b.is_nan()) {
        (true, true) => CmpOrdering::Equal,
        (true, false) => CmpOrdering::Less,
        (false, true) => CmpOrdering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(CmpOrdering::Equal),
    }
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.cmp_same_kind(other) == CmpOrdering::Equal
    }
}

impl Eq for TypedValue {}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Identifier(v) => write!(f, "{}", v),
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TypedValue::Double(v) => write!(f, "{}", v),
            TypedValue::Varchar(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Integer(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Double(v)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(d: NaiveDate) -> Self {
        TypedValue::Date(d)
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::Varchar(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::Varchar(s.to_string())
    }
}

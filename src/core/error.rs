//! 统计信息收集错误类型
//!
//! 扫描过程中出现的错误均视为致命错误：立即中止扫描，不返回任何部分结果。
//! 这些错误反映的是编程或配置问题，而不是可重试的瞬时状况。

use thiserror::Error;

use super::types::{ColumnType, ValueKind};

/// 统计信息错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// 列声明的类型与实际读取的值域不一致
    #[error("类型不匹配: 列 {column} 声明为 {declared}, 实际读取为 {actual}")]
    TypeMismatch {
        column: String,
        declared: ColumnType,
        actual: ValueKind,
    },

    /// 列声明了五种值域之外的类型
    #[error("不支持的列类型: 列 {column} 的类型为 {type_name}")]
    UnsupportedType { column: String, type_name: String },

    /// 调用方提供的过滤谓词执行失败
    #[error("过滤谓词执行失败: {0}")]
    PredicateFailure(String),

    /// 配置参数无效
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    /// 两个累加器无法合并
    #[error("无法合并统计信息: {0}")]
    IncompatibleMerge(String),
}

/// 统计信息结果类型
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// 构造类型不匹配错误
    pub fn type_mismatch(column: impl Into<String>, declared: ColumnType, actual: ValueKind) -> Self {
        StatsError::TypeMismatch {
            column: column.into(),
            declared,
            actual,
        }
    }

    /// 构造不支持类型错误
    pub fn unsupported_type(column: impl Into<String>, type_name: impl Into<String>) -> Self {
        StatsError::UnsupportedType {
            column: column.into(),
            type_name: type_name.into(),
        }
    }

    /// 从任意错误构造谓词失败错误
    pub fn predicate_failure<E: std::fmt::Display>(err: E) -> Self {
        StatsError::PredicateFailure(err.to_string())
    }
}

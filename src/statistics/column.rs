//! 列统计信息记录器
//!
//! 逐个接收列值，维护空值数、非空值数、最小/最大值、文本宽度总和以及去重计数器，
//! 扫描结束时生成不可变的 `ColumnStatistics` 快照。

use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;

use super::distinct::{ApproximateDistinctCounter, DistinctConfig};
use crate::core::error::{StatsError, StatsResult};
use crate::core::types::{ColumnType, TypedValue, ValueKind};

/// 列统计信息快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    /// 最小值，没有非空值时为 None
    pub min: Option<TypedValue>,
    /// 最大值，没有非空值时为 None
    pub max: Option<TypedValue>,
    /// 空值比例（0.0 - 1.0）
    pub nulls_fraction: f64,
    /// 不同值数量的估计
    pub distinct_values_count: u64,
    /// 平均宽度（字节），仅文本列
    pub average_width: Option<f64>,
    /// 文本总字节数，仅文本列
    pub data_size: Option<u64>,
    pub null_count: u64,
    pub non_null_count: u64,
}

/// 列统计信息记录器
#[derive(Debug, Clone)]
pub struct ColumnStatisticsRecorder {
    kind: ValueKind,
    null_count: u64,
    non_null_count: u64,
    min: Option<TypedValue>,
    max: Option<TypedValue>,
    width_sum: u64,
    distinct: ApproximateDistinctCounter,
}

impl ColumnStatisticsRecorder {
    /// 使用默认去重配置创建
    pub fn new(kind: ValueKind) -> Self {
        Self::with_counter(kind, ApproximateDistinctCounter::new())
    }

    pub fn with_config(kind: ValueKind, config: &DistinctConfig) -> StatsResult<Self> {
        Ok(Self::with_counter(
            kind,
            ApproximateDistinctCounter::with_config(config)?,
        ))
    }

    /// 按列声明类型创建，无法识别的类型返回 `UnsupportedType`
    pub fn for_column(
        column_name: &str,
        column_type: &ColumnType,
        config: &DistinctConfig,
    ) -> StatsResult<Self> {
        match column_type.kind() {
            Some(kind) => Self::with_config(kind, config),
            None => Err(StatsError::unsupported_type(
                column_name,
                column_type.to_string(),
            )),
        }
    }

    fn with_counter(kind: ValueKind, distinct: ApproximateDistinctCounter) -> Self {
        Self {
            kind,
            null_count: 0,
            non_null_count: 0,
            min: None,
            max: None,
            width_sum: 0,
            distinct,
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// 记录一个值，None 表示空值
    ///
    /// # Panics
    /// 值的值域与记录器不一致时 panic，这属于调用方的编程错误。
    pub fn record(&mut self, value: Option<TypedValue>) {
        let value = match value {
            Some(value) => value,
            None => {
                self.null_count += 1;
                return;
            }
        };

        assert_eq!(
            value.kind(),
            self.kind,
            "{} 列记录器收到了 {} 值",
            self.kind,
            value.kind()
        );

        self.non_null_count += 1;
        if let Some(width) = value.text_width() {
            self.width_sum += width as u64;
        }
        self.distinct.add(&value);

        if self
            .min
            .as_ref()
            .map_or(true, |min| value.cmp_same_kind(min) == CmpOrdering::Less)
        {
            self.min = Some(value.clone());
        }
        if self
            .max
            .as_ref()
            .map_or(true, |max| value.cmp_same_kind(max) == CmpOrdering::Greater)
        {
            self.max = Some(value);
        }
    }

    /// 生成当前状态的快照，不修改记录器
    pub fn snapshot(&self) -> ColumnStatistics {
        let total = self.null_count + self.non_null_count;
        let nulls_fraction = if total == 0 {
            0.0
        } else {
            self.null_count as f64 / total as f64
        };

        let is_text = self.kind == ValueKind::Varchar;
        let average_width = (is_text && self.non_null_count > 0)
            .then(|| self.width_sum as f64 / self.non_null_count as f64);

        ColumnStatistics {
            min: self.min.clone(),
            max: self.max.clone(),
            nulls_fraction,
            distinct_values_count: self.distinct.estimate(),
            average_width,
            data_size: is_text.then_some(self.width_sum),
            null_count: self.null_count,
            non_null_count: self.non_null_count,
        }
    }

    /// 合并另一个分区的记录器
    pub fn merge(&mut self, other: &ColumnStatisticsRecorder) -> StatsResult<()> {
        if self.kind != other.kind {
            return Err(StatsError::IncompatibleMerge(format!(
                "列值域不一致: {} 与 {}",
                self.kind, other.kind
            )));
        }
        self.distinct.merge(&other.distinct)?;

        self.null_count += other.null_count;
        self.non_null_count += other.non_null_count;
        self.width_sum += other.width_sum;

        if let Some(theirs) = &other.min {
            if self
                .min
                .as_ref()
                .map_or(true, |mine| theirs.cmp_same_kind(mine) == CmpOrdering::Less)
            {
                self.min = Some(theirs.clone());
            }
        }
        if let Some(theirs) = &other.max {
            if self
                .max
                .as_ref()
                .map_or(true, |mine| theirs.cmp_same_kind(mine) == CmpOrdering::Greater)
            {
                self.max = Some(theirs.clone());
            }
        }
        Ok(())
    }
}

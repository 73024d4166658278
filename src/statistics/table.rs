//! 表统计信息记录器
//!
//! 单线程、一次性地扫描行序列：对每一行计算过滤谓词，谓词成立时行数加一，
//! 并按列声明类型读取各列的值交给对应的列记录器。扫描结束后把每个列记录器的
//! 快照按列名汇总为 `TableStatistics`。
//!
//! 任何错误都会立即中止扫描，不返回部分结果。

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::column::{ColumnStatistics, ColumnStatisticsRecorder};
use super::distinct::DistinctConfig;
use crate::core::error::{StatsError, StatsResult};
use crate::core::schema::{Column, Table};
use crate::core::types::{TypedValue, ValueKind};

/// 表统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStatistics {
    /// 满足过滤条件的行数
    pub row_count: u64,
    /// 列名 -> 列统计信息
    pub columns: HashMap<String, ColumnStatistics>,
}

impl TableStatistics {
    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.get(name)
    }
}

/// 表统计信息记录器
#[derive(Debug, Clone, Default)]
pub struct TableStatisticsRecorder {
    config: DistinctConfig,
}

impl TableStatisticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DistinctConfig) -> StatsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DistinctConfig {
        &self.config
    }

    /// 生成整张表（分区 1/1）并记录统计信息
    pub fn record_table<T, P>(
        &self,
        table: &T,
        predicate: P,
        scale_factor: f64,
    ) -> StatsResult<TableStatistics>
    where
        T: Table,
        P: Fn(&T::Row) -> bool,
    {
        debug!("生成表 {} 的数据, scale factor = {}", table.name(), scale_factor);
        let rows = table.create_generator(scale_factor, 1, 1);
        self.record(rows, table.columns(), predicate)
    }

    /// 记录行序列的统计信息
    pub fn record<R, I, C, P>(&self, rows: I, columns: &[C], predicate: P) -> StatsResult<TableStatistics>
    where
        I: IntoIterator<Item = R>,
        C: Column<R>,
        P: Fn(&R) -> bool,
    {
        self.try_record(rows, columns, |row| Ok::<bool, StatsError>(predicate(row)))
    }

    /// 使用可能失败的过滤谓词记录统计信息
    ///
    /// 谓词返回错误时扫描中止，错误转换为 `StatsError::PredicateFailure`。
    pub fn try_record<R, I, C, P, E>(
        &self,
        rows: I,
        columns: &[C],
        predicate: P,
    ) -> StatsResult<TableStatistics>
    where
        I: IntoIterator<Item = R>,
        C: Column<R>,
        P: Fn(&R) -> Result<bool, E>,
        E: std::fmt::Display,
    {
        // 累加器按列位置索引，扫描开始前全部创建
        let mut recorders = columns
            .iter()
            .map(|column| {
                ColumnStatisticsRecorder::for_column(column.name(), column.column_type(), &self.config)
            })
            .collect::<StatsResult<Vec<_>>>()?;

        debug!("开始扫描, 共 {} 列", columns.len());

        let mut row_count: u64 = 0;
        for row in rows {
            if !predicate(&row).map_err(StatsError::predicate_failure)? {
                continue;
            }
            row_count += 1;
            for (column, recorder) in columns.iter().zip(recorders.iter_mut()) {
                let value = extract_value(&row, column, recorder.kind())?;
                recorder.record(value);
            }
        }

        let mut column_stats = HashMap::with_capacity(columns.len());
        for (column, recorder) in columns.iter().zip(recorders.iter()) {
            if column_stats.contains_key(column.name()) {
                warn!("列名重复: {}, 仅保留第一列的统计信息", column.name());
                continue;
            }
            column_stats.insert(column.name().to_string(), recorder.snapshot());
        }

        info!("扫描完成: {} 行满足过滤条件, {} 列", row_count, column_stats.len());
        Ok(TableStatistics {
            row_count,
            columns: column_stats,
        })
    }
}

/// 按列的声明值域读取值
fn extract_value<R, C>(row: &R, column: &C, kind: ValueKind) -> StatsResult<Option<TypedValue>>
where
    C: Column<R>,
{
    let value = match kind {
        ValueKind::Identifier => column.get_identifier(row)?.map(TypedValue::Identifier),
        ValueKind::Integer => column.get_integer(row)?.map(TypedValue::Integer),
        ValueKind::Date => column.get_date(row)?.map(TypedValue::Date),
        ValueKind::Double => column.get_double(row)?.map(TypedValue::Double),
        ValueKind::Varchar => column.get_string(row)?.map(TypedValue::Varchar),
    };
    Ok(value)
}

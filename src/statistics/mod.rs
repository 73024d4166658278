//! 列样本统计信息
//!
//! - `distinct`：近似去重计数器
//! - `column`：单列统计信息记录器与快照
//! - `table`：驱动整表扫描的记录器

pub mod column;
pub mod distinct;
pub mod table;

pub use column::{ColumnStatistics, ColumnStatisticsRecorder};
pub use distinct::{ApproximateDistinctCounter, DistinctConfig};
pub use table::{TableStatistics, TableStatisticsRecorder};

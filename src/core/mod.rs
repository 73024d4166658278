pub mod error;
pub mod murmur;
pub mod schema;
pub mod types;

// 错误和结果类型
pub use error::{StatsError, StatsResult};

// 核心数据类型
pub use schema::{Accessor, Column, ColumnDef, Getter, Table};
pub use types::{ColumnType, TypedValue, ValueKind};

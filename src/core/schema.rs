//! 表与列的外部接口
//!
//! 行生成器和表结构定义都属于外部协作方，这里只约定它们需要提供的能力：
//! - `Table`：给出列定义，并按比例因子和分区参数生成一次性的行序列
//! - `Column`：列名、声明类型，以及五个按值域划分的读取函数
//!
//! `ColumnDef` 是基于闭包的列定义实现，声明类型与实际读取函数可以不一致，
//! 不一致时由读取函数返回 `TypeMismatch`。

use chrono::NaiveDate;
use std::fmt;

use super::error::{StatsError, StatsResult};
use super::types::{ColumnType, ValueKind};

/// 列值读取函数
pub type Getter<R, T> = Box<dyn Fn(&R) -> Option<T> + Send + Sync>;

/// 列的列值读取器，每个分支对应一个值域
pub enum Accessor<R> {
    Identifier(Getter<R, i64>),
    Integer(Getter<R, i32>),
    Date(Getter<R, NaiveDate>),
    Double(Getter<R, f64>),
    Varchar(Getter<R, String>),
}

impl<R> Accessor<R> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Accessor::Identifier(_) => ValueKind::Identifier,
            Accessor::Integer(_) => ValueKind::Integer,
            Accessor::Date(_) => ValueKind::Date,
            Accessor::Double(_) => ValueKind::Double,
            Accessor::Varchar(_) => ValueKind::Varchar,
        }
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accessor::{:?}", self.kind())
    }
}

/// 列接口
///
/// 调用与列实际产出值域不符的读取函数时返回 `StatsError::TypeMismatch`。
pub trait Column<R> {
    fn name(&self) -> &str;

    fn column_type(&self) -> &ColumnType;

    fn get_identifier(&self, row: &R) -> StatsResult<Option<i64>>;

    fn get_integer(&self, row: &R) -> StatsResult<Option<i32>>;

    fn get_date(&self, row: &R) -> StatsResult<Option<NaiveDate>>;

    fn get_double(&self, row: &R) -> StatsResult<Option<f64>>;

    fn get_string(&self, row: &R) -> StatsResult<Option<String>>;
}

/// 表接口
pub trait Table {
    type Row;
    type Rows: Iterator<Item = Self::Row>;

    fn name(&self) -> &str;

    /// 按声明顺序返回列定义，列名在表内唯一
    fn columns(&self) -> &[ColumnDef<Self::Row>];

    /// 生成第 `part` 个分区（从 1 开始，共 `part_count` 个）的行序列
    fn create_generator(&self, scale_factor: f64, part: u32, part_count: u32) -> Self::Rows;
}

/// 基于闭包的列定义
pub struct ColumnDef<R> {
    name: String,
    column_type: ColumnType,
    accessor: Option<Accessor<R>>,
}

impl<R> ColumnDef<R> {
    /// 通用构造，声明类型与读取器由调用方分别指定
    pub fn new(name: impl Into<String>, column_type: ColumnType, accessor: Accessor<R>) -> Self {
        Self {
            name: name.into(),
            column_type,
            accessor: Some(accessor),
        }
    }

    /// 声明了无法识别类型的列，没有任何读取器
    pub fn other(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Other(type_name.into()),
            accessor: None,
        }
    }

    pub fn identifier<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> i64 + Send + Sync + 'static,
    {
        Self::nullable_identifier(name, move |row| Some(f(row)))
    }

    pub fn nullable_identifier<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> Option<i64> + Send + Sync + 'static,
    {
        Self::new(name, ColumnType::Identifier, Accessor::Identifier(Box::new(f)))
    }

    pub fn integer<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> i32 + Send + Sync + 'static,
    {
        Self::nullable_integer(name, move |row| Some(f(row)))
    }

    pub fn nullable_integer<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> Option<i32> + Send + Sync + 'static,
    {
        Self::new(name, ColumnType::Integer, Accessor::Integer(Box::new(f)))
    }

    pub fn date<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> NaiveDate + Send + Sync + 'static,
    {
        Self::nullable_date(name, move |row| Some(f(row)))
    }

    pub fn nullable_date<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> Option<NaiveDate> + Send + Sync + 'static,
    {
        Self::new(name, ColumnType::Date, Accessor::Date(Box::new(f)))
    }

    pub fn double<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        Self::nullable_double(name, move |row| Some(f(row)))
    }

    pub fn nullable_double<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&R) -> Option<f64> + Send + Sync + 'static,
    {
        Self::new(name, ColumnType::Double, Accessor::Double(Box::new(f)))
    }

    pub fn varchar<F>(name: impl Into<String>, length: u32, f: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::nullable_varchar(name, length, move |row| Some(f(row)))
    }

    pub fn nullable_varchar<F>(name: impl Into<String>, length: u32, f: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(name, ColumnType::varchar(length), Accessor::Varchar(Box::new(f)))
    }

    fn accessor(&self) -> StatsResult<&Accessor<R>> {
        self.accessor
            .as_ref()
            .ok_or_else(|| StatsError::unsupported_type(&self.name, self.column_type.to_string()))
    }

    fn mismatch(&self, accessor: &Accessor<R>) -> StatsError {
        StatsError::type_mismatch(&self.name, self.column_type.clone(), accessor.kind())
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("accessor", &self.accessor)
            .finish()
    }
}

impl<R> Column<R> for ColumnDef<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    fn get_identifier(&self, row: &R) -> StatsResult<Option<i64>> {
        match self.accessor()? {
            Accessor::Identifier(f) => Ok(f(row)),
            other => Err(self.mismatch(other)),
        }
    }

    fn get_integer(&self, row: &R) -> StatsResult<Option<i32>> {
        match self.accessor()? {
            Accessor::Integer(f) => Ok(f(row)),
            other => Err(self.mismatch(other)),
        }
    }

    fn get_date(&self, row: &R) -> StatsResult<Option<NaiveDate>> {
        match self.accessor()? {
            Accessor::Date(f) => Ok(f(row)),
            other => Err(self.mismatch(other)),
        }
    }

    fn get_double(&self, row: &R) -> StatsResult<Option<f64>> {
        match self.accessor()? {
            Accessor::Double(f) => Ok(f(row)),
            other => Err(self.mismatch(other)),
        }
    }

    fn get_string(&self, row: &R) -> StatsResult<Option<String>> {
        match self.accessor()? {
            Accessor::Varchar(f) => Ok(f(row)),
            other => Err(self.mismatch(other)),
        }
    }
}

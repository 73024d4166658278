//! 集成测试共享工具模块
//!
//! 提供测试用的数据表和断言辅助函数，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use tablestats::core::TypedValue;
use tablestats::statistics::{ColumnStatistics, TableStatistics};

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 获取列统计信息，列不存在时 panic
pub fn column<'a>(stats: &'a TableStatistics, name: &str) -> &'a ColumnStatistics {
    stats
        .column(name)
        .unwrap_or_else(|| panic!("缺少列 {} 的统计信息", name))
}

/// 断言去重估计值与真实值的相对误差在容差之内
pub fn assert_distinct_close(stats: &ColumnStatistics, actual: u64, tolerance: f64) {
    let estimate = stats.distinct_values_count as f64;
    let error = (estimate - actual as f64).abs() / actual.max(1) as f64;
    assert!(
        error <= tolerance,
        "去重估计偏差过大: 估计 {}, 实际 {}, 误差 {:.4}",
        estimate,
        actual,
        error
    );
}

/// 断言最小值不大于最大值，且两者同时存在或同时缺失
pub fn assert_min_max_consistent(stats: &ColumnStatistics) {
    match (&stats.min, &stats.max) {
        (Some(min), Some(max)) => {
            assert!(stats.non_null_count > 0);
            assert_ne!(
                min.cmp_same_kind(max),
                std::cmp::Ordering::Greater,
                "最小值 {} 大于最大值 {}",
                min,
                max
            );
        }
        (None, None) => assert_eq!(stats.non_null_count, 0),
        _ => panic!("最小值与最大值必须同时存在或同时缺失"),
    }
}

/// 断言列的最小/最大值
pub fn assert_range(stats: &ColumnStatistics, min: TypedValue, max: TypedValue) {
    assert_eq!(stats.min.as_ref(), Some(&min), "最小值不匹配");
    assert_eq!(stats.max.as_ref(), Some(&max), "最大值不匹配");
}

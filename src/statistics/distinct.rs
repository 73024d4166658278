//! 近似去重计数器
//!
//! 小基数时精确计数，超过阈值后改用 HyperLogLog 估计，内存占用与不同值的数量无关。
//!
//! 每个值先归约为 64 位哈希（`TypedValue::hash64`）：
//! - 精确阶段：保存哈希集合，集合大小超过 `exact_threshold` 后丢弃
//! - HyperLogLog 寄存器从第一个值开始维护，低 `precision` 位选择寄存器，
//!   其余位的前导零长度加一作为秩
//!
//! 估计值只依赖计数器状态，并且随状态单调不减：
//! - 精确阶段返回集合大小（不超过阈值）
//! - 近似阶段返回 `max(阈值 + 1, hll)`
//! - `hll` 在空寄存器数不少于 `m·e^-2.5` 时使用线性计数（结果不超过 `2.5·m`），
//!   否则使用 `max(2.5·m, 原始估计)`
//!
//! 合并取寄存器逐位最大值并合并精确集合，满足结合律和交换律。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::error::{StatsError, StatsResult};
use crate::core::types::TypedValue;

/// 允许的最小精度（16 个寄存器）
pub const MIN_PRECISION: u8 = 4;
/// 允许的最大精度（65536 个寄存器）
pub const MAX_PRECISION: u8 = 16;

/// 去重计数器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctConfig {
    /// 精确计数的最大不同值数量，默认 1024
    pub exact_threshold: usize,
    /// 寄存器数量的以 2 为底的对数，默认 12（标准误差约 1.6%）
    pub precision: u8,
}

impl Default for DistinctConfig {
    fn default() -> Self {
        Self {
            exact_threshold: 1024,
            precision: 12,
        }
    }
}

impl DistinctConfig {
    pub fn validate(&self) -> StatsResult<()> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&self.precision) {
            return Err(StatsError::InvalidConfig(format!(
                "precision 必须在 {} 到 {} 之间, 实际为 {}",
                MIN_PRECISION, MAX_PRECISION, self.precision
            )));
        }
        Ok(())
    }

    /// HyperLogLog 的理论相对标准误差
    pub fn standard_error(&self) -> f64 {
        1.04 / ((1u64 << self.precision) as f64).sqrt()
    }
}

/// 近似去重计数器
#[derive(Clone)]
pub struct ApproximateDistinctCounter {
    config: DistinctConfig,
    /// 精确阶段的哈希集合，进入近似阶段后为 None
    exact: Option<HashSet<u64>>,
    registers: Vec<u8>,
    /// 各秩的寄存器数量，下标 0 即空寄存器数
    rank_histogram: Vec<u32>,
}

impl ApproximateDistinctCounter {
    pub fn new() -> Self {
        Self::build(DistinctConfig::default())
    }

    pub fn with_config(config: &DistinctConfig) -> StatsResult<Self> {
        config.validate()?;
        Ok(Self::build(*config))
    }

    fn build(config: DistinctConfig) -> Self {
        let m = 1usize << config.precision;
        let max_rank = 64 - config.precision as usize + 1;
        let mut rank_histogram = vec![0u32; max_rank + 1];
        rank_histogram[0] = m as u32;
        Self {
            config,
            exact: Some(HashSet::new()),
            registers: vec![0u8; m],
            rank_histogram,
        }
    }

    pub fn config(&self) -> &DistinctConfig {
        &self.config
    }

    /// 是否仍处于精确计数阶段
    pub fn is_exact(&self) -> bool {
        self.exact.is_some()
    }

    pub fn add(&mut self, value: &TypedValue) {
        self.insert_hash(value.hash64());
    }

    fn insert_hash(&mut self, hash: u64) {
        self.update_register(hash);

        let exceeded = match self.exact.as_mut() {
            Some(set) => {
                set.insert(hash);
                set.len() > self.config.exact_threshold
            }
            None => false,
        };
        if exceeded {
            self.exact = None;
        }
    }

    fn update_register(&mut self, hash: u64) {
        let p = self.config.precision as u32;
        let index = (hash & ((1u64 << p) - 1)) as usize;
        let rank = ((hash >> p) << p).leading_zeros().min(64 - p) as u8 + 1;
        self.raise_register(index, rank);
    }

    fn raise_register(&mut self, index: usize, rank: u8) {
        let current = self.registers[index];
        if rank > current {
            self.rank_histogram[current as usize] -= 1;
            self.rank_histogram[rank as usize] += 1;
            self.registers[index] = rank;
        }
    }

    /// 当前的去重数量估计
    pub fn estimate(&self) -> u64 {
        match &self.exact {
            Some(set) => set.len() as u64,
            None => {
                let floor = self.config.exact_threshold as u64 + 1;
                floor.max(self.sketch_estimate().round() as u64)
            }
        }
    }

    fn sketch_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let zeros = self.rank_histogram[0] as f64;
        let linear_counting_floor = (m * (-2.5f64).exp()).ceil();

        if zeros >= linear_counting_floor {
            m * (m / zeros).ln()
        } else {
            (2.5 * m).max(self.raw_estimate())
        }
    }

    fn raw_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        // 从高秩（小项）开始累加，减少舍入误差
        let sum: f64 = self
            .rank_histogram
            .iter()
            .enumerate()
            .rev()
            .map(|(rank, &count)| count as f64 * 2f64.powi(-(rank as i32)))
            .sum();
        alpha(self.registers.len()) * m * m / sum
    }

    /// 合并另一个计数器
    ///
    /// 两者的精度与阈值必须一致。
    pub fn merge(&mut self, other: &ApproximateDistinctCounter) -> StatsResult<()> {
        if self.config != other.config {
            return Err(StatsError::IncompatibleMerge(format!(
                "去重计数器配置不一致: {:?} 与 {:?}",
                self.config, other.config
            )));
        }

        for (index, &rank) in other.registers.iter().enumerate() {
            self.raise_register(index, rank);
        }

        self.exact = match (self.exact.take(), &other.exact) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend(theirs.iter().copied());
                (mine.len() <= self.config.exact_threshold).then_some(mine)
            }
            _ => None,
        };
        Ok(())
    }
}

impl Default for ApproximateDistinctCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ApproximateDistinctCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApproximateDistinctCounter")
            .field("config", &self.config)
            .field("exact", &self.is_exact())
            .field("estimate", &self.estimate())
            .finish()
    }
}

fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{StatsError, StatsResult};
use crate::statistics::DistinctConfig;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub statistics: StatisticsConfig,
    pub log: LogConfig,
}

/// 统计信息收集配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StatisticsConfig {
    /// 精确去重计数的最大不同值数量
    pub exact_threshold: usize,
    /// HyperLogLog 精度（寄存器数量的 log2）
    pub precision: u8,
    /// 生成数据使用的比例因子
    pub scale_factor: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        let distinct = DistinctConfig::default();
        Self {
            exact_threshold: distinct.exact_threshold,
            precision: distinct.precision,
            scale_factor: 0.01,
        }
    }
}

impl StatisticsConfig {
    pub fn distinct(&self) -> DistinctConfig {
        DistinctConfig {
            exact_threshold: self.exact_threshold,
            precision: self.precision,
        }
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "tablestats".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> StatsResult<()> {
        self.statistics.distinct().validate()?;
        if !(self.statistics.scale_factor > 0.0 && self.statistics.scale_factor.is_finite()) {
            return Err(StatsError::InvalidConfig(format!(
                "scale_factor 必须为正数, 实际为 {}",
                self.statistics.scale_factor
            )));
        }
        if self.log.max_files == 0 {
            return Err(StatsError::InvalidConfig("max_files 不能为 0".to_string()));
        }
        Ok(())
    }
}

//! SyncBlueprint - Config Loader 输出
//!
//! 描述一次完整的同步运行：输入文件、插值策略、输出路由。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::ResampleConfig;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的运行配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 输入文件
    pub inputs: InputsConfig,

    /// 插值配置
    #[serde(default)]
    pub resample: ResampleConfig,

    /// 输出路由配置
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

/// 输入文件路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// 姿态文件 (.att)
    pub attitude: PathBuf,

    /// 行时文件 (.time)
    pub frame_times: PathBuf,
}

/// Sink 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 名称
    pub name: String,

    /// Sink 类型
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    pub fn new(name: impl Into<String>, sink_type: SinkType) -> Self {
        Self {
            name: name.into(),
            sink_type,
            params: HashMap::new(),
        }
    }

    /// 追加一个参数
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Sink 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 制表符分隔文本表
    Tsv,
    /// 日志输出
    Log,
    /// JSON 文件
    Json,
    /// 原始值与插值对比图 (PNG)
    Plot,
}

impl SyncBlueprint {
    /// 仅由输入路径构造，使用默认插值配置且无 sink
    pub fn from_inputs(attitude: impl Into<PathBuf>, frame_times: impl Into<PathBuf>) -> Self {
        Self {
            version: ConfigVersion::V1,
            inputs: InputsConfig {
                attitude: attitude.into(),
                frame_times: frame_times.into(),
            },
            resample: ResampleConfig::default(),
            sinks: Vec::new(),
        }
    }

    pub fn sinks_of_type(&self, kind: SinkType) -> impl Iterator<Item = &SinkConfig> {
        self.sinks.iter().filter(move |s| s.sink_type == kind)
    }
}

//! 命令行覆盖项
//!
//! 命令行参数优先于配置文件；未提供配置文件时由覆盖项直接构造蓝图。

use std::path::PathBuf;

use contracts::{ContractError, InterpolationMethod, SinkConfig, SinkType, SyncBlueprint};

use crate::validator;

/// 默认表格输出文件
pub const DEFAULT_TABLE_PATH: &str = "att.txt";

/// 默认 TSV sink 名称
const DEFAULT_TABLE_SINK: &str = "table";

/// 运行时覆盖项
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub attitude: Option<PathBuf>,
    pub frame_times: Option<PathBuf>,
    /// 替换第一个 tsv sink 的 path，没有则新增一个
    pub output: Option<PathBuf>,
    pub method: Option<InterpolationMethod>,
    /// 仅能开启
    pub unwrap_angles: bool,
    /// 新增（或改写）plot sink 的输出目录
    pub plot_dir: Option<PathBuf>,
    /// tsv sink 同时打印到 stdout
    pub echo: bool,
}

impl RunOverrides {
    /// 在已有蓝图上应用覆盖项并重新校验
    pub fn apply(self, mut blueprint: SyncBlueprint) -> Result<SyncBlueprint, ContractError> {
        if let Some(path) = self.attitude {
            blueprint.inputs.attitude = path;
        }
        if let Some(path) = self.frame_times {
            blueprint.inputs.frame_times = path;
        }
        if let Some(method) = self.method {
            blueprint.resample.method = method;
        }
        if self.unwrap_angles {
            blueprint.resample.unwrap_angles = true;
        }

        if let Some(output) = self.output {
            let path = output.display().to_string();
            match blueprint
                .sinks
                .iter_mut()
                .find(|s| s.sink_type == SinkType::Tsv)
            {
                Some(sink) => {
                    sink.params.insert("path".into(), path);
                }
                None => blueprint.sinks.push(
                    SinkConfig::new(DEFAULT_TABLE_SINK, SinkType::Tsv).with_param("path", path),
                ),
            }
        }

        // 原始行为：总是输出表格文件
        if blueprint.sinks.is_empty() {
            blueprint.sinks.push(
                SinkConfig::new(DEFAULT_TABLE_SINK, SinkType::Tsv)
                    .with_param("path", DEFAULT_TABLE_PATH),
            );
        }

        if let Some(dir) = self.plot_dir {
            let dir = dir.display().to_string();
            match blueprint
                .sinks
                .iter_mut()
                .find(|s| s.sink_type == SinkType::Plot)
            {
                Some(sink) => {
                    sink.params.insert("dir".into(), dir);
                }
                None => blueprint
                    .sinks
                    .push(SinkConfig::new("plots", SinkType::Plot).with_param("dir", dir)),
            }
        }

        if self.echo {
            for sink in blueprint
                .sinks
                .iter_mut()
                .filter(|s| s.sink_type == SinkType::Tsv)
            {
                sink.params.insert("echo".into(), "true".into());
            }
        }

        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// 不依赖配置文件，仅由覆盖项构造蓝图
    ///
    /// # Errors
    /// 缺少任一输入路径时返回 `ConfigValidation`
    pub fn into_blueprint(self) -> Result<SyncBlueprint, ContractError> {
        let attitude = self.attitude.clone().ok_or_else(|| {
            ContractError::config_validation("inputs.attitude", "attitude file is required")
        })?;
        let frame_times = self.frame_times.clone().ok_or_else(|| {
            ContractError::config_validation("inputs.frame_times", "frame time file is required")
        })?;
        self.apply(SyncBlueprint::from_inputs(attitude, frame_times))
    }
}

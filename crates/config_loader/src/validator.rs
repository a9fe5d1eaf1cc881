//! 配置校验模块
//!
//! 校验规则：
//! - 输入文件路径非空
//! - sink 名称非空且唯一
//! - tsv / json sink 的 path 参数非空
//! - plot sink 的 width / height 为不小于 64 的整数
//! - echo 参数为 true / false

use std::collections::HashSet;

use contracts::{ContractError, SinkConfig, SinkType, SyncBlueprint};

/// 图像最小边长（像素）
pub const MIN_PLOT_SIDE: u32 = 64;

/// 校验 SyncBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &SyncBlueprint) -> Result<(), ContractError> {
    validate_inputs(blueprint)?;
    validate_sink_names(blueprint)?;
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        validate_sink_params(idx, sink)?;
    }
    Ok(())
}

/// 校验输入路径
fn validate_inputs(blueprint: &SyncBlueprint) -> Result<(), ContractError> {
    if blueprint.inputs.attitude.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "inputs.attitude",
            "attitude file path cannot be empty",
        ));
    }
    if blueprint.inputs.frame_times.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "inputs.frame_times",
            "frame time file path cannot be empty",
        ));
    }
    Ok(())
}

/// 校验 sink 名称
fn validate_sink_names(blueprint: &SyncBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in blueprint.sinks.iter().enumerate() {
        if sink.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{idx}].name"),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// 校验类型特定参数
fn validate_sink_params(idx: usize, sink: &SinkConfig) -> Result<(), ContractError> {
    match sink.sink_type {
        SinkType::Tsv | SinkType::Json => {
            if let Some(path) = sink.param("path") {
                if path.trim().is_empty() {
                    return Err(ContractError::config_validation(
                        format!("sinks[{idx}].params.path"),
                        "path cannot be empty",
                    ));
                }
            }
            if let Some(echo) = sink.param("echo") {
                if echo.parse::<bool>().is_err() {
                    return Err(ContractError::config_validation(
                        format!("sinks[{idx}].params.echo"),
                        format!("echo must be true or false, got '{echo}'"),
                    ));
                }
            }
        }
        SinkType::Plot => {
            for key in ["width", "height"] {
                if let Some(raw) = sink.param(key) {
                    match raw.parse::<u32>() {
                        Ok(v) if v >= MIN_PLOT_SIDE => {}
                        _ => {
                            return Err(ContractError::config_validation(
                                format!("sinks[{idx}].params.{key}"),
                                format!("{key} must be an integer >= {MIN_PLOT_SIDE}, got '{raw}'"),
                            ))
                        }
                    }
                }
            }
            if let Some(dir) = sink.param("dir") {
                if dir.trim().is_empty() {
                    return Err(ContractError::config_validation(
                        format!("sinks[{idx}].params.dir"),
                        "dir cannot be empty",
                    ));
                }
            }
        }
        SinkType::Log => {}
    }
    Ok(())
}

//! # Config Loader
//!
//! 把同步配置文件变成经过校验的 [`SyncBlueprint`]。
//!
//! 流程：读取文件 → 判断格式 (`.toml` / `.json`，无扩展名时按内容判断)
//! → 解析 → 校验。命令行参数通过 [`RunOverrides`] 叠加在蓝图之上；
//! 没有配置文件时 [`RunOverrides::into_blueprint`] 直接构造蓝图。
//!
//! 校验规则：
//! - `inputs.attitude` / `inputs.frame_times` 非空
//! - sink 名称非空且唯一
//! - tsv / json sink 的 `path` 非空
//! - plot sink 的 `width` / `height` 不小于 [`MIN_PLOT_SIDE`]
//! - `echo` 只接受 `true` / `false`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("sync.toml")).unwrap();
//! println!("Attitude: {}", blueprint.inputs.attitude.display());
//! println!("Method: {}", blueprint.resample.method);
//! ```

mod overrides;
mod parser;
mod validator;

pub use contracts::SyncBlueprint;
pub use overrides::{RunOverrides, DEFAULT_TABLE_PATH};
pub use parser::ConfigFormat;
pub use validator::MIN_PLOT_SIDE;

use contracts::ContractError;
use std::path::Path;

/// 同步配置加载入口
pub struct ConfigLoader;

impl ConfigLoader {
    /// 读取并校验配置文件
    ///
    /// `.toml` / `.json` 按扩展名解析，没有扩展名时按内容判断；
    /// 其它扩展名直接报 `ConfigParse`。
    pub fn load_from_path(path: &Path) -> Result<SyncBlueprint, ContractError> {
        let declared = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Some(ConfigFormat::from_extension(ext).ok_or_else(|| {
                ContractError::config_parse(format!(
                    "unsupported config format .{ext} for {} (expected .toml or .json)",
                    path.display()
                ))
            })?),
            None => None,
        };

        let content = std::fs::read_to_string(path)?;
        let format = declared.unwrap_or_else(|| ConfigFormat::sniff(&content));
        Self::load_from_str(&content, format)
    }

    /// 解析并校验配置文本
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SyncBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// 把蓝图写回 TOML / JSON，字段布局与加载时相同
    pub fn render(blueprint: &SyncBlueprint, format: ConfigFormat) -> Result<String, ContractError> {
        parser::render(blueprint, format)
    }
}

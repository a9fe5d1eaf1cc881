//! 同步配置解析
//!
//! 配置由三部分组成：
//!
//! ```toml
//! [inputs]                     # 必填
//! attitude = "pass.att"
//! frame_times = "pass.time"
//!
//! [resample]                   # 可选，默认 cubic、不展开角度
//! method = "linear"            # cubic | linear | nearest
//! unwrap_angles = true
//!
//! [[sinks]]                    # 可选，可重复
//! name = "table"
//! sink_type = "tsv"            # log | tsv | json | plot
//! params = { path = "att.txt", echo = "true" }
//! ```
//!
//! JSON 形式字段相同。格式优先按扩展名判断；没有扩展名时看首个非空白字符，
//! `{` 视为 JSON，其余按 TOML 处理。解析错误带上出错的行列号。

use contracts::{ContractError, SyncBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (推荐)
    Toml,
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 按内容猜测格式：JSON 配置必然是一个对象
    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') => Self::Json,
            _ => Self::Toml,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

/// 字节偏移 → 1 起始的 (行, 列)
fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, col)
}

fn parse_error(
    format: ConfigFormat,
    at: Option<(usize, usize)>,
    message: &str,
    source: Box<dyn std::error::Error + Send + Sync>,
) -> ContractError {
    let message = match at {
        Some((line, col)) => format!(
            "{} parse error at line {line}, column {col}: {}",
            format.label(),
            message.trim_end()
        ),
        None => format!("{} parse error: {}", format.label(), message.trim_end()),
    };
    ContractError::ConfigParse {
        message,
        source: Some(source),
    }
}

fn parse_toml(content: &str) -> Result<SyncBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| {
        let at = e.span().map(|span| line_col(content, span.start));
        let message = e.message().to_string();
        parse_error(ConfigFormat::Toml, at, &message, Box::new(e))
    })
}

fn parse_json(content: &str) -> Result<SyncBlueprint, ContractError> {
    // serde_json 的错误文本已带 "at line L column C"
    serde_json::from_str(content).map_err(|e| {
        let message = e.to_string();
        parse_error(ConfigFormat::Json, None, &message, Box::new(e))
    })
}

/// 根据格式解析配置 (不做校验)
pub fn parse(content: &str, format: ConfigFormat) -> Result<SyncBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

/// 把蓝图写回指定格式
pub fn render(blueprint: &SyncBlueprint, format: ConfigFormat) -> Result<String, ContractError> {
    match format {
        ConfigFormat::Toml => toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}"))),
        ConfigFormat::Json => serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{InterpolationMethod, SinkType};

    fn parse_message(err: ContractError) -> String {
        match err {
            ContractError::ConfigParse { message, .. } => message,
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[inputs]
attitude = "VAZ1_201707010006_001.att"
frame_times = "VAZ1_201707010006_001.time"
"#;
        let result = parse(content, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.resample.method, InterpolationMethod::Cubic);
        assert!(!bp.resample.unwrap_angles);
        assert!(bp.sinks.is_empty());
    }

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[inputs]
attitude = "a.att"
frame_times = "a.time"

[resample]
method = "linear"
unwrap_angles = true

[[sinks]]
name = "table"
sink_type = "tsv"
[sinks.params]
path = "att.txt"
echo = "true"

[[sinks]]
name = "plots"
sink_type = "plot"
"#;
        let bp = parse(content, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.resample.method, InterpolationMethod::Linear);
        assert!(bp.resample.unwrap_angles);
        assert_eq!(bp.sinks.len(), 2);
        assert_eq!(bp.sinks[0].param("echo"), Some("true"));
        assert_eq!(bp.sinks[1].sink_type, SinkType::Plot);
    }

    #[test]
    fn test_parse_json_full() {
        let content = r#"{
            "inputs": { "attitude": "a.att", "frame_times": "a.time" },
            "resample": { "method": "nearest", "unwrap_angles": true },
            "sinks": [
                { "name": "log", "sink_type": "log" },
                { "name": "plots", "sink_type": "plot",
                  "params": { "dir": "plots", "width": "640" } }
            ]
        }"#;
        let bp = parse(content, ConfigFormat::Json).unwrap();
        assert_eq!(bp.inputs.frame_times.to_str(), Some("a.time"));
        assert_eq!(bp.resample.method, InterpolationMethod::Nearest);
        assert!(bp.resample.unwrap_angles);
        assert_eq!(bp.sinks[1].sink_type, SinkType::Plot);
        assert_eq!(bp.sinks[1].param("width"), Some("640"));
    }

    #[test]
    fn test_parse_unknown_method() {
        let content = r#"
[inputs]
attitude = "a.att"
frame_times = "a.time"

[resample]
method = "quintic"
"#;
        let message = parse_message(parse(content, ConfigFormat::Toml).unwrap_err());
        assert!(message.starts_with("TOML parse error"), "{message}");
        assert!(message.contains("quintic"), "{message}");
    }

    #[test]
    fn test_missing_inputs_section() {
        let content = "[resample]\nmethod = \"cubic\"\n";
        let message = parse_message(parse(content, ConfigFormat::Toml).unwrap_err());
        assert!(message.contains("inputs"), "{message}");
    }

    #[test]
    fn test_json_error_location() {
        let content = "{\n  \"inputs\": { \"attitude\": \"a.att\" }\n}";
        let message = parse_message(parse(content, ConfigFormat::Json).unwrap_err());
        assert!(message.starts_with("JSON parse error"), "{message}");
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("frame_times"), "{message}");
    }

    #[test]
    fn test_toml_error_location() {
        let content = "[inputs]\nattitude = \"a.att\"\nframe_times = [[[";
        let message = parse_message(parse(content, ConfigFormat::Toml).unwrap_err());
        assert!(message.starts_with("TOML parse error at line 3"), "{message}");
    }

    #[test]
    fn test_line_col() {
        let text = "ab\ncde\nf";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 4), (2, 2));
        assert_eq!(line_col(text, 7), (3, 1));
        assert_eq!(line_col(text, 100), (3, 2));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ConfigFormat::sniff("  \n{ \"inputs\": {} }"), ConfigFormat::Json);
        assert_eq!(ConfigFormat::sniff("[inputs]\n"), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::sniff("# comment\n[inputs]"), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::sniff(""), ConfigFormat::Toml);
    }
}

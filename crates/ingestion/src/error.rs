//! Ingestion 错误类型

use contracts::ContractError;
use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 文件读取失败
    #[error("failed to read {path}: {source}")]
    Read {
        /// 文件路径
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// XML 语法错误
    #[error("{source_name}: malformed xml: {message}")]
    Xml {
        /// 输入名称（文件路径或内存标识）
        source_name: String,
        /// 错误消息
        message: String,
    },

    /// 缺少容器元素
    #[error("{source_name}: missing <{element}> element")]
    MissingElement {
        source_name: String,
        element: &'static str,
    },

    /// 记录缺少字段
    #[error("{source_name}: record {record} has no <{field}>")]
    MissingField {
        source_name: String,
        /// 记录序号（从 0 开始）
        record: usize,
        field: &'static str,
    },

    /// 字段值不是合法数字
    #[error("{source_name}: record {record} <{field}> is not a number: {value:?}")]
    InvalidNumber {
        source_name: String,
        record: usize,
        field: &'static str,
        value: String,
    },
}

impl IngestionError {
    /// 输入名称
    pub fn source_name(&self) -> &str {
        match self {
            Self::Read { path, .. } => path,
            Self::Xml { source_name, .. }
            | Self::MissingElement { source_name, .. }
            | Self::MissingField { source_name, .. }
            | Self::InvalidNumber { source_name, .. } => source_name,
        }
    }
}

impl From<IngestionError> for ContractError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Read { source, .. } => ContractError::Io(source),
            other => ContractError::parse(other.source_name().to_string(), other.to_string()),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;

//! # Dispatcher
//!
//! 数据分发模块。
//!
//! 负责：
//! - 消费完成的 `SyncRun`（姿态表 + 原始姿态）
//! - Fan-out 到多个 sinks（tsv / log / json / plot）
//! - 每个 sink 独立 worker，汇总各自的成功 / 失败

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{DataSink, SyncRun};
pub use dispatcher::{
    create_dispatcher, DispatchReport, Dispatcher, DispatcherBuilder, DispatcherConfig,
};
pub use error::DispatcherError;
pub use handle::{SinkHandle, SinkOutcome, DEFAULT_QUEUE_CAPACITY};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{
    format_table, render_axis, JsonSink, LogSink, PlotSink, PlotSinkConfig, TsvSink,
    TsvSinkConfig,
};

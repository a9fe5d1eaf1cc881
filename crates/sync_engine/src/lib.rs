//! # Sync Engine
//!
//! 姿态重采样引擎。
//!
//! 负责：
//! - 按轴构建插值器（cubic / linear / nearest）
//! - 过滤姿态时间范围之外的帧（不外推）
//! - 在每个保留帧的时间戳上求值，输出 `SyncedTable`
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::{Resampler, ResampleConfig, InterpolationMethod};
//!
//! let resampler = Resampler::new(ResampleConfig::with_method(InterpolationMethod::Cubic));
//! let table = resampler.synchronize(&attitude, &frames)?;
//! for record in &table.records {
//!     println!("{} {} {}", record.frame_index, record.roll, record.yaw);
//! }
//! ```

mod angles;
mod engine;
mod filter;
mod interpolant;
mod spline;

pub use angles::{unwrap_degrees, wrap_degrees};
pub use engine::{synchronize, Resampler};
pub use filter::{filter_to_domain, FilteredFrames};
pub use interpolant::{AttitudeInterpolants, Interpolant};

// Re-export contracts types
pub use contracts::{InterpolationMethod, ResampleConfig, SyncMeta, SyncedRecord, SyncedTable};

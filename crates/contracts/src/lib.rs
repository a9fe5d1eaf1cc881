//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Attitude and frame timestamps share one absolute clock (UTC seconds, f64)
//! - `frame_index` identifies a frame; it is carried through, never reordered

mod attitude;
mod blueprint;
mod error;
mod frame;
mod resample_config;
mod sink;
mod source;
mod synced;

pub use attitude::*;
pub use blueprint::*;
pub use error::*;
pub use frame::*;
pub use resample_config::*;
pub use sink::*;
pub use source::{AttitudeSource, FrameTimeSource};
pub use synced::*;

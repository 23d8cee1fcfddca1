//! ClipPlan Library
//!
//! Plans size-targeted ffmpeg clips: time range resolution, encoder selection,
//! two-pass bitrate allocation, HDR tonemapping and subtitle handling, emitted
//! as ordered ffmpeg argument lists.
//!
//! # Usage
//!
//! ```bash
//! ffprobe -v quiet -show_format -show_streams -of json movie.mkv > movie.json
//! clipplan plan --probe movie.json --input movie.mkv --start 1:30 --duration 71 --target-size 10
//! clipplan inspect --probe movie.json
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod emitter;
pub mod error;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{OptionsError, PlanError, PlanWarning};
pub use domain::model::{
    AudioStreamInfo, EngineCapabilities, SourceMetadata, SubtitleStreamInfo, VideoStreamInfo,
};
pub use domain::options::Options;
pub use domain::plan::EncodePlan;
pub use emitter::{CommandEmitter, EmitContext, EmittedCommands};
pub use error::{ClipPlanError, ClipPlanResult};
pub use planner::{BitratePolicy, EncodePlanBuilder};

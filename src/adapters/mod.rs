// Adapters - External system implementations

pub mod probe_ffprobe;
pub mod static_capabilities;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use probe_ffprobe::FfprobeJsonAdapter;
pub use static_capabilities::StaticCapabilities;
pub use toml_config::{ClipPlanConfig, LoggingConfig, TomlConfigAdapter};
pub use tracing_log::{LogFormat, TracingLogAdapter};

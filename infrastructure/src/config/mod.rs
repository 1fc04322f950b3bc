//! Configuration file loading for thesis-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./thesis-quorum.toml` or `./.thesis-quorum.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/thesis-quorum/config.toml`
//! 4. Fallback: `~/.config/thesis-quorum/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileArchiveConfig, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileModelsConfig, FilePipelineConfig, FilePromptsConfig, FileReasoningConfig,
    FileRouteConfig, default_backends, default_routes,
};
pub use loader::ConfigLoader;

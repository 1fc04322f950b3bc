//! Infrastructure layer for thesis-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod archive;
pub mod config;
pub mod logging;
pub mod providers;
pub mod text;

// Re-export commonly used types
pub use archive::FsRunArchive;
pub use config::{
    ConfigLoader, ConfigValidationError, FileArchiveConfig, FileBackendConfig, FileConfig,
    FileLoggingConfig, FileModelsConfig, FilePipelineConfig, FilePromptsConfig,
    FileReasoningConfig, FileRouteConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{ChatBackend, ModelRoute, OpenAiCompatBackend, RoutingGateway};
pub use text::{PromptSet, TextLoadError, load_optional, load_text};

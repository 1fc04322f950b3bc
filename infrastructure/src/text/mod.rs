//! Reading externally authored text files.

mod loader;
mod prompts;

pub use loader::{TextLoadError, decode, load_optional, load_text};
pub use prompts::PromptSet;

//! Backend and routing configuration from TOML (`[backends.*]`, `[routes]`)
//!
//! A backend is one OpenAI-compatible endpoint. A route maps a model
//! identifier to a backend and the model name that backend expects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thesis_domain::Model;

/// One OpenAI-compatible endpoint
///
/// # Example
///
/// ```toml
/// [backends.yidong]
/// base_url = "https://example.internal/v1"
/// api_key_env = "YIDONG_API_KEY"
/// timeout_seconds = 600
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// HTTP timeout per request
    pub timeout_seconds: Option<u64>,
}

impl FileBackendConfig {
    fn new(base_url: Option<&str>, api_key_env: &str) -> Self {
        Self {
            base_url: base_url.map(str::to_string),
            api_key_env: api_key_env.to_string(),
            api_key: None,
            timeout_seconds: Some(600),
        }
    }
}

/// Where a model's requests go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRouteConfig {
    /// Key into `[backends]`
    pub backend: String,
    /// Model name sent in the request body
    pub remote_name: String,
}

impl FileRouteConfig {
    fn new(backend: &str, remote_name: &str) -> Self {
        Self {
            backend: backend.to_string(),
            remote_name: remote_name.to_string(),
        }
    }
}

/// Built-in backends. `yidong` has no public URL and must be configured.
pub fn default_backends() -> BTreeMap<String, FileBackendConfig> {
    BTreeMap::from([
        (
            "ark".to_string(),
            FileBackendConfig::new(Some("https://ark.cn-beijing.volces.com/api/v3"), "ARK_API_KEY"),
        ),
        (
            "openai".to_string(),
            FileBackendConfig::new(Some("https://api.openai.com/v1"), "OPENAI_API_KEY"),
        ),
        (
            "google".to_string(),
            FileBackendConfig::new(
                Some("https://generativelanguage.googleapis.com/v1beta/openai"),
                "GEMINI_API_KEY",
            ),
        ),
        ("yidong".to_string(), FileBackendConfig::new(None, "YIDONG_API_KEY")),
    ])
}

/// Built-in routes for every known model.
///
/// `doubao` is served through an Ark endpoint id, which is account specific;
/// override `routes.doubao.remote_name` with it.
pub fn default_routes() -> BTreeMap<String, FileRouteConfig> {
    Model::ALL
        .iter()
        .map(|model| {
            let route = match model {
                Model::Doubao => FileRouteConfig::new("ark", "doubao"),
                Model::Qwen3 => FileRouteConfig::new("yidong", "qwen3-32b"),
                Model::DeepSeekV3 => FileRouteConfig::new("yidong", "deepseek-v3"),
                Model::DeepSeekR1 => FileRouteConfig::new("yidong", "deepseek-r1"),
                Model::Gpt41 => FileRouteConfig::new("openai", "gpt-4.1"),
                Model::Gemini20Flash => FileRouteConfig::new("google", "gemini-2.0-flash"),
                Model::Gemini25Pro => FileRouteConfig::new("google", "gemini-2.5-pro"),
            };
            (model.as_str().to_string(), route)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_model_has_a_route_to_a_known_backend() {
        let backends = default_backends();
        let routes = default_routes();
        for model in Model::ALL {
            let route = routes.get(model.as_str()).unwrap();
            assert!(backends.contains_key(&route.backend), "{}", model);
        }
    }

    #[test]
    fn test_remote_names() {
        let routes = default_routes();
        assert_eq!(routes["dsr1"].remote_name, "deepseek-r1");
        assert_eq!(routes["qwen3"].remote_name, "qwen3-32b");
        assert_eq!(routes["gemini-2.5-pro"].backend, "google");
    }
}

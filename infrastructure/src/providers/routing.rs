use super::{ChatBackend, OpenAiCompatBackend};
use crate::config::FileConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thesis_application::ports::llm_gateway::{GatewayError, LlmGateway};
use thesis_domain::{Message, Model};
use tracing::debug;

/// Backend and remote model name serving one [`Model`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    pub backend: String,
    pub remote_name: String,
}

impl ModelRoute {
    pub fn new(backend: impl Into<String>, remote_name: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            remote_name: remote_name.into(),
        }
    }
}

/// Gateway that dispatches each request to the backend its model is routed to
pub struct RoutingGateway {
    backends: HashMap<String, Arc<dyn ChatBackend>>,
    routes: HashMap<Model, ModelRoute>,
}

impl RoutingGateway {
    pub fn new(
        backends: Vec<Arc<dyn ChatBackend>>,
        routes: impl IntoIterator<Item = (Model, ModelRoute)>,
    ) -> Self {
        Self {
            backends: backends
                .into_iter()
                .map(|b| (b.name().to_string(), b))
                .collect(),
            routes: routes.into_iter().collect(),
        }
    }

    /// Build the gateway for `models`, reading API keys from the process
    /// environment.
    pub fn from_config(config: &FileConfig, models: &[Model]) -> Result<Self, GatewayError> {
        Self::from_config_with_env(config, models, |name| std::env::var(name).ok())
    }

    /// Build the gateway for `models` only.
    ///
    /// Every model must have a route to a backend with a base URL and a
    /// non-empty key; otherwise the result is
    /// [`GatewayError::ModelNotConfigured`]. Backends no model uses are
    /// never constructed, so their keys may be absent.
    pub fn from_config_with_env(
        config: &FileConfig,
        models: &[Model],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GatewayError> {
        let mut backends: HashMap<String, Arc<dyn ChatBackend>> = HashMap::new();
        let mut routes = HashMap::new();

        for model in models {
            let route = config.routes.get(model.as_str()).ok_or_else(|| {
                GatewayError::ModelNotConfigured(format!("{}: no entry in [routes]", model))
            })?;

            if !backends.contains_key(&route.backend) {
                let settings = config.backends.get(&route.backend).ok_or_else(|| {
                    GatewayError::ModelNotConfigured(format!(
                        "{}: backend '{}' is not defined",
                        model, route.backend
                    ))
                })?;
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    GatewayError::ModelNotConfigured(format!(
                        "{}: backends.{}.base_url is not set",
                        model, route.backend
                    ))
                })?;
                let api_key = settings
                    .api_key
                    .clone()
                    .or_else(|| env(&settings.api_key_env))
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| {
                        GatewayError::ModelNotConfigured(format!(
                            "{}: API key missing (set {})",
                            model, settings.api_key_env
                        ))
                    })?;

                let backend = OpenAiCompatBackend::new(
                    route.backend.clone(),
                    base_url,
                    api_key,
                    settings.timeout_seconds.map(Duration::from_secs),
                )?;
                backends.insert(route.backend.clone(), Arc::new(backend));
            }

            routes.insert(
                *model,
                ModelRoute::new(route.backend.clone(), route.remote_name.clone()),
            );
        }

        Ok(Self { backends, routes })
    }

    fn resolve(&self, model: &Model) -> Result<(&dyn ChatBackend, &str), GatewayError> {
        let route = self
            .routes
            .get(model)
            .ok_or_else(|| GatewayError::ModelNotConfigured(model.to_string()))?;
        let backend = self.backends.get(&route.backend).ok_or_else(|| {
            GatewayError::ModelNotConfigured(format!("{}: backend '{}'", model, route.backend))
        })?;
        Ok((backend.as_ref(), route.remote_name.as_str()))
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn complete(&self, messages: &[Message], model: &Model) -> Result<String, GatewayError> {
        let (backend, remote_name) = self.resolve(model)?;
        debug!(model = %model, backend = backend.name(), remote = remote_name, "Routing request");
        backend.chat(remote_name, messages).await
    }
}

//! Shared wiring for every pipeline command

use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;
use std::sync::Arc;
use thesis_application::{
    ConversationLogger, NoConversationLogger, NoProgress, PipelineParams, ProgressNotifier,
    RunArchive,
};
use thesis_domain::{Model, ReasoningFilter};
use thesis_infrastructure::{
    FileConfig, FsRunArchive, JsonlConversationLogger, PromptSet, RoutingGateway,
};
use thesis_presentation::{ProgressReporter, SimpleProgress};
use tracing::{error, info};

/// Everything a command needs besides its own arguments
pub struct AppContext {
    pub config: FileConfig,
    pub params: PipelineParams,
    pub prompts: PromptSet,
    pub reasoning: ReasoningFilter,
    pub archive: Arc<dyn RunArchive>,
    pub conversation_logger: Arc<dyn ConversationLogger>,
    pub progress: Box<dyn ProgressNotifier>,
}

impl AppContext {
    /// Validate the configuration and build the shared adapters.
    pub fn new(config: FileConfig, quiet: bool) -> Result<Self> {
        let issues = config.validate();
        if !issues.is_empty() {
            for issue in &issues {
                error!("{}", issue);
            }
            bail!("{} configuration problem(s), see above", issues.len());
        }

        let prompts = PromptSet::load(&config.prompts).context("Failed to load prompt templates")?;
        let (reasoning, _) = config.reasoning.to_filter();
        let params = config.pipeline.to_params();

        let archive: Arc<dyn RunArchive> = Arc::new(FsRunArchive::new(&config.archive.base_dir));
        info!("Archive base: {}", config.archive.base_dir.display());

        let conversation_logger: Arc<dyn ConversationLogger> = match config
            .logging
            .conversation_log
            .as_deref()
            .and_then(JsonlConversationLogger::new)
        {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                Arc::new(logger)
            }
            None => Arc::new(NoConversationLogger),
        };

        let progress: Box<dyn ProgressNotifier> = if quiet {
            Box::new(NoProgress)
        } else if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };

        Ok(Self {
            config,
            params,
            prompts,
            reasoning,
            archive,
            conversation_logger,
            progress,
        })
    }

    /// Gateway able to serve exactly `models`.
    pub fn gateway(&self, models: &[Model]) -> Result<Arc<RoutingGateway>> {
        let gateway = RoutingGateway::from_config(&self.config, models)
            .map_err(|e| anyhow!("Gateway configuration: {}", e))?;
        Ok(Arc::new(gateway))
    }
}

/// Parse a model name given on the command line.
pub fn parse_model(name: &str) -> Result<Model> {
    name.parse::<Model>().map_err(|e| anyhow!("{}", e))
}

/// Model from the command line, or the configured one.
pub fn model_or(name: Option<&str>, configured: Option<Model>, role: &str) -> Result<Model> {
    match name {
        Some(name) => parse_model(name),
        None => configured.ok_or_else(|| anyhow!("No {} model configured", role)),
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Cannot write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

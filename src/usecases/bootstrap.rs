use std::{
    path::Path,
    sync::{mpsc, Arc},
};

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    backend::{BackgroundDispatcher, HttpChatSource},
    infra::{
        self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError,
        storage_layout::StorageLayout,
    },
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

/// Event source and orchestrator wired to the live backend.
pub struct ComposedShell {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

/// Loads config, prepares storage and installs logging. The returned guard
/// must be held for as long as log records should reach the file.
pub fn bootstrap(config_path: Option<&Path>) -> Result<(AppContext, WorkerGuard), AppError> {
    let context = build_context(&FileConfigAdapter::new(config_path), StorageLayout::resolve()?)?;
    context.layout.ensure_dirs()?;
    let log_guard = infra::logging::init(&context.config.logging, &context.layout.log_dir)?;

    tracing::debug!(
        base_url = %context.config.backend.base_url,
        log_file = %context.layout.log_file().display(),
        "bootstrap completed"
    );

    Ok((context, log_guard))
}

fn build_context(
    config_adapter: &dyn ConfigAdapter,
    layout: StorageLayout,
) -> Result<AppContext, AppError> {
    let config = config_adapter.load()?;

    Ok(AppContext::new(config, layout))
}

pub fn compose_chat_source(context: &AppContext) -> Result<HttpChatSource, AppError> {
    let source = HttpChatSource::new(&context.config.backend)?;
    tracing::debug!(
        endpoint = source.endpoint(),
        timeout_ms = context.config.backend.timeout_ms,
        "chat source ready"
    );

    Ok(source)
}

pub fn compose_shell(context: &AppContext) -> Result<ComposedShell, AppError> {
    let (outcome_tx, outcome_rx) = mpsc::channel();
    let source = Arc::new(compose_chat_source(context)?);
    let dispatcher = BackgroundDispatcher::new(source, outcome_tx)?;

    Ok(ComposedShell {
        event_source: Box::new(CrosstermEventSource::new(outcome_rx)),
        orchestrator: Box::new(DefaultShellOrchestrator::new(dispatcher)),
    })
}

use anyhow::Result;

use crate::{
    backend,
    cli::{Cli, Command},
    domain,
    infra::{self, error::AppError},
    ui,
    usecases::{self, bootstrap, context::AppContext, send_message},
};

pub fn run(cli: Cli) -> Result<()> {
    let (context, _log_guard) = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        backend = backend::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?;
        }
        Command::Send { message } => {
            let reply = send_once(&context, &message)?;
            println!("{reply}");
        }
    }

    Ok(())
}

/// Dispatches a single message outside the TUI and returns the resolved string.
fn send_once(context: &AppContext, message: &str) -> Result<String, AppError> {
    let source = bootstrap::compose_chat_source(context)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::RuntimeStart)?;

    Ok(runtime.block_on(send_message::dispatch(&source, message)))
}

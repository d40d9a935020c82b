use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    let endpoint = crate::backend::chat_endpoint(&context.config.backend.base_url);

    tracing::info!(
        log_level = %context.config.logging.level,
        endpoint = %endpoint,
        timeout_ms = context.config.backend.timeout_ms,
        "starting TUI shell"
    );

    super::terminal::install_panic_hook();
    let mut terminal = TerminalSession::new()?;

    run_loop(event_source, orchestrator, |state| {
        terminal.draw(|frame| view::render(frame, state, &endpoint))
    })?;

    tracing::info!(
        messages = orchestrator.state().conversation().messages().len(),
        "TUI shell stopped"
    );
    Ok(())
}

/// Draws, then feeds one event to the orchestrator, until it stops running.
fn run_loop<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<()>
where
    D: FnMut(&mut crate::domain::shell_state::ShellState) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(orchestrator.state_mut())?;

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}

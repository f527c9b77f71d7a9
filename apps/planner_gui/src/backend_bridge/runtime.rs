//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{DisplaySurface, DisplayTree, SearchClient, SearchController};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Forwards every surface update to the UI thread as a [`UiEvent`].
#[derive(Clone)]
pub struct ChannelSurface {
    ui_tx: Sender<UiEvent>,
}

impl ChannelSurface {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn emit(&self, event: UiEvent) {
        if self.ui_tx.send(event).is_err() {
            tracing::debug!("ui event receiver dropped");
        }
    }
}

impl DisplaySurface for ChannelSurface {
    fn set_busy(&self, busy: bool) {
        self.emit(UiEvent::Busy(busy));
    }

    fn clear(&self) {
        self.emit(UiEvent::Cleared);
    }

    fn show_results(&self, tree: DisplayTree) {
        self.emit(UiEvent::Results(tree));
    }

    fn show_error(&self, message: String) {
        self.emit(UiEvent::Error(UiError::from_message(
            UiErrorContext::Search,
            message,
        )));
    }
}

pub fn spawn_backend_thread(
    server_url: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let client = match SearchClient::for_server(&server_url) {
            Ok(client) => client,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: invalid server url '{server_url}': {err}"),
                )));
                tracing::error!("invalid search server url '{server_url}': {err:#}");
                return;
            }
        };
        let endpoint = client.endpoint().to_string();
        let controller = Arc::new(SearchController::new(client));
        let surface = ChannelSurface::new(ui_tx.clone());
        let _ = ui_tx.try_send(UiEvent::Info(format!("Ready ({endpoint})")));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::Search { form } => {
                        // Each submit runs as its own task so a second click
                        // reaches the busy flag and is ignored there.
                        let controller = Arc::clone(&controller);
                        let surface = surface.clone();
                        tokio::spawn(async move {
                            let outcome = controller.submit(&form, &surface).await;
                            tracing::debug!(?outcome, "search submission finished");
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    })
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn surface_updates_arrive_as_ui_events_in_order() {
        let (ui_tx, ui_rx) = bounded(8);
        let surface = ChannelSurface::new(ui_tx);

        surface.set_busy(true);
        surface.clear();
        surface.show_error("Unsupported pathology 'codo'.".to_string());
        surface.set_busy(false);

        let events: Vec<_> = ui_rx.try_iter().collect();
        assert!(matches!(events[0], UiEvent::Busy(true)));
        assert!(matches!(events[1], UiEvent::Cleared));
        match &events[2] {
            UiEvent::Error(err) => {
                assert_eq!(err.context(), UiErrorContext::Search);
                assert_eq!(err.message(), "Unsupported pathology 'codo'.");
            }
            _ => panic!("expected an error event"),
        }
        assert!(matches!(events[3], UiEvent::Busy(false)));
    }

    #[test]
    fn invalid_server_url_reports_startup_failure() {
        let (_cmd_tx, cmd_rx) = bounded(1);
        let (ui_tx, ui_rx) = bounded(8);

        spawn_backend_thread("ftp://nowhere".to_string(), cmd_rx, ui_tx)
            .join()
            .expect("backend thread");

        let startup_error = ui_rx.try_iter().find_map(|event| match event {
            UiEvent::Error(err) => Some(err),
            _ => None,
        });
        let err = startup_error.expect("startup error");
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
        assert!(err.message().contains("invalid server url"));
    }
}

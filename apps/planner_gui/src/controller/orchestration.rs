//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Returns whether the command was queued; otherwise `status` says why not.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend command processor disconnected (possible startup/runtime failure)"
                .to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::FormSnapshot;
    use crossbeam_channel::bounded;

    use super::*;

    fn search() -> BackendCommand {
        BackendCommand::Search {
            form: FormSnapshot::new(),
        }
    }

    #[test]
    fn queued_command_leaves_status_alone() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let mut status = "Ready".to_string();

        assert!(dispatch_backend_command(&cmd_tx, search(), &mut status));
        assert_eq!(status, "Ready");
        assert!(cmd_rx.try_recv().is_ok());
    }

    #[test]
    fn full_queue_is_reported() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(&cmd_tx, search(), &mut status));
        assert!(!dispatch_backend_command(&cmd_tx, search(), &mut status));
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn disconnected_backend_is_reported() {
        let (cmd_tx, cmd_rx) = bounded(1);
        drop(cmd_rx);
        let mut status = String::new();

        assert!(!dispatch_backend_command(&cmd_tx, search(), &mut status));
        assert!(status.contains("disconnected"));
    }
}

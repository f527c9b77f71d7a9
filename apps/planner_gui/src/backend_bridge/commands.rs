//! Backend commands queued from UI to backend worker.

use client_core::FormSnapshot;

pub enum BackendCommand {
    Search { form: FormSnapshot },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Search { .. } => "search",
        }
    }
}

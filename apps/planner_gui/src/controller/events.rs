//! UI/backend events and error modeling for the planner GUI controller.

use client_core::DisplayTree;

pub enum UiEvent {
    Info(String),
    Busy(bool),
    /// Previous results and error are gone; a new submission started.
    Cleared,
    Results(DisplayTree),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Service,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Search,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if context == UiErrorContext::BackendStartup {
            UiErrorCategory::Transport
        } else if message_lower.contains("session minutes")
            || message_lower.contains("invalid")
            || message_lower.contains("unsupported")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("disconnected")
            || message_lower.contains("queue")
            || message_lower.contains("connection")
            || message_lower.contains("startup failure")
        {
            UiErrorCategory::Transport
        } else if context == UiErrorContext::Search {
            UiErrorCategory::Service
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Startup failures leave no backend to retry against.
    pub fn is_fatal(&self) -> bool {
        self.context == UiErrorContext::BackendStartup
    }
}

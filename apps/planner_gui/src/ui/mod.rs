//! UI layer for the planner GUI: app shell and routine card widgets.

pub mod app;
pub mod cards;

pub use app::PlannerApp;

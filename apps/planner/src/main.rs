use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    build_request,
    config::load_settings,
    form::{LEVEL_FIELD, OBJECTIVES_FIELD, PATHOLOGIES_FIELD, QUERY_FIELD, SESSION_MINUTES_FIELD},
    DisplaySurface, DisplayTree, FormSnapshot, SearchClient, SearchController, SubmitOutcome,
};
use shared::domain::DEFAULT_SESSION_MINUTES;
use tracing_subscriber::EnvFilter;

/// Search workout routines and print them as cards.
#[derive(Parser, Debug)]
struct Args {
    /// Training objective; repeat for a mixed plan.
    #[arg(long = "objective")]
    objectives: Vec<String>,
    #[arg(long, default_value_t = DEFAULT_SESSION_MINUTES.to_string())]
    minutes: String,
    /// Physical limitation to avoid; repeatable.
    #[arg(long = "pathology")]
    pathologies: Vec<String>,
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    query: Option<String>,
    /// Overrides planner.toml / PLANNER_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Print every section, not only the warmup.
    #[arg(long)]
    expand_all: bool,
    /// Print the request payload instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn form(&self) -> FormSnapshot {
        let mut form = FormSnapshot::new();
        for objective in &self.objectives {
            form.append(OBJECTIVES_FIELD, objective.as_str());
        }
        for pathology in &self.pathologies {
            form.append(PATHOLOGIES_FIELD, pathology.as_str());
        }
        form.set(SESSION_MINUTES_FIELD, self.minutes.as_str());
        if let Some(level) = &self.level {
            form.set(LEVEL_FIELD, level.as_str());
        }
        if let Some(query) = &self.query {
            form.set(QUERY_FIELD, query.as_str());
        }
        form
    }
}

struct TerminalSurface {
    expand_all: bool,
}

impl DisplaySurface for TerminalSurface {
    fn set_busy(&self, busy: bool) {
        if busy {
            eprintln!("Searching routines...");
        }
    }

    fn clear(&self) {}

    fn show_results(&self, tree: DisplayTree) {
        print!("{}", tree.text(self.expand_all));
    }

    fn show_error(&self, message: String) {
        eprintln!("error: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let form = args.form();

    if args.dry_run {
        let request = build_request(&form);
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut settings = load_settings();
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    let client = SearchClient::for_server(&settings.server_url)
        .context("invalid search server configuration")?;
    tracing::debug!(endpoint = %client.endpoint(), "using search endpoint");

    let controller = SearchController::new(client);
    let surface = TerminalSurface {
        expand_all: args.expand_all,
    };

    Ok(match controller.submit(&form, &surface).await {
        SubmitOutcome::Rendered { .. } | SubmitOutcome::Empty => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent_runtime::{LoopConfig, OpenAiDecisionMaker, Orchestrator};
use browser_actions::{ActionConfig, BrowserService};
use cdp_session::SessionConfig;
use webpilot::{config::AppConfig, console};

/// LLM-driven browser automation agent.
#[derive(Debug, Parser)]
#[command(name = "webpilot", version, about)]
struct Cli {
    /// Run the browser without a visible window.
    #[arg(long)]
    headless: bool,

    /// Attach to a running browser over this debugger websocket URL.
    #[arg(long, value_name = "URL")]
    ws_url: Option<String>,

    /// Model name for the decision-maker endpoint.
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Step ceiling per task.
    #[arg(long, value_name = "N")]
    max_steps: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win either way.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut app = AppConfig::from_env().context("configuration")?;
    if let Some(model) = cli.model {
        app.model = model;
    }
    if let Some(base_url) = cli.base_url {
        app.base_url = base_url;
    }
    if let Some(max_steps) = cli.max_steps {
        app.max_steps = max_steps;
    }

    let mut session = SessionConfig::default();
    if cli.headless {
        session.headless = true;
    }
    if cli.ws_url.is_some() {
        session.websocket_url = cli.ws_url;
    }

    info!(model = %app.model, base_url = %app.base_url, "starting up");

    let browser = BrowserService::launch(&session, ActionConfig::default())
        .await
        .context("browser launch")?;

    let decider = OpenAiDecisionMaker::new(&app.api_key, &app.model, &app.base_url);

    let loop_config = LoopConfig {
        max_steps: app.max_steps,
        ..LoopConfig::default()
    };
    let mut orchestrator = Orchestrator::with_config(browser, decider, loop_config);

    console::run(&mut orchestrator).await.context("console")?;

    orchestrator.browser_mut().shutdown().await;
    info!("shut down cleanly");
    Ok(())
}

//! CLI for weather-agent: export the loop diagram, then run the canned
//! conversations against the chat endpoint and print every step.
//!
//! Requires `GEMINI_API_KEY` (in `.env` or the environment); see
//! `WeatherAgentConfig` for the optional settings.

use std::path::Path;

use anyhow::{Context, Result};
use toolgraph::diagram::{self, DiagramError, DEFAULT_DIAGRAM_FILE};
use toolgraph::{OpenAiCompatClient, StepEvent};
use tracing::{info, warn};

use weather_agent::{
    build_loop, logging, transcript, WeatherAgentConfig, CANNED_CONVERSATIONS,
};

fn print_step(event: &StepEvent) {
    for line in transcript(event) {
        println!("{line}");
    }
}

fn export_diagram() {
    let path = Path::new(DEFAULT_DIAGRAM_FILE);
    match diagram::export_png(path) {
        Ok(written) => {
            let shown = std::fs::canonicalize(&written).unwrap_or(written);
            println!("\n--- Graph visualization saved to {} ---", shown.display());
        }
        Err(DiagramError::RendererNotFound(bin)) => {
            warn!(renderer = %bin, "diagram renderer not available");
            println!("\nInstall graphviz to visualize the graph ({bin} not found in PATH).");
            println!("Mermaid source:\n{}", diagram::to_mermaid());
        }
        Err(e) => warn!(error = %e, "diagram export failed"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init();

    let cfg = WeatherAgentConfig::from_env().context("load configuration")?;
    info!(model = %cfg.model, api_base = %cfg.api_base, today = ?cfg.today, "configuration loaded");

    let llm = OpenAiCompatClient::new(cfg.llm_config());
    let agent = build_loop(Box::new(llm), cfg.today.clone(), cfg.loop_config());

    export_diagram();
    println!("\n--- Agent Initialized ---");

    for (title, question) in CANNED_CONVERSATIONS {
        println!("\n--- Running Agent: {title} ---");
        let state = toolgraph::ConversationState::new(question);
        let done = agent
            .run_with(state, print_step)
            .await
            .with_context(|| format!("conversation failed: {title}"))?;
        info!(messages = done.len(), "final answer: {}", done.final_answer().unwrap_or_default());
    }

    Ok(())
}

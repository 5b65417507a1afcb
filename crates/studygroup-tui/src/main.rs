use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use studygroup_core::{Config, GenerationRequest, PromptStyle};

mod app;
mod handler;
mod logging;
mod theme;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "studygroup")]
#[command(version, about = "Study groups in the terminal, with an AI tutor on call")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant one question and print the answer
    Ask {
        /// Your question
        question: String,
        /// Ask for a step-by-step tutor explanation
        #[arg(short, long)]
        tutor: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is optional; the app runs without it
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("{}: {err:#}", "Logging disabled".yellow());
            None
        }
    };

    let (config, config_path) = match cli.config {
        Some(path) => (Config::load_from(&path)?, path),
        None => (Config::load()?, Config::get_config_path()?),
    };
    let config = config.with_env_overrides();

    match cli.command {
        Some(Commands::Ask { question, tutor }) => ask_once(&config, &question, tutor).await,
        None => run_tui(&config, config_path).await,
    }
}

async fn ask_once(config: &Config, question: &str, tutor: bool) -> Result<()> {
    let style = if tutor { PromptStyle::Tutor } else { PromptStyle::General };
    let request = match GenerationRequest::build(style, question) {
        Ok(request) => request,
        Err(err) => {
            println!("{}", err.user_message().yellow());
            return Ok(());
        }
    };
    let client = config.gemini_client();

    println!("🤖 Asking {} ({})...\n", style.display_name().bold().magenta(), client.model().dimmed());

    let result = client.answer(&request).await;
    if result.is_fallback() {
        println!("{}", result.text().red());
    } else {
        println!("{}", "Response:".bold().green());
        println!("{}", result.text());
    }
    Ok(())
}

async fn run_tui(config: &Config, config_path: PathBuf) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(config, config_path);

    let outcome = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            let Some(event) = events.next().await else {
                break;
            };
            handler::handle_event(&mut app, event);
            app.poll_tasks();
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("exiting");
    outcome
}

// CodeLens Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | CodeLens

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use codelens::config::Settings;
use codelens::review::gateway::GroqGateway;
use codelens::review::report::AuditReport;
use codelens::review::{Language, Mode, ReviewSession};
use codelens::{server, state::ServerState, window};

#[derive(Parser)]
#[command(name = "codelens")]
#[command(about = "CodeLens AI code reviewer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the desktop review window
    Gui,

    /// Start the chat API server
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value_t = 3000)]
        port: u16,

        /// Directory of front-end assets to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Review a file: bullet summary plus score and complexity
    Analyze {
        /// Source file to review
        #[arg(short, long)]
        input: PathBuf,

        /// Write a plain-text audit report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Ask for an optimized rewrite of a file
    Optimize {
        /// Source file to optimize
        #[arg(short, long)]
        input: PathBuf,

        /// Write the optimized code here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate running a file and print its console output
    Run {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Ask a free-form question about a file
    Chat {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        message: String,
    },

    /// Print the guessed language of a file
    Detect {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

async fn review(
    settings: &Settings,
    input: &Path,
    mode: Mode,
    message: &str,
) -> anyhow::Result<ReviewSession> {
    let code = read_source(input)?;
    let gateway = GroqGateway::from_settings(settings);
    let mut session = ReviewSession::new(code);

    info!("[CLI] {} {:?} ({})", mode.as_str(), input, session.language());
    let done = session.submit(&gateway, &settings.model, mode, message).await?;
    if done.failed {
        let notice = match mode {
            Mode::Execute => session.console(),
            _ => session.last_assistant().map(|m| m.content.as_str()),
        };
        if let Some(notice) = notice {
            eprintln!("{}", notice);
        }
        bail!("{} request failed", mode.as_str());
    }
    Ok(session)
}

fn print_metrics(session: &ReviewSession) {
    let metrics = session.metrics();
    if let Some(score) = metrics.score {
        println!("Score: {}/100", score);
    }
    if let Some(time) = metrics.time_label() {
        println!("Time:  {}", time);
    }
    if let Some(space) = &metrics.space_complexity {
        println!("Space: {}", space);
    }
}

fn print_reply(session: &ReviewSession) {
    if let Some(reply) = session.last_assistant() {
        println!("{}\n", reply.content);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Quiet the windowing stack unless the user asks for it
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var(
            "RUST_LOG",
            "info,wgpu_core=error,wgpu_hal=error,naga=error,winit=error,eframe=warn",
        );
    }
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("[PANIC] at {}: {}", location, panic_info);
    }));

    let args = Cli::parse();
    let settings = Settings::from_env();

    match args.command {
        Commands::Gui => {
            info!("[CLI] Launching review window...");
            let runtime = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| window::run_gui(&settings, runtime))
                .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;
        }
        Commands::Serve { port, static_dir } => {
            let state = Arc::new(ServerState::from_settings(&settings));
            server::start_server(port, state, static_dir).await?;
        }
        Commands::Analyze { input, report } => {
            let session = review(&settings, &input, Mode::Analyze, "").await?;
            print_reply(&session);
            print_metrics(&session);

            if let Some(path) = report {
                let analysis = session
                    .last_analysis()
                    .context("no analysis reply to export")?;
                AuditReport::new(&analysis.content, session.metrics()).save(&path)?;
                println!("\nReport written to {}", path.display());
            }
        }
        Commands::Optimize { input, output } => {
            let original = read_source(&input)?;
            let session = review(&settings, &input, Mode::Optimize, "").await?;
            print_reply(&session);
            print_metrics(&session);

            if session.buffer() == original {
                println!("\n(no replacement code returned)");
            } else if let Some(path) = output {
                std::fs::write(&path, session.buffer())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("\nOptimized code written to {}", path.display());
            } else {
                println!("\n{}", session.buffer());
            }
        }
        Commands::Run { input } => {
            let session = review(&settings, &input, Mode::Execute, "").await?;
            println!("{}", session.console().unwrap_or_default());
        }
        Commands::Chat { input, message } => {
            let session = review(&settings, &input, Mode::Chat, &message).await?;
            print_reply(&session);
            print_metrics(&session);
        }
        Commands::Detect { input } => {
            let lang = Language::detect(&read_source(&input)?);
            println!(
                "{} (highlight: {}, file: {})",
                lang.display_name(),
                lang.highlight_tag(),
                lang.file_name()
            );
        }
    }

    Ok(())
}

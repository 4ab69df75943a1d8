//! Terminal front end for the commander portfolio assistant and the Click
//! Trainer reflex game.

mod dialog;
mod host;
mod trainer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commander_core::catalog::{self, CERTIFICATIONS, PROJECTS};
use commander_core::{Responder, Settings};
use commander_runtime::Host;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::dialog::DialogExit;
use crate::host::TerminalHost;

#[derive(Parser)]
#[command(
    name = "commander",
    about = "Portfolio assistant and Click Trainer reflex game"
)]
struct Cli {
    /// JSON settings file with links and timing overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print links instead of opening them in the browser.
    #[arg(long, global = true, default_value_t = false)]
    no_open: bool,

    /// Print session and game events as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single message without the thinking delay.
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Open the chat dialog.
    Chat,
    /// Play the Click Trainer.
    Game,
    /// Print the configured links.
    Links,
    /// List projects, or show one by title.
    Projects { title: Option<String> },
    /// List certifications.
    Certs,
    /// Print the version of the commander libraries.
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "commander=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let host = Arc::new(TerminalHost::new(!cli.no_open));

    match cli.command {
        Commands::Ask { text } => {
            let responder = Responder::new(settings.links.clone())?;
            let input = text.join(" ");
            let Some(turn) = responder.respond(&input) else {
                return Ok(());
            };
            if cli.json {
                println!("{}", serde_json::to_string(&turn)?);
            } else {
                println!("{}", turn.reply);
            }
            if let Some(effect) = &turn.effect {
                if let Err(error) = host.apply(effect) {
                    tracing::warn!(%error, "could not apply side effect");
                }
            }
        }
        Commands::Chat => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let exit = dialog::run(&settings, host, &mut lines, cli.json).await?;
            if exit == DialogExit::ToGame {
                let last = trainer::run(&settings, &mut lines, cli.json).await?;
                tracing::debug!(score = last.score, "left the trainer");
            }
        }
        Commands::Game => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let last = trainer::run(&settings, &mut lines, cli.json).await?;
            tracing::debug!(score = last.score, "left the trainer");
        }
        Commands::Links => {
            let links = &settings.links;
            println!("email      {}", links.email);
            println!("linkedin   {}", links.linkedin);
            println!("github     {}", links.github);
            println!("naukri     {}", links.naukri);
            println!("instagram  {}", links.instagram);
            println!("resume     {}", links.resume);
        }
        Commands::Projects { title: Some(title) } => {
            let project = catalog::find_project(&title)
                .with_context(|| format!("no project titled `{title}`"))?;
            println!("{}", project.title);
            println!("  {}", project.description);
            println!("  tags: {}", project.tags.join(", "));
            println!("  repo: {}", project.repo);
        }
        Commands::Projects { title: None } => {
            for project in PROJECTS {
                println!("{:<22} {}", project.title, project.description);
            }
        }
        Commands::Certs => {
            for cert in CERTIFICATIONS {
                println!("{:<28} {:<12} {}", cert.title, cert.issuer, cert.description);
            }
        }
        Commands::Version => {
            println!("commander {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

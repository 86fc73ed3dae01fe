// src/main.rs
// =============================================================================
// This is the entry point of the gh-embed command-line tool.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, default "info")
// 2. Parse command-line arguments using clap and load the settings
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = fetch failed/refused, 2 = error)
// =============================================================================

mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use cli::{Cli, Commands};
use gh_embed::github::{Commit, FileFetcher, Reference, RetrievedFile};
use gh_embed::{render_code_block, Control, Settings};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            reference,
            json,
            unpinned,
        } => {
            let Some(settings) = load_settings(&cli.config)? else {
                return Ok(2);
            };
            handle_get(&settings, &reference, json, !unpinned).await
        }
        Commands::Refresh { control, json } => {
            let Some(settings) = load_settings(&cli.config)? else {
                return Ok(2);
            };
            handle_refresh(&settings, &control, json).await
        }
        Commands::Pin { control } => handle_pin(&control),
        Commands::Repos { json } => {
            let Some(settings) = load_settings(&cli.config)? else {
                return Ok(2);
            };
            handle_repos(&settings, json).await
        }
        Commands::Commits { reference, json } => {
            let Some(settings) = load_settings(&cli.config)? else {
                return Ok(2);
            };
            handle_commits(&settings, &reference, json).await
        }
    }
}

// Loads settings and checks the token up front.
// Returns None (after telling the user) when there is no token.
fn load_settings(path: &Path) -> Result<Option<Settings>> {
    let settings = Settings::load(path)?;

    if let Err(e) = settings.require_token() {
        eprintln!("⚠️  {}", e);
        return Ok(None);
    }

    Ok(Some(settings))
}

#[derive(Serialize)]
struct EmbedOutput<'a> {
    control: String,
    #[serde(flatten)]
    file: &'a RetrievedFile,
}

// Handles the 'get' subcommand: fetch, then print control + code block
async fn handle_get(settings: &Settings, raw: &str, json: bool, pinned: bool) -> Result<i32> {
    let reference = Reference::resolve(raw, settings);
    let control = Control::new(reference, pinned);

    embed(settings, control, json).await
}

// Handles the 'refresh' subcommand
async fn handle_refresh(settings: &Settings, text: &str, json: bool) -> Result<i32> {
    let control: Control = text.parse()?;

    if let Err(e) = control.ensure_refreshable() {
        eprintln!("📌 {}", e);
        return Ok(1);
    }

    embed(settings, control, json).await
}

async fn embed(settings: &Settings, mut control: Control, json: bool) -> Result<i32> {
    let mut fetcher = FileFetcher::new(settings)?;

    log::info!("Fetching {}", control.reference);
    let file = match fetcher.fetch(&control.reference).await {
        Ok(file) => file,
        Err(failure) => {
            eprintln!("❌ {}", failure.notification());
            return Ok(1);
        }
    };

    control.record(&file);

    if json {
        let output = EmbedOutput {
            control: control.to_string(),
            file: &file,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", control);
        println!("{}", render_code_block(&file));
        log::info!("{}", control.label());
    }

    Ok(0)
}

// Handles the 'pin' subcommand. No network involved.
fn handle_pin(text: &str) -> Result<i32> {
    let mut control: Control = text.parse()?;
    control.toggle_pin();
    println!("{}", control);
    Ok(0)
}

// Handles the 'repos' subcommand
async fn handle_repos(settings: &Settings, json: bool) -> Result<i32> {
    let fetcher = FileFetcher::new(settings)?;

    let repos = match fetcher.list_repositories().await {
        Ok(repos) => repos,
        Err(failure) => {
            eprintln!("❌ {}", failure.notification());
            return Ok(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&repos)?);
        return Ok(0);
    }

    println!("{:<40} {}", "NAME", "DESCRIPTION");
    println!("{}", "=".repeat(80));
    for repo in &repos {
        println!(
            "{:<40} {}",
            repo.name,
            repo.description.as_deref().unwrap_or("")
        );
    }
    println!("\n📋 Total: {}", repos.len());

    Ok(0)
}

// Handles the 'commits' subcommand
async fn handle_commits(settings: &Settings, raw: &str, json: bool) -> Result<i32> {
    let reference = Reference::resolve(raw, settings);
    let mut fetcher = FileFetcher::new(settings)?;

    let commits = match fetcher.refresh_commits(&reference).await {
        Ok(commits) => commits.to_vec(),
        Err(failure) => {
            eprintln!("❌ {}", failure.notification());
            return Ok(1);
        }
    };
    let latest = fetcher
        .tracker()
        .latest(&reference.account, &reference.repository)
        .map(|c| c.id.clone());

    if json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
        return Ok(0);
    }

    print_commits(&commits, latest.as_deref());
    Ok(0)
}

fn print_commits(commits: &[Commit], latest: Option<&str>) {
    println!("{:<3}{:<10} {:<22} {}", "", "COMMIT", "AUTHORED", "MESSAGE");
    println!("{}", "=".repeat(100));

    for commit in commits {
        let marker = if Some(commit.id.as_str()) == latest { "⭐" } else { "" };
        let short_id = commit.id.get(..7).unwrap_or(&commit.id);

        // Keep long messages on one line
        let message = if commit.message.chars().count() > 60 {
            let cut: String = commit.message.chars().take(57).collect();
            format!("{}...", cut)
        } else {
            commit.message.clone()
        };

        println!(
            "{:<3}{:<10} {:<22} {}",
            marker,
            short_id,
            commit.authored_at.format("%Y-%m-%d %H:%M UTC"),
            message
        );
    }
}

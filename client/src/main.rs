use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{check_file, check_integrity, health_check, list_files, send_file, server_url};
use common::log::{error, info, init_logging, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
#[command(name = "chain-client")]
#[command(about = "Send files to a chain server as hash-linked chunks and verify them")]
struct Cli {
    /// Server base URL (defaults to $CHAIN_SERVER_URL, then http://127.0.0.1:8000)
    #[arg(long, global = true)]
    server_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a file and send its chain to the server
    Send {
        path: PathBuf,
    },
    /// Ask the server whether a local file's chain is stored intact
    Check {
        path: PathBuf,
    },
    /// Verify the chains of every file stored on the server
    Integrity {
    },
    /// List the files stored on the server
    Files {
    },
    /// Check that the server is up and is a chain server
    Health {
    },
    /// Read `send <path>`, `check <path>` and `quit` commands from stdin
    Interactive {
    },
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    let url = server_url(cli.server_url);

    if let Err(e) = run(&url, cli.command).await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(url: &str, command: Commands) -> Result<()> {
    health_check(url).await.with_context(|| format!("no chain server at {}", url))?;
    info!("🔍 Connected to chain server at {}", url);

    match command {
        Commands::Send { path } => send(url, &path).await,
        Commands::Check { path } => check(url, &path).await,
        Commands::Integrity { } => {
            let intact = check_integrity(url).await?;
            if intact {
                info!("✅ Every stored chain is intact");
            } else {
                warn!("👺 At least one stored chain is broken");
            }
            Ok(())
        }
        Commands::Files { } => {
            let files = list_files(url).await?;
            info!("📁 {} files stored", files.len());
            for file in files {
                info!("  - {} ({} chunks)", file.hash, file.chunks);
            }
            Ok(())
        }
        Commands::Health { } => {
            info!("✅ Chain server is up and running!");
            Ok(())
        }
        Commands::Interactive { } => interactive(url).await,
    }
}

async fn send(url: &str, path: &Path) -> Result<()> {
    let response = send_file(url, path).await?;
    if response.new_file {
        info!("📦 Sent {:?}: {} chunks, hash {}", path, response.chunk_count, response.hash);
    } else {
        info!("📦 {:?} was already stored, hash {}", path, response.hash);
    }
    Ok(())
}

async fn check(url: &str, path: &Path) -> Result<()> {
    let response = check_file(url, path).await?;
    if response.check {
        info!("✅ {:?} is stored intact, hash {}", path, response.hash);
    } else {
        warn!("❌ {:?} is missing or broken on the server, hash {}", path, response.hash);
    }
    Ok(())
}

async fn interactive(url: &str) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        // a failed command is reported and the prompt continues
        let result = match (command, arg) {
            ("", _) => Ok(()),
            ("quit" | "exit", _) => return Ok(()),
            ("send", path) if !path.is_empty() => send(url, Path::new(path)).await,
            ("check", path) if !path.is_empty() => check(url, Path::new(path)).await,
            _ => {
                warn!("Usage: send <path> | check <path> | quit");
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("❌ {:#}", e);
        }
    }
}

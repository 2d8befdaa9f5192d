// SPDX-License-Identifier: MIT
//
// bufcycle — reference host for the buffer-cycling popup.
//
// This binary wires the two crates together and drives them from a script:
//
//   bufcycle-core   → navigation, popup content/placement, timers, config
//   bufcycle-screen → the character grid the popup is painted onto
//
// Each script line is one editor event (open, close, keypress, time
// passing...). `show` prints the screen as it stands:
//
//   ┌──────────────────────────────┐
//   │                  ╭────────╮  │
//   │                  │ > a.rs │  │  ← popup, placed per config
//   │                  │   b.rs │  │
//   │                  ╰────────╯  │
//   ├──────────────────────────────┤
//   │ a.rs (STATUS)                │  ← last row
//   └──────────────────────────────┘

mod logging;
mod script;
mod session;

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bufcycle_core::host::Size;
use bufcycle_core::{Config, ConfigOverlay};
use bufcycle_screen::output::Style;
use bufcycle_screen::terminal;
use clap::Parser;

use crate::session::{Session, SessionHost};

/// Viewport used when neither `--size` nor the terminal gives one.
const FALLBACK_SIZE: Size = Size::new(80, 24);

#[derive(Debug, Parser)]
#[command(
    name = "bufcycle",
    version,
    about = "Cycle through open documents with a transient popup",
    long_about = "Runs a script of editor events against an in-memory editor \
                  and prints the screen whenever the script says `show`.\n\n\
                  Reads the script from SCRIPT, or from stdin when omitted."
)]
struct Cli {
    /// TOML file overriding the default configuration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Viewport size. Defaults to the terminal size, else 80x24.
    #[arg(short, long, value_name = "COLSxROWS", value_parser = parse_size_arg)]
    size: Option<Size>,

    /// Style the printed screens with ANSI escapes.
    #[arg(long)]
    color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Script file; stdin when omitted.
    script: Option<PathBuf>,
}

fn parse_size_arg(text: &str) -> Result<Size, String> {
    script::parse_size(text).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bufcycle: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::with_overlay(ConfigOverlay::load(path)?),
        None => Config::default(),
    };
    tracing::debug!(?config, "configuration resolved");

    let text = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read script {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("cannot read script from stdin")?;
            text
        }
    };

    let size = cli
        .size
        .or_else(terminal::get_size)
        .unwrap_or(FALLBACK_SIZE);
    let base = env::current_dir().ok();
    let home = env::var_os("HOME").map(PathBuf::from);
    tracing::info!(cols = size.cols, rows = size.rows, ?base, "starting session");

    let style = if cli.color { Style::Ansi } else { Style::Plain };
    let mut session = Session::new(SessionHost::new(size, base, home), config, style);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    session.run_script(&text, &mut out)?;
    out.flush().context("cannot write to stdout")?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

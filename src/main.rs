//! Narrator CLI
//!
//! Usage:
//!   narrator --script session.jsonl           # Replay a recorded session
//!   narrator --interactive                    # Read script events from stdin
//!   narrator --script s.jsonl --json          # JSON lines output
//!   narrator --strings de.json                # Overlay localized strings

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use game_narrator::core::{
    parse_event, parse_script, ConsoleSink, DrainLoop, OutputMode, PipelineConfig, QueueHandle,
    Session, StringTable,
};
use game_narrator::{Result, DRAIN_INTERVAL_MS, IDLE_TICK_MS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "narrator",
    version = VERSION,
    about = "Game narrator - turn game state changes into screen reader announcements",
    long_about = "Replays game-state events through the announcement pipeline.\n\n\
                  Each input line is one JSON event: a snapshot poll, a menu or dialogue\n\
                  change, a player request (hints, target navigation) or a wait.\n\
                  Announcements are delivered one at a time at a fixed cadence.\n\n\
                  Modes:\n  \
                  --script       Replay a JSON-lines file\n  \
                  --interactive  Read events from stdin"
)]
struct Args {
    /// JSON-lines script to replay
    #[arg(short, long)]
    script: Option<String>,

    /// Read events from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Output as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Wait after each delivered announcement (milliseconds)
    #[arg(long, default_value_t = DRAIN_INTERVAL_MS)]
    interval_ms: u64,

    /// JSON file of localized strings layered over the built-in English table
    #[arg(long)]
    strings: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "game_narrator=debug,narrator=debug"
    } else {
        "game_narrator=info,narrator=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: &Args) -> Result<()> {
    let mut strings = StringTable::english();
    if let Some(path) = &args.strings {
        strings = strings.overlay_file(path)?;
    }

    let mode = if args.json {
        OutputMode::Json
    } else if args.no_color {
        OutputMode::Plain
    } else {
        OutputMode::Terminal
    };
    let config = PipelineConfig {
        drain_interval_ms: args.interval_ms,
        idle_tick_ms: IDLE_TICK_MS,
    };

    let queue = QueueHandle::new();
    let drain = DrainLoop::new(queue.clone(), ConsoleSink::stdout(mode), config).spawn();
    let mut session = Session::new(queue.clone(), Arc::new(strings));

    let replayed = match &args.script {
        Some(path) if !args.interactive => replay_file(&mut session, path).await,
        _ => replay_stdin(&mut session, args.no_color || args.json).await,
    };

    // Let everything already announced reach the sink before stopping
    let (_, stats) = drain.finish(&queue, config.drain_interval()).await?;
    info!(
        delivered = stats.delivered,
        failed = stats.failed,
        suppressed = queue.suppressed_count(),
        "session finished"
    );
    replayed
}

async fn replay_file(session: &mut Session, path: &str) -> Result<()> {
    let script = tokio::fs::read_to_string(Path::new(path)).await?;
    let events = parse_script(&script)?;
    info!(path, events = events.len(), "replaying script");

    for event in events {
        if let Some(pause) = session.apply(event) {
            sleep(pause).await;
        }
    }
    Ok(())
}

async fn replay_stdin(session: &mut Session, quiet: bool) -> Result<()> {
    if !quiet {
        print_header();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            debug!(line_no, "quit requested");
            break;
        }
        match parse_event(line_no, line) {
            Ok(Some(event)) => {
                if let Some(pause) = session.apply(event) {
                    sleep(pause).await;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "skipping malformed event"),
        }
    }
    Ok(())
}

fn print_header() {
    eprintln!("{}", format!("Narrator v{}", VERSION).bold());
    eprintln!("One JSON event per line, e.g.");
    eprintln!(
        "{}",
        r#"  {"event": "dialogue", "speaker": "Judge", "fragments": ["Order!"]}"#.dimmed()
    );
    eprintln!("Type 'quit' to exit.");
    eprintln!();
}

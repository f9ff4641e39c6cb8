//! Stabalyzer -- analyze a Diplomacy position and recommend orders.
//!
//! Reads a scraped game-state JSON document, runs the parallel search for
//! the requested coalition, and prints the ranked recommendations. Exit
//! code 0 on success, 1 on any configuration or input error.

use std::fs;
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stabalyzer::eval::{Coalition, Priority};
use stabalyzer::protocol::coalition::{parse_coalitions, parse_priority};
use stabalyzer::protocol::scrape::{game_state_from_scrape, ScrapedGame};
use stabalyzer::search::{analyze, AnalysisOptions, AnalysisReport};

#[derive(Parser)]
#[command(name = "stabalyzer", about = "Diplomacy position analyzer", version)]
struct Args {
    /// Path to a scraped game-state JSON file, or '-' for stdin.
    state: String,

    /// Coalition specification, e.g. "England+France,Turkey".
    #[arg(long)]
    coalition: String,

    /// Name of the coalition to optimize for (defaults to the first one).
    #[arg(long)]
    optimize_for: Option<String>,

    /// Priority adjustment, e.g. "deny Russia nwy". Repeatable.
    #[arg(long = "priority")]
    priorities: Vec<String>,

    /// Maximum movement-phase search depth.
    #[arg(long, default_value_t = 4)]
    depth: u32,

    /// Search time in seconds.
    #[arg(long, default_value_t = 60)]
    time: u64,

    /// Worker thread count (defaults to the CPU count).
    #[arg(long)]
    threads: Option<usize>,

    /// PRNG seed (defaults to the clock).
    #[arg(long)]
    seed: Option<u64>,

    /// Log search progress.
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "stabalyzer=debug" } else { "stabalyzer=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let payload = read_payload(&args.state)?;
    let scraped: ScrapedGame =
        serde_json::from_str(&payload).map_err(|e| format!("invalid game-state JSON: {e}"))?;
    let state = game_state_from_scrape(&scraped).map_err(|e| e.to_string())?;

    let coalitions = parse_coalitions(&args.coalition).map_err(|e| e.to_string())?;
    let coalition = select_coalition(&coalitions, args.optimize_for.as_deref())?;

    let priorities: Vec<Priority> = args
        .priorities
        .iter()
        .map(|p| parse_priority(p).map_err(|e| e.to_string()))
        .collect::<Result<_, _>>()?;

    let mut options = AnalysisOptions {
        max_depth: args.depth,
        search_time: Duration::from_secs(args.time),
        seed: args.seed.unwrap_or_else(clock_seed),
        ..AnalysisOptions::default()
    };
    if let Some(threads) = args.threads {
        options.threads = threads.max(1);
    }
    if args.verbose {
        options.progress = Some(Arc::new(|simulations| {
            info!(simulations, "search progress");
        }));
    }

    info!(
        game = %scraped.game_id,
        coalition = %coalition.name,
        threads = options.threads,
        "analyzing position"
    );
    let report = analyze(&state, &coalition, &priorities, &options);

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to render report: {e}"))?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn read_payload(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read stdin: {e}"))?;
        Ok(buf)
    } else {
        fs::read_to_string(path).map_err(|e| format!("failed to read '{path}': {e}"))
    }
}

fn select_coalition(coalitions: &[Coalition], wanted: Option<&str>) -> Result<Coalition, String> {
    match wanted {
        None => coalitions
            .first()
            .cloned()
            .ok_or_else(|| "empty coalition specification".to_string()),
        Some(name) => coalitions
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| format!("no coalition named '{name}' in the specification")),
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

fn print_report(report: &AnalysisReport) {
    println!(
        "Coalition {}: {} simulations in {} ms",
        report.coalition, report.total_simulations, report.elapsed_ms
    );
    for ranked in &report.ranked {
        println!(
            "\n#{}  EV {:.3}  score {}  confidence {:?} ({} visits, stdev {:.3})",
            ranked.rank,
            ranked.expected_value,
            ranked.raw_score,
            ranked.confidence.level,
            ranked.confidence.visits,
            ranked.confidence.stdev,
        );
        for line in &ranked.coalition_orders {
            println!("  {line}");
        }
        if !ranked.opponent_orders.is_empty() {
            println!("  predicted replies:");
            for line in &ranked.opponent_orders {
                println!("    {line}");
            }
        }
        for turn in &ranked.predicted_turns {
            println!("  -> {} {} {}", turn.year, turn.season, turn.phase);
        }
    }
}

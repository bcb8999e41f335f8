//! fx-stress CLI
//!
//! Value an FX portfolio and search for its worst overnight scenario.
//!
//! # Usage
//!
//! ```bash
//! # Today's valuation per currency
//! fx-stress value --input portfolio.json
//!
//! # Profit for one hand-picked scenario
//! fx-stress scenario --input portfolio.json --moves GBP=-3,JPY=1
//!
//! # Worst case over the full move grid, as JSON
//! fx-stress worst --input portfolio.json --format json
//!
//! # Generate a random portfolio for testing
//! fx-stress generate --currencies EUR,GBP,JPY --output portfolio.json
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) to trace the search.

use chrono::NaiveDate;
use fx_stress::core::currency::CurrencyCode;
use fx_stress::core::market::{MarketSnapshot, PortfolioInput};
use fx_stress::core::position::Position;
use fx_stress::simulation::report::ValuationReport;
use fx_stress::simulation::scenario::{MoveVector, ScenarioEngine};
use fx_stress::simulation::search::{ScenarioSearch, SearchConfig};
use fx_stress::simulation::stress_test::{generate_random_portfolio, PortfolioConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"fx-stress — FX portfolio valuation and worst-case scenario search

USAGE:
    fx-stress <COMMAND> [OPTIONS]

COMMANDS:
    value       Value the portfolio per currency at today's rates
    scenario    Overnight profit for one set of standardized moves
    worst       Search every move combination for the largest loss
    generate    Generate a random portfolio file (for testing)
    help        Show this message

OPTIONS (value, scenario, worst):
    --input <FILE>      Path to JSON portfolio file
    --format <FORMAT>   Output format: text (default) or json
    --date <YYYY-MM-DD> Valuation date if the file has none (default: today)

OPTIONS (scenario):
    --moves <LIST>      Moves in volatilities, e.g. GBP=-3,JPY=1

OPTIONS (worst):
    --moves <LIST>      Move set tried per currency (default: -3,-1,0,1,3)
    --top <N>           Number of worst scenarios to show (default: 1)

OPTIONS (generate):
    --currencies <LIST> Comma-separated currency codes (default: EUR,GBP,JPY,CHF)
    --max-quantity <N>  Largest absolute position size (default: 10000000)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    fx-stress value --input portfolio.json
    fx-stress scenario --input portfolio.json --moves GBP=-3,JPY=1
    fx-stress worst --input portfolio.json --top 5
    fx-stress worst --input portfolio.json --moves -2,0,2 --format json
    fx-stress generate --currencies EUR,GBP,JPY --output portfolio.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Options shared by the commands that read a portfolio.
struct CommonArgs {
    input_path: Option<String>,
    json: bool,
    date: Option<NaiveDate>,
    moves: Option<String>,
    top: usize,
}

fn parse_common(args: &[String]) -> CommonArgs {
    let mut parsed = CommonArgs {
        input_path: None,
        json: false,
        date: None,
        moves: None,
        top: 1,
    };
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--input" => {
                parsed.input_path =
                    Some(value.unwrap_or_else(|| fail("--input requires a file path")));
            }
            "--format" => match value.as_deref() {
                Some("json") => parsed.json = true,
                Some("text") => parsed.json = false,
                _ => fail("--format requires 'text' or 'json'"),
            },
            "--date" => {
                let raw = value.unwrap_or_else(|| fail("--date requires YYYY-MM-DD"));
                parsed.date = Some(
                    raw.parse()
                        .unwrap_or_else(|e| fail(format!("invalid date '{}': {}", raw, e))),
                );
            }
            "--moves" => {
                parsed.moves = Some(value.unwrap_or_else(|| fail("--moves requires a list")));
            }
            "--top" => {
                parsed.top = value
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--top requires a number"));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 2;
    }
    parsed
}

fn load_portfolio(args: &CommonArgs) -> (MarketSnapshot, Vec<Position>) {
    let path = args
        .input_path
        .as_deref()
        .unwrap_or_else(|| fail("--input <FILE> is required"));

    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)));

    let input: PortfolioInput = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "valuation_date": "2019-04-01",
  "records": [
    {{ "currency": "USD", "spot": 1.0, "volatility": 0.0, "rate": 0.024 }},
    {{ "currency": "GBP", "spot": 1.30, "volatility": 0.08, "rate": 0.008,
       "spot_position": 1000000, "call_position": -500000 }}
  ]
}}"#
        );
        process::exit(1);
    });

    let today = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let (market, positions) = input.into_parts(today).unwrap_or_else(|e| fail(e));
    log::info!(
        "loaded {} positions valued on {}",
        positions.len(),
        market.valuation_date
    );
    (market, positions)
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e));
    println!("{}", json);
}

fn parse_named_moves(raw: &str) -> MoveVector {
    raw.split(',')
        .map(|entry| {
            let (code, z) = entry
                .split_once('=')
                .unwrap_or_else(|| fail(format!("expected CCY=MOVE, got '{}'", entry)));
            let z: f64 = z
                .trim()
                .parse()
                .unwrap_or_else(|e| fail(format!("invalid move '{}': {}", z, e)));
            (CurrencyCode::new(code), z)
        })
        .collect()
}

fn parse_move_set(raw: &str) -> Vec<f64> {
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse()
                .unwrap_or_else(|e| fail(format!("invalid move '{}': {}", s, e)))
        })
        .collect()
}

fn cmd_value(args: &[String]) {
    let args = parse_common(args);
    let (market, positions) = load_portfolio(&args);
    let engine = ScenarioEngine::new(&positions, &market);
    let report = ValuationReport::from_engine(&engine).unwrap_or_else(|e| fail(e));

    if args.json {
        print_json(&report);
    } else {
        for position in &positions {
            println!("{}", position);
        }
        println!();
        print!("{}", report);
    }
}

fn cmd_scenario(args: &[String]) {
    let args = parse_common(args);
    let moves = parse_named_moves(
        args.moves
            .as_deref()
            .unwrap_or_else(|| fail("--moves <LIST> is required")),
    );
    let (market, positions) = load_portfolio(&args);
    let engine = ScenarioEngine::new(&positions, &market);
    let result = engine.profit(&moves).unwrap_or_else(|e| fail(e));

    if args.json {
        print_json(&result);
    } else {
        println!("=== Overnight Profit ===");
        print!("{}", result);
    }
}

fn cmd_worst(args: &[String]) {
    let args = parse_common(args);
    let config = match args.moves.as_deref() {
        Some(raw) => SearchConfig {
            move_set: parse_move_set(raw),
        },
        None => SearchConfig::default(),
    };
    let (market, positions) = load_portfolio(&args);
    let engine = ScenarioEngine::new(&positions, &market);
    let ranked = ScenarioSearch::rank(&engine, &config).unwrap_or_else(|e| fail(e));
    let shown = &ranked[..args.top.min(ranked.len())];

    if args.json {
        print_json(&shown);
    } else if shown.is_empty() {
        println!("No scenarios (empty move set).");
    } else {
        println!("=== Worst Scenarios ({} evaluated) ===", ranked.len());
        for scenario in shown {
            println!("{}", scenario);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = PortfolioConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--currencies" => {
                let list =
                    value.unwrap_or_else(|| fail("--currencies requires a comma-separated list"));
                config.currencies = list.split(',').map(CurrencyCode::new).collect();
            }
            "--max-quantity" => {
                config.max_quantity = value
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--max-quantity requires a number"));
            }
            "--date" => {
                config.valuation_date = Some(
                    value
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| fail("--date requires YYYY-MM-DD")),
                );
            }
            "--output" => {
                output_path = Some(value.unwrap_or_else(|| fail("--output requires a file path")));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 2;
    }

    let input = generate_random_portfolio(&config);
    let json = serde_json::to_string_pretty(&input).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("cannot write '{}': {}", path, e)));
        eprintln!(
            "Generated {} currency rows → {}",
            input.records.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "value" => cmd_value(rest),
        "scenario" => cmd_scenario(rest),
        "worst" => cmd_worst(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}

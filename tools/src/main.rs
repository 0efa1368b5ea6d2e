//! insight-runner: headless analytics runner over the Olist extracts.
//!
//! Usage:
//!   insight-runner --data-dir ./data --remove 50
//!   insight-runner --data-dir ./data --ipc-mode

use anyhow::Result;
use olist_core::{
    config::EconomicsConfig,
    dataset::Dataset,
    drivers::{drivers_by_strength, SatisfactionDriver},
    features::{FeatureAggregator, SellerProfile},
    scenario::{CurvePoint, OptimalCutoffs, ScenarioEngine, ScenarioTotals},
    summary::PortfolioSummary,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetSummary,
    Scenario { removed_count: usize },
    Curve,
    Drivers,
    Quit,
}

#[derive(serde::Serialize)]
struct SummaryResponse {
    total_sellers: usize,
    summary: PortfolioSummary,
    optimal: OptimalCutoffs,
}

#[derive(serde::Serialize)]
struct ScenarioResponse {
    removed_count: usize,
    totals: ScenarioTotals,
    delta_net_profit: f64,
}

#[derive(serde::Serialize)]
struct CurveResponse {
    points: Vec<CurvePoint>,
}

#[derive(serde::Serialize)]
struct DriversResponse {
    drivers: Vec<SatisfactionDriver>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let remove = parse_arg(&args, "--remove", 0usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    if !ipc_mode {
        println!("Olist seller insights - insight-runner");
        println!("  data_dir: {data_dir}");
        println!("  config:   {}", config_path.unwrap_or("(defaults)"));
        println!("  remove:   {remove}");
        println!();
    }

    let config = match config_path {
        Some(path) => EconomicsConfig::load(Path::new(path))?,
        None => EconomicsConfig::default(),
    };

    let dataset = Dataset::load(Path::new(data_dir))?;
    let profiles = FeatureAggregator::new(&dataset, &config).build();
    let engine = ScenarioEngine::new(&profiles, &config);
    log::info!("Ranked {} sellers for scenario queries", engine.total_sellers());

    if ipc_mode {
        run_ipc_loop(&engine, &profiles, &config)?;
    } else {
        print_report(&engine, &profiles, &config, remove)?;
    }

    Ok(())
}

fn run_ipc_loop(
    engine: &ScenarioEngine,
    profiles: &[SellerProfile],
    config: &EconomicsConfig,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetSummary => {
                let response = SummaryResponse {
                    total_sellers: engine.total_sellers(),
                    summary: PortfolioSummary::compute(profiles, config),
                    optimal: engine.optimal_cutoffs(),
                };
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            }
            IpcCommand::Scenario { removed_count } => match engine.totals(removed_count) {
                Ok(totals) => {
                    let baseline = engine.totals(0)?;
                    let response = ScenarioResponse {
                        removed_count,
                        delta_net_profit: totals.net_profit - baseline.net_profit,
                        totals,
                    };
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                }
                Err(e) => {
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                }
            },
            IpcCommand::Curve => {
                let response = CurveResponse {
                    points: engine.curve(),
                };
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            }
            IpcCommand::Drivers => {
                let response = DriversResponse {
                    drivers: drivers_by_strength(),
                };
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_report(
    engine: &ScenarioEngine,
    profiles: &[SellerProfile],
    config: &EconomicsConfig,
    remove: usize,
) -> Result<()> {
    let summary = PortfolioSummary::compute(profiles, config);

    println!("=== PORTFOLIO SUMMARY ===");
    println!("  sellers:              {}", summary.n_sellers);
    println!("  items sold:           {}", summary.n_items);
    println!("  commission revenue:   R$ {:.2}", summary.commission_revenue);
    println!("  subscription revenue: R$ {:.2}", summary.subscription_revenue);
    println!("  total revenue:        R$ {:.2}", summary.total_revenue);
    println!("  review cost:          R$ {:.2}", summary.review_cost);
    println!("  gross profit:         R$ {:.2}", summary.gross_profit);
    println!("  IT cost:              R$ {:.2}", summary.it_cost);
    println!("  net profit:           R$ {:.2}", summary.net_profit);

    let optimal = engine.optimal_cutoffs();
    println!();
    println!("=== RECOMMENDED CUTOFF ===");
    match optimal.best_net {
        Some(best) => println!(
            "  keep {} sellers (remove {}) for a net profit of R$ {:.2}",
            best.n_sellers, best.removed_count, best.value
        ),
        None => println!("  (empty portfolio)"),
    }
    if let Some(best) = optimal.best_gross {
        println!(
            "  ignoring IT cost: keep {} sellers (remove {}) for R$ {:.2}",
            best.n_sellers, best.removed_count, best.value
        );
    }

    if remove > 0 {
        let baseline = engine.totals(0)?;
        let state = engine.scenario(remove)?;
        let delta = state.totals.net_profit - baseline.net_profit;
        println!();
        println!("=== SCENARIO (remove {remove} worst sellers) ===");
        println!("  kept sellers: {}", state.totals.n_sellers);
        println!("  items sold:   {}", state.totals.n_items);
        println!("  revenue:      R$ {:.2}", state.totals.revenue);
        println!("  review cost:  R$ {:.2}", state.totals.review_cost);
        println!("  gross profit: R$ {:.2}", state.totals.gross_profit);
        println!("  IT cost:      R$ {:.2}", state.totals.it_cost);
        println!("  net profit:   R$ {:.2}", state.totals.net_profit);
        println!("  vs baseline:  R$ {delta:+.2}");
    }

    println!();
    println!("=== SATISFACTION DRIVERS (strongest first) ===");
    for driver in drivers_by_strength() {
        println!(
            "  {:<24} one-star {:+.4} | five-star {:+.4}",
            driver.feature, driver.one_star_effect, driver.five_star_effect
        );
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

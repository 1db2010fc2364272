//! Bet slip service entry point.

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use betslip::account::{load_account, save_account, Account};
use betslip::api::{create_router, AppState};
use betslip::config::Config;
use betslip::market::{FilterParams, MatchBoard, MatchFilter};
use betslip::metrics;
use betslip::session::Session;
use betslip::slip::BetSlip;
use betslip::utils::{format_money, shutdown_signal};

/// Accumulator bet slip service.
#[derive(Parser, Debug)]
#[command(name = "betslip")]
#[command(about = "Accumulator bet slip with a demo account and HTTP API")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Price an accumulator without placing it.
    Quote {
        /// Selection as MATCH:LABEL:ODD (repeatable).
        #[arg(long = "pick", required = true)]
        picks: Vec<String>,

        /// Stake amount.
        #[arg(long, default_value = "0")]
        stake: String,
    },

    /// List matches on the board.
    Board {
        /// Sport filter.
        #[arg(long)]
        sport: Option<String>,
        /// League filter.
        #[arg(long)]
        league: Option<String>,
        /// Status filter (live, scheduled).
        #[arg(long)]
        status: Option<String>,
        /// Odd band (low, medium, high).
        #[arg(long)]
        odd: Option<String>,
        /// Team name search.
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("betslip=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Quote { picks, stake }) => cmd_quote(&picks, &stake),
        Some(Command::Board {
            sport,
            league,
            status,
            odd,
            search,
        }) => cmd_board(FilterParams {
            sport,
            league,
            status,
            odd,
            search,
        }),
        None => cmd_serve(args.port).await,
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("BETSLIP - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Initial Balance: {}", format_money(config.initial_balance));
    println!("  Minimum Bet: {}", format_money(config.min_bet));
    println!("  Max Selections: {}", config.max_selections);
    println!("  Reset Stake On Clear: {}", config.reset_stake_on_clear);
    println!("  State File: {}", config.state_file);
    println!(
        "  Matches File: {}",
        config.matches_file.as_deref().unwrap_or("(none)")
    );
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Parse "MATCH:LABEL:ODD".
fn parse_pick(raw: &str) -> anyhow::Result<(String, String, Decimal)> {
    let (rest, odd) = raw
        .rsplit_once(':')
        .with_context(|| format!("pick '{raw}' must look like MATCH:LABEL:ODD"))?;
    let (match_id, label) = rest
        .split_once(':')
        .with_context(|| format!("pick '{raw}' must look like MATCH:LABEL:ODD"))?;
    let odd = Decimal::from_str(odd.trim()).with_context(|| format!("invalid odd in '{raw}'"))?;
    let odd = betslip::market::validate_odd(odd)?;
    let match_id = betslip::market::validate_match_id(match_id)?;
    Ok((match_id.to_string(), label.to_string(), odd))
}

/// Price an accumulator from the command line.
fn cmd_quote(picks: &[String], stake: &str) -> anyhow::Result<()> {
    let mut slip = BetSlip::new();
    for raw in picks {
        let (match_id, label, odd) = parse_pick(raw)?;
        let action = slip.select_outcome(match_id, label, odd);
        info!(pick = %raw, %action, "Pick applied");
    }
    slip.set_stake_input(stake);

    println!("----------------------------------------------------------------------");
    for s in slip.selections() {
        println!("  {:<20} {:<20} {}", s.match_id, s.label, s.odd);
    }
    println!("----------------------------------------------------------------------");
    println!("  Combined odds:    {}", slip.combined_odds());
    println!("  Stake:            {}", format_money(slip.stake()));
    println!("  Potential return: {}", format_money(slip.potential_return()));

    if let Err(e) = slip.place_bet() {
        warn!(code = e.code(), "Slip is not placeable");
        println!("  Not placeable:    {}", e);
    }

    Ok(())
}

/// Print the filtered match board.
fn cmd_board(params: FilterParams) -> anyhow::Result<()> {
    let config = Config::load()?;
    let board = match &config.matches_file {
        Some(path) => MatchBoard::load(path)?,
        None => MatchBoard::default(),
    };
    let filter = MatchFilter::try_from(params)?;

    let matches = board.filter(&filter);
    if matches.is_empty() {
        println!("No matches found. Try adjusting the filters.");
        return Ok(());
    }

    for m in matches {
        println!(
            "{:<10} {:<40} {:<20} {:<9} 1:{} X:{} 2:{}",
            m.id,
            m.title(),
            m.league,
            m.status,
            m.odds.home,
            m.odds.draw,
            m.odds.away
        );
    }
    Ok(())
}

/// Serve the HTTP API.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load()?;
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(anyhow::anyhow!(e));
    }
    info!("Configuration loaded successfully");

    let handle = metrics::install_prometheus().context("Failed to install metrics recorder")?;

    let account = match load_account(&config.state_file) {
        Ok(Some(account)) => account,
        Ok(None) => Account::new(config.initial_balance),
        Err(e) => {
            error!(error = %e, "Failed to load saved account, starting fresh");
            Account::new(config.initial_balance)
        }
    };

    let board = match &config.matches_file {
        Some(path) => MatchBoard::load(path)?,
        None => {
            warn!("MATCHES_FILE not set, board is empty");
            MatchBoard::default()
        }
    };

    info!("Balance: {}", format_money(account.balance));
    info!("Minimum bet: {}", format_money(config.min_bet));
    info!("Matches on board: {}", board.len());

    let session =
        Session::new(account, board, config.limits()).with_clear_mode(config.clear_mode());
    let state = AppState::new(session)
        .with_state_file(&config.state_file)
        .with_metrics(handle);

    let app = create_router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    state.set_ready(true);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.set_ready(false);
    let session = state.session.read().await;
    if let Err(e) = save_account(&session.account, &config.state_file) {
        error!(error = %e, "Failed to save account on shutdown");
    }
    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_pick_splits_fields() {
        let (id, label, odd) = parse_pick("match_1:Home:1.65").unwrap();
        assert_eq!(id, "match_1");
        assert_eq!(label, "Home");
        assert_eq!(odd, dec!(1.65));
    }

    #[test]
    fn parse_pick_keeps_colons_in_label() {
        let (_, label, odd) = parse_pick("m2:Over 2.5: goals:1.90").unwrap();
        assert_eq!(label, "Over 2.5: goals");
        assert_eq!(odd, dec!(1.90));
    }

    #[test]
    fn parse_pick_rejects_bad_input() {
        assert!(parse_pick("m1-Home-1.5").is_err());
        assert!(parse_pick("m1:Home:abc").is_err());
        assert!(parse_pick("m1:Home:0.5").is_err());
        assert!(parse_pick(":Home:1.5").is_err());
    }
}

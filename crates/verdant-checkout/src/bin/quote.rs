//! # Shipping Quote Tool
//!
//! Prints shipping options and the order summary for a cart as JSON.
//!
//! ## Usage
//! ```bash
//! # Quote two items to North Carolina with the reference tables
//! cargo run -p verdant-checkout --bin quote -- --region NC \
//!     --item NWS_002:1:3000 --item NWS_005:2:1899
//!
//! # Pick a method and a ship date, using a custom rate file
//! cargo run -p verdant-checkout --bin quote -- --config ./rates.toml \
//!     --region CA --item NWS_001:3:2499 --method expedited --date 2024-10-28
//!
//! # Show the effective configuration
//! cargo run -p verdant-checkout --bin quote -- --print-config
//! ```
//!
//! Logs go to stderr (`RUST_LOG=debug` shows excluded methods), JSON to
//! stdout.

use std::env;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verdant_checkout::{CheckoutService, RateConfig};
use verdant_core::{CartLine, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut region = String::from("NC");
    let mut items: Vec<CartLine> = Vec::new();
    let mut method_id: Option<String> = None;
    let mut date: Option<NaiveDate> = None;
    let mut print_config = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--region" | "-r" => {
                region = value_of(&args, i)?.to_string();
                i += 1;
            }
            "--item" | "-i" => {
                items.push(parse_item(value_of(&args, i)?)?);
                i += 1;
            }
            "--method" | "-m" => {
                method_id = Some(value_of(&args, i)?.to_string());
                i += 1;
            }
            "--date" | "-d" => {
                let raw = value_of(&args, i)?;
                date = Some(
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map_err(|e| format!("invalid --date '{raw}': {e}"))?,
                );
                i += 1;
            }
            "--print-config" => print_config = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => return Err(format!("unknown argument '{other}' (see --help)").into()),
        }
        i += 1;
    }

    let config = RateConfig::load(config_path)?;
    if print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if items.is_empty() {
        return Err("at least one --item is required (see --help)".into());
    }

    // The only clock read: the core never looks at the system date.
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    info!(region = %region, items = items.len(), %today, "Quoting cart");

    let service = CheckoutService::new(config.build_engine()?);
    let options = service.shipping_options(&items, &region, today);
    let summary = service.summarize(&items, &region, method_id.as_deref(), today)?;

    let output = json!({
        "region": region,
        "date": today,
        "totalWeightLb": service.engine().total_weight(&items),
        "zone": service.engine().resolve_zone(&region).id,
        "options": options,
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show excluded methods and env overrides
/// - Default: INFO, debug for verdant crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,verdant=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn value_of(args: &[String], flag_index: usize) -> Result<&str, String> {
    args.get(flag_index + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", args[flag_index]))
}

/// Parses `PRODUCT_ID:QUANTITY:UNIT_PRICE_CENTS`.
fn parse_item(raw: &str) -> Result<CartLine, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [product_id, quantity, cents] = parts.as_slice() else {
        return Err(format!("invalid --item '{raw}', expected ID:QTY:CENTS"));
    };

    let quantity = quantity
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity in '{raw}': {e}"))?;
    let cents = cents
        .parse::<i64>()
        .map_err(|e| format!("invalid price in '{raw}': {e}"))?;

    Ok(CartLine::new(*product_id, quantity, Money::from_cents(cents)))
}

fn print_help() {
    println!("Verdant Shipping Quote Tool");
    println!();
    println!("Usage: quote [OPTIONS] --item ID:QTY:CENTS [--item ...]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>      Rate config file (default: $VERDANT_RATES_CONFIG or platform config dir)");
    println!("  -r, --region <CODE>      Destination region code (default: NC)");
    println!("  -i, --item <ID:QTY:CENTS> Cart line, repeatable");
    println!("  -m, --method <ID>        Shipping method for the summary (default: cheapest)");
    println!("  -d, --date <YYYY-MM-DD>  Ship date (default: today)");
    println!("      --print-config       Print the effective configuration as TOML");
    println!("  -h, --help               Show this help message");
}

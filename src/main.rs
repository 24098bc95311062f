use analytics::SummaryStats;
use anyhow::Context;
use api_client::{FeedKind, ProxyClient};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use configuration::{
    ApiKeys, Config, ConfigOverrides, MAX_WINDOW_DAYS, init_tracing, load_config, validate,
};
use core_types::ChartType;
use dashboard::{
    Dashboard, DashboardView, LookupResult, LookupUpdate, ProductLookup, SystemClock,
    fetch_metal_catalog,
};
use database::{ClearConfirmation, RecordStore};
use rust_decimal::Decimal;
use simulator::{BaselineCosts, CostDeltas, MassUnit, RoiTrend, SimulationResult, simulate};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

mod canvas;

use canvas::TerminalCanvas;

/// The main entry point for the bizpulse dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provider API keys usually live in .env; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = load_config(&cli.overrides.config)
        .with_context(|| format!("Failed to load {}", cli.overrides.config.display()))?;
    cli.overrides.apply(&mut config);
    let _guard = init_tracing(&config.logging)?;

    match cli.command {
        Commands::Serve => web_server::run_server(&config, ApiKeys::from_env()).await,
        Commands::Add(args) => handle_add(&config, args).await,
        Commands::Show(args) => handle_show(config, args).await,
        Commands::Clear(args) => handle_clear(&config, args).await,
        Commands::Simulate(args) => handle_simulate(&config, args).await,
        Commands::Lookup => handle_lookup(&config).await,
        Commands::Metals => handle_metals(&config).await,
        Commands::Advice(args) => handle_advice(config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small-business dashboard: daily revenue and expenditure, summary statistics,
/// a profit/ROI simulator and live market data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the data proxy server.
    Serve,
    /// Record (or replace) one day's revenue and expenditure.
    Add(AddArgs),
    /// Show the chart and summary statistics for a trailing window.
    Show(ShowArgs),
    /// Delete ALL stored records.
    Clear(ClearArgs),
    /// Run the what-if profit and ROI simulator.
    Simulate(SimulateArgs),
    /// Look up market data for a product; reads one product name per line from stdin.
    Lookup,
    /// List live metal prices.
    Metals,
    /// Ask for advice based on the latest news and the current window.
    Advice(WindowArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Day of month (DD). Defaults to today.
    #[arg(long)]
    day: Option<String>,
    /// Month (MM). Defaults to today.
    #[arg(long)]
    month: Option<String>,
    /// Year (YYYY). Defaults to today.
    #[arg(long)]
    year: Option<String>,
    #[arg(long)]
    revenue: String,
    #[arg(long)]
    expenditure: String,
}

#[derive(Args)]
struct WindowArgs {
    /// Number of days in the window, ending today.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS))]
    days: Option<i64>,
}

#[derive(Args)]
struct ShowArgs {
    #[command(flatten)]
    window: WindowArgs,
    /// Chart type: bar, line or combined.
    #[arg(long)]
    chart: Option<ChartType>,
    /// Also write the chart configuration as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args)]
struct ClearArgs {
    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = "0")]
    income: Decimal,
    #[arg(long, default_value = "0")]
    production: Decimal,
    #[arg(long, default_value = "0")]
    raw: Decimal,
    #[arg(long, default_value = "0")]
    transport: Decimal,
    #[arg(long, default_value = "0")]
    bills: Decimal,
    #[arg(long, default_value = "0")]
    other: Decimal,
    /// Percentage change applied to raw material cost.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    raw_pct: Decimal,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    transport_pct: Decimal,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    production_pct: Decimal,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    bills_pct: Decimal,
    /// Price the raw material cost from a live metal price (e.g. "copper").
    #[arg(long)]
    metal: Option<String>,
    /// Quantity of the metal, in `--unit`.
    #[arg(long, requires = "metal")]
    quantity: Option<Decimal>,
    /// toz, lb, g or kg. Defaults to the metal's quoted unit.
    #[arg(long, requires = "metal")]
    unit: Option<MassUnit>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn open_dashboard(
    config: &Config,
    canvas: TerminalCanvas,
) -> anyhow::Result<Dashboard<TerminalCanvas>> {
    let store = RecordStore::open(
        &config.storage.database_path,
        config.storage.storage_key.clone(),
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open the record store at {}",
            config.storage.database_path.display()
        )
    })?;
    Ok(Dashboard::new(
        store,
        canvas,
        Arc::new(SystemClock),
        &config.dashboard,
    ))
}

fn proxy(config: &Config) -> anyhow::Result<ProxyClient> {
    ProxyClient::new(&config.dashboard.api_base_url).context("Failed to build the proxy client")
}

async fn handle_add(config: &Config, args: AddArgs) -> anyhow::Result<()> {
    let mut board = open_dashboard(config, TerminalCanvas::default()).await?;

    let mut form = board.blank_form().with_amounts(args.revenue, args.expenditure);
    if let Some(day) = args.day {
        form.day = day;
    }
    if let Some(month) = args.month {
        form.month = month;
    }
    if let Some(year) = args.year {
        form.year = year;
    }

    let submission = board.submit(&form).await?;
    println!("{}", submission.message);
    print_stats(&submission.view);
    Ok(())
}

async fn handle_show(mut config: Config, args: ShowArgs) -> anyhow::Result<()> {
    if let Some(days) = args.window.days {
        config.dashboard.default_window_days = days;
    }
    if let Some(chart) = args.chart {
        config.dashboard.chart_type = chart;
    }
    validate(&config)?;

    let mut board = open_dashboard(&config, TerminalCanvas::new(true, args.json)).await?;
    let view = board.refresh().await;
    print_stats(&view);
    Ok(())
}

async fn handle_clear(config: &Config, args: ClearArgs) -> anyhow::Result<()> {
    let confirmation = if args.yes {
        ClearConfirmation::Confirmed
    } else {
        confirm("Are you sure you want to delete ALL data? This cannot be undone.")?
    };

    let mut board = open_dashboard(config, TerminalCanvas::default()).await?;
    let view = board.clear_all(confirmation).await?;
    match confirmation {
        ClearConfirmation::Confirmed => println!("All data deleted."),
        ClearConfirmation::Declined => println!("Nothing was deleted."),
    }
    print_stats(&view);
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<ClearConfirmation> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => ClearConfirmation::Confirmed,
        _ => ClearConfirmation::Declined,
    })
}

async fn handle_simulate(config: &Config, args: SimulateArgs) -> anyhow::Result<()> {
    let mut baseline = BaselineCosts {
        production: args.production,
        raw: args.raw,
        transport: args.transport,
        bills: args.bills,
        other: args.other,
    };

    if let Some(metal) = &args.metal {
        let feed = proxy(config)?;
        let catalog = fetch_metal_catalog(&feed).await?;
        let quote = catalog.find(metal)?;
        let unit = args.unit.unwrap_or(quote.base_unit);
        let quantity = args.quantity.unwrap_or_default();
        match quote.cost_for(quantity, unit)? {
            Some(cost) => {
                println!("Raw material cost set from {} ({quantity} {unit}): ₹{cost}", quote.name);
                baseline.raw = cost;
            }
            None => println!("Quantity is zero; raw material cost left unchanged."),
        }
    }

    let deltas = CostDeltas {
        raw: args.raw_pct,
        transport: args.transport_pct,
        production: args.production_pct,
        bills: args.bills_pct,
    };
    let result = simulate(&baseline, args.income, &deltas)?;
    print_simulation(&baseline, &result);
    Ok(())
}

async fn handle_lookup(config: &Config) -> anyhow::Result<()> {
    let feed = Arc::new(proxy(config)?);
    let (mut lookup, mut updates) = ProductLookup::from_config(feed, &config.dashboard);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_input: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => {
                    lookup.input(&text);
                    last_input = Some(text.trim().to_string());
                }
                None => break,
            },
            Some(update) = updates.recv() => print_lookup(&update),
        }
    }

    // Input closed: wait for the answer to the final product, if one is coming.
    let Some(last) = last_input.filter(|text| text.chars().count() >= config.dashboard.min_lookup_chars)
    else {
        return Ok(());
    };
    let patience = Duration::from_millis(config.dashboard.lookup_debounce_ms) + Duration::from_secs(30);
    while let Ok(Some(update)) = tokio::time::timeout(patience, updates.recv()).await {
        print_lookup(&update);
        if update.product == last {
            break;
        }
    }
    Ok(())
}

async fn handle_metals(config: &Config) -> anyhow::Result<()> {
    let catalog = fetch_metal_catalog(&proxy(config)?).await?;
    if catalog.is_empty() {
        println!("No metal prices available.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metal", "Key", "Price", "Per", "Units"]);
    for quote in catalog.quotes() {
        table.add_row(vec![
            Cell::new(&quote.name),
            Cell::new(&quote.key),
            Cell::new(format!("₹{:.2}", quote.price)).set_alignment(CellAlignment::Right),
            Cell::new(quote.base_unit.describe()),
            Cell::new(
                quote
                    .offered_units()
                    .iter()
                    .map(|unit| unit.symbol())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}

async fn handle_advice(mut config: Config, args: WindowArgs) -> anyhow::Result<()> {
    if let Some(days) = args.days {
        config.dashboard.default_window_days = days;
    }
    validate(&config)?;
    let board = open_dashboard(&config, TerminalCanvas::default()).await?;
    println!("Asking for advice...");
    let advice = board.request_advice(&proxy(&config)?).await?;
    println!("{advice}");
    Ok(())
}

// ==============================================================================
// Output
// ==============================================================================

fn money(value: Decimal) -> String {
    format!("₹{value:.2}")
}

fn print_stats(view: &DashboardView) {
    let stats: &SummaryStats = &view.stats;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![format!("Last {} days (to {})", view.window_days, view.today), String::new()]);

    let net_label = if stats.is_profitable() { "Net Profit" } else { "Net Loss" };
    for (label, value) in [
        ("Total Revenue", money(stats.total_revenue)),
        ("Total Expenditure", money(stats.total_expenditure)),
        (net_label, money(stats.net_profit)),
        ("Avg Daily Revenue", money(stats.avg_revenue)),
        ("Avg Daily Expenditure", money(stats.avg_expenditure)),
        ("Entries", stats.entry_count.to_string()),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

fn print_simulation(baseline: &BaselineCosts, result: &SimulationResult) {
    let simulated = &result.simulated_costs;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["", "Baseline", "Simulated"]);

    for (label, before, after) in [
        ("Production", baseline.production, simulated.production),
        ("Raw Materials", baseline.raw, simulated.raw),
        ("Transport", baseline.transport, simulated.transport),
        ("Bills", baseline.bills, simulated.bills),
        ("Other", baseline.other, simulated.other),
        ("Total Cost", result.baseline_total, result.simulated_total),
        ("Profit", result.baseline_profit, result.simulated_profit),
    ] {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(money(before)).set_alignment(CellAlignment::Right),
            Cell::new(money(after)).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("ROI"),
        Cell::new(format!("{:.2}%", result.baseline_roi)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2}%", result.simulated_roi)).set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");

    let change = result.roi_delta.abs();
    match result.trend {
        RoiTrend::Improvement => println!("ROI improves by {change:.2} points."),
        RoiTrend::Regression => println!("ROI falls by {change:.2} points."),
        RoiTrend::Neutral => println!("No significant change in ROI."),
    }
}

fn print_lookup(update: &LookupUpdate) {
    match &update.result {
        LookupResult::Hidden => {}
        LookupResult::Failed(message) => println!("[{}] Error: {message}", update.product),
        LookupResult::Data(data) => match data.kind {
            FeedKind::Finnhub => {
                let symbol = data.symbol.as_deref().unwrap_or("?");
                match data.quote.as_ref().and_then(|q| q.current.map(|c| (c, q))) {
                    Some((price, quote)) => println!(
                        "[{}] {symbol}: {price:.2} ({:+.2}, {:+.2}%)",
                        update.product,
                        quote.change.unwrap_or_default(),
                        quote.percent_change.unwrap_or_default()
                    ),
                    None => println!("[{}] {symbol}: no quote available.", update.product),
                }
                for item in data.news.iter().flatten().take(3) {
                    println!("    - {}", item.headline.as_deref().unwrap_or("(untitled)"));
                }
            }
            FeedKind::Mandi => {
                let record = data.commodity.as_ref().and_then(|c| c.records.first());
                match record {
                    Some(r) => println!(
                        "[{}] {}: modal price ₹{} at {} ({})",
                        update.product,
                        r.commodity.as_deref().unwrap_or("?"),
                        r.modal_price.as_deref().unwrap_or("?"),
                        r.market.as_deref().unwrap_or("unknown market"),
                        r.arrival_date.as_deref().unwrap_or("date unknown"),
                    ),
                    None => println!("[{}] No recent mandi prices.", update.product),
                }
            }
            FeedKind::None => println!("[{}] No market data for this product.", update.product),
        },
    }
}

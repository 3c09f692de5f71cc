use std::{fs::File, io::BufWriter, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use kitchen_inventory::{
    client::{HttpInventoryClient, InventoryApi},
    config::{self, AppConfig},
    dto::{ConsumptionForm, NewItemForm},
    events::{process_events, Event, EventSender},
    models::{
        ConsumptionReceipt, DaysRemaining, EnrichedItem, RestockAlert, RestockCalendarEntry,
        StockStatus, DEFAULT_UNIT, UNIT_OPTIONS,
    },
    queries::{DashboardStats, InventoryQuery, SortDirection, SortField},
    reports::{export_file_name, write_csv, AnalyticsReport},
    services::{InventoryService, InventorySnapshot, LoadPhase},
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Items(command) => handle_items_command(&context, command, cli.json).await?,
        Commands::Consume(args) => handle_consume_command(&context, args, cli.json).await?,
        Commands::Alerts => handle_alerts_command(&context, cli.json).await?,
        Commands::Calendar => handle_calendar_command(&context, cli.json).await?,
        Commands::Stats => handle_stats_command(&context, cli.json).await?,
        Commands::Report => handle_report_command(&context, cli.json).await?,
        Commands::Export(args) => handle_export_command(&context, args).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "kitchen-inventory",
    about = "Track kitchen stock, usage and restock forecasts",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Items(ItemsCommands),
    /// Log usage of an item
    Consume(ConsumeArgs),
    /// Show restock alerts computed by the store
    Alerts,
    /// Show the store's restock calendar
    Calendar,
    /// Show dashboard headline counts
    Stats,
    /// Show the analytics summary
    Report,
    /// Write the inventory as a CSV report
    Export(ExportArgs),
}

#[derive(Subcommand)]
enum ItemsCommands {
    List(ListItemsArgs),
    Add(AddItemArgs),
}

#[derive(Args)]
struct ListItemsArgs {
    #[arg(long, help = "Case-insensitive substring to match against item names")]
    search: Option<String>,
    #[arg(long, value_enum, help = "Only show items with this stock status")]
    status: Option<StockStatusArg>,
    #[arg(long, value_enum, default_value_t = SortFieldArg::Name, help = "Column to sort by")]
    sort: SortFieldArg,
    #[arg(long, action = ArgAction::SetTrue, help = "Sort in descending order")]
    desc: bool,
}

#[derive(Args)]
struct AddItemArgs {
    #[arg(long, help = "Display name for the item")]
    name: String,
    #[arg(long, help = "Units currently on hand")]
    quantity: String,
    #[arg(long, help = "Stock level at or below which the item counts as low")]
    threshold: String,
    #[arg(long, help = "Average units used per day")]
    daily_consumption: String,
    #[arg(long, help = "Unit of measure (defaults to pieces)")]
    unit: Option<String>,
}

#[derive(Args)]
struct ConsumeArgs {
    #[arg(long, help = "Name of the item that was used")]
    item: String,
    #[arg(long, help = "Units used")]
    quantity: String,
    #[arg(long, help = "Usage date as YYYY-MM-DD or RFC 3339 (defaults to today)")]
    date: Option<String>,
    #[arg(long, help = "Optional free-form notes")]
    notes: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(long, help = "Destination file (defaults to inventory-report-<date>.csv)")]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StockStatusArg {
    InStock,
    LowStock,
    OutOfStock,
}

impl From<StockStatusArg> for StockStatus {
    fn from(value: StockStatusArg) -> Self {
        match value {
            StockStatusArg::InStock => StockStatus::InStock,
            StockStatusArg::LowStock => StockStatus::LowStock,
            StockStatusArg::OutOfStock => StockStatus::OutOfStock,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortFieldArg {
    Name,
    Quantity,
    Days,
    Status,
}

impl From<SortFieldArg> for SortField {
    fn from(value: SortFieldArg) -> Self {
        match value {
            SortFieldArg::Name => SortField::Name,
            SortFieldArg::Quantity => SortField::Quantity,
            SortFieldArg::Days => SortField::DaysRemaining,
            SortFieldArg::Status => SortField::Status,
        }
    }
}

struct CliContext {
    config: AppConfig,
    client: Arc<HttpInventoryClient>,
    inventory: InventoryService,
    /// Detail of the startup refresh failure, if any.
    refresh_failure: Option<String>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let client = Arc::new(
            HttpInventoryClient::from_config(&config)
                .context("failed to build inventory store client")?,
        );

        let (event_tx, event_rx) = mpsc::channel::<Event>(32);
        let event_sender = Arc::new(EventSender::new(event_tx));
        tokio::spawn(process_events(event_rx));

        let inventory = InventoryService::new(client.clone(), Some(event_sender));
        let refresh_failure = match inventory.refresh().await {
            Ok(()) => None,
            Err(e) => {
                warn!(target: "kitchen_inventory_cli", error = %e, "initial refresh failed");
                Some(e.to_string())
            }
        };

        Ok(Self {
            config,
            client,
            inventory,
            refresh_failure,
        })
    }

    /// The cached view, or the refresh error when there is nothing trustworthy to show.
    async fn synced_snapshot(&self) -> Result<InventorySnapshot> {
        require_synced(
            self.inventory.snapshot().await,
            self.refresh_failure.as_deref(),
        )
    }
}

fn require_synced(
    snapshot: InventorySnapshot,
    refresh_failure: Option<&str>,
) -> Result<InventorySnapshot> {
    if snapshot.phase != LoadPhase::Error {
        return Ok(snapshot);
    }
    let detail = refresh_failure
        .or(snapshot.error.as_deref())
        .unwrap_or("inventory refresh failed")
        .to_string();
    Err(anyhow::Error::msg(detail).context("inventory store unavailable"))
}

async fn handle_items_command(context: &CliContext, command: ItemsCommands, json: bool) -> Result<()> {
    match command {
        ItemsCommands::List(args) => handle_items_list(context, args, json).await,
        ItemsCommands::Add(args) => handle_items_add(context, args, json).await,
    }
}

async fn handle_items_list(context: &CliContext, args: ListItemsArgs, json: bool) -> Result<()> {
    let snapshot = context.synced_snapshot().await?;
    let query = InventoryQuery {
        search: args.search,
        status: args.status.map(Into::into),
        sort_field: args.sort.into(),
        sort_direction: if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    };
    let items = query.apply(&snapshot.items);

    if json {
        print_json(&items)?;
    } else {
        render_sync_error(&snapshot);
        println!("Items {} shown (of {})", items.len(), snapshot.items.len());
        for item in &items {
            render_item(item);
        }
    }
    Ok(())
}

async fn handle_items_add(context: &CliContext, args: AddItemArgs, json: bool) -> Result<()> {
    let mut form = NewItemForm {
        name: args.name,
        quantity: args.quantity,
        restock_threshold: args.threshold,
        daily_consumption: args.daily_consumption,
        ..Default::default()
    };
    if let Some(unit) = args.unit {
        if !UNIT_OPTIONS.contains(&unit.trim()) {
            warn!(target: "kitchen_inventory_cli", unit = %unit, "unit is not one of the suggested options");
        }
        form.unit_of_measure = unit;
    }

    let draft = form.parse().context("invalid item")?;
    let created = context
        .inventory
        .add_item(draft)
        .await
        .context("failed to add item")?;

    if json {
        print_json(&created)?;
    } else {
        println!("Added item");
        render_item(&created);
    }
    Ok(())
}

async fn handle_consume_command(context: &CliContext, args: ConsumeArgs, json: bool) -> Result<()> {
    let mut form = ConsumptionForm::for_today();
    form.item_name = args.item;
    form.quantity_used = args.quantity;
    if let Some(date) = args.date {
        form.date = date;
    }
    form.notes = args.notes.unwrap_or_default();

    let items = context.inventory.items().await;
    let draft = form.parse(&items).context("invalid consumption entry")?;
    let receipt = context
        .inventory
        .log_consumption(draft)
        .await
        .context("failed to log consumption")?;

    if json {
        print_json(&receipt)?;
    } else {
        render_receipt(&receipt);
        let snapshot = context.inventory.snapshot().await;
        render_sync_error(&snapshot);
        if let Some(item) = snapshot.find_item(&receipt.item_name) {
            render_item(item);
        }
    }
    Ok(())
}

async fn handle_alerts_command(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.synced_snapshot().await?;
    if json {
        print_json(&snapshot.restock_alerts)?;
    } else {
        render_sync_error(&snapshot);
        println!("Restock alerts {}", snapshot.restock_alerts.len());
        for alert in &snapshot.restock_alerts {
            render_alert(alert);
        }
    }
    Ok(())
}

async fn handle_calendar_command(context: &CliContext, json: bool) -> Result<()> {
    let entries = context
        .client
        .restock_calendar()
        .await
        .context("failed to fetch restock calendar")?;
    if json {
        print_json(&entries)?;
    } else {
        println!("Restock calendar {} entr(ies)", entries.len());
        for entry in &entries {
            render_calendar_entry(entry);
        }
    }
    Ok(())
}

async fn handle_stats_command(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.synced_snapshot().await?;
    let stats = DashboardStats::from_items(&snapshot.items, context.config.critical_days);
    if json {
        print_json(&stats)?;
    } else {
        render_sync_error(&snapshot);
        println!(
            "Total {} • low stock {} • out of stock {} • critical (<= {} days) {}",
            stats.total,
            stats.low_stock,
            stats.out_of_stock,
            context.config.critical_days,
            stats.critical
        );
    }
    Ok(())
}

async fn handle_report_command(context: &CliContext, json: bool) -> Result<()> {
    let snapshot = context.synced_snapshot().await?;
    let report = AnalyticsReport::build(
        &snapshot.items,
        Utc::now().date_naive(),
        context.config.forecast_horizon_days,
    );
    if json {
        print_json(&report)?;
    } else {
        render_sync_error(&snapshot);
        render_report(&report);
    }
    Ok(())
}

async fn handle_export_command(context: &CliContext, args: ExportArgs) -> Result<()> {
    let snapshot = context.synced_snapshot().await?;
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now().date_naive())));
    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(&snapshot.items, BufWriter::new(file)).context("failed to write CSV report")?;
    println!("Exported {} item(s) to {}", snapshot.items.len(), path.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_sync_error(snapshot: &InventorySnapshot) {
    if let Some(error) = &snapshot.error {
        eprintln!("warning: {} (showing last known data)", error);
    }
}

fn render_item(item: &EnrichedItem) {
    let unit = item.item.unit_of_measure.as_deref().unwrap_or(DEFAULT_UNIT);
    println!(
        "- {} • {} {} • threshold {} • {}/day • {} • {}",
        item.name(),
        item.quantity(),
        unit,
        item.item.restock_threshold,
        item.item.daily_consumption,
        days_left(item.days_remaining),
        item.status.label()
    );
}

fn days_left(days: DaysRemaining) -> String {
    if days.is_unbounded() {
        "not being consumed".to_string()
    } else {
        format!("{days} day(s) left")
    }
}

fn render_receipt(receipt: &ConsumptionReceipt) {
    println!(
        "Logged {} x {}{}",
        receipt.quantity_used,
        receipt.item_name,
        receipt
            .message
            .as_deref()
            .map(|m| format!(" ({m})"))
            .unwrap_or_default()
    );
}

fn render_alert(alert: &RestockAlert) {
    println!(
        "- {} • {} on hand • {} • order {}",
        alert.item_name,
        alert.current_quantity,
        days_left(alert.days_until_depletion),
        alert.recommended_order_quantity
    );
}

fn render_calendar_entry(entry: &RestockCalendarEntry) {
    println!(
        "- {} • {} • order {}",
        entry.restock_date, entry.item_name, entry.recommended_quantity
    );
}

fn render_report(report: &AnalyticsReport) {
    println!("Analytics for {}", report.generated_on);
    println!(
        "Units on hand {} • daily consumption {:.2}",
        report.total_units, report.total_daily_consumption
    );
    for entry in &report.status_distribution {
        println!("  {} {}", entry.status.label(), entry.count);
    }

    println!("Top consumers");
    for consumer in &report.top_consumers {
        println!("  • {} {}/day", consumer.item_name, consumer.daily_consumption);
    }

    println!("Critical items");
    for item in &report.critical_items {
        println!(
            "  • {} • {} • {} • order {}",
            item.item_name,
            item.status.label(),
            days_left(item.days_remaining),
            item.recommended_order_quantity
        );
    }

    println!("Depletion outlook");
    for day in &report.depletion_outlook {
        println!("  {} (+{}) {}", day.date, day.days_ahead, day.items_depleting);
    }
}

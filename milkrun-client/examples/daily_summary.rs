//! Daily summary against a running backend
//!
//! Loads `.env`, pulls deliveries and the directory, then prints the admin
//! dashboard, today's report and the delivery boy roster.
//!
//! Run: MILKRUN_API_TOKEN=... cargo run --example daily_summary

use milkrun_client::logger::init_logger;
use milkrun_client::{ClientConfig, DeliveryBoard, Directory};
use shared::util::today;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger(Some("info"), std::env::var("MILKRUN_LOG_DIR").ok().as_deref());

    let config = ClientConfig::from_env();
    println!("\n🥛 Milkrun daily summary ({})", config.base_url);
    println!("=====================================\n");

    let backend = Arc::new(config.build_http_client()?);
    let board = DeliveryBoard::new(backend.clone());
    let directory = Directory::new(backend);

    board.reload().await?;
    if let Err(e) = directory.refresh().await {
        // roster and per-boy lines stay empty without a directory
        eprintln!("⚠️  {e}");
    }

    let dashboard = board.admin_dashboard();
    println!("Total deliveries: {}", dashboard.total_deliveries);
    println!("Total quantity:   {:.1} L", dashboard.total_quantity);
    for slice in &dashboard.distribution {
        println!("  {:<10} {:>4}  ({}%)", slice.status, slice.count, slice.percent());
    }

    let date = today();
    let report = board.daily_report(date, &directory);
    println!(
        "\n📅 {date}: {} delivered / {} total",
        report.overall_statistics.delivered_count, report.overall_statistics.total_deliveries
    );
    for line in &report.delivery_boys {
        println!(
            "  {:<20} {}/{}",
            line.delivery_boy.name,
            line.statistics.delivered_count,
            line.statistics.total_deliveries
        );
    }

    let records = board.records();
    println!("\n🚚 Roster");
    for entry in directory.roster(&records) {
        println!(
            "  {:<20} {:>7}  {:>3}%",
            entry.delivery_boy.name,
            entry.completed_label(),
            entry.display_percent()
        );
    }

    println!("\n🕑 Recent");
    for record in board.recent(5) {
        println!(
            "  {}  {:<20} {:<10} {:.1} L",
            record.delivery_date,
            record.customer_name().unwrap_or("-"),
            record.status,
            record.quantity
        );
    }

    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;

use washboard::{
    api::HttpGateway,
    board::{SlotBoard, SlotStatus},
    catalog::TimeSlotCatalog,
    config::AppConfig,
    logger::init_tracing,
    principal::Principal,
};

/// Day to render: first CLI argument as YYYY-MM-DD, today otherwise.
fn requested_day() -> anyhow::Result<NaiveDate> {
    match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid date argument {arg:?}, expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn build_board(cfg: &AppConfig, day: NaiveDate) -> anyhow::Result<SlotBoard> {
    let gateway = HttpGateway::new(
        cfg.api_base_url.clone(),
        Duration::from_secs(cfg.http_timeout_secs),
    )?;

    let catalog = TimeSlotCatalog::hourly(cfg.day_start_hour, cfg.day_end_hour);

    // The viewer only reads, so it runs as the oversight role.
    Ok(SlotBoard::new(
        Arc::new(gateway),
        catalog,
        Principal::Warden,
        day,
    ))
}

fn render_machine(board: &SlotBoard, machine: u32) {
    println!("Machine {machine}");

    for cell in board.grid() {
        match &cell.status {
            SlotStatus::Available => {
                println!("  {:>9}  free", cell.slot.display());
            }
            SlotStatus::Booked { resident, name } => {
                let who = name.clone().unwrap_or_else(|| format!("#{resident}"));
                println!("  {:>9}  {who}", cell.slot.display());
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production);

    let cfg = AppConfig::from_env();
    let day = requested_day()?;

    tracing::info!(%day, api = %cfg.api_base_url, "loading laundry grid");

    let board = build_board(&cfg, day)?;
    board
        .select_date(day)
        .await
        .context("failed to load bookings for the day")?;

    println!("Laundry bookings for {day}");
    for machine in 1..=cfg.machine_count {
        board.select_machine(machine);
        render_machine(&board, machine);
    }

    Ok(())
}

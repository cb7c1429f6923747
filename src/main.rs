// Timelapse
// Main entry point: loads the tracked events, prints their cards and keeps
// them current across midnight until interrupted

use chrono::Local;
use timelapse::models::display::TimeDisplayStyle;
use timelapse::services::appearance;
use timelapse::services::config::AppConfig;
use timelapse::services::event_store::EventStore;
use timelapse::services::presentation::{CardView, TrackerController};
use timelapse::services::refresh::MidnightRefresh;
use timelapse::services::storage::{KeyValueStore, MemoryStore, SqliteStore};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.filter.as_str()),
    )
    .init();

    log::info!("Starting Timelapse {}", env!("CARGO_PKG_VERSION"));

    match open_sqlite_store(&config) {
        Ok(backend) => run(backend, &config).await,
        Err(e) => {
            log::error!("{e:#}; events will not be saved this session");
            run(MemoryStore::new(), &config).await
        }
    }
}

fn open_sqlite_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let path = config.ensure_database_dir()?;
    log::info!("Using database {}", path.display());
    SqliteStore::open(&path.to_string_lossy())
}

async fn run<S: KeyValueStore>(backend: S, config: &AppConfig) -> anyhow::Result<()> {
    let system_is_dark = if config.appearance.follow_system_appearance {
        appearance::detect_system_dark()
    } else {
        None
    };
    log::debug!("System appearance: dark={system_is_dark:?}");

    let store = EventStore::new(backend);
    let mut controller = TrackerController::new(store, config.global_settings(system_is_dark));
    print_cards(&controller.cards());

    let (refresh, mut day_changes) = MidnightRefresh::spawn();
    let mut appearance_poll = tokio::time::interval(appearance::POLL_INTERVAL);
    appearance_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = appearance_poll.tick(), if config.appearance.follow_system_appearance => {
                if let Some(is_dark) = appearance::detect_system_dark() {
                    if controller.sync_system_appearance(is_dark) {
                        print_cards(&controller.cards());
                    }
                }
            }
            Some(now) = day_changes.recv() => {
                if controller.refresh_today(now) {
                    log::info!("Day changed to {}", now.date_naive());
                    print_cards(&controller.cards());
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                log::info!("Shutting down");
                break;
            }
        }
    }

    refresh.shutdown();
    Ok(())
}

fn print_cards(cards: &[CardView]) {
    println!("Timelapse, {}", Local::now().format("%A %-d %B %Y"));
    for card in cards {
        println!("{}", describe_card(card));
    }
}

fn describe_card(card: &CardView) -> String {
    let show_percentage = card.settings.show_percentage();
    let value = card.metrics.counter_text(true, show_percentage);
    let label = card.metrics.counter_label(true, show_percentage);

    match card.settings.style() {
        TimeDisplayStyle::BoldText => format!(
            "  {:<24} {} days in, {} days left",
            card.title,
            card.metrics.days_spent(),
            card.metrics.days_left()
        ),
        TimeDisplayStyle::ProgressBar => format!(
            "  {:<24} [{}] {} {}",
            card.title,
            progress_bar(card.metrics.bar_fraction(), 20),
            value,
            label
        ),
        TimeDisplayStyle::Grid | TimeDisplayStyle::Circle => format!(
            "  {:<24} {} {} ({} done)",
            card.title,
            value,
            label,
            card.metrics.percentage_text(false)
        ),
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

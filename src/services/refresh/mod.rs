//! Wakes the app at local midnight so day counts roll over while it runs.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::utils::date::start_of_day_or_after;

/// First instant of the local day after `now`.
///
/// Falls back to 24 hours later when that day has no valid local start.
pub fn next_local_midnight(now: DateTime<Local>) -> DateTime<Local> {
    now.date_naive()
        .succ_opt()
        .and_then(start_of_day_or_after)
        .unwrap_or_else(|| now + chrono::Duration::days(1))
}

pub fn duration_until_next_midnight(now: DateTime<Local>) -> Duration {
    (next_local_midnight(now) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Background task sending the wall-clock time on every wake-up.
///
/// The task stops when [`MidnightRefresh::shutdown`] is called, when the
/// handle is dropped, or when the receiver goes away.
pub struct MidnightRefresh {
    handle: JoinHandle<()>,
}

impl MidnightRefresh {
    /// Schedules a wake-up at every local midnight. Must be called inside a
    /// tokio runtime.
    pub fn spawn() -> (Self, mpsc::UnboundedReceiver<DateTime<Local>>) {
        Self::spawn_with_schedule(duration_until_next_midnight)
    }

    /// Like [`MidnightRefresh::spawn`], with `next_delay` deciding how long to
    /// sleep after each wake-up.
    pub fn spawn_with_schedule<F>(next_delay: F) -> (Self, mpsc::UnboundedReceiver<DateTime<Local>>)
    where
        F: Fn(DateTime<Local>) -> Duration + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            loop {
                let delay = next_delay(Local::now());
                log::debug!("Next day refresh in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;

                if tx.send(Local::now()).is_err() {
                    log::debug!("Day refresh receiver dropped, stopping");
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for MidnightRefresh {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).earliest().unwrap()
    }

    #[test]
    fn test_next_midnight_is_start_of_tomorrow() {
        let midnight = next_local_midnight(local(2024, 3, 14, 15, 30));
        assert_eq!(midnight.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.minute(), 0);
    }

    #[test]
    fn test_next_midnight_crosses_year() {
        let midnight = next_local_midnight(local(2024, 12, 31, 23, 59));
        assert_eq!(midnight.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_duration_until_midnight() {
        let delay = duration_until_next_midnight(local(2024, 6, 10, 23, 0));
        assert_eq!(delay, Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn test_sends_on_each_wake_up() {
        let (refresh, mut rx) = MidnightRefresh::spawn_with_schedule(|_| Duration::from_millis(5));
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        refresh.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_closes_channel() {
        let (refresh, mut rx) = MidnightRefresh::spawn_with_schedule(|_| Duration::from_secs(3600));
        refresh.shutdown();
        assert!(rx.recv().await.is_none());
    }
}

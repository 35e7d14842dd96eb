//! Current-time board refresh.
//!
//! While "use current time" mode is active, the board re-evaluates once
//! a second against the wall clock. The ticker owns a background task
//! publishing into a watch channel; dropping the handle cancels it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::domain::RefTime;
use crate::line::LineConfig;
use crate::timetable::Timetable;

use super::config::LookupConfig;
use super::engine::{Departure, next_departures};

/// Refresh cadence while current-time mode is active.
const TICK: Duration = Duration::from_secs(1);

/// A cancellable periodic departure re-evaluation.
///
/// Spawns a task that re-reads the clock every second, re-runs the
/// lookup, and publishes the result whenever it changes. The task is
/// aborted when the handle is dropped, so turning current-time mode off
/// is simply dropping the watch.
pub struct DepartureWatch {
    rx: watch::Receiver<Vec<Departure>>,
    task: JoinHandle<()>,
}

impl DepartureWatch {
    /// Spawn a watch driven by the local wall clock.
    pub fn spawn(
        table: Arc<Timetable>,
        line: Arc<LineConfig>,
        station: String,
        config: LookupConfig,
    ) -> Self {
        Self::spawn_with_clock(table, line, station, config, || {
            RefTime::from_clock(Local::now().time())
        })
    }

    /// Spawn a watch with an injected clock, for deterministic tests.
    pub fn spawn_with_clock(
        table: Arc<Timetable>,
        line: Arc<LineConfig>,
        station: String,
        config: LookupConfig,
        clock: impl Fn() -> RefTime + Send + 'static,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            loop {
                interval.tick().await;

                let at = clock();
                let departures = match next_departures(&table, &line, &station, at, &config) {
                    Ok(departures) => departures,
                    Err(e) => {
                        warn!(%station, %e, "lookup failed; publishing an empty board");
                        Vec::new()
                    }
                };

                tx.send_if_modified(|current| {
                    if *current != departures {
                        *current = departures;
                        true
                    } else {
                        false
                    }
                });
            }
        });

        Self { rx, task }
    }

    /// A receiver for the published departure lists.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Departure>> {
        self.rx.clone()
    }

    /// Stop the ticker.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for DepartureWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::yokohama_line;

    fn scenario(line: &LineConfig) -> Timetable {
        let text = [
            "sequence,tier,destination,A,Higashi-Kanagawa,platform,through_arrival",
            "0001,Local,Higashi-Kanagawa,0800,0830,2,-",
            "0002,Local,Higashi-Kanagawa,0810,0840,2,-",
        ]
        .join("\n");
        Timetable::parse(&text, line).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_on_first_tick() {
        let line = Arc::new(yokohama_line());
        let table = Arc::new(scenario(&line));

        let watch = DepartureWatch::spawn_with_clock(
            table,
            line,
            "A".to_string(),
            LookupConfig::default(),
            || RefTime::new(7, 59).unwrap(),
        );

        let mut rx = watch.subscribe();
        rx.changed().await.unwrap();
        let departures = rx.borrow_and_update().clone();

        assert_eq!(departures.len(), 2);
        assert_eq!(departures[0].departure.to_string(), "08:00");
    }

    #[tokio::test(start_paused = true)]
    async fn republishes_when_the_clock_moves_the_board() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let line = Arc::new(yokohama_line());
        let table = Arc::new(scenario(&line));

        let minutes = Arc::new(AtomicU32::new(7 * 60 + 59));
        let minutes_for_clock = minutes.clone();
        let watch = DepartureWatch::spawn_with_clock(
            table,
            line,
            "A".to_string(),
            LookupConfig::default(),
            move || {
                let m = minutes_for_clock.load(Ordering::SeqCst);
                RefTime::new(m / 60, m % 60).unwrap()
            },
        );

        let mut rx = watch.subscribe();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);

        // 08:05 passes the first train; the next tick shrinks the board
        minutes.store(8 * 60 + 5, Ordering::SeqCst);
        rx.changed().await.unwrap();
        let departures = rx.borrow_and_update().clone();
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].departure.to_string(), "08:10");
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_the_task() {
        let line = Arc::new(yokohama_line());
        let table = Arc::new(scenario(&line));

        let watch = DepartureWatch::spawn_with_clock(
            table,
            line,
            "A".to_string(),
            LookupConfig::default(),
            || RefTime::new(7, 0).unwrap(),
        );

        let mut rx = watch.subscribe();
        rx.changed().await.unwrap();

        drop(watch);

        // The sender side is gone, so the channel reports closure
        assert!(rx.changed().await.is_err());
    }
}

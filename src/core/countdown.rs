//! Live challenge countdown.
//!
//! [`CountdownTicker`] re-renders the countdown once per period on a tokio
//! task and publishes it on a watch channel. Dropping the ticker aborts the
//! task, so a view that goes away never leaves a timer behind. The task also
//! stops by itself after publishing the "ended" label.
//!
//! The JSON pages render a single snapshot through [`Countdown::render`] and
//! never start a ticker. This type is for embedders that keep a view open,
//! such as a server-rendered page or a push channel.

use crate::core::challenge::Countdown;
use crate::core::clock::Clock;
use crate::core::locale::Locale;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often the countdown is refreshed.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running countdown task.
#[derive(Debug)]
pub struct CountdownTicker {
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Starts ticking towards `ends_at`.
    ///
    /// The returned receiver already holds the text for the current instant.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(
        ends_at: DateTime<Utc>,
        locale: Locale,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> (Self, watch::Receiver<String>) {
        let initial = Countdown::until(ends_at, clock.now()).render(locale);
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial value is already published.
            interval.tick().await;

            loop {
                interval.tick().await;
                let countdown = Countdown::until(ends_at, clock.now());
                if tx.send(countdown.render(locale)).is_err() {
                    tracing::debug!("countdown receiver dropped, stopping ticker");
                    break;
                }
                if countdown == Countdown::Ended {
                    tracing::debug!(%ends_at, "challenge window closed, stopping ticker");
                    break;
                }
            }
        });

        (Self { handle }, rx)
    }

    /// Whether the task has stopped on its own.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

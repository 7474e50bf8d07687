//! Bonus challenge progress.
//!
//! A partner has `window_days` from registration to bring in leads whose
//! contracts add up to `target` in commission. What counts is when the *lead*
//! was captured: a contract signed after the window closes still qualifies if
//! its lead arrived inside the window.
//!
//! Everything here is a pure function of its inputs, including the current
//! time. The display layer supplies a fresh `now` on every tick.

use crate::core::commission::compute_commission;
use crate::core::contracts::ContractRecord;
use crate::core::locale::Locale;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Commission needed to complete the challenge.
pub const DEFAULT_CHALLENGE_TARGET: f64 = 3000.0;
/// Length of the challenge window, counted from registration.
pub const DEFAULT_CHALLENGE_WINDOW_DAYS: i64 = 30;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Challenge parameters, loaded from the `[challenge]` section of `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRules {
    /// Commission to reach
    #[serde(default = "default_target")]
    pub target: f64,
    /// Window length in days
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

const fn default_target() -> f64 {
    DEFAULT_CHALLENGE_TARGET
}

const fn default_window_days() -> i64 {
    DEFAULT_CHALLENGE_WINDOW_DAYS
}

impl Default for ChallengeRules {
    fn default() -> Self {
        Self {
            target: DEFAULT_CHALLENGE_TARGET,
            window_days: DEFAULT_CHALLENGE_WINDOW_DAYS,
        }
    }
}

/// Time left in the challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// The window has closed
    Ended,
    /// Time until the window closes, always positive
    Remaining(TimeDelta),
}

impl Countdown {
    /// Countdown from `now` until `ends_at`.
    #[must_use]
    pub fn until(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining = ends_at.signed_duration_since(now);
        if remaining > TimeDelta::zero() {
            Self::Remaining(remaining)
        } else {
            Self::Ended
        }
    }

    /// Renders the countdown for display.
    ///
    /// At least a day left shows `"{d}d {h}h {m}m"`, less than a day shows
    /// `"{h}h {m}m {s}s"`. Every component is floored.
    #[must_use]
    pub fn render(self, locale: Locale) -> String {
        let Self::Remaining(remaining) = self else {
            return ended_label(locale).to_string();
        };

        let ms = remaining.num_milliseconds();
        let days = ms / MS_PER_DAY;
        let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
        let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
        let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;

        if days >= 1 {
            format!("{days}d {hours}h {minutes}m")
        } else {
            format!("{hours}h {minutes}m {seconds}s")
        }
    }
}

/// Label shown once the challenge window has closed.
#[must_use]
pub const fn ended_label(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Encerrado",
        Locale::En => "Ended",
    }
}

/// Derived challenge progress. Recomputed on every render, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeState {
    /// Commission from contracts whose lead was captured inside the window
    pub current_commission: f64,
    /// Commission to reach
    pub target: f64,
    /// Progress towards the target, 0 to 100
    pub progress_percent: f64,
    /// Target reached
    pub completed: bool,
    /// Window still open
    pub is_active: bool,
    /// When the window closes
    pub ends_at: DateTime<Utc>,
    /// Time left
    pub countdown: Countdown,
    /// How many contracts contributed to `current_commission`
    pub qualifying_contracts: usize,
}

/// End of the challenge window for a registration date.
#[must_use]
pub fn challenge_end(registered_at: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    TimeDelta::try_days(window_days)
        .and_then(|window| registered_at.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Evaluates challenge progress.
///
/// Returns `None` when the partner has no registration date, which disables
/// the challenge entirely.
#[must_use]
pub fn evaluate_challenge(
    registered_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    contracts: &[ContractRecord],
    rules: &ChallengeRules,
) -> Option<ChallengeState> {
    let registered_at = registered_at?;
    let ends_at = challenge_end(registered_at, rules.window_days);
    let is_active = now < ends_at;

    let (current_commission, qualifying_contracts) = contracts
        .iter()
        .filter(|record| {
            record
                .lead
                .as_ref()
                .is_some_and(|lead| lead.created_at <= ends_at)
        })
        .fold((0.0, 0), |(sum, count), record| {
            (sum + compute_commission(&record.contract).total, count + 1)
        });

    let completed = current_commission >= rules.target;
    let progress_percent = if completed {
        100.0
    } else {
        (current_commission / rules.target * 100.0).min(100.0)
    };

    Some(ChallengeState {
        current_commission,
        target: rules.target,
        progress_percent,
        completed,
        is_active,
        ends_at,
        countdown: Countdown::until(ends_at, now),
        qualifying_contracts,
    })
}

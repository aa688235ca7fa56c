//! Trial activation types.
//!
//! A trial activation is a time-boxed grant that lets a user try a
//! marketplace bot without buying it. Every grant lasts exactly
//! [`TRIAL_DURATION_SECS`] from the moment it was (re)activated.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Length of every trial window: 3 days.
pub const TRIAL_DURATION_SECS: i64 = 3 * 24 * 60 * 60;

/// Trial window as a `TimeDelta`.
pub fn trial_duration() -> TimeDelta {
    TimeDelta::seconds(TRIAL_DURATION_SECS)
}

/// Identifier of a bot in the marketplace catalog.
///
/// Serialized as a bare JSON number so persisted records keep the
/// `"botId": 42` shape the catalog uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub i64);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for BotId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Cached trial status.
///
/// Recomputed by the sweep; between sweeps it may lag behind the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialStatus {
    Active,
    Expired,
}

impl TrialStatus {
    /// Badge label shown in the "my bots" view.
    pub fn badge(&self) -> &'static str {
        match self {
            TrialStatus::Active => "Активен",
            TrialStatus::Expired => "Истёк",
        }
    }
}

impl fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialStatus::Active => write!(f, "active"),
            TrialStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for TrialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TrialStatus::Active),
            "expired" => Ok(TrialStatus::Expired),
            other => Err(format!("invalid trial status: '{other}'")),
        }
    }
}

/// One bot's trial grant.
///
/// Field names are camelCase on the wire so the persisted value matches
/// the `activeBots` storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialActivation {
    pub bot_id: BotId,
    /// Display label captured at activation time (not re-fetched).
    pub bot_name: String,
    pub activated_at: DateTime<Utc>,
    /// Always `activated_at + trial_duration()`.
    pub expires_at: DateTime<Utc>,
    pub status: TrialStatus,
}

impl TrialActivation {
    /// Start a fresh trial epoch at `now`.
    pub fn start(bot_id: BotId, bot_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            bot_id,
            bot_name: bot_name.into(),
            activated_at: now,
            expires_at: now + trial_duration(),
            status: TrialStatus::Active,
        }
    }

    /// The status a sweep running at `now` would assign.
    pub fn status_at(&self, now: DateTime<Utc>) -> TrialStatus {
        if now < self.expires_at {
            TrialStatus::Active
        } else {
            TrialStatus::Expired
        }
    }

    /// Time left until expiry, or `None` once `now` has reached `expires_at`.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let left = self.expires_at - now;
        (left > TimeDelta::zero()).then_some(left)
    }

    pub fn is_active(&self) -> bool {
        self.status == TrialStatus::Active
    }
}

/// Render a countdown as `"2d 5h 13m"`.
pub fn format_remaining(left: TimeDelta) -> String {
    format!(
        "{}d {}h {}m",
        left.num_days(),
        left.num_hours() % 24,
        left.num_minutes() % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_trial_duration_is_three_days() {
        assert_eq!(TRIAL_DURATION_SECS, 259_200);
        assert_eq!(trial_duration(), TimeDelta::days(3));
    }

    #[test]
    fn test_start_sets_expiry() {
        let trial = TrialActivation::start(BotId(42), "Sales Bot", t0());
        assert_eq!(trial.activated_at, t0());
        assert_eq!(trial.expires_at - trial.activated_at, TimeDelta::days(3));
        assert_eq!(trial.status, TrialStatus::Active);
        assert!(trial.is_active());
    }

    #[test]
    fn test_status_at_boundary() {
        let trial = TrialActivation::start(BotId(1), "Bot", t0());
        let expiry = t0() + trial_duration();
        assert_eq!(trial.status_at(expiry - TimeDelta::seconds(1)), TrialStatus::Active);
        assert_eq!(trial.status_at(expiry), TrialStatus::Expired);
        assert_eq!(trial.status_at(expiry + TimeDelta::seconds(1)), TrialStatus::Expired);
    }

    #[test]
    fn test_remaining() {
        let trial = TrialActivation::start(BotId(1), "Bot", t0());
        let left = trial.remaining(t0() + TimeDelta::hours(1)).unwrap();
        assert_eq!(left, TimeDelta::hours(71));
        assert!(trial.remaining(t0() + trial_duration()).is_none());
    }

    #[test]
    fn test_format_remaining() {
        let left = TimeDelta::days(2) + TimeDelta::hours(5) + TimeDelta::minutes(13);
        assert_eq!(format_remaining(left), "2d 5h 13m");
    }

    #[test]
    fn test_status_roundtrip_and_badge() {
        assert_eq!("ACTIVE".parse::<TrialStatus>().unwrap(), TrialStatus::Active);
        assert_eq!(TrialStatus::Expired.to_string(), "expired");
        assert!("paused".parse::<TrialStatus>().is_err());
        assert_eq!(TrialStatus::Active.badge(), "Активен");
        assert_eq!(TrialStatus::Expired.badge(), "Истёк");
    }

    #[test]
    fn test_bot_id_parse() {
        assert_eq!(" 42 ".parse::<BotId>().unwrap(), BotId(42));
        assert!("abc".parse::<BotId>().is_err());
    }

    #[test]
    fn test_activation_wire_format() {
        let trial = TrialActivation::start(BotId(42), "Sales Bot", t0());
        let json = serde_json::to_value(&trial).unwrap();
        assert_eq!(json["botId"], 42);
        assert_eq!(json["botName"], "Sales Bot");
        assert_eq!(json["status"], "active");
        assert_eq!(json["activatedAt"], "2026-03-01T12:00:00Z");
        assert_eq!(json["expiresAt"], "2026-03-04T12:00:00Z");
    }

    #[test]
    fn test_activation_accepts_offset_timestamps() {
        let raw = r#"{
            "botId": 7,
            "botName": "Support",
            "activatedAt": "2026-03-01T15:00:00.000+03:00",
            "expiresAt": "2026-03-04T15:00:00.000+03:00",
            "status": "expired"
        }"#;
        let trial: TrialActivation = serde_json::from_str(raw).unwrap();
        assert_eq!(trial.bot_id, BotId(7));
        assert_eq!(trial.activated_at, t0());
        assert_eq!(trial.status, TrialStatus::Expired);
    }
}

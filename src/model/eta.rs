//! How close an order's ETA is, relative to a given instant.

use chrono::{DateTime, Utc};

/// ETAs within this many hours (and not yet passed) count as [`EtaProximity::Soon`].
pub const NEAR_WINDOW_HOURS: f64 = 72.0;

/// Fractional hours from `now` until `eta`; negative once the ETA has passed.
pub fn hours_until(eta: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (eta - now).num_milliseconds() as f64 / 3_600_000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaProximity {
    Overdue,
    Soon,
    OnSchedule,
}

impl EtaProximity {
    pub fn classify(eta: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let hours = hours_until(eta, now);
        if hours < 0.0 {
            EtaProximity::Overdue
        } else if hours <= NEAR_WINDOW_HOURS {
            EtaProximity::Soon
        } else {
            EtaProximity::OnSchedule
        }
    }

    /// Short badge text; empty when on schedule.
    pub fn label(self) -> &'static str {
        match self {
            EtaProximity::Overdue => "Overdue",
            EtaProximity::Soon => "Soon",
            EtaProximity::OnSchedule => "",
        }
    }
}

impl crate::model::Order {
    pub fn eta_proximity(&self, now: DateTime<Utc>) -> EtaProximity {
        EtaProximity::classify(self.eta, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn proximity_boundaries() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        assert_eq!(EtaProximity::classify(now - Duration::minutes(1), now), EtaProximity::Overdue);
        assert_eq!(EtaProximity::classify(now, now), EtaProximity::Soon);
        assert_eq!(EtaProximity::classify(now + Duration::hours(72), now), EtaProximity::Soon);
        assert_eq!(
            EtaProximity::classify(now + Duration::hours(73), now),
            EtaProximity::OnSchedule
        );
        assert_eq!(hours_until(now + Duration::minutes(90), now), 1.5);
    }

    #[test]
    fn labels() {
        assert_eq!(EtaProximity::Overdue.label(), "Overdue");
        assert_eq!(EtaProximity::Soon.label(), "Soon");
        assert_eq!(EtaProximity::OnSchedule.label(), "");
    }
}

//! Scheduled post times as written in the store.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Zone-less layouts accepted for scheduled times, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// When a row wants to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// No time set: due as soon as a run sees it.
    Immediate,
    At(DateTime<Utc>),
    /// A value was set but could not be read as a time. Treated as due.
    Unparsable(String),
}

impl Schedule {
    /// Interpret a raw store value.
    ///
    /// Blank or missing values mean [`Schedule::Immediate`]. RFC 3339 values
    /// carry their own offset; zone-less values are read in `offset`.
    #[must_use]
    pub fn parse(raw: Option<&str>, offset: FixedOffset) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Immediate;
        };

        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Self::At(at.with_timezone(&Utc));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });

        match naive.and_then(|n| offset.from_local_datetime(&n).single()) {
            Some(at) => Self::At(at.with_timezone(&Utc)),
            None => Self::Unparsable(raw.to_owned()),
        }
    }

    /// `true` when `now` has reached the scheduled time.
    ///
    /// [`Schedule::Immediate`] and [`Schedule::Unparsable`] are always due.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Immediate | Self::Unparsable(_) => true,
            Self::At(at) => *at <= now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn missing_and_blank_are_immediate() {
        assert_eq!(Schedule::parse(None, utc()), Schedule::Immediate);
        assert_eq!(Schedule::parse(Some("   "), utc()), Schedule::Immediate);
    }

    #[test]
    fn rfc3339_keeps_its_own_offset() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let schedule = Schedule::parse(Some("2025-03-01T10:00:00.000Z"), offset);
        assert_eq!(schedule, Schedule::At(at("2025-03-01T10:00:00Z")));
    }

    #[test]
    fn naive_time_uses_configured_offset() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let schedule = Schedule::parse(Some("2025-03-01 17:30"), offset);
        assert_eq!(schedule, Schedule::At(at("2025-03-01T10:30:00Z")));
    }

    #[test]
    fn date_only_means_midnight() {
        let schedule = Schedule::parse(Some("2025-03-01"), utc());
        assert_eq!(schedule, Schedule::At(at("2025-03-01T00:00:00Z")));
    }

    #[test]
    fn garbage_is_unparsable_and_due() {
        let schedule = Schedule::parse(Some("next tuesday"), utc());
        assert_eq!(schedule, Schedule::Unparsable("next tuesday".to_string()));
        assert!(schedule.is_due(at("2000-01-01T00:00:00Z")));
    }

    #[test]
    fn due_boundary_is_inclusive() {
        let now = at("2025-03-01T10:00:00Z");
        assert!(Schedule::At(now).is_due(now));
        assert!(!Schedule::At(at("2025-03-01T10:00:01Z")).is_due(now));
        assert!(Schedule::At(at("2025-03-01T09:59:59Z")).is_due(now));
    }
}

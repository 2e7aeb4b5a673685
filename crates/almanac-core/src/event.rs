use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A titled time interval on one owner's calendar — the unit of scheduling.
///
/// The busy interval is half-open: `[start, stop)`. Two events of the same
/// owner may touch endpoints but never strictly intersect; the rules engine
/// enforces this before anything reaches a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Backend-assigned id, unique for the lifetime of a store and never
    /// reused after deletion. `0` means "not yet persisted".
    pub id: i64,
    /// Human-readable label. Non-empty once persisted.
    pub title: String,
    /// Interval start (UTC). Always strictly before `stop` once persisted.
    pub start: DateTime<Utc>,
    /// Interval end (UTC), exclusive.
    pub stop: DateTime<Utc>,
    /// Free text, unconstrained.
    pub description: String,
    /// Whose calendar this event lives on. Non-zero once persisted;
    /// immutable after creation.
    pub owner_id: i64,
    /// How long before `start` to notify, if at all. `None` means "no
    /// notification" — never a zero-duration sentinel.
    #[serde(default, with = "notification_ms")]
    pub notification: Option<Duration>,
}

impl Event {
    /// True if this event's busy interval strictly intersects `[start, stop)`.
    pub fn overlaps(&self, start: DateTime<Utc>, stop: DateTime<Utc>) -> bool {
        self.start < stop && self.stop > start
    }
}

/// Serde representation of `Option<Duration>` as whole milliseconds,
/// matching the nullable `notification_ms` column of the SQLite backend.
mod notification_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(d) => s.serialize_some(&d.num_milliseconds()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let ms = Option::<i64>::deserialize(d)?;
        Ok(ms.map(Duration::milliseconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start_h: u32, stop_h: u32) -> Event {
        Event {
            id: 1,
            title: "standup".to_string(),
            start: Utc.with_ymd_and_hms(2026, 3, 10, start_h, 0, 0).unwrap(),
            stop: Utc.with_ymd_and_hms(2026, 3, 10, stop_h, 0, 0).unwrap(),
            description: String::new(),
            owner_id: 7,
            notification: None,
        }
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let e = event(10, 11);
        let at = |h| Utc.with_ymd_and_hms(2026, 3, 10, h, 0, 0).unwrap();
        assert!(!e.overlaps(at(11), at(12)));
        assert!(!e.overlaps(at(9), at(10)));
        assert!(e.overlaps(at(10), at(11)));
        assert!(e.overlaps(at(9), at(12)));
    }

    #[test]
    fn notification_survives_json_round_trip() {
        let mut e = event(10, 11);
        e.notification = Some(Duration::minutes(15));
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("900000"));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.notification, Some(Duration::minutes(15)));

        e.notification = None;
        let back: Event =
            serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();
        assert_eq!(back.notification, None);
    }
}

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::firestore::error::{invalid_argument, FirestoreResult};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
/// `0001-01-01T00:00:00Z`
const MIN_SECONDS: i64 = -62_135_596_800;
/// `9999-12-31T23:59:59Z`
const MAX_SECONDS: i64 = 253_402_300_799;

/// A point in time within the range Firestore accepts
/// (`0001-01-01T00:00:00Z` to `9999-12-31T23:59:59.999999999Z`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

impl Timestamp {
    /// Normalizes `nanos` into `0..1_000_000_000` and clamps the result to
    /// the supported range. Use [`Timestamp::try_new`] to reject values
    /// outside it instead.
    pub fn new(seconds: i64, nanos: i32) -> Self {
        let (seconds, nanos) = normalize(seconds, nanos);
        if seconds < MIN_SECONDS {
            Self {
                seconds: MIN_SECONDS,
                nanos: 0,
            }
        } else if seconds > MAX_SECONDS {
            Self {
                seconds: MAX_SECONDS,
                nanos: (NANOS_PER_SECOND - 1) as i32,
            }
        } else {
            Self { seconds, nanos }
        }
    }

    pub fn try_new(seconds: i64, nanos: i32) -> FirestoreResult<Self> {
        let (normalized, _) = normalize(seconds, nanos);
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&normalized) {
            return Err(invalid_argument(format!(
                "Timestamp seconds out of range: {seconds}"
            )));
        }
        Ok(Self::new(seconds, nanos))
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> i32 {
        self.nanos
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime.timestamp(), datetime.timestamp_subsec_nanos() as i32)
    }

    pub fn from_unix_micros(micros: i64) -> Self {
        Self::new(
            micros.div_euclid(1_000_000),
            (micros.rem_euclid(1_000_000) * 1_000) as i32,
        )
    }

    pub fn from_unix_millis(millis: i64) -> Self {
        Self::new(
            millis.div_euclid(1_000),
            (millis.rem_euclid(1_000) * 1_000_000) as i32,
        )
    }

    pub fn to_unix_micros(&self) -> i64 {
        self.seconds * 1_000_000 + i64::from(self.nanos) / 1_000
    }

    pub fn to_unix_millis(&self) -> i64 {
        self.seconds * 1_000 + i64::from(self.nanos) / 1_000_000
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanos as u32).single()
    }

    /// RFC 3339 rendering with nanosecond precision, as used by the JSON wire format.
    pub fn to_rfc3339(&self) -> String {
        match self.to_datetime() {
            Some(datetime) => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            // unreachable: chrono covers the whole supported range
            None => format!("{}.{:09}s", self.seconds, self.nanos),
        }
    }

    pub fn parse_rfc3339(value: &str) -> FirestoreResult<Self> {
        let datetime = DateTime::parse_from_rfc3339(value)
            .map_err(|err| invalid_argument(format!("Invalid timestamp: {err}")))?
            .with_timezone(&Utc);
        Self::try_new(datetime.timestamp(), datetime.timestamp_subsec_nanos() as i32)
    }
}

fn normalize(seconds: i64, nanos: i32) -> (i64, i32) {
    let nanos = i64::from(nanos);
    (
        seconds.saturating_add(nanos.div_euclid(NANOS_PER_SECOND)),
        nanos.rem_euclid(NANOS_PER_SECOND) as i32,
    )
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.seconds.cmp(&other.seconds) {
            Ordering::Equal => self.nanos.cmp(&other.nanos),
            ordering => ordering,
        }
    }
}

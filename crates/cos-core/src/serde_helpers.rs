/// Serde helpers shared across the data model.
///
/// The primary export is the [`kickoff`] module, used with
/// `#[serde(with = "crate::serde_helpers::kickoff")]` on game dates. Schedule
/// providers report kickoff times at minute precision (`2023-09-02T16:00Z`),
/// which is not valid RFC 3339, so deserialization accepts both forms.
/// Serialization always writes RFC 3339.
use chrono::{DateTime, NaiveDateTime, Utc};

/// Minute-precision UTC timestamp format used by schedule providers.
pub const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Parses a kickoff timestamp in RFC 3339 or [`PROVIDER_DATE_FORMAT`].
///
/// Returns `None` if neither form matches.
pub fn parse_kickoff(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, PROVIDER_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// `serde(with)` module for kickoff timestamps.
pub mod kickoff {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Writes the timestamp as RFC 3339 with second precision.
    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Reads RFC 3339 or the provider's minute-precision form.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_kickoff(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid kickoff time {raw:?}: expected RFC 3339 or YYYY-MM-DDTHH:MMZ"
            ))
        })
    }
}

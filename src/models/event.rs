use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tech event as read from the `events` collection.
///
/// Events are read-only values: they are decoded fresh from each storage
/// read and carry no storage identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(deserialize_with = "stored_date::deserialize")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "stored_date::deserialize")]
    pub end_date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub registration_link: String,
}

/// Dates written by different tools end up in the store in different shapes.
/// Naive values are taken as UTC.
pub mod stored_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognised date value: {}", raw)))
    }

    pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(text) => parse_str(text),
            // MongoDB extended JSON, as produced by mongoexport
            Value::Object(fields) => match fields.get("$date")? {
                Value::String(text) => parse_str(text),
                Value::Number(millis) => from_millis(millis.as_i64()?),
                Value::Object(inner) => from_millis(inner.get("$numberLong")?.as_str()?.parse().ok()?),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_str(text: &str) -> Option<DateTime<Utc>> {
        let text = text.trim();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Some(datetime.with_timezone(&Utc));
        }
        if let Ok(naive) = text.parse::<NaiveDateTime>() {
            return Some(naive.and_utc());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc());
        }

        text.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(millis).single()
    }
}

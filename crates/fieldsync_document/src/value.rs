//! Dynamic document field values.

use crate::error::{DocumentError, DocumentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic point as stored by the remote document store.
///
/// Locally, points are kept as WKT text (`POINT(lon lat)`); on the wire
/// they travel as a structured latitude/longitude pair, the one nested
/// value the document model allows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Renders the point as WKT, longitude first.
    pub fn to_wkt(&self) -> String {
        format!("POINT({} {})", self.longitude, self.latitude)
    }

    /// Parses a WKT `POINT(lon lat)` string.
    pub fn from_wkt(wkt: &str) -> DocumentResult<Self> {
        let trimmed = wkt.trim();
        let inner = trimmed
            .strip_prefix("POINT")
            .map(str::trim)
            .and_then(|s| s.strip_prefix('('))
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| DocumentError::InvalidWkt(wkt.to_string()))?;

        let mut parts = inner.split_whitespace();
        let longitude = parts
            .next()
            .and_then(|p| p.parse::<f64>().ok())
            .ok_or_else(|| DocumentError::InvalidWkt(wkt.to_string()))?;
        let latitude = parts
            .next()
            .and_then(|p| p.parse::<f64>().ok())
            .ok_or_else(|| DocumentError::InvalidWkt(wkt.to_string()))?;

        if parts.next().is_some() {
            return Err(DocumentError::InvalidWkt(wkt.to_string()));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wkt())
    }
}

/// A dynamic document field value.
///
/// This type represents any value the remote document store can hold for a
/// single field. Variant order matters for untagged deserialization:
/// timestamps are tried before plain text so ISO date strings round-trip
/// as timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Null / absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Point-in-time value (RFC 3339 on the wire).
    Timestamp(DateTime<Utc>),
    /// Geographic point.
    GeoPoint(GeoPoint),
    /// Text string (UTF-8).
    Text(String),
}

impl FieldValue {
    /// Returns true if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Interprets the value as a signed integer.
    ///
    /// Numeric text and whole floats coerce; the remote store does not
    /// guarantee stable scalar types across writers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Float(f) => Some(*f as i64),
            FieldValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Interprets the value as a float, coercing integers and numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interprets the value as a boolean, coercing boolean-looking text.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interprets the value as a timestamp.
    ///
    /// Text values are accepted in RFC 3339, bare ISO
    /// (`2026-02-07T12:39:22`), or space-separated
    /// (`2026-02-07 12:39:22`) form.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            FieldValue::Text(s) => parse_datetime(s),
            _ => None,
        }
    }

    /// Interprets the value as a geographic point, accepting WKT text.
    pub fn as_geo_point(&self) -> Option<GeoPoint> {
        match self {
            FieldValue::GeoPoint(p) => Some(*p),
            FieldValue::Text(s) => GeoPoint::from_wkt(s).ok(),
            _ => None,
        }
    }

}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        FieldValue::GeoPoint(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

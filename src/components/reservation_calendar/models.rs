use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A start or end marker as the backend sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateMarker {
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`
    Text(String),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
}

impl DateMarker {
    /// An empty string counts as no marker at all
    pub fn is_blank(&self) -> bool {
        matches!(self, DateMarker::Text(text) if text.trim().is_empty())
    }
}

/// Top-level fields of a reservation record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationFields {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub start: Option<DateMarker>,
    #[serde(default)]
    pub end: Option<DateMarker>,
    #[serde(default)]
    pub space_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Display fields the backend may nest under `extendedProps`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedFields {
    #[serde(default)]
    pub space_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
}

#[derive(Deserialize)]
struct WireReservation {
    #[serde(flatten)]
    fields: ReservationFields,
    #[serde(default, rename = "extendedProps")]
    extended_props: Option<ExtendedFields>,
}

/// Reservation record as received from the booking API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireReservation")]
pub enum RawReservation {
    Flat(ReservationFields),
    Nested {
        fields: ReservationFields,
        extended: ExtendedFields,
    },
}

impl From<WireReservation> for RawReservation {
    fn from(wire: WireReservation) -> Self {
        match wire.extended_props {
            Some(extended) => RawReservation::Nested {
                fields: wire.fields,
                extended,
            },
            None => RawReservation::Flat(wire.fields),
        }
    }
}

impl RawReservation {
    pub fn fields(&self) -> &ReservationFields {
        match self {
            RawReservation::Flat(fields) => fields,
            RawReservation::Nested { fields, .. } => fields,
        }
    }

    pub fn extended(&self) -> Option<&ExtendedFields> {
        match self {
            RawReservation::Flat(_) => None,
            RawReservation::Nested { extended, .. } => Some(extended),
        }
    }

    /// Identifier as a string; `None` when absent or null
    pub fn id_string(&self) -> Option<String> {
        match self.fields().id.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Approval state shown on the calendar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Approved,
}

impl ReservationStatus {
    /// Anything other than `approved` is shown as pending
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("approved") => ReservationStatus::Approved,
            Some("pending") | None => ReservationStatus::Pending,
            Some(other) => {
                tracing::debug!(status = other, "Unknown reservation status, showing as pending");
                ReservationStatus::Pending
            }
        }
    }
}

/// Colors handed to the rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryColors {
    pub color: String,
    pub background_color: String,
    pub border_color: String,
    pub text_color: String,
}

impl Default for EntryColors {
    fn default() -> Self {
        Self {
            color: APPROVED_GREEN.to_string(),
            background_color: APPROVED_GREEN.to_string(),
            border_color: APPROVED_GREEN_BORDER.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
        }
    }
}

pub const APPROVED_GREEN: &str = "#28a745";
pub const APPROVED_GREEN_BORDER: &str = "#218838";
pub const DEFAULT_TEXT_COLOR: &str = "white";

/// Display-only metadata attached to an entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryProps {
    pub status: ReservationStatus,
    pub space_name: String,
    pub user_name: String,
    pub start_time: String,
    pub end_time: String,
    pub justification: String,
    pub original_start: Option<DateMarker>,
    pub original_end: Option<DateMarker>,
}

/// A reservation placed on exactly one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    pub id: String,
    pub title: String,
    pub single_day: bool,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(flatten)]
    pub colors: EntryColors,
    pub extended_props: EntryProps,
}

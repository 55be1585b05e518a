//! Turns raw reservation records into single-day calendar entries.

use super::models::{
    DateMarker, EntryColors, EntryProps, NormalizedEntry, RawReservation, ReservationStatus,
    APPROVED_GREEN, APPROVED_GREEN_BORDER, DEFAULT_TEXT_COLOR,
};
use chrono::DateTime;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

pub const DEFAULT_SPACE_NAME: &str = "Espacio";
pub const DEFAULT_USER_NAME: &str = "Usuario";

/// Data-quality counters gathered while normalizing one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub dropped_missing_start: usize,
    /// Records without an id are dropped, never placed under a made-up id
    pub dropped_missing_id: usize,
    pub corrected_single_day: usize,
    /// Dates carried by more than one entry, with their entry count
    pub duplicate_dates: BTreeMap<String, usize>,
    pub duplicate_ids: Vec<String>,
}

impl NormalizeReport {
    pub fn dropped(&self) -> usize {
        self.dropped_missing_start + self.dropped_missing_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub entries: Vec<NormalizedEntry>,
    pub report: NormalizeReport,
}

/// Normalize a batch, preserving input order
pub fn normalize(raw: Vec<RawReservation>) -> Normalized {
    let mut report = NormalizeReport::default();
    let mut entries = Vec::with_capacity(raw.len());

    for record in &raw {
        let start = match record.fields().start.as_ref().filter(|m| !m.is_blank()) {
            Some(start) => start,
            None => {
                warn!(id = ?record.fields().id, "Dropping reservation without start");
                report.dropped_missing_start += 1;
                continue;
            }
        };

        let id = match record.id_string() {
            Some(id) => id,
            None => {
                warn!(start = ?start, "Dropping reservation without id");
                report.dropped_missing_id += 1;
                continue;
            }
        };

        let mut entry = build_entry(record, id, start);
        if !entry.single_day {
            warn!(id = %entry.id, "Entry was not single-day after construction, correcting");
            entry.single_day = true;
            report.corrected_single_day += 1;
        }
        entries.push(entry);
    }

    flag_duplicates(&entries, &mut report);

    debug!(
        received = raw.len(),
        kept = entries.len(),
        dropped = report.dropped(),
        "Normalized reservations"
    );

    Normalized { entries, report }
}

/// Calendar date of a start marker; never carries a time component
pub fn calendar_date(start: &DateMarker) -> String {
    match start {
        DateMarker::Text(text) => {
            let text = text.trim();
            match text.split_once(['T', ' ']) {
                Some((date, _)) => date.to_string(),
                None => text.to_string(),
            }
        }
        DateMarker::Timestamp(millis) => match DateTime::from_timestamp_millis(*millis) {
            Some(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
            // Out of range; the range filter drops it
            None => millis.to_string(),
        },
    }
}

/// `"{space} ({start}-{end})"` when both labels are present
pub fn entry_title(space_name: &str, start_time: &str, end_time: &str) -> String {
    if !start_time.is_empty() && !end_time.is_empty() {
        format!("{} ({}-{})", space_name, start_time, end_time)
    } else {
        space_name.to_string()
    }
}

/// Top-level value, else nested value, else nothing; empty strings do not count
fn resolve<'a>(top: Option<&'a String>, nested: Option<&'a String>) -> Option<&'a str> {
    top.map(String::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| nested.map(String::as_str).filter(|s| !s.is_empty()))
}

fn color_or(hint: Option<&String>, default: &str) -> String {
    hint.filter(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn build_entry(record: &RawReservation, id: String, start: &DateMarker) -> NormalizedEntry {
    let fields = record.fields();
    let extended = record.extended();

    let space_name = resolve(
        fields.space_name.as_ref(),
        extended.and_then(|e| e.space_name.as_ref()),
    )
    .unwrap_or(DEFAULT_SPACE_NAME)
    .to_string();
    let user_name = resolve(
        fields.user_name.as_ref(),
        extended.and_then(|e| e.user_name.as_ref()),
    )
    .unwrap_or(DEFAULT_USER_NAME)
    .to_string();
    let start_time = resolve(
        fields.start_time.as_ref(),
        extended.and_then(|e| e.start_time.as_ref()),
    )
    .unwrap_or_default()
    .to_string();
    let end_time = resolve(
        fields.end_time.as_ref(),
        extended.and_then(|e| e.end_time.as_ref()),
    )
    .unwrap_or_default()
    .to_string();
    let justification = resolve(
        fields.justification.as_ref(),
        extended.and_then(|e| e.justification.as_ref()),
    )
    .unwrap_or_default()
    .to_string();
    let status = ReservationStatus::from_wire(resolve(
        fields.status.as_ref(),
        extended.and_then(|e| e.status.as_ref()),
    ));

    NormalizedEntry {
        id,
        title: entry_title(&space_name, &start_time, &end_time),
        single_day: true,
        date: calendar_date(start),
        colors: EntryColors {
            color: color_or(fields.color.as_ref(), APPROVED_GREEN),
            background_color: color_or(fields.background_color.as_ref(), APPROVED_GREEN),
            border_color: color_or(fields.border_color.as_ref(), APPROVED_GREEN_BORDER),
            text_color: color_or(fields.text_color.as_ref(), DEFAULT_TEXT_COLOR),
        },
        extended_props: EntryProps {
            status,
            space_name,
            user_name,
            start_time,
            end_time,
            justification,
            original_start: Some(start.clone()),
            original_end: fields.end.clone(),
        },
    }
}

fn flag_duplicates(entries: &[NormalizedEntry], report: &mut NormalizeReport) {
    let mut per_date: BTreeMap<&str, usize> = BTreeMap::new();
    let mut seen_ids = HashSet::new();

    for entry in entries {
        *per_date.entry(entry.date.as_str()).or_default() += 1;
        if !seen_ids.insert(entry.id.as_str()) {
            report.duplicate_ids.push(entry.id.clone());
        }
    }

    report.duplicate_dates = per_date
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(date, count)| (date.to_string(), count))
        .collect();

    if !report.duplicate_dates.is_empty() {
        warn!(dates = ?report.duplicate_dates, "Several reservations share a date");
    }
    if !report.duplicate_ids.is_empty() {
        warn!(ids = ?report.duplicate_ids, "Duplicate reservation identifiers in response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<RawReservation> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn datetime_start_keeps_only_the_date() {
        let out = normalize(records(json!([{
            "id": 1,
            "start": "2024-03-15T10:00:00",
            "end": "2024-03-15T11:00:00",
            "startTime": "10:00",
            "endTime": "11:00",
            "spaceName": "Room A"
        }])));

        assert_eq!(out.entries.len(), 1);
        let entry = &out.entries[0];
        assert_eq!(entry.id, "1");
        assert_eq!(entry.date, "2024-03-15");
        assert_eq!(entry.title, "Room A (10:00-11:00)");
        assert!(entry.single_day);
        assert_eq!(
            entry.extended_props.original_end,
            Some(DateMarker::Text("2024-03-15T11:00:00".to_string()))
        );

        let value = serde_json::to_value(entry).unwrap();
        assert!(value.get("end").is_none());
    }

    #[test]
    fn date_only_and_timestamp_starts() {
        assert_eq!(calendar_date(&DateMarker::Text("2024-03-15".into())), "2024-03-15");
        assert_eq!(calendar_date(&DateMarker::Text("2024-03-15 23:30".into())), "2024-03-15");
        // 2024-03-15T23:30:00Z stays on the 15th regardless of local offset
        assert_eq!(
            calendar_date(&DateMarker::Timestamp(1_710_545_400_000)),
            "2024-03-15"
        );
    }

    #[test]
    fn missing_start_is_dropped_and_counted() {
        let out = normalize(records(json!([
            { "id": 1, "spaceName": "Room A" },
            { "id": 2, "start": "" },
            { "id": 3, "start": "2024-03-16" }
        ])));

        assert_eq!(out.entries.len(), 1);
        assert_eq!(out.entries[0].id, "3");
        assert_eq!(out.report.dropped_missing_start, 2);
        assert_eq!(out.report.dropped(), 2);
    }

    #[test]
    fn missing_id_is_dropped() {
        let out = normalize(records(json!([{ "start": "2024-03-16" }])));
        assert!(out.entries.is_empty());
        assert_eq!(out.report.dropped_missing_id, 1);
    }

    #[test]
    fn nested_fields_fill_gaps_and_defaults_apply() {
        let out = normalize(records(json!([
            {
                "id": "a",
                "start": "2024-03-15",
                "extendedProps": {
                    "spaceName": "Aula 3",
                    "userName": "Ana",
                    "status": "approved",
                    "startTime": "09:00",
                    "endTime": "10:00",
                    "justification": "Tutoría"
                }
            },
            { "id": "b", "start": "2024-03-16", "spaceName": "", "startTime": "09:00" }
        ])));

        let nested = &out.entries[0];
        assert_eq!(nested.title, "Aula 3 (09:00-10:00)");
        assert_eq!(nested.extended_props.user_name, "Ana");
        assert_eq!(nested.extended_props.status, ReservationStatus::Approved);
        assert_eq!(nested.extended_props.justification, "Tutoría");

        let bare = &out.entries[1];
        assert_eq!(bare.title, DEFAULT_SPACE_NAME);
        assert_eq!(bare.extended_props.user_name, DEFAULT_USER_NAME);
        assert_eq!(bare.extended_props.status, ReservationStatus::Pending);
        assert_eq!(bare.extended_props.justification, "");
        assert_eq!(bare.colors, EntryColors::default());
    }

    #[test]
    fn top_level_wins_over_nested() {
        let out = normalize(records(json!([{
            "id": 1,
            "start": "2024-03-15",
            "spaceName": "Sala Grande",
            "status": "pending",
            "extendedProps": { "spaceName": "Aula 3", "status": "approved" }
        }])));
        assert_eq!(out.entries[0].extended_props.space_name, "Sala Grande");
        assert_eq!(out.entries[0].extended_props.status, ReservationStatus::Pending);
    }

    #[test]
    fn backend_colors_are_kept() {
        let out = normalize(records(json!([{
            "id": 1,
            "start": "2024-03-15",
            "color": "#dc3545",
            "backgroundColor": "#dc3545",
            "borderColor": "#c82333"
        }])));
        let colors = &out.entries[0].colors;
        assert_eq!(colors.color, "#dc3545");
        assert_eq!(colors.border_color, "#c82333");
        assert_eq!(colors.text_color, DEFAULT_TEXT_COLOR);
    }

    #[test]
    fn shared_dates_are_kept_but_flagged() {
        let out = normalize(records(json!([
            { "id": 1, "start": "2024-03-15T09:00:00" },
            { "id": 2, "start": "2024-03-15T12:00:00" },
            { "id": 2, "start": "2024-03-17" }
        ])));

        assert_eq!(out.entries.len(), 3);
        assert_eq!(out.report.duplicate_dates.get("2024-03-15"), Some(&2));
        assert_eq!(out.report.duplicate_dates.len(), 1);
        assert_eq!(out.report.duplicate_ids, vec!["2".to_string()]);
    }

    #[test]
    fn output_order_follows_input() {
        let out = normalize(records(json!([
            { "id": 3, "start": "2024-03-20" },
            { "id": 1, "start": "2024-03-01" },
            { "id": 2, "start": "2024-03-10" }
        ])));
        let ids: Vec<_> = out.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }
}

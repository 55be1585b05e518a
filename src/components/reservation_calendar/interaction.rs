//! Hover and click texts. These read entry props only and never touch adapter state.

use super::models::{NormalizedEntry, ReservationStatus};
use super::range::parse_date;
use rust_i18n::t;

pub fn status_label(status: ReservationStatus) -> String {
    match status {
        ReservationStatus::Approved => t!("status_approved").to_string(),
        ReservationStatus::Pending => t!("status_pending").to_string(),
    }
}

/// Short multi-line text shown while hovering an entry
pub fn hover_tooltip(entry: &NormalizedEntry) -> String {
    let props = &entry.extended_props;
    format!(
        "{}\n{}: {}\n{}: {}\n{}: {} - {}",
        props.space_name,
        t!("tooltip_status"),
        status_label(props.status),
        t!("tooltip_user"),
        props.user_name,
        t!("tooltip_time"),
        props.start_time,
        props.end_time,
    )
}

/// Full description shown when an entry is selected
pub fn detail_text(entry: &NormalizedEntry) -> String {
    let props = &entry.extended_props;
    let date = parse_date(&entry.date)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| entry.date.clone());
    let justification = if props.justification.is_empty() {
        t!("not_available").to_string()
    } else {
        props.justification.clone()
    };

    [
        format!("{}: {}", t!("detail_reservation"), props.space_name),
        format!("{}: {}", t!("tooltip_status"), status_label(props.status)),
        format!("{}: {}", t!("tooltip_user"), props.user_name),
        format!("{}: {}", t!("detail_date"), date),
        format!("{}: {} - {}", t!("tooltip_time"), props.start_time, props.end_time),
        format!("{}: {}", t!("detail_justification"), justification),
    ]
    .join("\n")
}

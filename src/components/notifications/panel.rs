use super::models::{Notification, NotificationKind};
use crate::utils::time::{parse_timestamp, relative_time};
use chrono::{DateTime, Utc};
use rust_i18n::t;

/// Items shown in the dropdown at most
pub const MAX_LISTED: usize = 10;
/// Counts above this show as "99+"
pub const BADGE_CAP: i64 = 99;

/// Unread counter next to the bell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Badge {
    #[default]
    Hidden,
    Visible(String),
}

pub fn badge_for_count(count: i64) -> Badge {
    if count <= 0 {
        Badge::Hidden
    } else if count > BADGE_CAP {
        Badge::Visible(format!("{}+", BADGE_CAP))
    } else {
        Badge::Visible(count.to_string())
    }
}

pub fn icon_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "ℹ",
        NotificationKind::Success => "✔",
        NotificationKind::Warning => "⚠",
        NotificationKind::Error => "✖",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelItem {
    pub id: String,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
    pub link: String,
    /// Unread items are emphasised
    pub bold: bool,
    pub age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelList {
    #[default]
    Loading,
    Empty(String),
    Items(Vec<PanelItem>),
    Error(String),
}

/// Everything the notification dropdown shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub badge: Badge,
    pub list: PanelList,
}

/// Where the panel is drawn
pub trait PanelView: Send + Sync {
    fn render_panel(&self, state: &PanelState);
}

/// Build the dropdown list from a backend listing
pub fn build_list(notifications: Vec<Notification>, now: DateTime<Utc>) -> PanelList {
    if notifications.is_empty() {
        return PanelList::Empty(t!("notifications_empty").to_string());
    }

    let items = notifications
        .into_iter()
        .take(MAX_LISTED)
        .map(|n| PanelItem {
            icon: icon_for(n.kind),
            link: n.link.filter(|l| !l.is_empty()).unwrap_or_else(|| "#".to_string()),
            bold: !n.read,
            age: parse_timestamp(&n.created_at)
                .map(|created| relative_time(created, now))
                .unwrap_or_default(),
            id: n.id,
            title: n.title,
            message: n.message,
        })
        .collect();
    PanelList::Items(items)
}

pub fn list_error() -> PanelList {
    PanelList::Error(t!("notifications_error").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: usize, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            kind: NotificationKind::Warning,
            title: format!("Aviso {}", id),
            message: "Mensaje".to_string(),
            link: None,
            read,
            created_at: "2024-03-15T08:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn badge_hides_zero_and_caps_large_counts() {
        assert_eq!(badge_for_count(0), Badge::Hidden);
        assert_eq!(badge_for_count(7), Badge::Visible("7".to_string()));
        assert_eq!(badge_for_count(99), Badge::Visible("99".to_string()));
        assert_eq!(badge_for_count(150), Badge::Visible("99+".to_string()));
    }

    #[test]
    fn list_is_bounded_and_marks_unread() {
        rust_i18n::set_locale("es");
        let now = parse_timestamp("2024-03-15T10:00:00Z").unwrap();
        let notifications = (0..15).map(|i| notification(i, i % 2 == 0)).collect();

        let PanelList::Items(items) = build_list(notifications, now) else {
            panic!("expected items");
        };
        assert_eq!(items.len(), MAX_LISTED);
        assert_eq!(items[0].link, "#");
        assert_eq!(items[0].icon, "⚠");
        assert!(!items[0].bold);
        assert!(items[1].bold);
        assert_eq!(items[0].age, "Hace 2 horas");
    }

    #[test]
    fn empty_listing_shows_message() {
        rust_i18n::set_locale("es");
        assert_eq!(
            build_list(Vec::new(), Utc::now()),
            PanelList::Empty("No tienes notificaciones nuevas".to_string())
        );
    }
}

//! Render models handed to a [`ListingView`](crate::view::ListingView).

use shared::{
    domain::MaidId,
    protocol::{EmploymentHistoryEntry, MaidSummary, PageLink},
};
use url::Url;

/// Horizontal room the popup needs to the right of a card.
const POPUP_REACH: f64 = 600.0;
/// Right-hand margin kept clear of the viewport edge.
const VIEWPORT_MARGIN: f64 = 250.0;
const POPUP_RIGHT_OFFSET: f64 = 200.0;
const POPUP_LEFT_OFFSET: f64 = 380.0;
const POPUP_TOP_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPosition {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupSide {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub left: f64,
    pub top: f64,
    pub side: PopupSide,
}

pub fn popup_placement(card: CardPosition, viewport_width: f64) -> PopupPlacement {
    let top = card.top - POPUP_TOP_OFFSET;
    if card.left + POPUP_REACH < viewport_width - VIEWPORT_MARGIN {
        PopupPlacement {
            left: card.left + POPUP_RIGHT_OFFSET,
            top,
            side: PopupSide::Right,
        }
    } else {
        PopupPlacement {
            left: card.left - POPUP_LEFT_OFFSET,
            top,
            side: PopupSide::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPopup {
    pub agency_name: String,
    pub employment_history: Vec<EmploymentHistoryEntry>,
    pub updated_at: String,
}

impl CardPopup {
    pub fn has_history(&self) -> bool {
        !self.employment_history.is_empty()
    }

    pub fn updated_line(&self) -> String {
        format!("Updated on {}", self.updated_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaidCard {
    pub id: MaidId,
    pub name: String,
    pub nationality: String,
    pub age: u32,
    pub marital_status: String,
    pub type_of_maid: String,
    pub photo_url: String,
    pub popup: CardPopup,
}

impl MaidCard {
    pub fn from_summary(summary: &MaidSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name.clone(),
            nationality: summary.nationality.clone(),
            age: summary.age,
            marital_status: summary.marital_status.clone(),
            type_of_maid: summary.type_of_maid.clone(),
            photo_url: summary.photo_url.clone(),
            popup: CardPopup {
                agency_name: summary.agency_name.clone(),
                employment_history: summary.employment_history.clone(),
                updated_at: summary.updated_at.clone(),
            },
        }
    }

    pub fn detail_path(&self) -> String {
        format!("/maid_info/{}", self.id.0)
    }

    pub fn shortlist_path(&self) -> String {
        format!("/shortlisted_cart/add_to_shortlisted_cart/{}", self.id.0)
    }

    pub fn age_line(&self) -> String {
        format!("{} Yrs old / {}", self.age, self.marital_status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerDirection {
    Previous,
    Next,
}

/// One entry of the page-number strip with its normalised target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStripEntry {
    pub label: String,
    pub target: Option<Url>,
    pub active: bool,
}

impl PageStripEntry {
    pub fn new(link: &PageLink, target: Option<Url>) -> Self {
        Self {
            label: link.label.clone(),
            target,
            active: link.active,
        }
    }

    /// The active page and ellipsis placeholders are not clickable.
    pub fn is_clickable(&self) -> bool {
        !self.active && self.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_opens_right_when_there_is_room() {
        let placement = popup_placement(CardPosition { left: 100.0, top: 50.0 }, 1280.0);
        assert_eq!(placement.side, PopupSide::Right);
        assert_eq!(placement.left, 300.0);
        assert_eq!(placement.top, 40.0);
    }

    #[test]
    fn popup_flips_left_at_the_boundary() {
        // 430 + 600 == 1280 - 250, which is not strictly less.
        let placement = popup_placement(CardPosition { left: 430.0, top: 0.0 }, 1280.0);
        assert_eq!(placement.side, PopupSide::Left);
        assert_eq!(placement.left, 50.0);
        assert_eq!(placement.top, -10.0);

        let placement = popup_placement(CardPosition { left: 429.0, top: 0.0 }, 1280.0);
        assert_eq!(placement.side, PopupSide::Right);
        assert_eq!(placement.left, 629.0);
    }

    #[test]
    fn card_links_follow_maid_id() {
        let card = MaidCard {
            id: MaidId(42),
            name: "Siti".into(),
            nationality: "Indonesian".into(),
            age: 28,
            marital_status: "Married".into(),
            type_of_maid: "New".into(),
            photo_url: "/media/siti.jpg".into(),
            popup: CardPopup {
                agency_name: "Best Agency".into(),
                employment_history: Vec::new(),
                updated_at: "2021-01-05".into(),
            },
        };
        assert_eq!(card.detail_path(), "/maid_info/42");
        assert_eq!(card.shortlist_path(), "/shortlisted_cart/add_to_shortlisted_cart/42");
        assert_eq!(card.age_line(), "28 Yrs old / Married");
        assert!(!card.popup.has_history());
        assert_eq!(card.popup.updated_line(), "Updated on 2021-01-05");
    }

    #[test]
    fn strip_entries_without_target_or_active_are_inert() {
        let target = Url::parse("https://maids.example.com/api/maids/?page=2").ok();
        let link = PageLink {
            url: Some("/api/maids/?page=2".into()),
            label: "2".into(),
            active: false,
        };
        assert!(PageStripEntry::new(&link, target.clone()).is_clickable());

        let active = PageLink { active: true, ..link.clone() };
        assert!(!PageStripEntry::new(&active, target).is_clickable());

        let ellipsis = PageLink { url: None, label: "...".into(), active: false };
        assert!(!PageStripEntry::new(&ellipsis, None).is_clickable());
    }
}

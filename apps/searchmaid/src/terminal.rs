//! Plain-text rendering of the listing page on stdout.

use std::sync::Mutex;

use client_core::{
    CardPosition, ListingView, MaidCard, PageStripEntry, PagerDirection, PopupPlacement, PopupSide,
};
use shared::domain::FilterKey;
use url::Url;

/// Card footprint used to lay the result grid out in pixels (14rem plus margins).
const CARD_WIDTH: f64 = 240.0;
const CARD_HEIGHT: f64 = 430.0;

/// Pixel position of card `index` when cards flow left to right across `viewport_width`.
pub fn card_position(index: usize, viewport_width: f64) -> CardPosition {
    let columns = ((viewport_width / CARD_WIDTH).floor() as usize).max(1);
    CardPosition {
        left: (index % columns) as f64 * CARD_WIDTH,
        top: (index / columns) as f64 * CARD_HEIGHT,
    }
}

#[derive(Default)]
struct Screen {
    cards: Vec<MaidCard>,
    strip: Vec<PageStripEntry>,
}

pub struct TerminalView {
    origin: Url,
    screen: Mutex<Screen>,
}

impl TerminalView {
    pub fn new(listing_url: &Url) -> Self {
        let mut origin = listing_url.clone();
        origin.set_path("/");
        origin.set_query(None);
        Self {
            origin,
            screen: Mutex::new(Screen::default()),
        }
    }

    fn link(&self, path: &str) -> String {
        self.origin
            .join(path)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| path.to_string())
    }

    /// The page-number strip as one line, the active page in brackets.
    pub fn page_strip_line(&self) -> Option<String> {
        self.with_screen(|screen| {
            if screen.strip.is_empty() {
                return None;
            }
            let labels: Vec<String> = screen
                .strip
                .iter()
                .map(|entry| {
                    if entry.active {
                        format!("[{}]", entry.label)
                    } else {
                        entry.label.clone()
                    }
                })
                .collect();
            Some(labels.join(" "))
        })
    }

    fn with_screen<R>(&self, f: impl FnOnce(&mut Screen) -> R) -> R {
        let mut screen = match self.screen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut screen)
    }
}

impl ListingView for TerminalView {
    fn set_control_value(&self, key: FilterKey, value: &str) {
        println!("[{key}] = {value}");
    }

    fn set_result_count(&self, count: u64) {
        println!("{count} maids found");
    }

    fn show_results(&self) {
        self.with_screen(|screen| screen.cards.clear());
        println!("----------------------------------------");
    }

    fn hide_results(&self) {
        println!("(results hidden)");
    }

    fn show_no_results(&self) {
        println!("No results");
    }

    fn append_card(&self, card: &MaidCard) {
        let index = self.with_screen(|screen| {
            screen.cards.push(card.clone());
            screen.cards.len() - 1
        });
        println!("#{index} {} ({})", card.name, card.nationality);
        println!("    {}", card.age_line());
        println!("    {}", card.type_of_maid);
        println!("    photo:     {}", self.link(&card.photo_url));
        println!("    details:   {}", self.link(&card.detail_path()));
        println!("    shortlist: {}", self.link(&card.shortlist_path()));
    }

    fn set_pager(&self, direction: PagerDirection, target: Option<&Url>) {
        let name = match direction {
            PagerDirection::Previous => "prev",
            PagerDirection::Next => "next",
        };
        match target {
            Some(url) => println!("[{name}] -> {url}"),
            None => println!("[{name}] disabled"),
        }
    }

    fn clear_page_strip(&self) {
        self.with_screen(|screen| screen.strip.clear());
    }

    fn insert_page_entry(&self, entry: &PageStripEntry) {
        self.with_screen(|screen| screen.strip.insert(0, entry.clone()));
    }

    fn show_popup(&self, card_index: usize, placement: PopupPlacement) {
        let Some(card) = self.with_screen(|screen| screen.cards.get(card_index).cloned()) else {
            return;
        };
        let side = match placement.side {
            PopupSide::Right => "right",
            PopupSide::Left => "left",
        };
        println!(
            "popup #{card_index} ({side} of card, left={:.0} top={:.0})",
            placement.left, placement.top
        );
        println!("  {}", card.popup.agency_name);
        if card.popup.has_history() {
            println!("  Employment History");
        }
        for entry in &card.popup.employment_history {
            println!("    {} - {}", entry.date_from, entry.date_to);
            println!("    Country: {} | Employer: {}", entry.country, entry.employer);
            println!("    {}", entry.work_duties);
            if !entry.remarks.is_empty() {
                println!("    {}", entry.remarks);
            }
        }
        println!("  {}", card.popup.updated_line());
    }

    fn hide_popup(&self, card_index: usize) {
        println!("popup #{card_index} closed");
    }
}

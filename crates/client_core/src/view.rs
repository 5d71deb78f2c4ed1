//! The page surface the controller draws on.

use shared::domain::FilterKey;
use url::Url;

use crate::cards::{MaidCard, PageStripEntry, PagerDirection, PopupPlacement};

/// Markup the controller drives: filter controls, the result container,
/// the pager and the page-number strip. Implementations own their element
/// state; the controller only issues updates.
pub trait ListingView: Send + Sync {
    /// Shows `value` in the control bound to `key`. `"none"` means no preference.
    fn set_control_value(&self, key: FilterKey, value: &str);

    fn set_result_count(&self, count: u64);

    /// Makes the result container visible and removes any previous cards.
    fn show_results(&self);

    fn hide_results(&self);

    /// Switches the result-count label to its "No" results state.
    fn show_no_results(&self);

    fn append_card(&self, card: &MaidCard);

    /// Enables the button when `target` is present and stores it as the click target.
    fn set_pager(&self, direction: PagerDirection, target: Option<&Url>);

    fn clear_page_strip(&self);

    /// Inserts `entry` immediately after the strip's fixed anchor element.
    fn insert_page_entry(&self, entry: &PageStripEntry);

    fn show_popup(&self, card_index: usize, placement: PopupPlacement);

    fn hide_popup(&self, card_index: usize);
}

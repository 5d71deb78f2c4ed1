use serde::{Deserialize, Serialize};

use crate::{domain::MaidId, error::ContractError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentHistoryEntry {
    pub date_from: String,
    pub date_to: String,
    pub country: String,
    pub employer: String,
    pub work_duties: String,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaidSummary {
    pub id: MaidId,
    pub name: String,
    pub nationality: String,
    pub age: u32,
    pub marital_status: String,
    pub type_of_maid: String,
    pub agency_name: String,
    #[serde(rename = "maid_photo")]
    pub photo_url: String,
    #[serde(rename = "dateupdated")]
    pub updated_at: String,
    pub employment_history: Vec<EmploymentHistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum WireLabel {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WirePageLink(Option<String>, WireLabel, bool);

/// One `(url, label, is_active)` entry of the page-number strip.
/// A missing url marks an ellipsis placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WirePageLink", into = "WirePageLink")]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

impl From<WirePageLink> for PageLink {
    fn from(WirePageLink(url, label, active): WirePageLink) -> Self {
        let label = match label {
            WireLabel::Text(text) => text,
            WireLabel::Number(number) => number.to_string(),
        };
        Self { url, label, active }
    }
}

impl From<PageLink> for WirePageLink {
    fn from(link: PageLink) -> Self {
        WirePageLink(link.url, WireLabel::Text(link.label), link.active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarkup {
    pub page_links: Vec<PageLink>,
}

/// One page of listing results as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub count: u64,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub results: Vec<MaidSummary>,
    pub html: PageMarkup,
}

impl ResultPage {
    pub fn validate(&self) -> Result<(), ContractError> {
        if (self.results.len() as u64) > self.count {
            return Err(ContractError::CountBelowResults {
                count: self.count,
                results: self.results.len(),
            });
        }

        let active = self.html.page_links.iter().filter(|link| link.active).count();
        if active > 1 {
            return Err(ContractError::MultipleActiveLinks { active });
        }

        Ok(())
    }

    pub fn page_links(&self) -> &[PageLink] {
        &self.html.page_links
    }
}

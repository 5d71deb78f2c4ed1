use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(MaidId);

/// Value a filter control reports when nothing is selected.
pub const NO_PREFERENCE: &str = "none";

/// Value the listing endpoint needs for `format` to answer with JSON.
pub const JSON_FORMAT: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    LastUpdated,
    Nationality,
    TypeOfMaid,
    PreferredResponsibility,
    LanguageAbility,
    MaritalStatus,
    AgeGroup,
    Agency,
    SortBy,
    Format,
}

impl FilterKey {
    pub const ALL: [FilterKey; 10] = [
        FilterKey::LastUpdated,
        FilterKey::Nationality,
        FilterKey::TypeOfMaid,
        FilterKey::PreferredResponsibility,
        FilterKey::LanguageAbility,
        FilterKey::MaritalStatus,
        FilterKey::AgeGroup,
        FilterKey::Agency,
        FilterKey::SortBy,
        FilterKey::Format,
    ];

    /// Keys backed by a user-facing select control. `format` is not one of them.
    pub const CONTROLS: [FilterKey; 9] = [
        FilterKey::LastUpdated,
        FilterKey::Nationality,
        FilterKey::TypeOfMaid,
        FilterKey::PreferredResponsibility,
        FilterKey::LanguageAbility,
        FilterKey::MaritalStatus,
        FilterKey::AgeGroup,
        FilterKey::Agency,
        FilterKey::SortBy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::LastUpdated => "last_updated",
            FilterKey::Nationality => "nationality",
            FilterKey::TypeOfMaid => "type_of_maid",
            FilterKey::PreferredResponsibility => "preferred_responsibility",
            FilterKey::LanguageAbility => "language_ability",
            FilterKey::MaritalStatus => "marital_status",
            FilterKey::AgeGroup => "age_group",
            FilterKey::Agency => "agency",
            FilterKey::SortBy => "sort_by",
            FilterKey::Format => "format",
        }
    }

    pub fn from_query_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == key)
    }

    pub fn has_control(self) -> bool {
        self != FilterKey::Format
    }

    fn default_value(self) -> &'static str {
        match self {
            FilterKey::Format => JSON_FORMAT,
            _ => "",
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active search filters and sort order. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<FilterKey, String>,
}

impl Default for FilterState {
    fn default() -> Self {
        let values = FilterKey::ALL
            .into_iter()
            .map(|key| (key, key.default_value().to_string()))
            .collect();
        Self { values }
    }
}

impl FilterState {
    pub fn get(&self, key: FilterKey) -> &str {
        self.values
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_value())
    }

    /// Stores a control value, mapping the `"none"` sentinel to an empty string.
    pub fn set(&mut self, key: FilterKey, value: &str) {
        let stored = if value == NO_PREFERENCE { "" } else { value };
        self.values.insert(key, stored.to_string());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    /// All keys in declaration order, ready to be sent as query parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterKey::ALL
            .into_iter()
            .map(|key| (key.as_str(), self.get(key).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_carries_every_key() {
        let state = FilterState::default();
        let pairs = state.query_pairs();
        assert_eq!(pairs.len(), FilterKey::ALL.len());
        for (name, value) in pairs {
            if name == "format" {
                assert_eq!(value, "json");
            } else {
                assert_eq!(value, "", "{name} should start empty");
            }
        }
    }

    #[test]
    fn none_sentinel_is_stored_as_empty() {
        let mut state = FilterState::default();
        state.set(FilterKey::Nationality, "PH");
        assert_eq!(state.get(FilterKey::Nationality), "PH");
        state.set(FilterKey::Nationality, "none");
        assert_eq!(state.get(FilterKey::Nationality), "");
    }

    #[test]
    fn reset_restores_json_format() {
        let mut state = FilterState::default();
        state.set(FilterKey::SortBy, "price");
        state.set(FilterKey::Format, "api");
        assert!(!state.is_cleared());
        state.reset();
        assert!(state.is_cleared());
        assert_eq!(state.get(FilterKey::Format), "json");
    }

    #[test]
    fn query_keys_round_trip_through_names() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::from_query_key(key.as_str()), Some(key));
        }
        assert_eq!(FilterKey::from_query_key("page"), None);
        assert!(!FilterKey::Format.has_control());
        assert!(FilterKey::CONTROLS.iter().all(|key| key.has_control()));
    }
}

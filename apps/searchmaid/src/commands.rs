//! Terminal commands standing in for the listing page's controls.

use shared::domain::FilterKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFilter { key: FilterKey, value: String },
    Reset,
    Refresh,
    Next,
    Previous,
    Page { label: String },
    Hover { index: usize },
    Unhover { index: usize },
    ShowFilters,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a filter control")]
    UnknownFilter(String),
}

pub const HELP: &str = "\
commands:
  set <filter> <value>   change a filter control (value 'none' clears it)
  reset                  clear every filter
  refresh                search again with the current filters
  next | prev            follow the pager
  page <label>           follow a numbered page link
  hover <n> | unhover <n>  open or close the detail popup of card n
  filters                print the current filters
  quit
filters: last_updated nationality type_of_maid preferred_responsibility
         language_ability marital_status age_group agency sort_by";

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetFilter { .. } => "set",
            Command::Reset => "reset",
            Command::Refresh => "refresh",
            Command::Next => "next",
            Command::Previous => "prev",
            Command::Page { .. } => "page",
            Command::Hover { .. } => "hover",
            Command::Unhover { .. } => "unhover",
            Command::ShowFilters => "filters",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "set" => {
                let key = words.next().ok_or(CommandError::Usage("set <filter> <value>"))?;
                let value = words.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(CommandError::Usage("set <filter> <value>"));
                }
                let key = FilterKey::from_query_key(key)
                    .filter(|key| key.has_control())
                    .ok_or_else(|| CommandError::UnknownFilter(key.to_string()))?;
                Command::SetFilter { key, value }
            }
            "reset" => Command::Reset,
            "refresh" => Command::Refresh,
            "next" => Command::Next,
            "prev" | "previous" => Command::Previous,
            "page" => {
                let label = words.next().ok_or(CommandError::Usage("page <label>"))?;
                Command::Page {
                    label: label.to_string(),
                }
            }
            "hover" => Command::Hover {
                index: parse_index(words.next(), "hover <n>")?,
            },
            "unhover" => Command::Unhover {
                index: parse_index(words.next(), "unhover <n>")?,
            },
            "filters" => Command::ShowFilters,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_index(word: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    word.and_then(|w| w.parse::<usize>().ok())
        .ok_or(CommandError::Usage(usage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_changes_with_spaces_in_value() {
        assert_eq!(
            Command::parse("set preferred_responsibility Care of Elderly"),
            Ok(Some(Command::SetFilter {
                key: FilterKey::PreferredResponsibility,
                value: "Care of Elderly".into(),
            }))
        );
    }

    #[test]
    fn format_is_not_a_control() {
        assert_eq!(
            Command::parse("set format xml"),
            Err(CommandError::UnknownFilter("format".into()))
        );
        assert_eq!(
            Command::parse("set nationality"),
            Err(CommandError::Usage("set <filter> <value>"))
        );
    }

    #[test]
    fn parses_navigation_and_hover() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(Command::parse("PREV"), Ok(Some(Command::Previous)));
        assert_eq!(
            Command::parse("page 3"),
            Ok(Some(Command::Page { label: "3".into() }))
        );
        assert_eq!(
            Command::parse("hover 2"),
            Ok(Some(Command::Hover { index: 2 }))
        );
        assert_eq!(
            Command::parse("unhover x"),
            Err(CommandError::Usage("unhover <n>"))
        );
        assert!(matches!(
            Command::parse("carousel"),
            Err(CommandError::Unknown(_))
        ));
    }
}

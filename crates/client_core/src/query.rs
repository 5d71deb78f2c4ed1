//! Query-string seeding and page-URL normalisation.

use std::collections::HashMap;

use url::{form_urlencoded, Url};

use crate::error::FetchError;

/// Decodes a page query string into key/value pairs. A leading `?` is
/// ignored and a repeated key keeps its last value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Resolves a server-provided page URL onto the listing endpoint's origin.
///
/// Relative URLs are joined onto `listing_url`. Absolute URLs keep their path
/// and query but take scheme, host and port from `listing_url`, so a backend
/// behind a proxy that reports `http://internal:8000/...` still lands on the
/// public origin.
pub fn resolve_page_url(listing_url: &Url, raw: &str) -> Result<Url, FetchError> {
    let mut resolved = listing_url.join(raw.trim())?;

    if resolved.origin() == listing_url.origin() {
        return Ok(resolved);
    }

    resolved
        .set_scheme(listing_url.scheme())
        .map_err(|()| FetchError::InvalidUrl(format!("cannot rewrite scheme of {raw}")))?;
    resolved.set_host(listing_url.host_str())?;
    resolved
        .set_port(listing_url.port())
        .map_err(|()| FetchError::InvalidUrl(format!("cannot rewrite port of {raw}")))?;

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Url {
        Url::parse("https://maids.example.com/api/maids/").expect("listing url")
    }

    #[test]
    fn decodes_values_and_ignores_leading_question_mark() {
        let parsed = parse_query_string("?nationality=PH&preferred_responsibility=Care%20of%20Elderly");
        assert_eq!(parsed.get("nationality").map(String::as_str), Some("PH"));
        assert_eq!(
            parsed.get("preferred_responsibility").map(String::as_str),
            Some("Care of Elderly")
        );
    }

    #[test]
    fn last_occurrence_wins_and_bare_keys_are_empty() {
        let parsed = parse_query_string("type_of_maid=NEW&type_of_maid=TRF&agency");
        assert_eq!(parsed.get("type_of_maid").map(String::as_str), Some("TRF"));
        assert_eq!(parsed.get("agency").map(String::as_str), Some(""));
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn relative_page_urls_join_the_listing_endpoint() {
        let resolved = resolve_page_url(&listing(), "/api/maids/?page=2").expect("resolve");
        assert_eq!(resolved.as_str(), "https://maids.example.com/api/maids/?page=2");

        let resolved = resolve_page_url(&listing(), "?page=3&format=json").expect("resolve");
        assert_eq!(
            resolved.as_str(),
            "https://maids.example.com/api/maids/?page=3&format=json"
        );
    }

    #[test]
    fn absolute_page_urls_are_moved_onto_the_listing_origin() {
        let resolved =
            resolve_page_url(&listing(), "http://10.0.0.7:8000/api/maids/?page=2&sort_by=price")
                .expect("resolve");
        assert_eq!(
            resolved.as_str(),
            "https://maids.example.com/api/maids/?page=2&sort_by=price"
        );
    }

    #[test]
    fn listing_port_is_preserved() {
        let listing = Url::parse("http://127.0.0.1:4100/api/maids/").expect("listing url");
        let resolved =
            resolve_page_url(&listing, "https://maids.example.com/api/maids/?page=5").expect("resolve");
        assert_eq!(resolved.as_str(), "http://127.0.0.1:4100/api/maids/?page=5");
    }
}

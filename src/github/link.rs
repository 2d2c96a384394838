use std::collections::HashMap;

use super::GithubError;

/// Parse an RFC 5988 `Link` header into a map of relation name to URL.
///
/// Each comma-separated segment must look like `<url>; rel="name"`. A segment
/// that does not split into exactly two `;` parts fails the whole parse.
pub fn parse_link_header(header: &str) -> Result<HashMap<String, String>, GithubError> {
    if header.is_empty() {
        return Err(GithubError::InvalidHeaderFormat(
            "link header must not be empty".to_string(),
        ));
    }

    let mut links = HashMap::new();
    for segment in header.split(',') {
        let parts: Vec<&str> = segment.split(';').collect();
        let [url_part, rel_part] = parts.as_slice() else {
            return Err(GithubError::InvalidHeaderFormat(format!(
                "segment could not be split on ';': {}",
                segment.trim()
            )));
        };

        let url = strip_enclosing(url_part.trim(), "<", ">").trim();
        let name = strip_enclosing(rel_part.trim(), "rel=\"", "\"").trim();
        links.insert(name.to_string(), url.to_string());
    }

    Ok(links)
}

fn strip_enclosing<'a>(value: &'a str, prefix: &str, suffix: &str) -> &'a str {
    value
        .strip_prefix(prefix)
        .and_then(|inner| inner.strip_suffix(suffix))
        .unwrap_or(value)
}

/// Resolve the last reachable page number from a parsed link header.
///
/// The `page` query parameter of the `last` relation wins when present;
/// otherwise `previous` is carried forward unchanged.
pub fn resolve_page_limit(
    links: Option<&HashMap<String, String>>,
    previous: Option<u32>,
) -> Option<u32> {
    links
        .and_then(|links| links.get("last"))
        .and_then(|last| last_page_number(last))
        .or(previous)
}

fn last_page_number(url: &str) -> Option<u32> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let page = parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())?;
    page.parse::<u32>().ok().filter(|page| *page > 0)
}

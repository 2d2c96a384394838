use tracing::{debug, instrument, warn};

use super::link::{parse_link_header, resolve_page_limit};
use super::{Event, GithubError, HttpFetch};

/// Everything a paginated walk of a user's event feed collected.
#[derive(Debug, Default)]
pub struct EventHistory {
    /// Events in feed order (newest first), page by page
    pub events: Vec<Event>,
    /// Number of page requests issued
    pub pages_fetched: u32,
    /// True when the walk stopped at the API's page ceiling rather than an empty page
    pub truncated: bool,
}

/// Build the URL for one page of a user's public event feed.
///
/// The username is pushed as a single percent-encoded path segment, so it can
/// never add segments of its own.
pub fn events_url(api_url: &str, username: &str, page: u32) -> Result<String, GithubError> {
    let mut url = reqwest::Url::parse(api_url)
        .map_err(|e| GithubError::InvalidApiUrl(format!("{}: {}", api_url, e)))?;
    url.path_segments_mut()
        .map_err(|()| GithubError::InvalidApiUrl(api_url.to_string()))?
        .pop_if_empty()
        .extend(["users", username, "events"]);
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url.to_string())
}

/// Reject an empty username before any request goes out.
pub fn validate_username(username: &str) -> Result<(), GithubError> {
    if username.is_empty() {
        Err(GithubError::InvalidUsername(username.to_string()))
    } else {
        Ok(())
    }
}

/// Fetch a user's event feed page by page until an empty page or the page ceiling.
///
/// Pages are requested strictly in sequence: the ceiling comes from each
/// response's `link` header and must be re-checked before asking for more.
/// The page that reaches the ceiling is not included in the result.
#[instrument(skip(client, api_url))]
pub async fn fetch_events(
    client: &dyn HttpFetch,
    api_url: &str,
    username: &str,
) -> Result<EventHistory, GithubError> {
    validate_username(username)?;

    let mut history = EventHistory::default();
    let mut page: u32 = 1;
    let mut page_limit: Option<u32> = None;

    loop {
        let response = client.get(&events_url(api_url, username, page)?).await?;
        history.pages_fetched += 1;

        let link = response.link.clone();
        let events: Vec<Event> = response.decode()?;
        if events.is_empty() {
            debug!(page, "reached empty page");
            return Ok(history);
        }

        let links = link.as_deref().map(parse_link_header).transpose()?;
        page_limit = resolve_page_limit(links.as_ref(), page_limit);
        if page_limit.is_some_and(|limit| page >= limit) {
            warn!(
                page,
                limit = page_limit,
                "ending query early due to GitHub API fetch limits"
            );
            // the flag mirrors the warning above for callers and tests
            history.truncated = true;
            return Ok(history);
        }

        debug!(page, count = events.len(), limit = page_limit, "fetched event page");
        history.events.extend(events);
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::ScriptedFetch;
    use serde_json::json;

    const API: &str = "https://api.test";

    fn push_event(id: &str) -> serde_json::Value {
        json!({ "id": id, "type": "PushEvent", "payload": {} })
    }

    fn page_url(page: u32) -> String {
        events_url(API, "octocat", page).unwrap()
    }

    fn event_count(history: &EventHistory) -> usize {
        history.events.len()
    }

    #[test]
    fn test_events_url() {
        assert_eq!(
            events_url("https://api.github.com/", "octocat", 3).unwrap(),
            "https://api.github.com/users/octocat/events?page=3"
        );
        assert_eq!(
            events_url("https://ghe.example.com/api/v3", "octocat_acme", 1).unwrap(),
            "https://ghe.example.com/api/v3/users/octocat_acme/events?page=1"
        );
    }

    #[test]
    fn test_events_url_encodes_username_as_one_segment() {
        assert_eq!(
            events_url(API, "a/b?c", 1).unwrap(),
            "https://api.test/users/a%2Fb%3Fc/events?page=1"
        );
    }

    #[test]
    fn test_events_url_rejects_unparseable_api_url() {
        assert!(matches!(
            events_url("not a url", "octocat", 1),
            Err(GithubError::InvalidApiUrl(_))
        ));
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("octocat").is_ok());
        assert!(validate_username("octocat_acme").is_ok());
        assert!(validate_username("").is_err());
    }

    #[tokio::test]
    async fn test_fetch_events_stops_at_empty_page() {
        let client = ScriptedFetch::new()
            .respond(
                &page_url(1),
                json!([push_event("1"), push_event("2")]),
                None,
            )
            .respond(&page_url(2), json!([push_event("3")]), None)
            .respond(&page_url(3), json!([]), None);

        let history = fetch_events(&client, API, "octocat").await.unwrap();

        assert_eq!(event_count(&history), 3);
        let kinds: Vec<_> = history.events.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["PushEvent"; 3]);
        assert!(!history.truncated);
        assert_eq!(history.pages_fetched, 3);
        assert_eq!(
            client.requests(),
            vec![
                page_url(1),
                page_url(2),
                page_url(3),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_events_keeps_page_order() {
        let client = ScriptedFetch::new()
            .respond(
                &page_url(1),
                json!([{ "type": "WatchEvent", "payload": {} }]),
                None,
            )
            .respond(
                &page_url(2),
                json!([{ "type": "ForkEvent", "payload": {} }]),
                None,
            )
            .respond(&page_url(3), json!([]), None);

        let history = fetch_events(&client, API, "octocat").await.unwrap();
        let kinds: Vec<_> = history.events.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["WatchEvent", "ForkEvent"]);
    }

    #[tokio::test]
    async fn test_fetch_events_halts_at_page_limit() {
        let page_1_link = format!(
            "<{}>; rel=\"next\", <{}>; rel=\"last\"",
            page_url(2),
            page_url(2)
        );
        let page_2_link = format!(
            "<{}>; rel=\"first\", <{}>; rel=\"prev\"",
            page_url(1),
            page_url(1)
        );
        let client = ScriptedFetch::new()
            .respond(
                &page_url(1),
                json!([push_event("1")]),
                Some(&page_1_link),
            )
            .respond(
                &page_url(2),
                json!([push_event("2")]),
                Some(&page_2_link),
            )
            .respond(&page_url(3), json!([push_event("3")]), None);

        let history = fetch_events(&client, API, "octocat").await.unwrap();

        // truncated is set in the same branch that logs the fetch-limit warning
        assert!(history.truncated);
        // the page that hit the ceiling is dropped
        assert_eq!(event_count(&history), 1);
        assert_eq!(client.requests().len(), 2);
        assert!(!client.requests().contains(&page_url(3)));
    }

    #[tokio::test]
    async fn test_fetch_events_limit_of_one_returns_nothing() {
        let link = format!("<{}>; rel=\"last\"", page_url(1));
        let client = ScriptedFetch::new().respond(
            &page_url(1),
            json!([push_event("1")]),
            Some(&link),
        );

        let history = fetch_events(&client, API, "octocat").await.unwrap();
        assert!(history.truncated);
        assert!(history.events.is_empty());
        assert_eq!(history.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_fetch_events_malformed_link_aborts() {
        let client = ScriptedFetch::new().respond(
            &page_url(1),
            json!([push_event("1")]),
            Some("<https://api.test/users/octocat/events?page=2>"),
        );

        let err = fetch_events(&client, API, "octocat").await.unwrap_err();
        assert!(matches!(err, GithubError::InvalidHeaderFormat(_)));
    }

    #[tokio::test]
    async fn test_fetch_events_transport_failure_propagates() {
        let client = ScriptedFetch::new().respond(
            &page_url(1),
            json!([push_event("1")]),
            None,
        );

        // page 2 is unscripted and answers 404
        let err = fetch_events(&client, API, "octocat").await.unwrap_err();
        assert!(matches!(err, GithubError::UnexpectedStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_events_rejects_empty_username_without_requests() {
        let client = ScriptedFetch::new();
        let err = fetch_events(&client, API, "").await.unwrap_err();
        assert!(matches!(err, GithubError::InvalidUsername(_)));
        assert!(client.requests().is_empty());
    }
}

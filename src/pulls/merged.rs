use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, debug_span, instrument, Instrument};

use crate::github::{GithubError, HttpFetch, PullRequest};

/// Refetch every pull request from its canonical URL and keep the merged ones.
///
/// All refetches run concurrently; results are slotted back by input index so
/// the output keeps input order. The first failure aborts the rest.
#[instrument(skip_all, fields(count = pull_requests.len()))]
pub async fn resolve_merged(
    client: Arc<dyn HttpFetch>,
    pull_requests: Vec<PullRequest>,
) -> Result<Vec<PullRequest>, GithubError> {
    let mut join_set = JoinSet::new();
    let mut slots: Vec<Option<PullRequest>> = vec![None; pull_requests.len()];

    for (index, stale) in pull_requests.into_iter().enumerate() {
        let client = Arc::clone(&client);
        let span = debug_span!("refetch", index, url = %stale.url);
        join_set.spawn(
            async move {
                let current: PullRequest = client.get(&stale.url).await?.decode()?;
                debug!(merged = current.merged, "refetched pull request");
                Ok::<_, GithubError>((index, current))
            }
            .instrument(span),
        );
    }

    while let Some(joined) = join_set.join_next().await {
        let (index, current) = joined??;
        if let Some(slot) = slots.get_mut(index) {
            *slot = Some(current);
        }
    }

    Ok(slots.into_iter().flatten().filter(|pr| pr.merged).collect())
}

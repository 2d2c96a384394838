use crate::github::PullRequest;

/// How the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored listing (stdout) or markdown (file)
    Text,
    /// Pretty-printed JSON array of the refetched pull requests
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Merged pull requests for one user, ready for rendering.
#[derive(Debug)]
pub struct Report {
    /// GitHub login the report is about
    pub username: String,
    /// Refetched, merged pull requests in feed order (newest first)
    pub pull_requests: Vec<PullRequest>,
}

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub repository: Option<String>,
    pub number: u64,
    pub title: String,
    pub link: String,
    pub merged_at: Option<String>,
}

impl ReportEntry {
    pub fn from_pull_request(pr: &PullRequest) -> Self {
        Self {
            repository: repository_from_api_url(&pr.url),
            number: pr.number,
            title: pr.title.clone().unwrap_or_else(|| "(untitled)".to_string()),
            link: pr.html_url.clone().unwrap_or_else(|| pr.url.clone()),
            merged_at: pr.merged_at.clone(),
        }
    }

    /// `owner/repo#number`, or `#number` when the repository is unknown.
    pub fn reference(&self) -> String {
        match &self.repository {
            Some(repo) => format!("{}#{}", repo, self.number),
            None => format!("#{}", self.number),
        }
    }
}

/// Pull `owner/repo` out of a `.../repos/{owner}/{repo}/pulls/{n}` API URL.
fn repository_from_api_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segments: Vec<_> = parsed.path_segments()?.collect();
    let repos = segments.iter().position(|segment| *segment == "repos")?;
    match segments.get(repos + 1..repos + 4)? {
        [owner, repo, "pulls"] => Some(format!("{}/{}", owner, repo)),
        _ => None,
    }
}

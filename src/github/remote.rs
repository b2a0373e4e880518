//! Remote URL parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{WorkflowError, WorkflowResult};

/// Host used when a remote URL carries none (local paths, `file://`).
pub const DEFAULT_HOST: &str = "github.com";

// scheme, optional `git@`, host, then any path prefix before owner/repo
static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z+]+://)?(?:git@)?([^/:]*)[/:](?:[^/]+/)*([^/]+)/([^/]+?)(?:\.git)?/?$")
        .expect("remote url pattern is valid")
});

/// The repository a remote points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    /// `https://<host>/<owner>/<repo>`.
    pub fn web_root(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo)
    }
}

/// Parse `git@github.com:acme/widgets.git`, `https://github.com/acme/widgets`
/// and similar.
pub fn parse_remote_url(url: &str) -> WorkflowResult<GitHubRepo> {
    let caps = REMOTE_URL
        .captures(url.trim())
        .ok_or_else(|| unparseable(url))?;
    let host = caps.get(1).map_or("", |m| m.as_str());
    let (Some(owner), Some(repo)) = (caps.get(2), caps.get(3)) else {
        return Err(unparseable(url));
    };
    Ok(GitHubRepo {
        host: if host.is_empty() { DEFAULT_HOST } else { host }.to_string(),
        owner: owner.as_str().to_string(),
        repo: repo.as_str().to_string(),
    })
}

/// The fork's URL: `origin_url` with the owner replaced by `user`.
///
/// Keeps the scheme, host and path shape of the origin remote, so SSH
/// origins get SSH forks.
pub fn fork_remote_url(origin_url: &str, user: &str) -> WorkflowResult<String> {
    let url = origin_url.trim();
    let caps = REMOTE_URL.captures(url).ok_or_else(|| unparseable(url))?;
    let owner = caps.get(2).ok_or_else(|| unparseable(url))?;
    Ok(format!(
        "{}{}{}",
        &url[..owner.start()],
        user,
        &url[owner.end()..]
    ))
}

fn unparseable(url: &str) -> WorkflowError {
    WorkflowError::user(format!(
        "Couldn't work out the GitHub repository from remote URL '{}'",
        url
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(host: &str, owner: &str, name: &str) -> GitHubRepo {
        GitHubRepo {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: name.to_string(),
        }
    }

    #[test]
    fn parses_common_shapes() {
        let expected = repo("github.com", "acme", "widgets");
        for url in [
            "git@github.com:acme/widgets.git",
            "git@github.com:acme/widgets",
            "https://github.com/acme/widgets.git",
            "https://github.com/acme/widgets",
            "ssh://git@github.com/acme/widgets.git",
            "git+ssh://git@github.com/acme/widgets.git",
        ] {
            assert_eq!(parse_remote_url(url).unwrap(), expected, "{}", url);
        }
    }

    #[test]
    fn keeps_enterprise_hosts_and_aliases() {
        assert_eq!(
            parse_remote_url("git@github.example.com:acme/widgets.git").unwrap(),
            repo("github.example.com", "acme", "widgets")
        );
        assert_eq!(
            parse_remote_url("gh:acme/widgets").unwrap(),
            repo("gh", "acme", "widgets")
        );
    }

    #[test]
    fn local_paths_default_the_host() {
        assert_eq!(
            parse_remote_url("/tmp/x/acme/widgets.git").unwrap(),
            repo("github.com", "acme", "widgets")
        );
        assert_eq!(
            parse_remote_url("file:///tmp/x/acme/widgets.git").unwrap(),
            repo("github.com", "acme", "widgets")
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_remote_url("widgets").is_err());
        assert!(parse_remote_url("").is_err());
    }

    #[test]
    fn fork_url_swaps_owner_only() {
        assert_eq!(
            fork_remote_url("git@github.com:acme/widgets.git", "jdoe").unwrap(),
            "git@github.com:jdoe/widgets.git"
        );
        assert_eq!(
            fork_remote_url("https://github.com/acme/widgets", "jdoe").unwrap(),
            "https://github.com/jdoe/widgets"
        );
        assert_eq!(
            fork_remote_url("/tmp/acme/acme/widgets.git", "jdoe").unwrap(),
            "/tmp/acme/jdoe/widgets.git"
        );
    }

    #[test]
    fn web_root() {
        assert_eq!(
            repo("github.com", "acme", "widgets").web_root(),
            "https://github.com/acme/widgets"
        );
    }
}

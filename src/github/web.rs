//! Browser URLs.

use super::remote::GitHubRepo;

/// Where to create a fork of `repo`.
pub fn fork_creation_url(repo: &GitHubRepo) -> String {
    format!("{}/fork", repo.web_root())
}

/// A pre-filled pull request form.
///
/// `head_owner` is set when the head branch lives on a fork; GitHub then
/// expects `owner:branch`.
pub fn compare_url(
    repo: &GitHubRepo,
    base: &str,
    head_owner: Option<&str>,
    head: &str,
    title: &str,
    body: &str,
) -> String {
    let head = match head_owner {
        Some(owner) => format!("{}:{}", owner, head),
        None => head.to_string(),
    };
    format!(
        "{}/compare/{}...{}?expand=1&title={}&body={}",
        repo.web_root(),
        base,
        head,
        urlencoding::encode(title),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> GitHubRepo {
        GitHubRepo {
            host: "github.com".to_string(),
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
        }
    }

    #[test]
    fn fork_url() {
        assert_eq!(
            fork_creation_url(&widgets()),
            "https://github.com/acme/widgets/fork"
        );
    }

    #[test]
    fn compare_from_origin() {
        assert_eq!(
            compare_url(
                &widgets(),
                "main",
                None,
                "jdoe/feature/main/kittens",
                "Add kittens",
                ""
            ),
            "https://github.com/acme/widgets/compare/main...jdoe/feature/main/kittens\
             ?expand=1&title=Add%20kittens&body="
        );
    }

    #[test]
    fn compare_from_fork_escapes_body() {
        let url = compare_url(
            &widgets(),
            "release",
            Some("jdoe"),
            "feature/release/kittens",
            "Fix & ship",
            "line one\nline two",
        );
        assert!(url.starts_with(
            "https://github.com/acme/widgets/compare/release...jdoe:feature/release/kittens?"
        ));
        assert!(url.contains("title=Fix%20%26%20ship"));
        assert!(url.contains("body=line%20one%0Aline%20two"));
    }
}

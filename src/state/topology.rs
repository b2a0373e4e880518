//! Parent/remote topology of feature branches.
//!
//! A feature branch `kittens` started from `main` by `jdoe` is pushed as
//! `jdoe/feature/main/kittens` on `origin` (or `feature/main/kittens` on a
//! fork) and tracks it. Git's own `branch.<name>.remote` / `branch.<name>.merge`
//! keys therefore carry everything needed to recover the [`ParentLink`]; no
//! other state is stored.

use tracing::debug;

use super::codec;
use crate::error::{WorkflowError, WorkflowResult};
use crate::git::GitConfigMap;
use crate::types::RemoteKind;
use crate::vcs::Vcs;

/// Path segment that marks a feature branch on the remote.
const FEATURE_SEGMENT: &str = "feature";

/// Where a feature branch lives and what it merges back into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    pub remote: RemoteKind,
    pub parent: String,
}

impl ParentLink {
    /// Recover the link from `branch.<branch>.remote` and `branch.<branch>.merge`.
    ///
    /// Returns `None` if either key is missing, the remote is neither
    /// `origin` nor `fork`, or the merge ref is not a feature-branch ref.
    pub fn from_config(config: &GitConfigMap, branch: &str) -> Option<Self> {
        let remote: RemoteKind = config.branch_value(branch, "remote")?.parse().ok()?;
        let merge_ref = config.branch_value(branch, "merge")?;
        let parent = parent_from_merge_ref(remote, merge_ref)?;
        Some(ParentLink { remote, parent })
    }

    /// The remote branch name for `feature` under this link.
    pub fn remote_branch(&self, feature: &str, owner: &str) -> String {
        remote_name_for(feature, &self.parent, self.remote.is_fork(), owner)
    }
}

/// Decode the parent from a tracked merge ref.
///
/// Origin refs look like `refs/heads/<owner>/feature/<enc>/<name>`; fork refs
/// omit the owner: `refs/heads/feature/<enc>/<name>`.
pub fn parent_from_merge_ref(remote: RemoteKind, merge_ref: &str) -> Option<String> {
    let path = merge_ref.strip_prefix("refs/heads/")?;
    let segments: Vec<&str> = path.split('/').collect();

    let feature_at = match remote {
        RemoteKind::Origin => 1,
        RemoteKind::Fork => 0,
    };
    // feature marker, at least one parent segment, the branch name
    if segments.len() < feature_at + 3 || segments[feature_at] != FEATURE_SEGMENT {
        return None;
    }
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let encoded = segments[feature_at + 1..segments.len() - 1].join("/");
    Some(codec::decode(&encoded))
}

/// Remote branch name for a new feature branch.
///
/// `{owner}/feature/{encode(parent)}/{feature}`, without the owner prefix on
/// a fork (the fork itself already belongs to the owner).
pub fn remote_name_for(feature: &str, parent: &str, on_fork: bool, owner: &str) -> String {
    let encoded = codec::encode(parent);
    if on_fork {
        format!("{}/{}/{}", FEATURE_SEGMENT, encoded, feature)
    } else {
        format!("{}/{}/{}/{}", owner, FEATURE_SEGMENT, encoded, feature)
    }
}

/// Resolve the parent link of a local branch.
///
/// Every command that works on a feature branch depends on this, so a
/// missing or malformed link is a hard error rather than a default.
pub async fn resolve_parent<G: Vcs>(git: &G, branch: &str) -> WorkflowResult<ParentLink> {
    let config = git.config().await?;
    match ParentLink::from_config(&config, branch) {
        Some(link) => {
            debug!(branch, remote = %link.remote, parent = %link.parent, "resolved parent");
            Ok(link)
        }
        None => Err(not_a_feature_branch(branch)),
    }
}

fn not_a_feature_branch(branch: &str) -> WorkflowError {
    WorkflowError::user(format!(
        "Couldn't find parent for branch '{}' - not a feature branch?",
        branch
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(pairs: &[(&str, &str)]) -> GitConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn remote_names() {
        assert_eq!(
            remote_name_for("kittens", "main", false, "jdoe"),
            "jdoe/feature/main/kittens"
        );
        assert_eq!(
            remote_name_for("kittens", "main", true, "jdoe"),
            "feature/main/kittens"
        );
        assert_eq!(
            remote_name_for("kittens", "release/2.0", false, "jdoe"),
            "jdoe/feature/release_2f2.0/kittens"
        );
    }

    #[test]
    fn origin_link_from_config() {
        let cfg = config(&[
            ("branch.kittens.remote", "origin"),
            ("branch.kittens.merge", "refs/heads/jdoe/feature/main/kittens"),
        ]);
        assert_eq!(
            ParentLink::from_config(&cfg, "kittens"),
            Some(ParentLink {
                remote: RemoteKind::Origin,
                parent: "main".to_string()
            })
        );
    }

    #[test]
    fn fork_link_from_config() {
        let cfg = config(&[
            ("branch.kittens.remote", "fork"),
            ("branch.kittens.merge", "refs/heads/feature/my_5fparent/kittens"),
        ]);
        assert_eq!(
            ParentLink::from_config(&cfg, "kittens"),
            Some(ParentLink {
                remote: RemoteKind::Fork,
                parent: "my_parent".to_string()
            })
        );
    }

    #[test]
    fn cascade_branches_are_not_feature_branches() {
        let cfg = config(&[
            ("branch.release.remote", "origin"),
            ("branch.release.merge", "refs/heads/release"),
        ]);
        assert_eq!(ParentLink::from_config(&cfg, "release"), None);
    }

    #[test]
    fn missing_keys_are_not_feature_branches() {
        let cfg = config(&[("branch.kittens.remote", "origin")]);
        assert_eq!(ParentLink::from_config(&cfg, "kittens"), None);
        assert_eq!(ParentLink::from_config(&GitConfigMap::default(), "kittens"), None);
    }

    #[test]
    fn unknown_remote_is_not_a_feature_branch() {
        let cfg = config(&[
            ("branch.kittens.remote", "upstream"),
            ("branch.kittens.merge", "refs/heads/jdoe/feature/main/kittens"),
        ]);
        assert_eq!(ParentLink::from_config(&cfg, "kittens"), None);
    }

    #[test]
    fn merge_ref_without_feature_marker_is_rejected() {
        assert_eq!(
            parent_from_merge_ref(RemoteKind::Origin, "refs/heads/jdoe/topic/main/kittens"),
            None
        );
        assert_eq!(
            parent_from_merge_ref(RemoteKind::Fork, "refs/heads/jdoe/feature/main/kittens"),
            None
        );
        assert_eq!(
            parent_from_merge_ref(RemoteKind::Origin, "refs/tags/jdoe/feature/main/kittens"),
            None
        );
    }

    #[test]
    fn unencoded_nested_parent_is_still_recovered() {
        assert_eq!(
            parent_from_merge_ref(
                RemoteKind::Origin,
                "refs/heads/jdoe/feature/release/2.0/kittens"
            ),
            Some("release/2.0".to_string())
        );
    }

    #[test]
    fn not_a_feature_branch_message() {
        assert_eq!(
            not_a_feature_branch("main").to_string(),
            "Couldn't find parent for branch 'main' - not a feature branch?"
        );
    }

    proptest! {
        #[test]
        fn link_round_trips_through_merge_ref(
            feature in "[a-zA-Z0-9_-]{1,20}",
            parent_parts in prop::collection::vec("[a-zA-Z0-9_.-]{1,10}", 1..4),
            on_fork in any::<bool>(),
        ) {
            let parent = parent_parts.join("/");
            let remote = if on_fork { RemoteKind::Fork } else { RemoteKind::Origin };
            let merge_ref = format!("refs/heads/{}", remote_name_for(&feature, &parent, on_fork, "jdoe"));
            prop_assert_eq!(parent_from_merge_ref(remote, &merge_ref), Some(parent));
        }
    }
}

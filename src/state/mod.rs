//! Feature-branch topology.
//!
//! `codec` escapes parent names into a single ref segment; `topology` reads
//! and writes the parent/remote link that git's tracking configuration holds
//! for each feature branch.

pub mod codec;
pub mod topology;

pub use topology::{ParentLink, parent_from_merge_ref, remote_name_for, resolve_parent};

pub mod branch_name;
pub mod remote_key;
pub mod repo_slug;

pub use branch_name::{BranchName, BranchNameError};
pub use remote_key::RemoteKey;
pub use repo_slug::{RepoSlug, RepoSlugError};

pub mod commit_lookup;

pub use commit_lookup::{CommitLookup, CommitLookupError, GithubCommitLookup, GITHUB_API_BASE};

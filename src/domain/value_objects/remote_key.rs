use std::fmt;

/// Canonical identity of a (repository, branch) pair: `owner/name@branch`.
///
/// Two remotes are the same unit of synchronization and installation exactly
/// when their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemoteKey(String);

impl RemoteKey {
    pub fn new(repo: &str, branch: &str) -> Self {
        Self(format!("{}@{}", repo, branch))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name of the local clone for this key.
    ///
    /// ASCII alphanumerics, `-` and `.` are kept; every other byte (including
    /// `_` itself) is written as `_XX` hex. The mapping is injective, so two
    /// distinct keys never share a clone directory, and it contains no path
    /// separators.
    pub fn dir_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 8);
        for byte in self.0.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                out.push(byte as char);
            } else {
                out.push_str(&format!("_{:02X}", byte));
            }
        }
        out
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use crate::common::error::RefdocsError;
use std::path::Path;

/// refdocs全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use refdocs::common::result::RefdocsResult;
/// use refdocs::common::error::RefdocsError;
///
/// fn example_with_error() -> RefdocsResult<()> {
///     let io_error = std::io::Error::new(std::io::ErrorKind::Other, "boom");
///     Err(RefdocsError::pipeline_error_with_source("Sync", "clone failed", io_error))
/// }
/// assert!(example_with_error().is_err());
/// ```
pub type RefdocsResult<T> = Result<T, RefdocsError>;

/// IOエラーにパス情報を付与するヘルパー
pub trait IoResultExt<T> {
    /// `std::io::Result` を、対象パスとメッセージ付きの `RefdocsResult` に変換する
    fn with_path(self, path: &Path, message: impl Into<String>) -> RefdocsResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: &Path, message: impl Into<String>) -> RefdocsResult<T> {
        self.map_err(|e| {
            RefdocsError::filesystem_error_with_source(message, Some(path.to_path_buf()), e)
        })
    }
}

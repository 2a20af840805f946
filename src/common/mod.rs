//! Shared error handling
pub mod error;
pub mod result;

pub use error::RefdocsError;
pub use result::RefdocsResult;

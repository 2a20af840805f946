//! Pipeline phases and the use cases that sequence them
pub mod services;
pub mod use_cases;

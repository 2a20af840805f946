pub mod build_reference;
pub mod clean_output;
pub mod python_reference;

pub use build_reference::{
    BuildReferenceConfig, BuildReferenceError, BuildReferenceUseCase, BuildReport,
    PipelineAdapters,
};
pub use clean_output::{clear_directory, CleanOutputUseCase};
pub use python_reference::{
    PythonReferenceConfig, PythonReferenceError, PythonReferenceReport, PythonReferenceUseCase,
};

pub mod typedoc;

pub use typedoc::{
    CompilerError, DocCompiler, EntryPointStrategy, ProjectReflection, RootOptions, TypedocCli,
    DEFAULT_SORT,
};

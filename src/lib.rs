//! A binder-style IDL compiler front end — parses interface and parcelable
//! declarations, resolves imports, assigns transaction ids, and validates the
//! result against a back-end-specific type namespace.
//!
//! The single entry point is [`Compiler`], a non-consuming builder that can
//! be reused across multiple calls:
//!
//! ```no_run
//! use bidl::Compiler;
//!
//! let output = Compiler::new()
//!     .import_dir("aidl/")
//!     .compile("aidl/com/x/IFoo.aidl".as_ref())?;
//! println!("{}", serde_json::to_string_pretty(&output.json)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Error handling
//!
//! Every fallible stage returns [`error::CompileError`], a non-empty list of
//! [`error::CoreError`] diagnostics. Each renders through `Display` as
//! `file:line message`; `Parse` diagnostics additionally carry enough source
//! context for [`miette`] to render an underlined snippet when printed with
//! `{:?}`.

pub(crate) mod backend;
pub(crate) mod compiler;
pub(crate) mod doc_comments;
pub(crate) mod error;
pub(crate) mod import;
pub(crate) mod io;
pub(crate) mod lexer;
pub(crate) mod manifest;
pub(crate) mod model;
pub(crate) mod namespace;
pub(crate) mod parser;
pub(crate) mod suggest;
pub(crate) mod validate;

pub use backend::{BackEnd, JsonBackEnd};
pub use compiler::{CompileOutput, Compiler, Target};
pub use error::{CompileError, CoreError};
pub use io::{FsIo, IoDelegate, MemIo};
pub use model::ast::{
    Argument, Direction, Document, Import, Interface, Method, Parcelable, QualifiedName, TypeRef,
};
pub use namespace::{ManagedNamespace, Namespace, NativeNamespace};

//! AST Model (C3): the closed set of node variants described in the data
//! model. Nodes are constructed by the parser and flow linearly from parser
//! to driver to back end; nothing here is `Clone` except where a caller
//! genuinely needs a copy (`QualifiedName`, used as a map key in more than
//! one place).

use std::path::PathBuf;

/// An ordered, non-empty sequence of identifier segments. Immutable once
/// built: there is no mutation API, only construction and read access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName(Vec<String>);

impl QualifiedName {
    /// # Panics
    /// Panics if `segments` is empty; a qualified name always has at least
    /// one segment.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        assert!(!segments.is_empty(), "qualified name must have a segment");
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Join segments with `.`, e.g. `["com", "x"]` -> `"com.x"`.
    #[must_use]
    pub fn dot_form(&self) -> String {
        self.0.join(".")
    }

    /// Join segments with the platform path separator, e.g. `["com", "x"]`
    /// -> `com/x`. Used when computing expected/searched file paths.
    #[must_use]
    pub fn path_form(&self) -> PathBuf {
        self.0.iter().collect()
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dot_form())
    }
}

/// A type name as written in source, plus enough context to later resolve it
/// against a `TypeNamespace`. Two `TypeRef`s naming the same text are not
/// necessarily the same type -- resolution depends on imports in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub line: usize,
    pub is_array: bool,
    pub leading_comment: Option<String>,
}

impl TypeRef {
    #[must_use]
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            is_array: false,
            leading_comment: None,
        }
    }

    /// The textual form a back end or error message should show, including
    /// the `[]` array suffix if present.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.is_array {
            format!("{}[]", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// The direction of data flow for a method argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    #[must_use]
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    #[must_use]
    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::InOut => "inout",
        }
    }
}

/// A single method argument.
#[derive(Debug, Clone)]
pub struct Argument {
    pub direction: Direction,
    /// Whether `direction` was written explicitly in source (`in`/`out`/
    /// `inout`), as opposed to defaulting to `In`.
    pub direction_explicit: bool,
    pub ty: TypeRef,
    pub name: String,
    pub line: usize,
}

impl Argument {
    #[must_use]
    pub fn implicit_in(ty: TypeRef, name: impl Into<String>, line: usize) -> Self {
        Self {
            direction: Direction::In,
            direction_explicit: false,
            ty,
            name: name.into(),
            line,
        }
    }
}

/// A method declared on an interface.
#[derive(Debug, Clone)]
pub struct Method {
    pub oneway: bool,
    pub return_type: TypeRef,
    pub name: String,
    pub args: Vec<Argument>,
    /// An id the user wrote explicitly (`= N` suffix). `None` means the
    /// validator must assign one (or reject the interface for mixed mode).
    pub explicit_id: Option<u32>,
    /// The id this method will carry on the wire once validation has run.
    /// Populated by the semantic validator, never by the parser.
    pub assigned_id: Option<u32>,
    pub line: usize,
    pub leading_comment: Option<String>,
}

impl Method {
    /// Arguments that are inputs (`in` and `inout`), in source order.
    #[must_use]
    pub fn input_args(&self) -> Vec<&Argument> {
        self.args.iter().filter(|a| a.direction.is_input()).collect()
    }

    /// Arguments that are outputs (`out` and `inout`), in source order.
    #[must_use]
    pub fn output_args(&self) -> Vec<&Argument> {
        self.args.iter().filter(|a| a.direction.is_output()).collect()
    }
}

/// A declaration of an externally-defined, opaque value type. The compiler
/// never inspects a parcelable's fields -- only that it exists and what kind
/// it is.
#[derive(Debug, Clone)]
pub struct Parcelable {
    pub name: String,
    pub package: QualifiedName,
    pub line: usize,
}

impl Parcelable {
    #[must_use]
    pub fn canonical_name(&self) -> String {
        format!("{}.{}", self.package.dot_form(), self.name)
    }
}

/// A named collection of remotely callable methods belonging to a package.
#[derive(Debug, Clone)]
pub struct Interface {
    pub name: String,
    pub package: QualifiedName,
    pub oneway: bool,
    pub methods: Vec<Method>,
    pub line: usize,
    pub leading_comment: Option<String>,
}

impl Interface {
    #[must_use]
    pub fn canonical_name(&self) -> String {
        format!("{}.{}", self.package.dot_form(), self.name)
    }
}

/// The parsed content of one source file: exactly one interface, or a
/// non-empty list of parcelables. Modeled as a tagged variant rather than a
/// numeric discriminant with a manually linked list of declarations.
#[derive(Debug, Clone)]
pub enum Document {
    Interface(Interface),
    Parcelables(Vec<Parcelable>),
}

impl Document {
    #[must_use]
    pub fn as_interface(&self) -> Option<&Interface> {
        match self {
            Document::Interface(i) => Some(i),
            Document::Parcelables(_) => None,
        }
    }
}

/// A reference to an imported class, along with everything discovered about
/// it as resolution proceeds. `resolved_path` and `document` are populated by
/// the Import Resolver and Parser respectively; both start `None`.
#[derive(Debug, Clone)]
pub struct Import {
    pub from_file: PathBuf,
    pub class_name: QualifiedName,
    pub line: usize,
    pub resolved_path: Option<PathBuf>,
    pub document: Option<Document>,
}

impl Import {
    #[must_use]
    pub fn new(from_file: PathBuf, class_name: QualifiedName, line: usize) -> Self {
        Self {
            from_file,
            class_name,
            line,
            resolved_path: None,
            document: None,
        }
    }
}

//! Maps a dotted class name to a file path by searching an ordered list of
//! configured roots, first match wins.

use std::path::PathBuf;

use crate::io::IoDelegate;
use crate::model::ast::QualifiedName;

pub const SOURCE_EXTENSION: &str = "aidl";

/// An ordered list of search roots. The "already known, skip" legacy
/// tolerance rule (§9) is implemented by the driver against the type
/// namespace, which also dedups repeated imports of the same class --
/// this resolver has no need to track opened files itself.
pub struct ImportResolver {
    roots: Vec<PathBuf>,
}

impl ImportResolver {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Convert a dotted class name into the relative path searched for under
    /// each root: dots become path separators, the source extension is
    /// appended.
    #[must_use]
    pub fn relative_path(class_name: &QualifiedName) -> PathBuf {
        let mut path = class_name.path_form();
        path.set_extension(SOURCE_EXTENSION);
        path
    }

    /// Search configured roots in order for `class_name`, returning the
    /// first readable match as reported by `io` -- the same seam every
    /// other read in the pipeline goes through, so an in-memory filesystem
    /// in tests sees import resolution too. Earliest root wins; there is no
    /// recursion beyond the single computed relative path per root.
    #[must_use]
    pub fn find_import_file(&self, class_name: &QualifiedName, io: &dyn IoDelegate) -> Option<PathBuf> {
        let relative = Self::relative_path(class_name);
        self.roots
            .iter()
            .map(|root| root.join(&relative))
            .find(|candidate| io.file_is_readable(candidate))
    }
}

//! The compact text format that lets a large build share a pre-resolved type
//! dictionary instead of re-parsing every transitive import. Every physical
//! line increments the line counter, comment and blank lines included, so a
//! diagnostic from a multi-line manifest always cites the right line.

use crate::error::CoreError;
use crate::model::ast::QualifiedName;
use crate::namespace::Namespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Parcelable,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: ManifestKind,
    pub canonical_name: String,
}

/// Parse a manifest's text into entries, failing on the first malformed
/// line or unknown `kind` token. `path` is used only for diagnostics.
pub fn read(path: &str, text: &str) -> Result<Vec<ManifestEntry>, CoreError> {
    let mut entries = Vec::new();
    for (zero_based, raw_line) in text.lines().enumerate() {
        let line = zero_based + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let body = trimmed.strip_suffix(';').ok_or_else(|| CoreError::Manifest {
            path: path.to_string(),
            line,
            message: format!("malformed preprocessed manifest line: `{raw_line}`"),
        })?;
        let mut parts = body.split_whitespace();
        let kind_token = parts.next().ok_or_else(|| CoreError::Manifest {
            path: path.to_string(),
            line,
            message: format!("malformed preprocessed manifest line: `{raw_line}`"),
        })?;
        let canonical_name = parts.next().ok_or_else(|| CoreError::Manifest {
            path: path.to_string(),
            line,
            message: format!("malformed preprocessed manifest line: `{raw_line}`"),
        })?;
        if parts.next().is_some() {
            return Err(CoreError::Manifest {
                path: path.to_string(),
                line,
                message: format!("malformed preprocessed manifest line: `{raw_line}`"),
            });
        }

        let kind = match kind_token {
            "parcelable" => ManifestKind::Parcelable,
            "interface" => ManifestKind::Interface,
            other => {
                return Err(CoreError::Manifest {
                    path: path.to_string(),
                    line,
                    message: format!("unknown preprocessed manifest kind `{other}`"),
                });
            }
        };

        entries.push(ManifestEntry {
            kind,
            canonical_name: canonical_name.to_string(),
        });
    }
    Ok(entries)
}

/// Register every entry from a parsed manifest into `ns`, as if each had
/// been declared in the (virtual) file `path`.
pub fn register_into(
    ns: &mut dyn Namespace,
    path: &str,
    entries: &[ManifestEntry],
) -> Result<(), CoreError> {
    for entry in entries {
        let mut segments: Vec<String> = entry.canonical_name.split('.').map(str::to_string).collect();
        let name = segments.pop().unwrap_or_default();
        let package = if segments.is_empty() {
            QualifiedName::new(vec![String::new()])
        } else {
            QualifiedName::new(segments)
        };
        match entry.kind {
            ManifestKind::Parcelable => {
                ns.add_parcelable(
                    &crate::model::ast::Parcelable {
                        name,
                        package,
                        line: 0,
                    },
                    path,
                )?;
            }
            ManifestKind::Interface => {
                ns.add_interface(
                    &crate::model::ast::Interface {
                        name,
                        package,
                        oneway: false,
                        methods: vec![],
                        line: 0,
                        leading_comment: None,
                    },
                    path,
                )?;
            }
        }
    }
    Ok(())
}

/// One declaration per physical line, `\n`-terminated. Written the same way
/// regardless of host so output is byte-identical across platforms (the
/// original opens the output file in binary mode for the same reason).
#[must_use]
pub fn write(entries: &[ManifestEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let kind = match entry.kind {
            ManifestKind::Parcelable => "parcelable",
            ManifestKind::Interface => "interface",
        };
        out.push_str(kind);
        out.push(' ');
        out.push_str(&entry.canonical_name);
        out.push_str(";\n");
    }
    out
}

//! Composes IO, the parser, the import resolver, the type namespace, the
//! validator, and a back end into one compilation pipeline, exposed as a
//! reusable, non-consuming builder: `import_dir`/`preprocessed`/`target`
//! mutate `&mut self` and return `&mut Self` so a `Compiler` can be
//! configured once and reused across calls.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::backend::{BackEnd, JsonBackEnd};
use crate::error::{CompileError, CoreError};
use crate::import::ImportResolver;
use crate::io::{FsIo, IoDelegate};
use crate::manifest;
use crate::model::ast::{Document, Import, Interface};
use crate::namespace::{ManagedNamespace, Namespace, NativeNamespace};
use crate::parser;
use crate::validate;

/// Which back-end type namespace variant to validate against.
/// Selected once per compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    Native,
    Managed,
}

impl Target {
    fn namespace(self) -> Box<dyn Namespace> {
        match self {
            Target::Native => Box::new(NativeNamespace::new()),
            Target::Managed => Box::new(ManagedNamespace::new()),
        }
    }
}

/// The result of a successful compilation: the validated interface (methods
/// now carry assigned ids), the fully resolved import list, and whatever
/// the back end produced from them.
#[derive(Debug)]
pub struct CompileOutput {
    pub interface: Interface,
    pub imports: Vec<Import>,
    pub json: Value,
}

/// A non-consuming builder configuring one compilation: construct once,
/// configure with `&mut self` methods, reuse across multiple `compile`
/// calls.
pub struct Compiler {
    import_dirs: Vec<PathBuf>,
    manifests: Vec<PathBuf>,
    target: Target,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            import_dirs: Vec::new(),
            manifests: Vec::new(),
            target: Target::default(),
        }
    }

    pub fn import_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.import_dirs.push(dir.into());
        self
    }

    pub fn preprocessed(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.manifests.push(path.into());
        self
    }

    pub fn target(&mut self, target: Target) -> &mut Self {
        self.target = target;
        self
    }

    /// Compile `input` against the real filesystem, using the JSON back end.
    ///
    /// # Errors
    /// Returns the accumulated errors of whichever stage first failed.
    pub fn compile(&self, input: &Path) -> Result<CompileOutput, CompileError> {
        self.compile_with(input, &FsIo, &JsonBackEnd)
    }

    /// Compile `input`, reading through `io` and handing the validated model
    /// to `back_end`. The seam tests use to substitute an in-memory
    /// filesystem and to exercise the back-end contract independently of
    /// `JsonBackEnd`.
    ///
    /// # Errors
    /// Returns the accumulated errors of whichever stage first failed.
    pub fn compile_with(
        &self,
        input: &Path,
        io: &dyn IoDelegate,
        back_end: &dyn BackEnd,
    ) -> Result<CompileOutput, CompileError> {
        let mut ns = self.target.namespace();

        // Stage 1: load preprocessed manifests, fail fast.
        for manifest_path in &self.manifests {
            let text = io.get_file_contents(manifest_path).map_err(|reason| {
                CompileError(vec![CoreError::Io {
                    path: manifest_path.clone(),
                    reason,
                }])
            })?;
            let path_str = manifest_path.display().to_string();
            let entries = manifest::read(&path_str, &text).map_err(|e| CompileError(vec![e]))?;
            manifest::register_into(ns.as_mut(), &path_str, &entries).map_err(|e| CompileError(vec![e]))?;
        }

        // Stage 2: parse the input file; require exactly one interface.
        let input_str = input.display().to_string();
        let source = io
            .get_file_contents(input)
            .map_err(|reason| CompileError(vec![CoreError::Io { path: input.to_path_buf(), reason }]))?;
        let parsed = parser::parse(&source, input).map_err(|e| CompileError(vec![e]))?;
        let mut interface = match parsed.document {
            Document::Interface(iface) => iface,
            Document::Parcelables(_) => {
                return Err(CompileError(vec![CoreError::Structural {
                    file: input_str.clone(),
                    line: 1,
                    message: "input file must declare exactly one interface".to_string(),
                }]));
            }
        };

        // Stage 3: filename/package agreement.
        validate::check_filename(&input_str, &interface.package, "interface", &interface.name, interface.line)
            .map_err(|e| CompileError(vec![e]))?;

        // Stage 4: resolve and parse imports, tolerating ones the namespace
        // already knows about via a preprocessed manifest (legacy
        // tolerance).
        let resolver = ImportResolver::new(self.import_dirs.clone());
        let mut resolved_imports = Vec::with_capacity(parsed.imports.len());
        let mut import_errors = Vec::new();
        for mut import in parsed.imports {
            if ns.has(&import.class_name.dot_form()) {
                resolved_imports.push(import);
                continue;
            }
            let Some(path) = resolver.find_import_file(&import.class_name, io) else {
                import_errors.push(CoreError::ImportUnresolved {
                    file: input_str.clone(),
                    line: import.line,
                    class_name: import.class_name.dot_form(),
                });
                continue;
            };
            let text = match io.get_file_contents(&path) {
                Ok(t) => t,
                Err(reason) => {
                    import_errors.push(CoreError::Io { path: path.clone(), reason });
                    continue;
                }
            };
            let imported = match parser::parse(&text, &path) {
                Ok(p) => p,
                Err(e) => {
                    import_errors.push(e);
                    continue;
                }
            };
            let path_str = path.display().to_string();
            if let Err(e) = filename_check_document(&imported.document, &path_str) {
                import_errors.push(e);
            }
            import.resolved_path = Some(path);
            import.document = Some(imported.document);
            resolved_imports.push(import);
        }
        if !import_errors.is_empty() {
            return Err(CompileError(import_errors));
        }

        // Stage 5: gather types from the input interface and every resolved
        // import's declarations into the namespace.
        let mut gather_errors = Vec::new();
        if let Err(e) = ns.add_interface(&interface, &input_str) {
            gather_errors.push(e);
        }
        for import in &resolved_imports {
            let Some(doc) = &import.document else { continue };
            let path_str = import
                .resolved_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            match doc {
                Document::Interface(iface) => {
                    if let Err(e) = ns.add_interface(iface, &path_str) {
                        gather_errors.push(e);
                    }
                }
                Document::Parcelables(ps) => {
                    for p in ps {
                        if let Err(e) = ns.add_parcelable(p, &path_str) {
                            gather_errors.push(e);
                        }
                    }
                }
            }
        }
        if !gather_errors.is_empty() {
            return Err(CompileError(gather_errors));
        }

        // Stage 6: validate types on the input interface.
        let mut stage_errors = validate::check_method_uniqueness(&interface, &input_str);
        stage_errors.extend(validate::check_types(&interface, ns.as_mut(), &input_str));
        stage_errors.extend(validate::check_oneway(&interface, &input_str));
        if !stage_errors.is_empty() {
            return Err(CompileError(stage_errors));
        }

        // Stage 7: assign or validate transaction ids.
        validate::assign_or_validate_ids(&mut interface, &input_str).map_err(CompileError)?;

        // Stage 8: hand off to the back end.
        let json = back_end
            .emit(&interface, ns.as_ref(), &resolved_imports)
            .map_err(|message| {
                CompileError(vec![CoreError::Structural {
                    file: input_str.clone(),
                    line: interface.line,
                    message,
                }])
            })?;

        Ok(CompileOutput {
            interface,
            imports: resolved_imports,
            json,
        })
    }
}

/// Filename-check every declaration in an imported document.
fn filename_check_document(document: &Document, path_str: &str) -> Result<(), CoreError> {
    match document {
        Document::Interface(iface) => {
            validate::check_filename(path_str, &iface.package, "interface", &iface.name, iface.line)
        }
        Document::Parcelables(ps) => {
            for p in ps {
                validate::check_filename(path_str, &p.package, "parcelable", &p.name, p.line)?;
            }
            Ok(())
        }
    }
}

//! Filename/package agreement, type legality, method uniqueness, and
//! transaction-id assignment, each check collecting its failures into an
//! accumulator `Vec` instead of bailing on the first one.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;
use crate::import::SOURCE_EXTENSION;
use crate::model::ast::{Direction, Interface, QualifiedName};
use crate::namespace::Namespace;

/// `FIRST_CALL_TRANSACTION = 1` is reserved by the binder wire format; user
/// ids are offsets from it and so start at 0.
pub const MIN_USER_SET_METHOD_ID: u32 = 0;
pub const MAX_USER_SET_METHOD_ID: u32 = 16_777_214;

/// Join a relative path onto the process's current working directory and
/// collapse `.`/`..` components syntactically.
///
/// This is deliberately not `fs::canonicalize`: that resolves symlinks and
/// requires the path to exist on disk, which would make `check_filename`
/// depend on the real filesystem even when called with a virtual `MemIo`
/// path that was never written to disk (every validator test goes through
/// `MemIo`). Joining against cwd and normalizing `.`/`..` gives the
/// "relative input paths are canonicalized against the current working
/// directory" behavior for the common case -- a relative input path -- at
/// the cost of leaving symlink resolution undone, a narrower deviation than
/// comparing the raw path string.
fn canonicalize_against_cwd(path_str: &str) -> String {
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized.to_string_lossy().into_owned()
}

/// Compute the expected relative suffix `<package-as-path>/<name>.<ext>` and
/// check that `path_str`, canonicalized against the current working
/// directory, ends with it.
///
/// Comparison is case-sensitive on Linux and case-insensitive everywhere
/// else. On a case-sensitive non-Linux filesystem (e.g. a case-sensitive
/// volume on macOS) this under-rejects mismatched filenames; that is a known
/// limitation preserved intentionally, not a bug to fix here.
pub fn check_filename(
    path_str: &str,
    package: &QualifiedName,
    kind: &'static str,
    name: &str,
    line: usize,
) -> Result<(), CoreError> {
    let mut expected = package.segments().join("/");
    if !expected.is_empty() {
        expected.push('/');
    }
    expected.push_str(name);
    expected.push('.');
    expected.push_str(SOURCE_EXTENSION);

    let canonical = canonicalize_against_cwd(path_str);
    let matches = if cfg!(target_os = "linux") {
        canonical.ends_with(&expected)
    } else {
        canonical.to_lowercase().ends_with(&expected.to_lowercase())
    };

    if matches {
        Ok(())
    } else {
        Err(CoreError::FilenameMismatch {
            file: path_str.to_string(),
            line,
            kind,
            name: name.to_string(),
            expected,
        })
    }
}

/// Within one interface, method names must be pairwise distinct. Returns one
/// diagnostic per duplicate, citing both the offending and first-definition
/// line.
#[must_use]
pub fn check_method_uniqueness(iface: &Interface, file: &str) -> Vec<CoreError> {
    let mut first_seen: indexmap::IndexMap<&str, usize> = indexmap::IndexMap::new();
    let mut errors = Vec::new();
    for m in &iface.methods {
        if let Some(&first_line) = first_seen.get(m.name.as_str()) {
            errors.push(CoreError::MethodRedefinition {
                file: file.to_string(),
                line: m.line,
                first_line,
                name: m.name.clone(),
            });
        } else {
            first_seen.insert(&m.name, m.line);
        }
    }
    errors
}

/// Register container instantiations and check return/argument legality for
/// every method. Accumulates failures across the whole interface rather
/// than stopping at the first one.
pub fn check_types(iface: &Interface, ns: &mut dyn Namespace, file: &str) -> Vec<CoreError> {
    let mut errors = Vec::new();
    for m in &iface.methods {
        if let Err(e) = ns.add_container(&m.return_type.name, file, m.return_type.line) {
            errors.push(e);
        }
        if let Err(e) = ns.is_valid_return_type(&m.return_type, file) {
            errors.push(e);
        }
        for (index, arg) in m.args.iter().enumerate() {
            if let Err(e) = ns.add_container(&arg.ty.name, file, arg.line) {
                errors.push(e);
            }
            if let Err(e) = ns.is_valid_arg(arg, index + 1, file) {
                errors.push(e);
            }
        }
    }
    errors
}

/// A one-way method (or any method on a one-way interface) does not wait
/// for a reply: its return type must be `void` and none of its arguments
/// may be `out` or `inout`.
#[must_use]
pub fn check_oneway(iface: &Interface, file: &str) -> Vec<CoreError> {
    let mut errors = Vec::new();
    for m in &iface.methods {
        if !(iface.oneway || m.oneway) {
            continue;
        }
        if m.return_type.name != "void" || m.return_type.is_array {
            errors.push(CoreError::TypeLegality {
                file: file.to_string(),
                line: m.line,
                message: format!(
                    "oneway method {} must return void, found {}",
                    m.name,
                    m.return_type.display_name()
                ),
            });
        }
        for arg in &m.args {
            if arg.direction != Direction::In {
                errors.push(CoreError::TypeLegality {
                    file: file.to_string(),
                    line: arg.line,
                    message: format!(
                        "oneway method {}: argument {} cannot be {}",
                        m.name,
                        arg.name,
                        arg.direction.as_str()
                    ),
                });
            }
        }
    }
    errors
}

/// Assign or validate transaction ids. Either every method in the
/// interface carries a user id (validated for range and uniqueness, then
/// preserved) or none does (assigned `0..N-1` in source order); any other
/// mix is a single file-level diagnostic with no partial assignment.
pub fn assign_or_validate_ids(iface: &mut Interface, file: &str) -> Result<(), Vec<CoreError>> {
    let explicit_count = iface.methods.iter().filter(|m| m.explicit_id.is_some()).count();

    if explicit_count > 0 && explicit_count < iface.methods.len() {
        return Err(vec![CoreError::IdRule {
            file: file.to_string(),
            line: iface.line,
            message: "either all methods of an interface must have an explicit transaction id, or none may".to_string(),
        }]);
    }

    let mut errors = Vec::new();

    if explicit_count == 0 {
        for (index, m) in iface.methods.iter_mut().enumerate() {
            m.assigned_id = Some(index as u32);
        }
        return Ok(());
    }

    let mut seen: std::collections::HashMap<u32, usize> = std::collections::HashMap::new();
    for m in &mut iface.methods {
        let id = m.explicit_id.expect("explicit_count counted only Some ids");
        if !(MIN_USER_SET_METHOD_ID..=MAX_USER_SET_METHOD_ID).contains(&id) {
            errors.push(CoreError::IdRule {
                file: file.to_string(),
                line: m.line,
                message: format!(
                    "transaction id {id} for method {} is out of range [{MIN_USER_SET_METHOD_ID}, {MAX_USER_SET_METHOD_ID}]",
                    m.name
                ),
            });
            continue;
        }
        if let Some(&first_line) = seen.get(&id) {
            errors.push(CoreError::IdRule {
                file: file.to_string(),
                line: m.line,
                message: format!(
                    "duplicate transaction id {id} for method {}; first assigned at line {first_line}",
                    m.name
                ),
            });
            continue;
        }
        seen.insert(id, m.line);
        m.assigned_id = Some(id);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ast::{Argument, Method, TypeRef};

    fn qn(dotted: &str) -> QualifiedName {
        QualifiedName::new(dotted.split('.').map(str::to_string).collect())
    }

    fn method(name: &str, line: usize, explicit_id: Option<u32>) -> Method {
        Method {
            oneway: false,
            return_type: TypeRef::new("void", line),
            name: name.to_string(),
            args: vec![],
            explicit_id,
            assigned_id: None,
            line,
            leading_comment: None,
        }
    }

    fn interface(methods: Vec<Method>) -> Interface {
        Interface {
            name: "IFoo".into(),
            package: qn("com.x"),
            oneway: false,
            methods,
            line: 1,
            leading_comment: None,
        }
    }

    #[test]
    fn filename_happy_path() {
        check_filename("com/x/IFoo.aidl", &qn("com.x"), "interface", "IFoo", 1).unwrap();
    }

    #[test]
    fn filename_mismatch_reports_expected_path() {
        let err = check_filename("com/y/IFoo.aidl", &qn("com.x"), "interface", "IFoo", 1).unwrap_err();
        match err {
            CoreError::FilenameMismatch { expected, .. } => assert_eq!(expected, "com/x/IFoo.aidl"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn filename_check_normalizes_leading_dot_segment() {
        check_filename("./com/x/IFoo.aidl", &qn("com.x"), "interface", "IFoo", 1).unwrap();
    }

    #[test]
    fn filename_check_normalizes_parent_dir_segments() {
        check_filename("com/y/../x/IFoo.aidl", &qn("com.x"), "interface", "IFoo", 1).unwrap();
    }

    #[test]
    fn filename_mismatch_error_reports_the_original_path() {
        let err = check_filename("./com/y/IFoo.aidl", &qn("com.x"), "interface", "IFoo", 1).unwrap_err();
        match err {
            CoreError::FilenameMismatch { file, .. } => assert_eq!(file, "./com/y/IFoo.aidl"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_method_names_cite_both_lines() {
        let iface = interface(vec![method("a", 1, None), method("a", 2, None)]);
        let errors = check_method_uniqueness(&iface, "f.aidl");
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            CoreError::MethodRedefinition { line, first_line, .. } => {
                assert_eq!(*line, 2);
                assert_eq!(*first_line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn oneway_method_with_non_void_return_is_rejected() {
        let mut m = method("a", 1, None);
        m.oneway = true;
        m.return_type = TypeRef::new("int", 1);
        let iface = interface(vec![m]);
        let errors = check_oneway(&iface, "f.aidl");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::TypeLegality { .. }));
    }

    #[test]
    fn oneway_method_with_out_argument_is_rejected() {
        let mut m = method("a", 1, None);
        m.oneway = true;
        m.args.push(Argument {
            direction: Direction::Out,
            direction_explicit: true,
            ty: TypeRef::new("int", 1),
            name: "x".into(),
            line: 1,
        });
        let iface = interface(vec![m]);
        let errors = check_oneway(&iface, "f.aidl");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::TypeLegality { .. }));
    }

    #[test]
    fn oneway_method_with_inout_argument_is_rejected() {
        let mut m = method("a", 1, None);
        m.oneway = true;
        m.args.push(Argument {
            direction: Direction::InOut,
            direction_explicit: true,
            ty: TypeRef::new("int", 1),
            name: "x".into(),
            line: 1,
        });
        let iface = interface(vec![m]);
        let errors = check_oneway(&iface, "f.aidl");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::TypeLegality { .. }));
    }

    #[test]
    fn oneway_method_with_void_return_and_in_args_is_accepted() {
        let mut m = method("a", 1, None);
        m.oneway = true;
        m.args.push(Argument {
            direction: Direction::In,
            direction_explicit: true,
            ty: TypeRef::new("int", 1),
            name: "x".into(),
            line: 1,
        });
        let iface = interface(vec![m]);
        assert!(check_oneway(&iface, "f.aidl").is_empty());
    }

    #[test]
    fn interface_level_oneway_applies_to_every_method() {
        let mut m = method("a", 1, None);
        m.return_type = TypeRef::new("int", 1);
        let mut iface = interface(vec![m]);
        iface.oneway = true;
        let errors = check_oneway(&iface, "f.aidl");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn non_oneway_method_with_non_void_return_is_unaffected() {
        let mut m = method("a", 1, None);
        m.return_type = TypeRef::new("int", 1);
        let iface = interface(vec![m]);
        assert!(check_oneway(&iface, "f.aidl").is_empty());
    }

    #[test]
    fn implicit_ids_assigned_in_source_order() {
        let mut iface = interface(vec![method("a", 1, None), method("b", 2, None)]);
        assign_or_validate_ids(&mut iface, "f.aidl").unwrap();
        assert_eq!(iface.methods[0].assigned_id, Some(0));
        assert_eq!(iface.methods[1].assigned_id, Some(1));
    }

    #[test]
    fn explicit_ids_are_preserved() {
        let mut iface = interface(vec![method("a", 1, Some(5)), method("b", 2, Some(3))]);
        assign_or_validate_ids(&mut iface, "f.aidl").unwrap();
        assert_eq!(iface.methods[0].assigned_id, Some(5));
        assert_eq!(iface.methods[1].assigned_id, Some(3));
    }

    #[test]
    fn mixed_ids_are_rejected_as_single_diagnostic() {
        let mut iface = interface(vec![method("a", 1, Some(0)), method("b", 2, None)]);
        let errors = assign_or_validate_ids(&mut iface, "f.aidl").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::IdRule { .. }));
    }

    #[test]
    fn duplicate_explicit_ids_are_rejected() {
        let mut iface = interface(vec![method("a", 1, Some(5)), method("b", 2, Some(5))]);
        let errors = assign_or_validate_ids(&mut iface, "f.aidl").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::IdRule { .. }));
    }

    #[test]
    fn out_of_range_id_is_rejected() {
        let mut iface = interface(vec![method("a", 1, Some(MAX_USER_SET_METHOD_ID + 1))]);
        let errors = assign_or_validate_ids(&mut iface, "f.aidl").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CoreError::IdRule { .. }));
    }
}

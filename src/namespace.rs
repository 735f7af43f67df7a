//! A back-end-specific registry of known types, with a capability interface
//! shared by two concrete back ends instead of two statically-selected
//! subclasses. Storage is `IndexMap`-backed, insertion-order preserving, and
//! idempotent under re-registration of an identical declaration.

use indexmap::IndexMap;

use crate::error::CoreError;
use crate::model::ast::{Argument, Direction, Interface, Parcelable, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive,
    Parcelable,
    Interface,
    Container,
}

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub kind: TypeKind,
    pub defining_file: Option<String>,
}

/// The capability interface every back end's namespace implements.
pub trait Namespace {
    fn has(&self, name: &str) -> bool;
    /// Every registered canonical name, in registration order. Used by back
    /// ends that need to enumerate the populated namespace rather than
    /// probe it one name at a time.
    fn names(&self) -> Vec<String>;
    fn add_parcelable(&mut self, decl: &Parcelable, file: &str) -> Result<(), CoreError>;
    fn add_interface(&mut self, decl: &Interface, file: &str) -> Result<(), CoreError>;
    fn add_container(&mut self, type_name: &str, file: &str, line: usize) -> Result<(), CoreError>;
    fn is_valid_return_type(&self, ty: &TypeRef, file: &str) -> Result<(), CoreError>;
    fn is_valid_arg(&self, arg: &Argument, index: usize, file: &str) -> Result<(), CoreError>;
}

#[derive(Default)]
struct Registry {
    entries: IndexMap<String, TypeEntry>,
}

impl Registry {
    fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn register_primitive(&mut self, name: &str) {
        self.entries.insert(
            name.to_string(),
            TypeEntry {
                kind: TypeKind::Primitive,
                defining_file: None,
            },
        );
    }

    /// Register a declared (non-container) entry. Redeclaration with the
    /// same kind from the same file is idempotent; a conflicting kind, or
    /// the same kind from a different file, is an error.
    fn register(
        &mut self,
        name: String,
        kind: TypeKind,
        file: &str,
        line: usize,
    ) -> Result<(), CoreError> {
        if let Some(existing) = self.entries.get(&name) {
            if existing.kind == kind && existing.defining_file.as_deref() == Some(file) {
                return Ok(());
            }
            return Err(CoreError::TypeLegality {
                file: file.to_string(),
                line,
                message: format!("{name} is already declared with a different kind or in a different file"),
            });
        }
        self.entries.insert(
            name,
            TypeEntry {
                kind,
                defining_file: Some(file.to_string()),
            },
        );
        Ok(())
    }

    fn register_container(&mut self, name: String) {
        self.entries.entry(name).or_insert(TypeEntry {
            kind: TypeKind::Container,
            defining_file: None,
        });
    }

    fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.entries.get(name).map(|e| e.kind)
    }
}

/// Parse `Outer<a,b,...>` into `("Outer", ["a", "b", ...])`. Returns `None`
/// if `text` has no generic parameter list (i.e. it isn't a container
/// reference at all, which is not an error -- `add_container` is a no-op in
/// that case).
fn split_container(text: &str) -> Option<(&str, Vec<&str>)> {
    let lt = text.find('<')?;
    let base = &text[..lt];
    let inner = text.strip_suffix('>')?.get(lt + 1..)?;
    Some((base, inner.split(',').collect()))
}

fn add_container_impl(
    registry: &mut Registry,
    legal_containers: &[(&str, usize)],
    type_name: &str,
    file: &str,
    line: usize,
) -> Result<(), CoreError> {
    let Some((base, params)) = split_container(type_name) else {
        return Ok(());
    };

    let Some(&(_, arity)) = legal_containers.iter().find(|(name, _)| *name == base) else {
        return Err(CoreError::TypeLegality {
            file: file.to_string(),
            line,
            message: format!("{base} is not a supported container type"),
        });
    };
    if params.len() != arity {
        return Err(CoreError::TypeLegality {
            file: file.to_string(),
            line,
            message: format!("{base} takes {arity} type parameter(s), found {}", params.len()),
        });
    }
    for param in &params {
        if !registry.has(param) {
            add_container_impl(registry, legal_containers, param, file, line)?;
            if !registry.has(param) {
                return Err(CoreError::TypeLegality {
                    file: file.to_string(),
                    line,
                    message: format!("{param} is not a defined type"),
                });
            }
        }
    }
    registry.register_container(type_name.to_string());
    Ok(())
}

/// Appends a "did you mean X?" hint to `message` when some registered name is
/// within the allowed edit distance of `unknown`.
fn suggest_hint(registry: &Registry, unknown: &str, message: String) -> String {
    let max = crate::suggest::max_edit_distance(unknown.len());
    let closest = registry
        .entries
        .keys()
        .filter(|name| !name.contains('<'))
        .map(|name| (name, crate::suggest::levenshtein(unknown, name)))
        .filter(|(_, dist)| *dist <= max)
        .min_by_key(|(_, dist)| *dist);
    match closest {
        Some((name, _)) => format!("{message} (did you mean {name}?)"),
        None => message,
    }
}

fn valid_return_type_impl(registry: &Registry, ty: &TypeRef, file: &str) -> Result<(), CoreError> {
    if registry.has(&ty.name) {
        Ok(())
    } else {
        Err(CoreError::TypeLegality {
            file: file.to_string(),
            line: ty.line,
            message: suggest_hint(registry, &ty.name, format!("unknown return type {}", ty.display_name())),
        })
    }
}

fn valid_arg_impl(
    registry: &Registry,
    arg: &Argument,
    index: usize,
    file: &str,
) -> Result<(), CoreError> {
    let Some(kind) = registry.kind_of(&arg.ty.name) else {
        return Err(CoreError::TypeLegality {
            file: file.to_string(),
            line: arg.line,
            message: suggest_hint(
                registry,
                &arg.ty.name,
                format!("argument {index} ({}): unknown type {}", arg.name, arg.ty.display_name()),
            ),
        });
    };
    match kind {
        TypeKind::Primitive if arg.direction != Direction::In => Err(CoreError::TypeLegality {
            file: file.to_string(),
            line: arg.line,
            message: format!(
                "argument {index} ({}): primitive type {} cannot be {}",
                arg.name,
                arg.ty.display_name(),
                arg.direction.as_str()
            ),
        }),
        TypeKind::Interface if arg.direction == Direction::Out => Err(CoreError::TypeLegality {
            file: file.to_string(),
            line: arg.line,
            message: format!(
                "argument {index} ({}): interface type {} cannot be out",
                arg.name,
                arg.ty.display_name()
            ),
        }),
        _ => Ok(()),
    }
}

macro_rules! define_namespace {
    ($name:ident, $primitives:expr, $containers:expr) => {
        pub struct $name {
            registry: Registry,
        }

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                let mut registry = Registry::default();
                for p in $primitives {
                    registry.register_primitive(p);
                }
                Self { registry }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Namespace for $name {
            fn has(&self, name: &str) -> bool {
                self.registry.has(name)
            }

            fn names(&self) -> Vec<String> {
                self.registry.entries.keys().cloned().collect()
            }

            fn add_parcelable(&mut self, decl: &Parcelable, file: &str) -> Result<(), CoreError> {
                self.registry
                    .register(decl.canonical_name(), TypeKind::Parcelable, file, decl.line)
            }

            fn add_interface(&mut self, decl: &Interface, file: &str) -> Result<(), CoreError> {
                self.registry
                    .register(decl.canonical_name(), TypeKind::Interface, file, decl.line)
            }

            fn add_container(&mut self, type_name: &str, file: &str, line: usize) -> Result<(), CoreError> {
                add_container_impl(&mut self.registry, $containers, type_name, file, line)
            }

            fn is_valid_return_type(&self, ty: &TypeRef, file: &str) -> Result<(), CoreError> {
                valid_return_type_impl(&self.registry, ty, file)
            }

            fn is_valid_arg(&self, arg: &Argument, index: usize, file: &str) -> Result<(), CoreError> {
                valid_arg_impl(&self.registry, arg, index, file)
            }
        }
    };
}

const NATIVE_PRIMITIVES: &[&str] = &[
    "void", "boolean", "byte", "char", "int", "long", "float", "double", "String", "IBinder",
];
const NATIVE_CONTAINERS: &[(&str, usize)] = &[("List", 1)];

const MANAGED_PRIMITIVES: &[&str] = &[
    "void", "boolean", "byte", "char", "int", "long", "float", "double", "String", "CharSequence",
    "IBinder",
];
const MANAGED_CONTAINERS: &[(&str, usize)] = &[("List", 1), ("Map", 2)];

define_namespace!(NativeNamespace, NATIVE_PRIMITIVES, NATIVE_CONTAINERS);
define_namespace!(ManagedNamespace, MANAGED_PRIMITIVES, MANAGED_CONTAINERS);

#[cfg(test)]
mod tests {
    use super::*;

    fn parcelable(name: &str, pkg: &str, line: usize) -> Parcelable {
        Parcelable {
            name: name.to_string(),
            package: crate::model::ast::QualifiedName::new(
                pkg.split('.').map(str::to_string).collect(),
            ),
            line,
        }
    }

    #[test]
    fn primitives_are_preregistered() {
        let ns = NativeNamespace::new();
        assert!(ns.has("int"));
        assert!(ns.has("void"));
        assert!(!ns.has("Bar"));
    }

    #[test]
    fn add_parcelable_then_has_finds_it() {
        let mut ns = NativeNamespace::new();
        let p = parcelable("Bar", "com.z", 1);
        ns.add_parcelable(&p, "com/z/Bar.aidl").unwrap();
        assert!(ns.has("com.z.Bar"));
    }

    #[test]
    fn redeclaration_from_same_file_is_idempotent() {
        let mut ns = NativeNamespace::new();
        let p = parcelable("Bar", "com.z", 1);
        ns.add_parcelable(&p, "com/z/Bar.aidl").unwrap();
        ns.add_parcelable(&p, "com/z/Bar.aidl").unwrap();
    }

    #[test]
    fn conflicting_redeclaration_is_an_error() {
        let mut ns = NativeNamespace::new();
        let p = parcelable("Bar", "com.z", 1);
        ns.add_parcelable(&p, "com/z/Bar.aidl").unwrap();
        let err = ns.add_parcelable(&p, "com/z/other.aidl").unwrap_err();
        assert!(matches!(err, CoreError::TypeLegality { .. }));
    }

    #[test]
    fn add_container_no_op_for_non_generic_name() {
        let mut ns = NativeNamespace::new();
        ns.add_container("String", "f.aidl", 1).unwrap();
    }

    #[test]
    fn add_container_registers_legal_list() {
        let mut ns = NativeNamespace::new();
        ns.add_container("List<String>", "f.aidl", 1).unwrap();
        assert!(ns.has("List<String>"));
    }

    #[test]
    fn add_container_rejects_unsupported_container_on_native() {
        let mut ns = NativeNamespace::new();
        let err = ns.add_container("Map<String,String>", "f.aidl", 1).unwrap_err();
        assert!(matches!(err, CoreError::TypeLegality { .. }));
    }

    #[test]
    fn add_container_allows_map_on_managed() {
        let mut ns = ManagedNamespace::new();
        ns.add_container("Map<String,String>", "f.aidl", 1).unwrap();
        assert!(ns.has("Map<String,String>"));
    }

    #[test]
    fn add_container_rejects_wrong_arity() {
        let mut ns = ManagedNamespace::new();
        let err = ns.add_container("Map<String>", "f.aidl", 1).unwrap_err();
        assert!(matches!(err, CoreError::TypeLegality { .. }));
    }

    #[test]
    fn primitive_out_argument_is_rejected() {
        let ns = NativeNamespace::new();
        let arg = Argument {
            direction: Direction::Out,
            direction_explicit: true,
            ty: TypeRef::new("int", 1),
            name: "x".into(),
            line: 1,
        };
        let err = ns.is_valid_arg(&arg, 1, "f.aidl").unwrap_err();
        assert!(matches!(err, CoreError::TypeLegality { .. }));
    }

    #[test]
    fn primitive_in_argument_is_valid() {
        let ns = NativeNamespace::new();
        let arg = Argument {
            direction: Direction::In,
            direction_explicit: false,
            ty: TypeRef::new("int", 1),
            name: "x".into(),
            line: 1,
        };
        ns.is_valid_arg(&arg, 1, "f.aidl").unwrap();
    }

    #[test]
    fn interface_out_argument_is_rejected() {
        let mut ns = NativeNamespace::new();
        ns.registry
            .register("com.x.IFoo".into(), TypeKind::Interface, "com/x/IFoo.aidl", 1)
            .unwrap();
        let arg = Argument {
            direction: Direction::Out,
            direction_explicit: true,
            ty: TypeRef::new("com.x.IFoo", 1),
            name: "cb".into(),
            line: 1,
        };
        let err = ns.is_valid_arg(&arg, 1, "f.aidl").unwrap_err();
        assert!(matches!(err, CoreError::TypeLegality { .. }));
    }

    #[test]
    fn unknown_return_type_is_rejected() {
        let ns = NativeNamespace::new();
        let ty = TypeRef::new("Bogus", 1);
        assert!(ns.is_valid_return_type(&ty, "f.aidl").is_err());
    }

    #[test]
    fn unknown_return_type_suggests_a_close_match() {
        let ns = NativeNamespace::new();
        let ty = TypeRef::new("Strnig", 1);
        let err = ns.is_valid_return_type(&ty, "f.aidl").unwrap_err();
        match err {
            CoreError::TypeLegality { message, .. } => {
                assert!(message.contains("did you mean String?"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

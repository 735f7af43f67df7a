//! The trait a target-language emitter would implement, consuming the
//! validated interface, the populated namespace, and the resolved import
//! list. Real target-language code generation is out of scope here; this
//! crate ships one concrete JSON back end so the contract itself is
//! exercised and testable.

use serde_json::{Value, json};

use crate::model::ast::{Direction, Import, Interface, Method};
use crate::namespace::Namespace;

/// A consumer of the validated compilation result. Implementations may
/// fail (e.g. writing output files), hence the `Result` return.
pub trait BackEnd {
    /// # Errors
    /// Returns a message describing why the back end could not process the
    /// validated model (e.g. an I/O failure while writing generated files).
    fn emit(&self, iface: &Interface, ns: &dyn Namespace, imports: &[Import]) -> Result<Value, String>;
}

/// Renders the validated model to a `serde_json::Value`: every method with
/// its assigned id and resolved argument directions, plus the list of
/// canonical names known to the namespace. Useful for tests and for
/// introspecting a compilation without a real target-language emitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBackEnd;

impl BackEnd for JsonBackEnd {
    fn emit(&self, iface: &Interface, ns: &dyn Namespace, imports: &[Import]) -> Result<Value, String> {
        Ok(json!({
            "package": iface.package.dot_form(),
            "name": iface.name,
            "oneway": iface.oneway,
            "methods": iface.methods.iter().map(method_json).collect::<Vec<_>>(),
            "namespace": ns.names(),
            "imports": imports
                .iter()
                .map(|i| i.class_name.dot_form())
                .collect::<Vec<_>>(),
        }))
    }
}

fn method_json(m: &Method) -> Value {
    json!({
        "name": m.name,
        "oneway": m.oneway,
        "id": m.assigned_id,
        "return_type": m.return_type.display_name(),
        "args": m.args.iter().map(|a| json!({
            "name": a.name,
            "direction": direction_str(a.direction),
            "type": a.ty.display_name(),
        })).collect::<Vec<_>>(),
    })
}

fn direction_str(d: Direction) -> &'static str {
    match d {
        Direction::In => "in",
        Direction::Out => "out",
        Direction::InOut => "inout",
    }
}

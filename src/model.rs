//! AST Model (C3) namespace: re-exported from `lib.rs` as `model::ast`.

pub(crate) mod ast;

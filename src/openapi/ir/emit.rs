//! TypeScript code emission via the Emit trait.
//!
//! This module provides a trait-based approach to converting TypeScript AST nodes
//! to string representations. Each AST type implements `Emit` for clean, composable
//! code generation.

use super::types::{BinOp, TsExpr, TsFunction, TsLiteral, TsModule, TsParam, TsPrimitive, TsStmt, TsType};
use super::utils::escape_js_string;

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::Any => "any".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => format!("{}[]", inner.emit()),
            TsType::Ref(name) => name.clone(),
        }
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::StrictNotEqual => "!==".to_string(),
            BinOp::And => "&&".to_string(),
        }
    }
}

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("{}({})", callee.emit(), args_str)
            }
            TsExpr::Member { object, prop } => {
                format!("{}.{}", object.emit(), prop)
            }
            TsExpr::Index { object, index } => {
                format!("{}[{}]", object.emit(), index.emit())
            }
            TsExpr::New { callee, args } => {
                let args_str = args.iter().map(|a| a.emit()).collect::<Vec<_>>().join(", ");
                format!("new {}({})", callee.emit(), args_str)
            }
            TsExpr::BinOp { left, op, right } => {
                format!("{} {} {}", left.emit(), op.emit(), right.emit())
            }
            TsExpr::Assign { target, value } => {
                format!("{} = {}", target.emit(), value.emit())
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        match &self.ty {
            Some(ty) => format!("{}: {}", self.name, ty.emit()),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Expr(expr) => {
                format!("{}{};\n", prefix, expr.emit())
            }
            TsStmt::If { cond, then_body } => {
                let mut output = format!("{}if ({}) {{\n", prefix, cond.emit());
                emit_block(&mut output, then_body, indent + 1);
                output.push_str(&format!("{}}}\n", prefix));
                output
            }
            TsStmt::ForIndex { index, array, body } => {
                let mut output = format!(
                    "{prefix}for (let {index} = 0; {index} < {}.length; {index}++) {{\n",
                    array.emit()
                );
                emit_block(&mut output, body, indent + 1);
                output.push_str(&format!("{}}}\n", prefix));
                output
            }
            TsStmt::ForOf {
                binding,
                iterable,
                body,
            } => {
                let mut output =
                    format!("{}for (const {} of {}) {{\n", prefix, binding, iterable.emit());
                emit_block(&mut output, body, indent + 1);
                output.push_str(&format!("{}}}\n", prefix));
                output
            }
            TsStmt::Return(expr) => format!("{}return {};\n", prefix, expr.emit()),
        }
    }
}

fn emit_block(output: &mut String, body: &[TsStmt], indent: usize) {
    for stmt in body {
        output.push_str(&stmt.emit_indented(indent));
    }
}

// =============================================================================
// Functions
// =============================================================================

impl Emit for TsFunction {
    fn emit(&self) -> String {
        let mut output = String::new();

        // Export keyword
        if self.is_export {
            output.push_str("export ");
        }

        // Parameters
        let params_str = self.params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ");

        output.push_str(&format!("function {}({})", self.name, params_str));
        if self.body.is_empty() {
            output.push_str(" {}\n");
        } else {
            output.push_str(" {\n");
            emit_block(&mut output, &self.body, 1);
            output.push_str("}\n");
        }

        output
    }
}

// =============================================================================
// Module
// =============================================================================

impl Emit for TsModule {
    fn emit(&self) -> String {
        self.functions
            .iter()
            .map(|func| func.emit())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Tests
// =============================================================================

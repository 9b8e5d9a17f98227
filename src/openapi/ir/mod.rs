//! TypeScript AST used as the output of response-transform code generation.
//!
//! Two layers:
//! 1. TypeScript AST IR: types, expressions, statements, functions
//! 2. Emission: AST to TypeScript code strings via the `Emit` trait
//!
//! Code generation only builds structured AST (testable); emission is purely
//! mechanical string building.
//!
//! ## Module Structure
//!
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsStmt, TsFunction, TsModule)
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: Common utilities shared across modules

mod emit;
mod types;
pub mod utils;

pub use emit::Emit;
pub use types::{BinOp, TsExpr, TsFunction, TsLiteral, TsModule, TsParam, TsPrimitive, TsStmt, TsType};

//! TypeScript IR types for code generation.
//!
//! This module defines the slice of the TypeScript syntax that response
//! transforms need:
//! - TsType: parameter types (named references, arrays, `any`)
//! - TsExpr: expressions (identifiers, member access, calls, comparisons)
//! - TsStmt: statements (guards, loops, expression statements)
//! - TsFunction / TsModule: the emitted declarations

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Primitive type: any
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Named type reference: Order, Pet
    Ref(String),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    Any,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsLiteral {
    String(String),
    Null,
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", null
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Member access: foo.bar
    Member { object: Box<TsExpr>, prop: String },
    /// Index/bracket access: obj[key]
    Index {
        object: Box<TsExpr>,
        index: Box<TsExpr>,
    },
    /// new Date(...)
    New {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Binary expression: a !== undefined, a && b
    BinOp {
        left: Box<TsExpr>,
        op: BinOp,
        right: Box<TsExpr>,
    },
    /// Assignment: target = value
    Assign {
        target: Box<TsExpr>,
        value: Box<TsExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    StrictNotEqual,
    And,
}

impl TsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TsExpr::Ident(name.into())
    }

    pub fn member(object: TsExpr, prop: impl Into<String>) -> Self {
        TsExpr::Member {
            object: Box::new(object),
            prop: prop.into(),
        }
    }

    pub fn index(object: TsExpr, index: TsExpr) -> Self {
        TsExpr::Index {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn call(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn new_object(callee: TsExpr, args: Vec<TsExpr>) -> Self {
        TsExpr::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn bin(left: TsExpr, op: BinOp, right: TsExpr) -> Self {
        TsExpr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn assign(target: TsExpr, value: TsExpr) -> Self {
        TsExpr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsStmt {
    /// Expression statement
    Expr(TsExpr),
    /// If statement (guards never need an else branch)
    If { cond: TsExpr, then_body: Vec<TsStmt> },
    /// for (let i = 0; i < array.length; i++) { ... }
    ForIndex {
        index: String,
        array: TsExpr,
        body: Vec<TsStmt>,
    },
    /// for (const binding of iterable) { ... }
    ForOf {
        binding: String,
        iterable: TsExpr,
        body: Vec<TsStmt>,
    },
    /// return expr;
    Return(TsExpr),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsParam {
    pub name: String,
    pub ty: Option<TsType>,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsFunction {
    pub name: String,
    pub params: Vec<TsParam>,
    pub body: Vec<TsStmt>,
    pub is_export: bool,
}

/// Complete TypeScript module fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsModule {
    pub functions: Vec<TsFunction>,
}

//! Code generation from transformation plans to TypeScript AST.
//!
//! Every statement produced here mutates the value it is given in place:
//! date-time strings are replaced by `Date` objects, arrays and maps are
//! walked by index/key so that element assignments land in the container.

use tracing::debug;

use super::method::MethodId;
use super::operations::OperationPlan;
use super::plan::TransformationPlan;
use super::registry::MethodRegistry;
use crate::openapi::error::TransformError;
use crate::openapi::ir::utils::{capitalize_first, property_access};
use crate::openapi::ir::{BinOp, TsExpr, TsFunction, TsLiteral, TsParam, TsStmt, TsType};

/// Options that shape guard generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Properties are never `undefined`, only possibly `null`.
    pub require_all_properties: bool,
}

/// Position of the value being emitted.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    loops: usize,
    nested: bool,
}

impl Scope {
    fn index_var(self) -> String {
        loop_var("i", self.loops)
    }

    fn key_var(self) -> String {
        loop_var("key", self.loops)
    }

    fn enter_loop(self) -> Self {
        Self {
            loops: self.loops + 1,
            nested: true,
        }
    }

    fn enter_property(self) -> Self {
        Self {
            nested: true,
            ..self
        }
    }
}

fn loop_var(base: &str, depth: usize) -> String {
    if depth == 0 {
        base.to_string()
    } else {
        format!("{base}{depth}")
    }
}

/// Renders plans into statements against a registry whose methods are all built.
#[derive(Debug, Clone, Copy)]
pub struct TransformEmitter<'r> {
    registry: &'r MethodRegistry,
    options: EmitOptions,
}

impl<'r> TransformEmitter<'r> {
    pub fn new(registry: &'r MethodRegistry, options: EmitOptions) -> Self {
        Self { registry, options }
    }

    /// Statements applying `plan` to `value`. Empty when nothing needs to change.
    pub fn emit(
        &self,
        plan: &TransformationPlan,
        value: &TsExpr,
    ) -> Result<Vec<TsStmt>, TransformError> {
        self.emit_in(plan, value, Scope::default())
    }

    fn emit_in(
        &self,
        plan: &TransformationPlan,
        value: &TsExpr,
        scope: Scope,
    ) -> Result<Vec<TsStmt>, TransformError> {
        match plan {
            TransformationPlan::Primitive => Ok(Vec::new()),
            TransformationPlan::DateTime { nullable } => {
                let convert = TsStmt::Expr(TsExpr::assign(
                    value.clone(),
                    TsExpr::new_object(TsExpr::ident("Date"), vec![value.clone()]),
                ));
                Ok(self.guarded(value, *nullable, vec![convert]))
            }
            TransformationPlan::Delegate { method, nullable } => {
                // A named date-time string cannot be replaced from inside a
                // function, so it is converted where it is used.
                if let Some(inner) = self.registry.date_time_alias(*method) {
                    let plan = TransformationPlan::DateTime {
                        nullable: *nullable || inner,
                    };
                    return self.emit_in(&plan, value, scope);
                }
                if self.registry.is_method_empty(*method)? {
                    return Ok(Vec::new());
                }
                Ok(vec![self.call_method(*method, value, *nullable)])
            }
            TransformationPlan::Array { item, nullable } => {
                let index = scope.index_var();
                let element = TsExpr::index(value.clone(), TsExpr::ident(index.as_str()));
                let body = self.emit_in(item, &element, scope.enter_loop())?;
                if body.is_empty() {
                    return Ok(Vec::new());
                }
                let walk = TsStmt::ForIndex {
                    index,
                    array: value.clone(),
                    body,
                };
                Ok(self.guarded(value, *nullable, vec![walk]))
            }
            TransformationPlan::PassThrough { inner, nullable } => {
                let key = scope.key_var();
                let entry = TsExpr::index(value.clone(), TsExpr::ident(key.as_str()));
                let body = self.emit_in(inner, &entry, scope.enter_loop())?;
                if body.is_empty() {
                    return Ok(Vec::new());
                }
                let walk = TsStmt::ForOf {
                    binding: key,
                    iterable: TsExpr::call(
                        TsExpr::member(TsExpr::ident("Object"), "keys"),
                        vec![value.clone()],
                    ),
                    body,
                };
                Ok(self.guarded(value, *nullable, vec![walk]))
            }
            TransformationPlan::Object {
                properties,
                nullable,
            } => {
                let mut body = Vec::new();
                for property in properties {
                    let access = property_access(value.clone(), &property.name);
                    body.extend(self.emit_in(&property.plan, &access, scope.enter_property())?);
                }
                if body.is_empty() || !scope.nested {
                    return Ok(body);
                }
                Ok(self.guarded(value, *nullable, body))
            }
        }
    }

    /// `value !== undefined` / `value !== null` according to the options.
    fn presence_guard(&self, value: &TsExpr, nullable: bool) -> Option<TsExpr> {
        let not_null = || not_equal(value, TsExpr::Literal(TsLiteral::Null));
        let not_undefined = || not_equal(value, TsExpr::ident("undefined"));
        match (self.options.require_all_properties, nullable) {
            (true, true) => Some(not_null()),
            (true, false) => None,
            (false, true) => Some(TsExpr::bin(not_undefined(), BinOp::And, not_null())),
            (false, false) => Some(not_undefined()),
        }
    }

    fn guarded(&self, value: &TsExpr, nullable: bool, body: Vec<TsStmt>) -> Vec<TsStmt> {
        match self.presence_guard(value, nullable) {
            Some(cond) => vec![TsStmt::If {
                cond,
                then_body: body,
            }],
            None => body,
        }
    }

    /// Method calls always check for `undefined`: the callee assumes a value.
    fn call_method(&self, id: MethodId, value: &TsExpr, nullable: bool) -> TsStmt {
        let method = self.registry.method(id);
        let call = TsExpr::call(
            TsExpr::ident(method.function_name()),
            vec![value.clone()],
        );
        let mut cond = not_equal(value, TsExpr::ident("undefined"));
        if nullable {
            cond = TsExpr::bin(
                cond,
                BinOp::And,
                not_equal(value, TsExpr::Literal(TsLiteral::Null)),
            );
        }
        TsStmt::If {
            cond,
            then_body: vec![TsStmt::Expr(call)],
        }
    }

    /// Guarded call of the transform for `type_name`, if that type needs one.
    pub fn call_site(
        &self,
        type_name: &str,
        value: &TsExpr,
    ) -> Result<Option<TsStmt>, TransformError> {
        let Some(id) = self.registry.id_of(type_name) else {
            return Ok(None);
        };
        let delegate = TransformationPlan::Delegate {
            method: id,
            nullable: false,
        };
        let mut stmts = self.emit(&delegate, value)?;
        Ok(match stmts.len() {
            1 => stmts.pop(),
            _ => None,
        })
    }

    /// `function transformXResponse(x: X) { ... }` for a non-empty method.
    pub fn method_function(&self, id: MethodId) -> Result<Option<TsFunction>, TransformError> {
        let method = self.registry.method(id);
        if self.registry.is_method_empty(id)? {
            return Ok(None);
        }
        let Some(plan) = method.plan() else {
            return Ok(None);
        };
        if self.registry.date_time_alias(id).is_some() {
            debug!(
                type_name = method.type_name(),
                "Date-time alias is converted inline, no function generated."
            );
            return Ok(None);
        }

        let param = TsExpr::ident(method.parameter_name());
        let body = self.emit(plan, &param)?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(TsFunction {
            name: method.function_name().to_string(),
            params: vec![TsParam {
                name: method.parameter_name().to_string(),
                ty: Some(TsType::Ref(method.type_name().to_string())),
            }],
            body,
            is_export: false,
        }))
    }

    /// Functions for every non-empty method, in registry order.
    pub fn method_functions(&self) -> Result<Vec<TsFunction>, TransformError> {
        let mut functions = Vec::new();
        for (id, _) in self.registry.iter() {
            if let Some(function) = self.method_function(id)? {
                functions.push(function);
            }
        }
        Ok(functions)
    }

    /// Exported `transform<Op>OperationResponse(response)` returning the converted response.
    pub fn operation_function(
        &self,
        operation: &OperationPlan,
    ) -> Result<Option<TsFunction>, TransformError> {
        let response = TsExpr::ident("response");
        let mut body = self.emit(&operation.plan, &response)?;
        if body.is_empty() {
            return Ok(None);
        }
        body.push(TsStmt::Return(response));
        Ok(Some(TsFunction {
            name: format!("transform{}OperationResponse", capitalize_first(&operation.name)),
            params: vec![TsParam {
                name: "response".to_string(),
                ty: Some(operation.response_type.clone()),
            }],
            body,
            is_export: true,
        }))
    }
}

fn not_equal(value: &TsExpr, other: TsExpr) -> TsExpr {
    TsExpr::bin(value.clone(), BinOp::StrictNotEqual, other)
}

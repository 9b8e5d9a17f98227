//! Date transform generator for OpenAPI documents.
//!
//! The pipeline is:
//! 1. Parse: JSON/YAML text -> OpenApiSpec
//! 2. Plan: requested types and operation responses -> MethodRegistry + plans
//! 3. Codegen: plans -> TsFunction (TypeScript AST)
//! 4. Emit: TsModule -> String (via Emit trait)

use tracing::{debug, info};

use crate::openapi::error::TransformError;
use crate::openapi::ir::{Emit, TsExpr, TsFunction, TsModule, TsStmt};
use crate::openapi::spec::{DocumentFormat, OpenApiSpec};
use crate::openapi::transform::{
    EmitOptions, MethodRegistry, Planner, TransformEmitter, plan_operations,
};

/// What to generate and how to guard it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Properties may be `null` but are never missing.
    pub require_all_properties: bool,
    /// Component types to generate transforms for, in this order.
    pub types: Vec<String>,
    /// Generate transforms for every component schema.
    pub all_types: bool,
    /// Generate `transform<Op>OperationResponse` functions.
    pub include_operations: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            require_all_properties: false,
            types: Vec::new(),
            all_types: false,
            include_operations: true,
        }
    }
}

/// A guarded call of a type's transform on a value named `response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub type_name: String,
    pub statement: TsStmt,
}

/// Generated functions, ready to be spliced into a client module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    /// One function per non-empty named type, in first-reference order.
    pub method_functions: Vec<TsFunction>,
    /// One exported function per operation whose response contains dates.
    pub operation_functions: Vec<TsFunction>,
    /// Call sites for the requested types that need a transform.
    pub call_sites: Vec<CallSite>,
}

impl TransformOutput {
    pub fn is_empty(&self) -> bool {
        self.method_functions.is_empty() && self.operation_functions.is_empty()
    }

    pub fn to_module(&self) -> TsModule {
        TsModule {
            functions: self
                .method_functions
                .iter()
                .chain(&self.operation_functions)
                .cloned()
                .collect(),
        }
    }

    pub fn render(&self) -> String {
        self.to_module().emit()
    }

    /// The call-site snippet for `type_name`, if that type needs one.
    pub fn call_site(&self, type_name: &str) -> Option<String> {
        self.call_sites
            .iter()
            .find(|site| site.type_name == type_name)
            .map(|site| site.statement.emit_indented(0))
    }
}

/// Build every transform `options` asks for out of a parsed document.
pub fn generate_transforms(
    spec: &OpenApiSpec,
    options: &GenerateOptions,
) -> Result<TransformOutput, TransformError> {
    let planner = Planner::new(spec);
    let mut registry = MethodRegistry::new();

    let requested: Vec<String> = if options.all_types {
        spec.components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default()
    } else {
        options.types.clone()
    };

    for type_name in &requested {
        let schema = spec
            .component_schema(type_name)
            .ok_or_else(|| TransformError::UnknownType(type_name.clone()))?;
        registry.get_or_create(&planner, type_name, schema)?;
    }

    let operations = if options.include_operations {
        plan_operations(&planner, &mut registry)?
    } else {
        Vec::new()
    };
    debug!(
        methods = registry.len(),
        operations = operations.len(),
        "Planning complete."
    );

    let emitter = TransformEmitter::new(
        &registry,
        EmitOptions {
            require_all_properties: options.require_all_properties,
        },
    );

    let method_functions = emitter.method_functions()?;

    let mut operation_functions = Vec::new();
    for operation in &operations {
        if let Some(function) = emitter.operation_function(operation)? {
            operation_functions.push(function);
        }
    }

    let response = TsExpr::ident("response");
    let mut call_sites = Vec::new();
    for type_name in &requested {
        if let Some(statement) = emitter.call_site(type_name, &response)? {
            call_sites.push(CallSite {
                type_name: type_name.clone(),
                statement,
            });
        }
    }

    info!(
        functions = method_functions.len(),
        operations = operation_functions.len(),
        "Generated date transforms."
    );

    Ok(TransformOutput {
        method_functions,
        operation_functions,
        call_sites,
    })
}

/// Generate TypeScript transforms from an OpenAPI document string.
pub fn generate(
    text: &str,
    format: DocumentFormat,
    options: &GenerateOptions,
) -> Result<String, TransformError> {
    let spec = OpenApiSpec::parse(text, format)?;
    Ok(generate_transforms(&spec, options)?.render())
}

//! Date transform planning and code generation.
//!
//! The pipeline has four stages:
//! 1. **Resolve**: `$ref` strings are looked up among component schemas
//! 2. **Plan**: every schema node becomes a [`TransformationPlan`]; named
//!    types become methods in a [`MethodRegistry`] so recursion terminates
//! 3. **Decide**: the registry answers whether a method would do anything,
//!    also for cyclic type graphs
//! 4. **Emit**: [`TransformEmitter`] turns plans into TypeScript statements,
//!    dropping everything that would be a no-op

mod codegen;
mod method;
mod operations;
mod plan;
mod registry;
mod resolver;

pub use codegen::{EmitOptions, TransformEmitter};
pub use method::{MethodId, MethodState, TransformationMethod};
pub use operations::{
    HttpMethod, OperationPlan, is_json_media_type, operation_name, plan_operations,
    success_response_schema,
};
pub use plan::{Planner, PropertyPlan, TransformationPlan};
pub use registry::MethodRegistry;
pub use resolver::{SCHEMA_PREFIX, ref_type_name, resolve_ref};

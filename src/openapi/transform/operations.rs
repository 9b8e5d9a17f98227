//! Discovery of operation success responses and their plans.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::plan::{Planner, TransformationPlan};
use super::registry::MethodRegistry;
use super::resolver::ref_type_name;
use crate::openapi::error::TransformError;
use crate::openapi::ir::utils::sanitize_ts_identifier;
use crate::openapi::ir::{TsPrimitive, TsType};
use crate::openapi::spec::{Operation, SchemaOrBool};

/// Success statuses, most preferred first.
const SUCCESS_STATUSES: [&str; 8] = ["200", "201", "202", "203", "206", "207", "default", "2XX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// The response transform of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    /// Sanitized TypeScript identifier (e.g. "getOrderById")
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    /// Declared type of the `response` parameter
    pub response_type: TsType,
    pub plan: TransformationPlan,
}

/// Plan every operation that has a JSON success response, in path order.
pub fn plan_operations(
    planner: &Planner<'_>,
    registry: &mut MethodRegistry,
) -> Result<Vec<OperationPlan>, TransformError> {
    let doc = planner.document();
    let mut operations = Vec::new();
    let mut names = HashSet::new();

    let mut paths: Vec<_> = doc.paths.iter().collect();
    paths.sort_by_key(|(path, _)| *path);

    for (path, item) in paths {
        for (method, op) in [
            (HttpMethod::Get, item.get.as_ref()),
            (HttpMethod::Post, item.post.as_ref()),
            (HttpMethod::Put, item.put.as_ref()),
            (HttpMethod::Patch, item.patch.as_ref()),
            (HttpMethod::Delete, item.delete.as_ref()),
        ] {
            let Some(op) = op else { continue };
            let name = operation_name(path, method, op);
            if !names.insert(name.clone()) {
                return Err(TransformError::DuplicateOperationName(name));
            }
            let Some(schema) = success_response_schema(op)? else {
                trace!(path = path.as_str(), method = method.as_str(), "No JSON success response.");
                continue;
            };

            let plan = planner.plan(registry, schema)?;
            debug!(operation = name.as_str(), path = path.as_str(), "Planned operation response.");
            operations.push(OperationPlan {
                name,
                path: path.clone(),
                method,
                response_type: response_type(schema),
                plan,
            });
        }
    }

    Ok(operations)
}

/// Schema of the preferred success response with a JSON body.
///
/// Shared responses (`$ref` into `#/components/responses`) are not followed;
/// meeting one before a JSON body is found is an error.
pub fn success_response_schema(op: &Operation) -> Result<Option<&SchemaOrBool>, TransformError> {
    for status in SUCCESS_STATUSES {
        let Some(response) = op.responses.get(status) else {
            continue;
        };
        if let Some(reference) = &response.ref_path {
            return Err(TransformError::UnsupportedReferenceKind(reference.clone()));
        }
        let schema = response.content.iter().flatten().find_map(|(media_type, media)| {
            if is_json_media_type(media_type) {
                media.schema.as_ref()
            } else {
                None
            }
        });
        if schema.is_some() {
            return Ok(schema);
        }
    }
    Ok(None)
}

pub fn is_json_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json") || essence == "*/*"
}

/// Sanitized `operationId`, else built from the method and static path segments.
pub fn operation_name(path: &str, method: HttpMethod, op: &Operation) -> String {
    if let Some(id) = &op.operation_id {
        return sanitize_ts_identifier(id);
    }

    let path_parts: Vec<_> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();

    let base = path_parts.join("-");
    sanitize_ts_identifier(&format!("{}-{}", method.as_str().to_lowercase(), base))
}

/// `Name` for a reference, `Name[]` for an array of references, else `any`.
fn response_type(schema: &SchemaOrBool) -> TsType {
    let SchemaOrBool::Schema(schema) = schema else {
        return TsType::Primitive(TsPrimitive::Any);
    };
    if let Some(name) = schema.ref_path.as_deref().and_then(ref_type_name) {
        return TsType::Ref(name.to_string());
    }
    if schema.primary_type() == Some("array")
        && let Some(SchemaOrBool::Schema(items)) = schema.items.as_deref()
        && let Some(name) = items.ref_path.as_deref().and_then(ref_type_name)
    {
        return TsType::Array(Box::new(TsType::Ref(name.to_string())));
    }
    TsType::Primitive(TsPrimitive::Any)
}

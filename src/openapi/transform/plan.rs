//! Classification of schema nodes into transformation plans.

use super::method::MethodId;
use super::registry::MethodRegistry;
use super::resolver::resolve_ref;
use crate::openapi::error::TransformError;
use crate::openapi::spec::{OpenApiSpec, Schema, SchemaOrBool};

/// What has to happen to a value of some schema shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformationPlan {
    /// Nothing to do.
    Primitive,
    /// `value = new Date(value)`
    DateTime { nullable: bool },
    /// Call the function generated for a named type.
    Delegate { method: MethodId, nullable: bool },
    Array {
        item: Box<TransformationPlan>,
        nullable: bool,
    },
    /// A map (`additionalProperties`): `inner` applies to every value.
    PassThrough {
        inner: Box<TransformationPlan>,
        nullable: bool,
    },
    Object {
        properties: Vec<PropertyPlan>,
        nullable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPlan {
    pub name: String,
    pub plan: TransformationPlan,
}

impl TransformationPlan {
    /// Mark the plan nullable (used when unwrapping `anyOf: [X, null]`).
    fn into_nullable(self) -> Self {
        match self {
            Self::Primitive => Self::Primitive,
            Self::DateTime { .. } => Self::DateTime { nullable: true },
            Self::Delegate { method, .. } => Self::Delegate {
                method,
                nullable: true,
            },
            Self::Array { item, .. } => Self::Array {
                item,
                nullable: true,
            },
            Self::PassThrough { inner, .. } => Self::PassThrough {
                inner,
                nullable: true,
            },
            Self::Object { properties, .. } => Self::Object {
                properties,
                nullable: true,
            },
        }
    }
}

/// Builds plans for schemas of one document, registering named types on the way.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    doc: &'a OpenApiSpec,
}

impl<'a> Planner<'a> {
    pub fn new(doc: &'a OpenApiSpec) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &'a OpenApiSpec {
        self.doc
    }

    pub fn plan(
        &self,
        registry: &mut MethodRegistry,
        schema: &SchemaOrBool,
    ) -> Result<TransformationPlan, TransformError> {
        match schema {
            // `true`/`false` is the "any" shorthand
            SchemaOrBool::Bool(_) => Ok(TransformationPlan::Primitive),
            SchemaOrBool::Schema(schema) => self.plan_schema(registry, schema),
        }
    }

    fn plan_schema(
        &self,
        registry: &mut MethodRegistry,
        schema: &Schema,
    ) -> Result<TransformationPlan, TransformError> {
        if let Some(reference) = &schema.ref_path {
            let (resolved, name) = resolve_ref(self.doc, reference)?;
            let method = registry.get_or_create(self, name, resolved)?;
            return Ok(TransformationPlan::Delegate {
                method,
                nullable: schema.is_nullable(),
            });
        }

        if let Some(inner) = schema.unwrap_nullable() {
            return Ok(self.plan(registry, inner)?.into_nullable());
        }
        // Any other union is opaque.
        if schema.any_of.is_some() {
            return Ok(TransformationPlan::Primitive);
        }

        let nullable = schema.is_nullable();
        match schema.primary_type() {
            Some("array") => {
                let item = match &schema.items {
                    Some(items) => self.plan(registry, items)?,
                    None => TransformationPlan::Primitive,
                };
                return Ok(TransformationPlan::Array {
                    item: Box::new(item),
                    nullable,
                });
            }
            Some("boolean" | "integer" | "number") => return Ok(TransformationPlan::Primitive),
            _ => {}
        }

        if schema.is_object() {
            return self.plan_object(registry, schema, nullable);
        }

        // Has to be a string at this point
        if schema.format.as_deref() == Some("date-time") {
            Ok(TransformationPlan::DateTime { nullable })
        } else {
            Ok(TransformationPlan::Primitive)
        }
    }

    fn plan_object(
        &self,
        registry: &mut MethodRegistry,
        schema: &Schema,
        nullable: bool,
    ) -> Result<TransformationPlan, TransformError> {
        match (&schema.properties, schema.map_values()) {
            (Some(_), Some(_)) => Err(TransformError::ConflictingObjectShape),
            (None, Some(values)) => Ok(TransformationPlan::PassThrough {
                inner: Box::new(self.plan(registry, values)?),
                nullable,
            }),
            (Some(properties), None) => {
                let properties = properties
                    .iter()
                    .map(|(name, property)| {
                        Ok(PropertyPlan {
                            name: name.clone(),
                            plan: self.plan(registry, property)?,
                        })
                    })
                    .collect::<Result<Vec<_>, TransformError>>()?;
                Ok(TransformationPlan::Object {
                    properties,
                    nullable,
                })
            }
            (None, None) => Err(TransformError::EmptyObjectSchema),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn plan_inline(doc: &OpenApiSpec, schema_json: &str) -> Result<TransformationPlan, TransformError> {
        let schema: SchemaOrBool = serde_json::from_str(schema_json).unwrap();
        let mut registry = MethodRegistry::new();
        Planner::new(doc).plan(&mut registry, &schema)
    }

    fn empty_doc() -> OpenApiSpec {
        OpenApiSpec::default()
    }

    #[test]
    fn test_boolean_schema_is_primitive() {
        let doc = empty_doc();
        assert_eq!(plan_inline(&doc, "true").unwrap(), TransformationPlan::Primitive);
        assert_eq!(plan_inline(&doc, "false").unwrap(), TransformationPlan::Primitive);
    }

    #[test]
    fn test_scalars_are_primitive() {
        let doc = empty_doc();
        for schema in [
            r#"{"type": "boolean"}"#,
            r#"{"type": "integer", "format": "int64"}"#,
            r#"{"type": "number"}"#,
            r#"{"type": "string"}"#,
            r#"{"type": "string", "format": "date"}"#,
            r#"{"type": "string", "enum": ["a", "b"]}"#,
        ] {
            assert_eq!(plan_inline(&doc, schema).unwrap(), TransformationPlan::Primitive, "{schema}");
        }
    }

    #[test]
    fn test_date_time_nullability() {
        let doc = empty_doc();
        assert_eq!(
            plan_inline(&doc, r#"{"type": "string", "format": "date-time"}"#).unwrap(),
            TransformationPlan::DateTime { nullable: false }
        );
        assert_eq!(
            plan_inline(&doc, r#"{"type": "string", "format": "date-time", "nullable": true}"#).unwrap(),
            TransformationPlan::DateTime { nullable: true }
        );
        assert_eq!(
            plan_inline(&doc, r#"{"type": ["string", "null"], "format": "date-time"}"#).unwrap(),
            TransformationPlan::DateTime { nullable: true }
        );
        assert_eq!(
            plan_inline(&doc, r#"{"anyOf": [{"type": "string", "format": "date-time"}, {"type": "null"}]}"#)
                .unwrap(),
            TransformationPlan::DateTime { nullable: true }
        );
    }

    #[test]
    fn test_other_unions_are_opaque() {
        let doc = empty_doc();
        let plan = plan_inline(
            &doc,
            r#"{"anyOf": [{"type": "string", "format": "date-time"}, {"type": "integer"}]}"#,
        )
        .unwrap();
        assert_eq!(plan, TransformationPlan::Primitive);
    }

    #[test]
    fn test_array_without_items() {
        let doc = empty_doc();
        assert_eq!(
            plan_inline(&doc, r#"{"type": "array", "nullable": true}"#).unwrap(),
            TransformationPlan::Array {
                item: Box::new(TransformationPlan::Primitive),
                nullable: true
            }
        );
    }

    #[test]
    fn test_object_properties_in_declaration_order() {
        let doc = empty_doc();
        let plan = plan_inline(
            &doc,
            r#"{"type": "object", "properties": {
                "updated": {"type": "string", "format": "date-time"},
                "count": {"type": "integer"},
                "created": {"type": "string", "format": "date-time"}
            }}"#,
        )
        .unwrap();
        let TransformationPlan::Object { properties, nullable } = plan else {
            panic!("expected object plan, got {plan:?}");
        };
        assert!(!nullable);
        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["updated", "count", "created"]);
        assert_eq!(properties[1].plan, TransformationPlan::Primitive);
    }

    #[test]
    fn test_map_is_pass_through() {
        let doc = empty_doc();
        let plan = plan_inline(
            &doc,
            r#"{"type": "object", "additionalProperties": {"type": "string", "format": "date-time"}}"#,
        )
        .unwrap();
        assert_eq!(
            plan,
            TransformationPlan::PassThrough {
                inner: Box::new(TransformationPlan::DateTime { nullable: false }),
                nullable: false
            }
        );

        let plan = plan_inline(&doc, r#"{"type": "object", "additionalProperties": true}"#).unwrap();
        assert_eq!(
            plan,
            TransformationPlan::PassThrough {
                inner: Box::new(TransformationPlan::Primitive),
                nullable: false
            }
        );
    }

    #[test]
    fn test_object_shape_errors() {
        let doc = empty_doc();
        let err = plan_inline(
            &doc,
            r#"{"type": "object", "properties": {"a": {"type": "string"}}, "additionalProperties": {"type": "string"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::ConflictingObjectShape));

        let err = plan_inline(&doc, r#"{"type": "object"}"#).unwrap_err();
        assert!(matches!(err, TransformError::EmptyObjectSchema));

        // additionalProperties: false is the same as leaving it out
        let plan = plan_inline(
            &doc,
            r#"{"type": "object", "properties": {"a": {"type": "string"}}, "additionalProperties": false}"#,
        )
        .unwrap();
        assert!(matches!(plan, TransformationPlan::Object { .. }));
    }

    #[test]
    fn test_reference_delegates_to_registered_method() {
        let doc = OpenApiSpec::from_json(
            r#"{"components": {"schemas": {"Pet": {"type": "object", "properties": {"born": {"type": "string", "format": "date-time"}}}}}}"#,
        )
        .unwrap();
        let schema: SchemaOrBool =
            serde_json::from_str(r##"{"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}"##).unwrap();
        let mut registry = MethodRegistry::new();
        let plan = Planner::new(&doc).plan(&mut registry, &schema).unwrap();

        let id = registry.id_of("Pet").unwrap();
        assert_eq!(
            plan,
            TransformationPlan::Array {
                item: Box::new(TransformationPlan::Delegate {
                    method: id,
                    nullable: false
                }),
                nullable: false
            }
        );
    }

    #[test]
    fn test_unsupported_reference_aborts() {
        let doc = empty_doc();
        let err = plan_inline(
            &doc,
            r##"{"type": "object", "properties": {"pet": {"$ref": "#/definitions/Pet"}}}"##,
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedReferenceKind(_)));
    }
}

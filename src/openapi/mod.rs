//! OpenAPI response date transforms.
//!
//! This module reads OpenAPI 3.0/3.1 documents and generates TypeScript
//! functions that convert `format: date-time` strings in decoded JSON
//! responses into `Date` objects:
//! - One `transform<Type>Response` function per component type that holds dates
//! - One exported `transform<Op>OperationResponse` function per operation
//! - Guarded call-site snippets for requested types

mod emitter;
mod error;
pub mod ir;
pub mod spec;
pub mod transform;

pub use emitter::{CallSite, GenerateOptions, TransformOutput, generate, generate_transforms};
pub use error::TransformError;
pub use spec::{DocumentFormat, OpenApiSpec};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const PETSTORE_JSON: &str = r##"{
  "openapi": "3.0.3",
  "info": { "title": "Petstore", "version": "1.0.0" },
  "paths": {
    "/store/order/{orderId}": {
      "get": {
        "operationId": "getOrderById",
        "responses": {
          "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Order" } } } },
          "404": { "description": "Not found" }
        }
      }
    },
    "/pets": {
      "get": {
        "operationId": "listPets",
        "responses": {
          "200": { "description": "OK", "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } } } }
        }
      }
    },
    "/pets/{petId}/vaccinations": {
      "get": {
        "responses": {
          "200": { "description": "OK", "content": { "application/json": { "schema": { "type": "object", "additionalProperties": { "type": "string", "format": "date-time" } } } } }
        }
      }
    }
  },
  "components": {
    "schemas": {
      "Order": {
        "type": "object",
        "properties": {
          "id": { "type": "integer", "format": "int64" },
          "shipDate": { "type": "string", "format": "date-time" },
          "pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } },
          "status": { "type": "string", "enum": ["placed", "approved", "delivered"] }
        }
      },
      "Pet": {
        "type": "object",
        "properties": {
          "name": { "type": "string" },
          "birthDate": { "type": "string", "format": "date-time", "nullable": true },
          "owner": { "$ref": "#/components/schemas/Owner" }
        }
      },
      "Owner": {
        "type": "object",
        "properties": {
          "name": { "type": "string" },
          "friends": { "type": "array", "items": { "$ref": "#/components/schemas/Owner" } }
        }
      }
    }
  }
}"##;

    const PETSTORE_YAML: &str = r#"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /store/order/{orderId}:
    get:
      operationId: getOrderById
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
        "404":
          description: Not found
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
  /pets/{petId}/vaccinations:
    get:
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                type: object
                additionalProperties:
                  type: string
                  format: date-time
components:
  schemas:
    Order:
      type: object
      properties:
        id:
          type: integer
          format: int64
        shipDate:
          type: string
          format: date-time
        pets:
          type: array
          items:
            $ref: '#/components/schemas/Pet'
        status:
          type: string
          enum: [placed, approved, delivered]
    Pet:
      type: object
      properties:
        name:
          type: string
        birthDate:
          type: string
          format: date-time
          nullable: true
        owner:
          $ref: '#/components/schemas/Owner'
    Owner:
      type: object
      properties:
        name:
          type: string
        friends:
          type: array
          items:
            $ref: '#/components/schemas/Owner'
"#;

    const PET_FUNCTION: &str = "function transformPetResponse(pet: Pet) {
  if (pet.birthDate !== undefined && pet.birthDate !== null) {
    pet.birthDate = new Date(pet.birthDate);
  }
}
";

    const ORDER_FUNCTION: &str = "function transformOrderResponse(order: Order) {
  if (order.shipDate !== undefined) {
    order.shipDate = new Date(order.shipDate);
  }
  if (order.pets !== undefined) {
    for (let i = 0; i < order.pets.length; i++) {
      if (order.pets[i] !== undefined) {
        transformPetResponse(order.pets[i]);
      }
    }
  }
}
";

    fn generate_json(options: &GenerateOptions) -> String {
        generate(PETSTORE_JSON, DocumentFormat::Json, options).unwrap()
    }

    #[test]
    fn test_generate_petstore() {
        let ts_code = generate_json(&GenerateOptions::default());

        // Methods in first-reference order: Pet (via listPets) before Order.
        assert!(ts_code.starts_with(&format!("{PET_FUNCTION}\n{ORDER_FUNCTION}\n")));
        // A type whose only reference cycle carries no dates gets no function.
        assert!(!ts_code.contains("transformOwnerResponse"));

        assert!(ts_code.contains("export function transformListPetsOperationResponse(response: Pet[]) {"));
        assert!(ts_code.contains(
            "export function transformGetPetsVaccinationsOperationResponse(response: any) {
  if (response !== undefined) {
    for (const key of Object.keys(response)) {
      if (response[key] !== undefined) {
        response[key] = new Date(response[key]);
      }
    }
  }
  return response;
}
"
        ));
        assert!(ts_code.ends_with(
            "export function transformGetOrderByIdOperationResponse(response: Order) {
  if (response !== undefined) {
    transformOrderResponse(response);
  }
  return response;
}
"
        ));
    }

    #[test]
    fn test_yaml_and_json_agree() {
        let options = GenerateOptions::default();
        let from_yaml = generate(PETSTORE_YAML, DocumentFormat::Yaml, &options).unwrap();
        assert_eq!(from_yaml, generate_json(&options));
    }

    #[test]
    fn test_require_all_properties_drops_undefined_checks() {
        let ts_code = generate_json(&GenerateOptions {
            require_all_properties: true,
            ..GenerateOptions::default()
        });
        assert!(ts_code.contains(
            "  if (pet.birthDate !== null) {\n    pet.birthDate = new Date(pet.birthDate);\n  }\n"
        ));
        assert!(ts_code.contains("  order.shipDate = new Date(order.shipDate);\n"));
        // Calls stay guarded.
        assert!(ts_code.contains("if (order.pets[i] !== undefined) {"));
    }

    #[test]
    fn test_requested_types_only() {
        let spec = OpenApiSpec::from_json(PETSTORE_JSON).unwrap();
        let output = generate_transforms(
            &spec,
            &GenerateOptions {
                types: vec!["Order".into(), "Owner".into()],
                include_operations: false,
                ..GenerateOptions::default()
            },
        )
        .unwrap();

        let names: Vec<_> = output.method_functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["transformOrderResponse", "transformPetResponse"]);
        assert!(output.operation_functions.is_empty());

        assert_eq!(
            output.call_site("Order").unwrap(),
            "if (response !== undefined) {\n  transformOrderResponse(response);\n}\n"
        );
        assert!(output.call_site("Owner").is_none());
    }

    #[test]
    fn test_all_types_follow_component_order() {
        let spec = OpenApiSpec::from_json(PETSTORE_JSON).unwrap();
        let output = generate_transforms(
            &spec,
            &GenerateOptions {
                all_types: true,
                include_operations: false,
                ..GenerateOptions::default()
            },
        )
        .unwrap();
        assert_eq!(output.render(), format!("{ORDER_FUNCTION}\n{PET_FUNCTION}"));
    }

    #[test]
    fn test_no_dates_no_output() {
        let spec = OpenApiSpec::from_json(PETSTORE_JSON).unwrap();
        let output = generate_transforms(
            &spec,
            &GenerateOptions {
                types: vec!["Owner".into()],
                include_operations: false,
                ..GenerateOptions::default()
            },
        )
        .unwrap();
        assert!(output.is_empty());
        assert_eq!(output.render(), "");
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = generate(
            PETSTORE_JSON,
            DocumentFormat::Json,
            &GenerateOptions {
                types: vec!["Invoice".into()],
                ..GenerateOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::UnknownType(name) if name == "Invoice"));
    }

    #[test]
    fn test_errors_abort_generation() {
        let err = generate("{ not json", DocumentFormat::Json, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::Parse(_)));

        let external_ref = r#"{"paths": {"/a": {"get": {"responses": {"200": {"content": {"application/json": {
            "schema": {"$ref": "common.yaml#/Thing"}
        }}}}}}}}"#;
        let err = generate(external_ref, DocumentFormat::Json, &GenerateOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Not implemented ref"));
        assert!(matches!(err, TransformError::UnsupportedReferenceKind(ref r) if r == "common.yaml#/Thing"));
    }
}

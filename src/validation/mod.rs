//! Semantic validation of workflows documents.
//!
//! Every rule is a method returning the violations it found as a
//! `Vec<ValidationError>`; the document pass concatenates them in traversal
//! order (info, source descriptions, workflows, steps, components) and never
//! stops at the first violation.

mod action;
mod document;
mod index;
mod parameter;
mod syntax;
mod workflow;

pub use index::IdentifierIndex;
pub use syntax::{is_valid_component_key, is_valid_json_pointer, is_valid_outputs_key, is_valid_workflow_id};

use crate::models::WorkflowsSpec;
use serde::Serialize;

/// Message reported when the document or its version is missing
pub const UNDEFINED_SPEC: &str = "'workflowsSpec' is undefined";

/// Type of validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    MissingField,
    InvalidEnumValue,
    InvalidSyntax,
    DuplicateIdentifier,
    UnresolvedReference,
    /// None of the mutually exclusive target fields is set
    MissingEntity,
    /// More than one of the mutually exclusive target fields is set
    InvalidEntity,
    OutOfRange,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::MissingField => write!(f, "Missing required field"),
            ErrorType::InvalidEnumValue => write!(f, "Invalid enumeration value"),
            ErrorType::InvalidSyntax => write!(f, "Invalid identifier syntax"),
            ErrorType::DuplicateIdentifier => write!(f, "Duplicate identifier"),
            ErrorType::UnresolvedReference => write!(f, "Unresolved reference"),
            ErrorType::MissingEntity => write!(f, "Missing entity"),
            ErrorType::InvalidEntity => write!(f, "Invalid entity"),
            ErrorType::OutOfRange => write!(f, "Value out of range"),
        }
    }
}

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub error_type: ErrorType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl ValidationError {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            workflow_id: None,
            step_id: None,
            source_name: None,
            component: None,
            error_type,
            message: message.into(),
            file_path: None,
            line_number: None,
        }
    }

    pub fn with_workflow(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn with_step(mut self, step_id: impl Into<String>) -> Self {
        self.step_id = Some(step_id.into());
        self
    }

    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line_number: usize) -> Self {
        self.file_path = Some(file_path.into());
        self.line_number = Some(line_number);
        self
    }

    /// Format error message with location context
    pub fn format(&self) -> String {
        let mut parts = Vec::new();

        // File location
        if let (Some(path), Some(line)) = (&self.file_path, self.line_number) {
            parts.push(format!("{}:{}", path, line));
        }

        if let Some(source) = &self.source_name {
            parts.push(format!("[source: {}]", source));
        }

        if let Some(component) = &self.component {
            parts.push(format!("[component: {}]", component));
        }

        // Workflow/step context
        match (&self.workflow_id, &self.step_id) {
            (Some(w), Some(s)) => parts.push(format!("[workflow: {}, step: {}]", w, s)),
            (Some(w), None) => parts.push(format!("[workflow: {}]", w)),
            (None, Some(s)) => parts.push(format!("[step: {}]", s)),
            (None, None) => {}
        }

        parts.push(self.message.clone());

        parts.join(" ")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Result of validating one document
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Formatted error messages in traversal order
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::format).collect()
    }

    /// Get a summary message
    pub fn summary(&self) -> String {
        if self.is_valid() {
            "Document is valid".to_string()
        } else {
            format!("Document is invalid with {} errors", self.errors.len())
        }
    }
}

// `is_valid` is always derived from `errors`
impl Serialize for ValidationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ValidationResult", 2)?;
        state.serialize_field("is_valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

/// Rule set for one validation run.
///
/// Holds the identifier indices built by [`WorkflowsValidator::load_workflow_ids`]
/// and [`WorkflowsValidator::load_step_ids`]. [`WorkflowsValidator::validate`]
/// always starts from a fresh instance so indices never leak between documents.
#[derive(Debug, Default)]
pub struct WorkflowsValidator<'a> {
    index: IdentifierIndex<'a>,
}

impl<'a> WorkflowsValidator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a whole document, collecting every violation
    pub fn validate(document: Option<&'a WorkflowsSpec>) -> ValidationResult {
        let Some(document) = document.filter(|d| d.workflows_spec.as_deref().is_some_and(|v| !v.is_empty()))
        else {
            tracing::debug!("Document or its version is missing, skipping all rules");
            return ValidationResult::from_errors(vec![ValidationError::new(
                ErrorType::MissingField,
                UNDEFINED_SPEC,
            )]);
        };

        let mut validator = Self::new();
        let mut errors = vec![];

        errors.extend(validator.validate_info(document.info.as_ref()));
        errors.extend(validator.validate_source_descriptions(document.source_descriptions.as_deref()));

        let workflows = document.workflows();
        if workflows.is_empty() {
            errors.push(ValidationError::new(
                ErrorType::MissingField,
                "'workflows' is undefined: at least one workflow is required",
            ));
        }

        errors.extend(validator.load_workflow_ids(workflows));
        errors.extend(validator.load_step_ids(workflows));
        tracing::debug!(
            workflows = validator.index.workflow_count(),
            "Identifier index built"
        );

        for (idx, workflow) in workflows.iter().enumerate() {
            errors.extend(validator.validate_workflow(workflow, idx));

            let label = workflow.label(idx);
            for step in workflow.steps() {
                errors.extend(validator.scoped_step_errors(step, Some(idx), &label));
            }
        }

        errors.extend(validator.validate_components(document.components.as_ref()));

        let result = ValidationResult::from_errors(errors);
        tracing::info!(
            valid = result.is_valid(),
            errors = result.errors.len(),
            "Validation finished"
        );
        result
    }
}

/// Validate a workflows document
pub fn validate(document: Option<&WorkflowsSpec>) -> ValidationResult {
    WorkflowsValidator::validate(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_DOCUMENT: &str = r#"
workflowsSpec: 1.0.0
info:
  title: Pet purchase
  version: 1.0.0
sourceDescriptions:
  - name: petStore
    url: https://example.com/petstore.json
    type: openapi
workflows:
  - workflowId: buy-pet
    steps:
      - stepId: find-pet
        operationId: findPetsByStatus
        parameters:
          - name: status
            in: query
            value: available
        outputs:
          petId: $response.body#/0/id
      - stepId: place-order
        operationId: placeOrder
        dependsOn: find-pet
        onFailure:
          - type: retry
            stepId: place-order
            retryAfter: 1000
            retryLimit: 3
"#;

    fn parse(yaml: &str) -> WorkflowsSpec {
        serde_yaml::from_str(yaml).expect("Failed to parse document")
    }

    #[test]
    fn test_missing_document() {
        let result = validate(None);
        assert!(!result.is_valid());
        assert_eq!(result.messages(), vec![UNDEFINED_SPEC.to_string()]);
    }

    #[test]
    fn test_missing_version_short_circuits() {
        // Nothing else is filled in, yet only the root error is reported
        let document = WorkflowsSpec::default();
        let result = validate(Some(&document));

        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "'workflowsSpec' is undefined");

        let document = WorkflowsSpec {
            workflows_spec: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(validate(Some(&document)).messages(), vec![UNDEFINED_SPEC.to_string()]);
    }

    #[test]
    fn test_valid_document() {
        let document = parse(VALID_DOCUMENT);
        let result = validate(Some(&document));

        assert!(result.is_valid(), "Unexpected errors: {:?}", result.messages());
        assert_eq!(result.summary(), "Document is valid");
    }

    #[test]
    fn test_validate_is_idempotent() {
        let document = parse(
            r#"
workflowsSpec: 1.0.0
info:
  title: Broken
workflows:
  - workflowId: flow
    steps:
      - stepId: a
        dependsOn: missing
      - stepId: a
        operationId: op
"#,
        );

        let first = validate(Some(&document));
        let second = validate(Some(&document));
        assert_eq!(first, second);
        assert!(!first.is_valid());
    }

    #[test]
    fn test_errors_follow_traversal_order() {
        let document = parse(
            r#"
workflowsSpec: 1.0.0
info:
  version: 1.0.0
sourceDescriptions:
  - name: api
    type: openapi
workflows:
  - workflowId: first flow
    steps:
      - stepId: s1
        operationId: op
  - workflowId: second
    steps:
      - stepId: s1
components:
  parameters:
    bad key:
      in: query
      value: 1
"#,
        );

        let result = validate(Some(&document));
        let kinds: Vec<_> = result.errors.iter().map(|e| e.error_type).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorType::MissingField,  // info.title
                ErrorType::MissingField,  // url
                ErrorType::InvalidSyntax, // workflowId
                ErrorType::MissingEntity, // second/s1
                ErrorType::InvalidSyntax, // component key
            ]
        );
        assert_eq!(result.errors[3].workflow_id.as_deref(), Some("second"));
        assert_eq!(result.errors[3].step_id.as_deref(), Some("s1"));
        assert_eq!(result.summary(), "Document is invalid with 5 errors");
    }

    #[test]
    fn test_missing_workflows() {
        let document = parse(
            r#"
workflowsSpec: 1.0.0
info:
  title: Empty
  version: 1.0.0
sourceDescriptions:
  - name: api
    url: openapi.yaml
    type: openapi
"#,
        );

        let result = validate(Some(&document));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::MissingField);
    }

    #[test]
    fn test_error_format_with_context() {
        let error = ValidationError::new(ErrorType::MissingField, "'stepId' is undefined")
            .with_workflow("q1")
            .with_step("Step[0]");
        assert_eq!(error.format(), "[workflow: q1, step: Step[0]] 'stepId' is undefined");

        let error = error.with_location("flows.yaml", 12);
        assert_eq!(
            error.to_string(),
            "flows.yaml:12 [workflow: q1, step: Step[0]] 'stepId' is undefined"
        );
    }

    #[test]
    fn test_step_dependencies_stay_within_repeated_workflow_id() {
        let document = parse(
            r#"
workflowsSpec: 1.0.0
info:
  title: Refunds
  version: 1.0.0
sourceDescriptions:
  - name: api
    url: openapi.yaml
    type: openapi
workflows:
  - workflowId: refunds
    steps:
      - stepId: only-in-first
        operationId: lookup
  - workflowId: refunds
    steps:
      - stepId: second
        operationId: refund
        dependsOn: only-in-first
"#,
        );

        let result = validate(Some(&document));
        assert_eq!(
            result.messages(),
            vec![
                "[workflow: refunds] 'workflowId' is not unique: 'refunds' is already used".to_string(),
                "[workflow: refunds, step: second] 'dependsOn' references unknown step 'only-in-first'"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_positional_label_keeps_own_step_scope() {
        let document = parse(
            r#"
workflowsSpec: 1.0.0
info:
  title: Labels
  version: 1.0.0
sourceDescriptions:
  - name: api
    url: openapi.yaml
    type: openapi
workflows:
  - workflowId: "Workflow[1]"
    steps:
      - stepId: ghost
        operationId: haunt
  - steps:
      - stepId: visitor
        operationId: visit
        dependsOn: ghost
"#,
        );

        let result = validate(Some(&document));
        let kinds: Vec<_> = result.errors.iter().map(|e| e.error_type).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorType::InvalidSyntax,
                ErrorType::MissingField,
                ErrorType::UnresolvedReference,
            ]
        );
        assert!(result.errors[2].message.contains("unknown step 'ghost'"));
    }

    #[test]
    fn test_result_validity_follows_errors() {
        let mut result = ValidationResult::from_errors(vec![]);
        assert!(result.is_valid());
        assert_eq!(result.summary(), "Document is valid");

        result
            .errors
            .push(ValidationError::new(ErrorType::MissingField, "'info' is undefined"));
        assert!(!result.is_valid());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}

use super::syntax::{is_valid_component_key, is_valid_json_pointer};
use super::{ErrorType, ValidationError, WorkflowsValidator};
use crate::models::workflow::present;
use crate::models::{Components, Parameter};

const PARAMETER_LOCATIONS: &[&str] = &["path", "query", "header", "cookie"];

impl WorkflowsValidator<'_> {
    /// Validate a parameter attached to a step or workflow
    pub fn validate_parameter(&self, parameter: &Parameter, workflow_id: &str) -> Vec<ValidationError> {
        parameter_errors(parameter)
            .into_iter()
            .map(|e| e.with_workflow(workflow_id))
            .collect()
    }

    /// Validate the reusable components registry
    pub fn validate_components(&self, components: Option<&Components>) -> Vec<ValidationError> {
        let Some(components) = components else {
            return vec![];
        };

        let mut errors = vec![];

        if let Some(inputs) = &components.inputs {
            errors.extend(check_keys("inputs", inputs.keys()));
        }

        if let Some(parameters) = &components.parameters {
            errors.extend(check_keys("parameters", parameters.keys()));
            for (key, parameter) in parameters {
                let path = format!("parameters.{}", key);
                errors.extend(parameter_errors(parameter).into_iter().map(|e| e.with_component(path.as_str())));
            }
        }

        if let Some(actions) = &components.success_actions {
            errors.extend(check_keys("successActions", actions.keys()));
            for (key, action) in actions {
                let path = format!("successActions.{}", key);
                errors.extend(
                    self.success_action_errors(action)
                        .into_iter()
                        .map(|e| e.with_component(path.as_str())),
                );
            }
        }

        if let Some(actions) = &components.failure_actions {
            errors.extend(check_keys("failureActions", actions.keys()));
            for (key, action) in actions {
                let path = format!("failureActions.{}", key);
                errors.extend(
                    self.failure_action_errors(action)
                        .into_iter()
                        .map(|e| e.with_component(path.as_str())),
                );
            }
        }

        errors
    }
}

/// Rules shared by inline and reusable parameters, without location context
pub(super) fn parameter_errors(parameter: &Parameter) -> Vec<ValidationError> {
    let mut errors = vec![];
    let prefix = present(&parameter.name)
        .map(|name| format!("parameter '{}': ", name))
        .unwrap_or_default();

    match present(&parameter.location) {
        None => errors.push(ValidationError::new(
            ErrorType::MissingField,
            format!("{}'in' is undefined", prefix),
        )),
        Some(location) if !PARAMETER_LOCATIONS.contains(&location) => errors.push(ValidationError::new(
            ErrorType::InvalidEnumValue,
            format!(
                "{}'in' is invalid: '{}' (expected one of: {})",
                prefix,
                location,
                PARAMETER_LOCATIONS.join(", ")
            ),
        )),
        Some(_) => {}
    }

    let has_value = match &parameter.value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    if !has_value {
        errors.push(ValidationError::new(
            ErrorType::MissingField,
            format!("{}'value' is undefined", prefix),
        ));
    }

    if let Some(target) = present(&parameter.target)
        && !is_valid_json_pointer(target)
    {
        errors.push(ValidationError::new(
            ErrorType::InvalidSyntax,
            format!("{}'target' is not a valid JSON pointer: '{}'", prefix, target),
        ));
    }

    errors
}

fn check_keys<'k>(section: &str, keys: impl Iterator<Item = &'k String>) -> Vec<ValidationError> {
    keys.filter(|key| !is_valid_component_key(key))
        .map(|key| {
            ValidationError::new(
                ErrorType::InvalidSyntax,
                format!("component key is invalid: '{}' (whitespace is not allowed)", key),
            )
            .with_component(section)
        })
        .collect()
}

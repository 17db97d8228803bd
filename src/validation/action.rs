use super::{ErrorType, ValidationError, WorkflowsValidator};
use crate::models::workflow::present;
use crate::models::{ActionTarget, Criterion, FailureAction, SuccessAction};

const SUCCESS_ACTION_TYPES: &[&str] = &["end", "goto"];
const FAILURE_ACTION_TYPES: &[&str] = &["end", "goto", "retry"];
const CRITERION_TYPES: &[&str] = &["simple", "regex", "jsonpath", "xpath"];

impl WorkflowsValidator<'_> {
    pub fn validate_success_action(&self, action: &SuccessAction, step_id: &str) -> Vec<ValidationError> {
        self.success_action_errors(action)
            .into_iter()
            .map(|e| e.with_step(step_id))
            .collect()
    }

    pub fn validate_failure_action(&self, action: &FailureAction, step_id: &str) -> Vec<ValidationError> {
        self.failure_action_errors(action)
            .into_iter()
            .map(|e| e.with_step(step_id))
            .collect()
    }

    pub fn validate_criterion(&self, criterion: &Criterion, step_id: &str) -> Vec<ValidationError> {
        criterion_errors(criterion)
            .into_iter()
            .map(|e| e.with_step(step_id))
            .collect()
    }

    pub(super) fn success_action_errors(&self, action: &SuccessAction) -> Vec<ValidationError> {
        let mut errors = vec![];

        errors.extend(check_action_type(&action.action_type, SUCCESS_ACTION_TYPES));
        errors.extend(check_action_target(action.target()));

        for criterion in &action.criteria {
            errors.extend(criterion_errors(criterion));
        }

        errors
    }

    pub(super) fn failure_action_errors(&self, action: &FailureAction) -> Vec<ValidationError> {
        let mut errors = vec![];

        errors.extend(check_action_type(&action.action_type, FAILURE_ACTION_TYPES));
        errors.extend(check_action_target(action.target()));

        if present(&action.action_type) == Some("retry") {
            if let Some(retry_after) = action.retry_after
                && retry_after < 0
            {
                errors.push(ValidationError::new(
                    ErrorType::OutOfRange,
                    format!("'retryAfter' must be non-negative, got {}", retry_after),
                ));
            }

            if let Some(retry_limit) = action.retry_limit
                && retry_limit < 0
            {
                errors.push(ValidationError::new(
                    ErrorType::OutOfRange,
                    format!("'retryLimit' must be non-negative, got {}", retry_limit),
                ));
            }
        }

        for criterion in &action.criteria {
            errors.extend(criterion_errors(criterion));
        }

        errors
    }
}

fn check_action_type(action_type: &Option<String>, allowed: &[&str]) -> Option<ValidationError> {
    match present(action_type) {
        None => Some(ValidationError::new(
            ErrorType::MissingField,
            "action 'type' is undefined",
        )),
        Some(t) if !allowed.contains(&t) => Some(ValidationError::new(
            ErrorType::InvalidEnumValue,
            format!(
                "action 'type' is invalid: '{}' (expected one of: {})",
                t,
                allowed.join(", ")
            ),
        )),
        Some(_) => None,
    }
}

fn check_action_target(target: ActionTarget<'_>) -> Option<ValidationError> {
    match target {
        ActionTarget::Missing => Some(ValidationError::new(
            ErrorType::MissingEntity,
            "missing entity: action requires one of 'stepId' or 'workflowId'",
        )),
        ActionTarget::Conflicting => Some(ValidationError::new(
            ErrorType::InvalidEntity,
            "invalid entity: action 'stepId' and 'workflowId' are mutually exclusive",
        )),
        ActionTarget::Step(_) | ActionTarget::Workflow(_) => None,
    }
}

/// A typed criterion needs a known type and a context; untyped ones are unchecked
pub(super) fn criterion_errors(criterion: &Criterion) -> Vec<ValidationError> {
    let mut errors = vec![];

    let Some(criterion_type) = present(&criterion.criterion_type) else {
        return errors;
    };

    if !CRITERION_TYPES.contains(&criterion_type) {
        errors.push(ValidationError::new(
            ErrorType::InvalidEnumValue,
            format!(
                "criterion 'type' is invalid: '{}' (expected one of: {})",
                criterion_type,
                CRITERION_TYPES.join(", ")
            ),
        ));
    }

    if present(&criterion.context).is_none() {
        errors.push(ValidationError::new(
            ErrorType::MissingField,
            format!("criterion 'context' is required when 'type' is '{}'", criterion_type),
        ));
    }

    errors
}

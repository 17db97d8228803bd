use super::action::criterion_errors;
use super::parameter::parameter_errors;
use super::syntax::{is_valid_outputs_key, is_valid_workflow_id};
use super::{ErrorType, ValidationError, WorkflowsValidator};
use crate::models::workflow::present;
use crate::models::{Step, StepTarget, Workflow};
use indexmap::IndexMap;

/// Workflow references into other documents are not resolvable here
const EXTERNAL_WORKFLOW_PREFIX: &str = "$sourceDescriptions.";

impl WorkflowsValidator<'_> {
    /// Validate workflow-level rules. Steps are validated separately by the
    /// document pass, each against its own workflow's step scope.
    pub fn validate_workflow(&self, workflow: &Workflow, index: usize) -> Vec<ValidationError> {
        let mut errors = vec![];
        let label = workflow.label(index);

        match present(&workflow.workflow_id) {
            None => errors.push(
                ValidationError::new(ErrorType::MissingField, "'workflowId' is undefined")
                    .with_workflow(label.as_str()),
            ),
            Some(workflow_id) if !is_valid_workflow_id(workflow_id) => errors.push(
                ValidationError::new(
                    ErrorType::InvalidSyntax,
                    format!(
                        "'workflowId' is invalid: '{}' (only letters, digits, '_' and '-' are allowed)",
                        workflow_id
                    ),
                )
                .with_workflow(label.as_str()),
            ),
            Some(_) => {}
        }

        if workflow.steps().is_empty() {
            errors.push(
                ValidationError::new(
                    ErrorType::MissingField,
                    "'steps' is undefined: at least one step is required",
                )
                .with_workflow(label.as_str()),
            );
        }

        for dependency in workflow.depends_on.iter().flatten() {
            if dependency.starts_with(EXTERNAL_WORKFLOW_PREFIX) {
                continue;
            }

            if present(&workflow.workflow_id) == Some(dependency.as_str()) {
                errors.push(
                    ValidationError::new(
                        ErrorType::UnresolvedReference,
                        "'dependsOn' cannot reference the workflow itself",
                    )
                    .with_workflow(label.as_str()),
                );
            } else if !self.index.contains_workflow(dependency) {
                errors.push(
                    ValidationError::new(
                        ErrorType::UnresolvedReference,
                        format!("'dependsOn' references unknown workflow '{}'", dependency),
                    )
                    .with_workflow(label.as_str()),
                );
            }
        }

        for parameter in &workflow.parameters {
            errors.extend(self.validate_parameter(parameter, &label));
        }

        errors.extend(
            outputs_errors(workflow.outputs.as_ref())
                .into_iter()
                .map(|e| e.with_workflow(label.as_str())),
        );

        errors
    }

    /// Validate one step of the workflow identified by `workflow_id`
    pub fn validate_step(&self, step: &Step, workflow_id: &str) -> Vec<ValidationError> {
        self.scoped_step_errors(step, self.index.scope(workflow_id), workflow_id)
    }

    /// Validate a step whose `dependsOn` resolves within the workflow at `position`
    pub(super) fn scoped_step_errors(
        &self,
        step: &Step,
        position: Option<usize>,
        workflow_id: &str,
    ) -> Vec<ValidationError> {
        let mut errors = vec![];
        let step_id = present(&step.step_id);

        let in_context = |error: ValidationError| match step_id {
            Some(id) => error.with_workflow(workflow_id).with_step(id),
            None => error.with_workflow(workflow_id),
        };

        match step_id {
            None => errors.push(in_context(ValidationError::new(
                ErrorType::MissingField,
                "'stepId' is undefined",
            ))),
            Some(id) if !is_valid_workflow_id(id) => errors.push(in_context(ValidationError::new(
                ErrorType::InvalidSyntax,
                format!(
                    "'stepId' is invalid: '{}' (only letters, digits, '_' and '-' are allowed)",
                    id
                ),
            ))),
            Some(_) => {}
        }

        match step.target() {
            StepTarget::Missing => errors.push(in_context(ValidationError::new(
                ErrorType::MissingEntity,
                "missing entity: step requires one of 'operationId', 'operationRef' or 'workflowId'",
            ))),
            StepTarget::Conflicting(fields) => errors.push(in_context(ValidationError::new(
                ErrorType::InvalidEntity,
                format!(
                    "invalid entity: step sets {} but they are mutually exclusive",
                    fields.join(", ")
                ),
            ))),
            StepTarget::Operation(_) | StepTarget::OperationRef(_) | StepTarget::Workflow(_) => {}
        }

        if let Some(dependency) = present(&step.depends_on) {
            if step_id == Some(dependency) {
                errors.push(in_context(ValidationError::new(
                    ErrorType::UnresolvedReference,
                    "'dependsOn' cannot reference the step itself",
                )));
            } else if !position.is_some_and(|p| self.index.contains_step_at(p, dependency)) {
                errors.push(in_context(ValidationError::new(
                    ErrorType::UnresolvedReference,
                    format!("'dependsOn' references unknown step '{}'", dependency),
                )));
            }
        }

        for parameter in &step.parameters {
            errors.extend(parameter_errors(parameter).into_iter().map(&in_context));
        }

        for criterion in &step.success_criteria {
            errors.extend(criterion_errors(criterion).into_iter().map(&in_context));
        }

        for action in &step.on_success {
            errors.extend(self.success_action_errors(action).into_iter().map(&in_context));
        }

        for action in &step.on_failure {
            errors.extend(self.failure_action_errors(action).into_iter().map(&in_context));
        }

        errors.extend(outputs_errors(step.outputs.as_ref()).into_iter().map(&in_context));

        errors
    }
}

fn outputs_errors(outputs: Option<&IndexMap<String, String>>) -> Vec<ValidationError> {
    outputs
        .into_iter()
        .flat_map(|outputs| outputs.keys())
        .filter(|key| !is_valid_outputs_key(key))
        .map(|key| {
            ValidationError::new(
                ErrorType::InvalidSyntax,
                format!(
                    "'outputs' key is invalid: '{}' (must not contain whitespace or start with '$')",
                    key
                ),
            )
        })
        .collect()
}

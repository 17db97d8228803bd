use super::{ErrorType, ValidationError, WorkflowsValidator};
use crate::models::workflow::present;
use crate::models::{Step, Workflow};
use std::collections::HashMap;

/// Lookup tables for identifier cross-references, scoped to one validation run
#[derive(Debug, Default)]
pub struct IdentifierIndex<'a> {
    workflows: HashMap<&'a str, &'a Workflow>,
    /// Step ids of each workflow, by position in the document
    steps: Vec<HashMap<&'a str, &'a Step>>,
    /// First workflow position carrying each label
    scopes: HashMap<String, usize>,
}

impl<'a> IdentifierIndex<'a> {
    pub fn workflow(&self, workflow_id: &str) -> Option<&'a Workflow> {
        self.workflows.get(workflow_id).copied()
    }

    /// Position of the first workflow labelled `workflow_id`
    pub fn scope(&self, workflow_id: &str) -> Option<usize> {
        self.scopes.get(workflow_id).copied()
    }

    pub fn step(&self, workflow_id: &str, step_id: &str) -> Option<&'a Step> {
        self.scope(workflow_id)
            .and_then(|position| self.step_at(position, step_id))
    }

    pub fn step_at(&self, position: usize, step_id: &str) -> Option<&'a Step> {
        self.steps
            .get(position)
            .and_then(|steps| steps.get(step_id))
            .copied()
    }

    pub fn contains_workflow(&self, workflow_id: &str) -> bool {
        self.workflows.contains_key(workflow_id)
    }

    pub fn contains_step(&self, workflow_id: &str, step_id: &str) -> bool {
        self.step(workflow_id, step_id).is_some()
    }

    pub fn contains_step_at(&self, position: usize, step_id: &str) -> bool {
        self.step_at(position, step_id).is_some()
    }

    pub fn workflow_count(&self) -> usize {
        self.workflows.len()
    }
}

impl<'a> WorkflowsValidator<'a> {
    /// Index workflows by id, reporting every repeated id after its first occurrence
    pub fn load_workflow_ids(&mut self, workflows: &'a [Workflow]) -> Vec<ValidationError> {
        let mut errors = vec![];
        self.index.workflows.clear();

        for workflow in workflows {
            let Some(workflow_id) = present(&workflow.workflow_id) else {
                continue;
            };

            if self.index.workflows.contains_key(workflow_id) {
                errors.push(
                    ValidationError::new(
                        ErrorType::DuplicateIdentifier,
                        format!("'workflowId' is not unique: '{}' is already used", workflow_id),
                    )
                    .with_workflow(workflow_id),
                );
            } else {
                self.index.workflows.insert(workflow_id, workflow);
            }
        }

        errors
    }

    /// Index steps per workflow, reporting every repeated step id inside the same workflow.
    ///
    /// Each workflow gets its own scope, even when its id repeats another one.
    pub fn load_step_ids(&mut self, workflows: &'a [Workflow]) -> Vec<ValidationError> {
        let mut errors = vec![];
        self.index.steps.clear();
        self.index.scopes.clear();

        for (idx, workflow) in workflows.iter().enumerate() {
            let label = workflow.label(idx);
            let mut indexed = HashMap::new();

            for step in workflow.steps() {
                let Some(step_id) = present(&step.step_id) else {
                    continue;
                };

                if indexed.contains_key(step_id) {
                    errors.push(
                        ValidationError::new(
                            ErrorType::DuplicateIdentifier,
                            format!("'stepId' is not unique: '{}' is already used in this workflow", step_id),
                        )
                        .with_workflow(label.as_str())
                        .with_step(step_id),
                    );
                    continue;
                }

                indexed.insert(step_id, step);
            }

            self.index.steps.push(indexed);
            self.index.scopes.entry(label).or_insert(idx);
        }

        errors
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Workflows document root object.
///
/// Every field that may be missing from the source text is optional so the
/// validator can report it instead of the parser rejecting the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowsSpec {
    /// The version of the workflows specification (e.g., "1.0.0")
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "workflowsSpec")]
    pub workflows_spec: Option<String>,

    /// Metadata about the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    /// A list of source descriptions (references to API documents)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sourceDescriptions")]
    pub source_descriptions: Option<Vec<SourceDescription>>,

    /// A list of workflows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<Workflow>>,

    /// Reusable components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// The title of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// A short summary of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// A description of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The version of the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDescription {
    /// A name for the source description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A URL or relative path to the referenced document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The type of the source description ("openapi" or "workflow")
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub source_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// A unique identifier for the workflow
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "workflowId")]
    pub workflow_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Input schema for the workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,

    /// Workflows that must complete before this one
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "dependsOn")]
    pub depends_on: Option<Vec<String>>,

    /// A list of steps in the workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,

    /// Parameters applied to every step of the workflow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Output values from the workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// An identifier for the step, unique within its workflow
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "stepId")]
    pub step_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reference to an operation by operationId
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "operationId")]
    pub operation_id: Option<String>,

    /// Reference to an operation in an external document
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "operationRef")]
    pub operation_ref: Option<String>,

    /// Reference to a workflow to execute
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "workflowId")]
    pub workflow_id: Option<String>,

    /// Parameters for the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// A step of the same workflow that must run first
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "dependsOn")]
    pub depends_on: Option<String>,

    /// Success criteria for the step
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "successCriteria")]
    pub success_criteria: Vec<Criterion>,

    /// Actions to take on success
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "onSuccess")]
    pub on_success: Vec<SuccessAction>,

    /// Actions to take on failure
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "onFailure")]
    pub on_failure: Vec<FailureAction>,

    /// Output values from the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The location of the parameter (path, query, header, cookie)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "in")]
    pub location: Option<String>,

    /// The value of the parameter (can be a runtime expression)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// JSON pointer into the request the value is written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// The context to evaluate (e.g., "$response.body")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// The condition to check (e.g., "$statusCode == 200")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// How the condition is evaluated (simple, regex, jsonpath, xpath)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub criterion_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The type of the action (end, goto)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub action_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "stepId")]
    pub step_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "workflowId")]
    pub workflow_id: Option<String>,

    /// Criteria deciding whether the action applies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The type of the action (end, goto, retry)
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub action_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "stepId")]
    pub step_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", rename = "workflowId")]
    pub workflow_id: Option<String>,

    /// Milliseconds to wait before retrying
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "retryAfter")]
    pub retry_after: Option<i64>,

    /// Maximum number of retries
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "retryLimit")]
    pub retry_limit: Option<i64>,

    /// Criteria deciding whether the action applies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Reusable input schemas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<IndexMap<String, serde_json::Value>>,

    /// Reusable parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<IndexMap<String, Parameter>>,

    /// Reusable success actions
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "successActions")]
    pub success_actions: Option<IndexMap<String, SuccessAction>>,

    /// Reusable failure actions
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "failureActions")]
    pub failure_actions: Option<IndexMap<String, FailureAction>>,
}

/// What a step executes. Resolved from the three mutually exclusive
/// `operationId` / `operationRef` / `workflowId` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTarget<'a> {
    Missing,
    Operation(&'a str),
    OperationRef(&'a str),
    Workflow(&'a str),
    /// More than one target field is set; holds the field names
    Conflicting(Vec<&'static str>),
}

/// Where an action transfers control to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget<'a> {
    Missing,
    Step(&'a str),
    Workflow(&'a str),
    Conflicting,
}

/// Treats empty strings as absent
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Step {
    pub fn target(&self) -> StepTarget<'_> {
        let set: Vec<(&'static str, &str)> = [
            ("operationId", present(&self.operation_id)),
            ("operationRef", present(&self.operation_ref)),
            ("workflowId", present(&self.workflow_id)),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect();

        match set.as_slice() {
            [] => StepTarget::Missing,
            [("operationId", v)] => StepTarget::Operation(*v),
            [("operationRef", v)] => StepTarget::OperationRef(*v),
            [(_, v)] => StepTarget::Workflow(*v),
            _ => StepTarget::Conflicting(set.iter().map(|(field, _)| *field).collect()),
        }
    }
}

fn action_target<'a>(step_id: &'a Option<String>, workflow_id: &'a Option<String>) -> ActionTarget<'a> {
    match (present(step_id), present(workflow_id)) {
        (None, None) => ActionTarget::Missing,
        (Some(step), None) => ActionTarget::Step(step),
        (None, Some(workflow)) => ActionTarget::Workflow(workflow),
        (Some(_), Some(_)) => ActionTarget::Conflicting,
    }
}

impl SuccessAction {
    pub fn target(&self) -> ActionTarget<'_> {
        action_target(&self.step_id, &self.workflow_id)
    }
}

impl FailureAction {
    pub fn target(&self) -> ActionTarget<'_> {
        action_target(&self.step_id, &self.workflow_id)
    }
}

impl WorkflowsSpec {
    /// Workflows of the document, empty when the list is absent
    pub fn workflows(&self) -> &[Workflow] {
        self.workflows.as_deref().unwrap_or_default()
    }
}

impl Workflow {
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or_default()
    }

    /// Label used in messages: the workflow id, or its position when the id is missing
    pub fn label(&self, index: usize) -> String {
        present(&self.workflow_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Workflow[{}]", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_target_variants() {
        let step = Step {
            operation_id: Some("getUser".to_string()),
            ..Default::default()
        };
        assert_eq!(step.target(), StepTarget::Operation("getUser"));

        let step = Step {
            workflow_id: Some("other-flow".to_string()),
            ..Default::default()
        };
        assert_eq!(step.target(), StepTarget::Workflow("other-flow"));

        let step = Step {
            operation_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(step.target(), StepTarget::Missing);

        let step = Step {
            operation_id: Some("getUser".to_string()),
            operation_ref: Some("#/paths/~1users/get".to_string()),
            ..Default::default()
        };
        assert_eq!(
            step.target(),
            StepTarget::Conflicting(vec!["operationId", "operationRef"])
        );
    }

    #[test]
    fn test_action_target_variants() {
        let action = SuccessAction {
            step_id: Some("step-one".to_string()),
            workflow_id: Some("flow".to_string()),
            ..Default::default()
        };
        assert_eq!(action.target(), ActionTarget::Conflicting);

        let action = FailureAction::default();
        assert_eq!(action.target(), ActionTarget::Missing);
    }

    #[test]
    fn test_deserialize_step() {
        let yaml = r#"
stepId: login
operationId: loginUser
dependsOn: register
parameters:
  - name: Authorization
    in: header
    value: $steps.register.outputs.token
onFailure:
  - type: retry
    stepId: login
    retryAfter: 1000
    retryLimit: 3
outputs:
  token: $response.body#/token
"#;

        let step: Step = serde_yaml::from_str(yaml).expect("Failed to parse step");
        assert_eq!(step.step_id.as_deref(), Some("login"));
        assert_eq!(step.depends_on.as_deref(), Some("register"));
        assert_eq!(step.parameters[0].location.as_deref(), Some("header"));
        assert_eq!(step.on_failure[0].retry_limit, Some(3));
        assert!(step.outputs.unwrap().contains_key("token"));
    }

    #[test]
    fn test_workflow_label() {
        let workflow = Workflow::default();
        assert_eq!(workflow.label(2), "Workflow[2]");

        let workflow = Workflow {
            workflow_id: Some("signup".to_string()),
            ..Default::default()
        };
        assert_eq!(workflow.label(2), "signup");
    }
}

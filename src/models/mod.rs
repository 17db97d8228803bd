pub mod workflow;

pub use workflow::{
    ActionTarget, Components, Criterion, FailureAction, Info, Parameter, SourceDescription, Step,
    StepTarget, SuccessAction, Workflow, WorkflowsSpec,
};

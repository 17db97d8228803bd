use crate::models::workflow::present;
use crate::models::StepTarget;
use crate::{Result, loader};
use colored::*;
use std::path::Path;

pub fn execute_list(path: &Path) -> Result<()> {
    println!("{}", "Loading workflows document...".bright_blue());
    println!("  Path: {}", path.display());

    let document = loader::load_document(path)?;

    println!("\n{}", "✓ Document loaded successfully".green());
    if let Some(info) = &document.info {
        println!("  Title: {}", present(&info.title).unwrap_or("-").bold());
        println!("  Version: {}", present(&info.version).unwrap_or("-"));
    }
    println!(
        "  Workflows Spec Version: {}",
        present(&document.workflows_spec).unwrap_or("-")
    );
    println!();

    let workflows = document.workflows();
    if workflows.is_empty() {
        println!("{}", "No workflows found".yellow());
        return Ok(());
    }

    println!("{}", format!("Workflows ({}):", workflows.len()).bold());
    for (idx, workflow) in workflows.iter().enumerate() {
        println!();
        println!(
            "  {}. {} {}",
            idx + 1,
            "Workflow:".bright_cyan(),
            workflow.label(idx).bold()
        );

        if let Some(summary) = present(&workflow.summary) {
            println!("     Summary: {}", summary);
        }

        println!("     Steps: {}", workflow.steps().len());

        for (step_idx, step) in workflow.steps().iter().enumerate() {
            println!(
                "       {}. {}",
                step_idx + 1,
                present(&step.step_id).unwrap_or("<missing stepId>").cyan()
            );

            if let Some(description) = present(&step.description) {
                println!("          Description: {}", description);
            }

            match step.target() {
                StepTarget::Operation(operation_id) => {
                    println!("          Operation: {}", operation_id.bright_yellow());
                }
                StepTarget::OperationRef(operation_ref) => {
                    println!("          Operation Ref: {}", operation_ref.bright_yellow());
                }
                StepTarget::Workflow(workflow_id) => {
                    println!("          Workflow: {}", workflow_id.bright_magenta());
                }
                StepTarget::Missing | StepTarget::Conflicting(_) => {}
            }

            if let Some(dependency) = present(&step.depends_on) {
                println!("          Depends on: {}", dependency);
            }
        }
    }

    Ok(())
}

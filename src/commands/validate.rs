use crate::cli::ReportFormat;
use crate::validation::{ValidationResult, WorkflowsValidator};
use crate::{Result, loader};
use colored::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub fn execute_validate(path: &Path, format: ReportFormat) -> Result<()> {
    let result = validate_file(path)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ReportFormat::Text => print_report(path, &result),
    }

    if !result.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}

/// Load and validate a document, annotating errors with their line in the file
pub fn validate_file(path: &Path) -> Result<ValidationResult> {
    let document = loader::load_document(path)?;
    let result = WorkflowsValidator::validate(Some(&document));

    Ok(annotate_with_line_numbers(result, path))
}

fn print_report(path: &Path, result: &ValidationResult) {
    println!("{}", "Validating workflows document...".bright_blue());
    println!("  Path: {}", path.display());
    println!();

    if result.is_valid() {
        println!("{}", "✓ All validations passed successfully".green().bold());
        return;
    }

    println!("    {}", "✗ Errors:".red().bold());
    for error in &result.errors {
        println!("      - {}", error.format().red());
    }
    println!();
    println!("{}", format!("✗ {}", result.summary()).red().bold());
}

/// Build a map of workflow IDs and step IDs to their line numbers in the file.
///
/// Only list items that start with `workflowId:` / `stepId:` are recognised,
/// and a `stepId:` item only counts when it sits directly in the workflow's
/// `steps:` list. Step ids are unique per workflow only, so steps are keyed by
/// the workflow they appear under.
fn build_line_map(file_path: &Path) -> Result<HashMap<String, usize>> {
    let content = fs::read_to_string(file_path)?;
    let mut map = HashMap::new();
    let mut current_workflow: Option<String> = None;
    let mut workflow_indent: Option<usize> = None;
    // indent of the current workflow's `steps:` key and of its list items
    let mut steps_indent: Option<usize> = None;
    let mut step_item_indent: Option<usize> = None;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1; // 1-indexed
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();

        let Some(item) = trimmed.strip_prefix('-').map(str::trim_start) else {
            if indent == 0 {
                // next top-level section
                current_workflow = None;
                workflow_indent = None;
                steps_indent = None;
            } else if trimmed.starts_with("steps:")
                && current_workflow.is_some()
                && workflow_indent.is_some_and(|w| indent > w)
            {
                steps_indent = Some(indent);
                step_item_indent = None;
            } else if steps_indent.is_some_and(|s| indent <= s) {
                steps_indent = None;
            }
            continue;
        };

        if workflow_indent.is_none_or(|w| indent <= w) {
            match key_value(item, "workflowId:") {
                Some(id) => {
                    workflow_indent = Some(indent);
                    current_workflow = Some(id.to_string());
                    map.entry(format!("workflow:{}", id)).or_insert(line_number);
                }
                // a workflow without a leading id has no key to record
                None if workflow_indent == Some(indent) => current_workflow = None,
                None => {}
            }
            steps_indent = None;
            continue;
        }

        let Some(steps) = steps_indent else {
            continue;
        };
        if indent < steps {
            continue;
        }
        let item_indent = *step_item_indent.get_or_insert(indent);

        if indent == item_indent
            && let (Some(id), Some(workflow)) = (key_value(item, "stepId:"), &current_workflow)
        {
            map.entry(format!("step:{}:{}", workflow, id)).or_insert(line_number);
        }
    }

    Ok(map)
}

fn key_value<'l>(line: &'l str, key: &str) -> Option<&'l str> {
    let rest = line.strip_prefix(key)?;
    let value = rest.split('#').next()?.trim().trim_matches(|c: char| c == '"' || c == '\'');
    (!value.is_empty()).then_some(value)
}

/// Annotate errors with line numbers from the document file
fn annotate_with_line_numbers(mut result: ValidationResult, path: &Path) -> ValidationResult {
    let line_map = match build_line_map(path) {
        Ok(map) => map,
        Err(_) => return result, // If we can't read the file, just return as-is
    };

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("workflows.yaml");

    result.errors = result
        .errors
        .into_iter()
        .map(|error| {
            let line = match (&error.workflow_id, &error.step_id) {
                (Some(workflow_id), Some(step_id)) => line_map
                    .get(&format!("step:{}:{}", workflow_id, step_id))
                    .or_else(|| line_map.get(&format!("workflow:{}", workflow_id))),
                (Some(workflow_id), None) => line_map.get(&format!("workflow:{}", workflow_id)),
                _ => None,
            };

            match line {
                Some(&line_number) => error.with_location(file_name, line_number),
                None => error,
            }
        })
        .collect();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_line_map() {
        let yaml = r#"workflowsSpec: 1.0.0
workflows:
  - workflowId: first
    steps:
      - stepId: login
        operationId: loginUser
        onSuccess:
          - type: goto
            stepId: login
  - workflowId: second
    steps:
      - stepId: login
        workflowId: first
"#;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let map = build_line_map(file.path()).unwrap();
        assert_eq!(map.get("workflow:first"), Some(&3));
        assert_eq!(map.get("step:first:login"), Some(&5));
        assert_eq!(map.get("workflow:second"), Some(&10));
        assert_eq!(map.get("step:second:login"), Some(&12));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_build_line_map_ignores_nested_step_references() {
        let yaml = r#"workflowsSpec: 1.0.0
workflows:
  - workflowId: flow
    steps:
      - stepId: first
        operationId: start
        onSuccess:
          - stepId: later
            type: goto
      - stepId: later
        operationId: finish
  - summary: no id
    steps:
      - stepId: orphan
        operationId: lost
"#;
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let map = build_line_map(file.path()).unwrap();
        assert_eq!(map.get("step:flow:first"), Some(&5));
        assert_eq!(map.get("step:flow:later"), Some(&10));
        assert_eq!(map.get("step:flow:orphan"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_key_value() {
        assert_eq!(key_value("stepId: login # first", "stepId:"), Some("login"));
        assert_eq!(key_value("stepId: 'quoted'", "stepId:"), Some("quoted"));
        assert_eq!(key_value("stepId:", "stepId:"), None);
        assert_eq!(key_value("operationId: x", "stepId:"), None);
    }
}

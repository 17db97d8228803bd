use regex::Regex;
use std::sync::LazyLock;

static WORKFLOW_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("workflow id pattern is valid"));

static OUTPUTS_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^$\s]\S*$").expect("outputs key pattern is valid"));

static COMPONENT_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+$").expect("component key pattern is valid"));

/// Letters, digits, `_` and `-` only. Also used for step ids.
pub fn is_valid_workflow_id(id: &str) -> bool {
    WORKFLOW_ID_RE.is_match(id)
}

/// No whitespace, and must not start with `$`
pub fn is_valid_outputs_key(key: &str) -> bool {
    OUTPUTS_KEY_RE.is_match(key)
}

/// No whitespace; otherwise broader than workflow ids (e.g. `.` is allowed)
pub fn is_valid_component_key(key: &str) -> bool {
    COMPONENT_KEY_RE.is_match(key)
}

pub fn is_valid_json_pointer(pointer: &str) -> bool {
    pointer.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_id() {
        assert!(is_valid_workflow_id("idOfTheWorkflow_1"));
        assert!(is_valid_workflow_id("user-onboarding-flow"));
        assert!(!is_valid_workflow_id("workflow id"));
        assert!(!is_valid_workflow_id("workflow.id"));
        assert!(!is_valid_workflow_id(""));
        assert!(!is_valid_workflow_id("flow\n"));
    }

    #[test]
    fn test_outputs_key() {
        assert!(is_valid_outputs_key("tokenExpires"));
        assert!(is_valid_outputs_key("token.expires"));
        assert!(!is_valid_outputs_key("$tokenExpires"));
        assert!(!is_valid_outputs_key("$token Expires"));
        assert!(!is_valid_outputs_key("token Expires"));
        assert!(!is_valid_outputs_key(""));
    }

    #[test]
    fn test_component_key() {
        assert!(is_valid_component_key("pagination"));
        assert!(is_valid_component_key("pagination.order"));
        assert!(!is_valid_component_key("pagination order"));
        assert!(!is_valid_component_key(""));
    }

    #[test]
    fn test_json_pointer() {
        assert!(is_valid_json_pointer("/user/id"));
        assert!(is_valid_json_pointer("/"));
        assert!(!is_valid_json_pointer("user/id"));
        assert!(!is_valid_json_pointer("#/petId"));
    }
}

use super::{ErrorType, ValidationError, WorkflowsValidator};
use crate::models::workflow::present;
use crate::models::{Info, SourceDescription};

const SOURCE_TYPES: &[&str] = &["openapi", "workflow"];

impl WorkflowsValidator<'_> {
    /// Validate the document header: title and version are both required
    pub fn validate_info(&self, info: Option<&Info>) -> Vec<ValidationError> {
        let Some(info) = info else {
            return vec![ValidationError::new(ErrorType::MissingField, "'info' is undefined")];
        };

        let mut errors = vec![];

        if present(&info.title).is_none() {
            errors.push(ValidationError::new(ErrorType::MissingField, "'info.title' is undefined"));
        }

        if present(&info.version).is_none() {
            errors.push(ValidationError::new(ErrorType::MissingField, "'info.version' is undefined"));
        }

        errors
    }

    /// Validate the referenced source documents
    pub fn validate_source_descriptions(
        &self,
        source_descriptions: Option<&[SourceDescription]>,
    ) -> Vec<ValidationError> {
        let source_descriptions = match source_descriptions {
            Some(list) if !list.is_empty() => list,
            _ => {
                return vec![ValidationError::new(
                    ErrorType::MissingField,
                    "'sourceDescriptions' is undefined: at least one source description is required",
                )];
            }
        };

        let mut errors = vec![];

        for (idx, source) in source_descriptions.iter().enumerate() {
            let name = present(&source.name)
                .map(str::to_string)
                .unwrap_or_else(|| format!("SourceDescription[{}]", idx));

            if present(&source.url).is_none() {
                errors.push(
                    ValidationError::new(ErrorType::MissingField, "'url' is undefined")
                        .with_source(name.as_str()),
                );
            }

            match present(&source.source_type) {
                None => errors.push(
                    ValidationError::new(ErrorType::MissingField, "'type' is undefined")
                        .with_source(name.as_str()),
                ),
                Some(source_type) if !SOURCE_TYPES.contains(&source_type) => errors.push(
                    ValidationError::new(
                        ErrorType::InvalidEnumValue,
                        format!(
                            "'type' is invalid: '{}' (expected one of: {})",
                            source_type,
                            SOURCE_TYPES.join(", ")
                        ),
                    )
                    .with_source(name.as_str()),
                ),
                Some(_) => {}
            }
        }

        errors
    }
}

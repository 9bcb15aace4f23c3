//! Validated comparison input.

use serde::Serialize;

use crate::domain::foundation::ValidationError;

/// Minimum number of options a comparison needs.
pub const MIN_OPTIONS: usize = 2;

/// Minimum number of constraints a comparison needs.
pub const MIN_CONSTRAINTS: usize = 1;

/// Options and constraints submitted for comparison.
///
/// Immutable once constructed. Every entry is trimmed and non-empty, there are
/// at least [`MIN_OPTIONS`] options and at least [`MIN_CONSTRAINTS`] constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonInput {
    options: Vec<String>,
    constraints: Vec<String>,
}

impl ComparisonInput {
    /// Validates raw user input.
    ///
    /// Collects every violation instead of stopping at the first one so the
    /// caller can report them field by field.
    pub fn new(
        options: Vec<String>,
        constraints: Vec<String>,
    ) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let options = clean_entries("options", options, MIN_OPTIONS, &mut errors);
        let constraints = clean_entries("constraints", constraints, MIN_CONSTRAINTS, &mut errors);

        if errors.is_empty() {
            Ok(Self {
                options,
                constraints,
            })
        } else {
            Err(errors)
        }
    }

    /// Options in submission order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Constraints in submission order.
    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }
}

fn clean_entries(
    field: &str,
    entries: Vec<String>,
    min: usize,
    errors: &mut Vec<ValidationError>,
) -> Vec<String> {
    if entries.len() < min {
        errors.push(ValidationError::too_few_items(field, min, entries.len()));
    }

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let trimmed = entry.trim();
            if trimmed.is_empty() {
                errors.push(ValidationError::empty_field(format!("{}[{}]", field, index)));
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

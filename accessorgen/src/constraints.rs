//! The "unique symmetrically" constraint: no two records may hold the same pair
//! of values with the two fields swapped, e.g. `{name: Edward, nickname: Ted}`
//! and `{name: Ted, nickname: Edward}`.

use serde_json::Value;

use crate::errors::{GenerateError, GenerateResult};
use crate::types::ClassDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueSymmetrically {
    first: String,
    second: String,
}

impl UniqueSymmetrically {
    /// `fields` must name exactly two fields. `class` is only used for errors.
    pub fn new(class: &str, fields: &[String]) -> GenerateResult<Self> {
        match fields {
            [first, second] => Ok(Self {
                first: first.clone(),
                second: second.clone(),
            }),
            _ => Err(GenerateError::configuration(
                class,
                format!("unique_symmetrically needs exactly two fields, got {}", fields.len()),
            )),
        }
    }

    /// The constraint declared on `class`, if any.
    pub fn for_class(class: &ClassDescriptor) -> GenerateResult<Option<Self>> {
        class
            .unique_symmetrically
            .as_deref()
            .map(|fields| Self::new(&class.name, fields))
            .transpose()
    }

    pub fn fields(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    /// Both fields must be mapped on `class`.
    pub fn validate_against(&self, class: &ClassDescriptor) -> GenerateResult<()> {
        for field in [&self.first, &self.second] {
            if class.field_named(field).is_none() {
                return Err(GenerateError::configuration(
                    &class.name,
                    format!("unique_symmetrically field `{field}` is not mapped"),
                ));
            }
        }
        Ok(())
    }

    /// First record in `existing` whose two values are `candidate`'s swapped.
    ///
    /// `candidate` itself is never reported, even when it appears in
    /// `existing`.
    pub fn find_symmetric_duplicate<'a>(&self, candidate: &Value, existing: &'a [Value]) -> Option<&'a Value> {
        let swapped_first = candidate.get(&self.second)?;
        let swapped_second = candidate.get(&self.first)?;

        existing.iter().find(|record| {
            !std::ptr::eq(*record, candidate)
                && record.get(&self.first) == Some(swapped_first)
                && record.get(&self.second) == Some(swapped_second)
        })
    }

    /// Violation message for `class`.
    pub fn message(&self, class: &str) -> String {
        format!(
            "A duplicate {class} already exists, but with the values for {} and {} reversed.",
            self.first, self.second
        )
    }
}

//! Declarative field validation
//!
//! Every request type publishes a static table of [`FieldRule`]s; one generic
//! function, [`validate`], walks the table and either wraps the record in
//! [`Validated`] or returns every failing field.

use serde::Serialize;
use std::fmt;
use std::ops::Deref;

/// Constraint on a single string field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Wire name of the field (camelCase)
    pub name: &'static str,
    /// Minimum length in Unicode scalar values
    pub min_len: usize,
    /// Measure the length after trimming surrounding whitespace
    pub trimmed: bool,
    /// Message reported when the rule fails
    pub message: &'static str,
}

impl FieldRule {
    pub const fn min(name: &'static str, min_len: usize, message: &'static str) -> Self {
        Self {
            name,
            min_len,
            trimmed: false,
            message,
        }
    }

    /// Same rule, but leading and trailing whitespace does not count.
    pub const fn trimmed(self) -> Self {
        Self {
            trimmed: true,
            ..self
        }
    }

    pub fn check(&self, value: &str) -> Result<(), FieldError> {
        let value = if self.trimmed { value.trim() } else { value };
        if value.chars().count() >= self.min_len {
            Ok(())
        } else {
            Err(FieldError {
                field: self.name,
                message: self.message,
            })
        }
    }
}

/// A record that can be checked against a rule table
pub trait Validate {
    /// Rules in declaration order
    const RULES: &'static [FieldRule];

    /// Value of the field named by a rule. Unknown names return `None`,
    /// which the validator reports as a failure of that rule.
    fn field(&self, name: &str) -> Option<&str>;
}

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All failing fields of one record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message reported for `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|e| e.field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A record that passed [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Validated<T>(T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Check `record` against its rule table.
pub fn validate<T: Validate>(record: T) -> Result<Validated<T>, ValidationErrors> {
    let errors: Vec<FieldError> = T::RULES
        .iter()
        .filter_map(|rule| match record.field(rule.name) {
            Some(value) => rule.check(value).err(),
            None => Some(FieldError {
                field: rule.name,
                message: rule.message,
            }),
        })
        .collect();

    if errors.is_empty() {
        Ok(Validated(record))
    } else {
        Err(ValidationErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair {
        a: String,
        b: String,
    }

    impl Validate for Pair {
        const RULES: &'static [FieldRule] = &[
            FieldRule::min("a", 3, "a is short"),
            FieldRule::min("b", 1, "b is required").trimmed(),
            FieldRule::min("ghost", 0, "ghost is not a field"),
        ];

        fn field(&self, name: &str) -> Option<&str> {
            match name {
                "a" => Some(&self.a),
                "b" => Some(&self.b),
                _ => None,
            }
        }
    }

    #[test]
    fn test_collects_every_failing_field_in_order() {
        let err = validate(Pair {
            a: "xy".into(),
            b: "   ".into(),
        })
        .unwrap_err();

        let fields: Vec<_> = err.fields().collect();
        assert_eq!(fields, vec!["a", "b", "ghost"]);
        assert_eq!(err.message_for("a"), Some("a is short"));
        assert_eq!(err.to_string(), "invalid fields: a, b, ghost");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let rule = FieldRule::min("cropType", 3, "short");
        // three Urdu letters, six bytes
        assert!(rule.check("گند").is_ok());
        assert!(rule.check("گن").is_err());
    }

    #[test]
    fn test_untrimmed_rule_counts_whitespace() {
        let rule = FieldRule::min("x", 2, "short");
        assert!(rule.check("  ").is_ok());
        assert!(rule.trimmed().check("  ").is_err());
    }
}

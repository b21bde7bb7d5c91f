//! Composable model validation.
//!
//! Every mutating operation runs its request model through a validator
//! before touching storage. A validator is a plain function that evaluates
//! a fixed, ordered list of atomic checks and folds them with [`ensure`]
//! into a single [`ValidationResult`]; all checks run even when earlier
//! ones fail, so callers see every violation in one pass. Failures are
//! data — nothing in this module panics or raises.

mod checks;

pub use checks::{
    community_exists, if_present, is_future, is_past, is_positive, not_empty,
    not_null,
};

use serde::Serialize;

use super::result::{CoreError, CoreResult};

/// A single validation failure, labelled with the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The human-readable failure message, intended for direct display.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Aggregate outcome of running a model through its checks.
///
/// Success is defined as "no errors collected". Errors preserve the order
/// in which the checks were declared, so reporting stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// The successful result: no errors.
    #[must_use]
    pub const fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// A failed result carrying exactly one error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Whether no check failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Every collected error, in declaration order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consume the result, keeping the error list.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// The combined failure, or `None` when validation passed.
    #[must_use]
    pub fn into_failure(self) -> Option<ValidationFailure> {
        if self.errors.is_empty() {
            None
        } else {
            Some(ValidationFailure(self.errors))
        }
    }
}

impl From<ValidationResult> for CoreResult<(), ValidationFailure> {
    fn from(result: ValidationResult) -> Self {
        match result.into_failure() {
            None => Self::Success(()),
            Some(failure) => Self::Failure(failure),
        }
    }
}

/// One or more validation errors folded into a single taxonomy member, so
/// a failed validation can ride the error side of a [`CoreResult`].
///
/// The combined message wraps each error in braces:
/// `{Name is null or empty},{Capacity is not greater than 0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure(Vec<ValidationError>);

impl ValidationFailure {
    /// The individual errors, in declaration order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{{{error}}}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

impl CoreError for ValidationFailure {
    fn kind(&self) -> &'static str {
        "validation"
    }
}

/// Collect every failed check into a [`ValidationResult`].
///
/// Checks are already-evaluated `Option`s (present = failed); output order
/// matches input order. An empty input yields success.
///
/// # Examples
/// ```
/// use soundlink::domain::validation::{ensure, not_empty};
///
/// let result = ensure([
///     not_empty("Name", Some("Jam Night")),
///     not_empty("Genre", None),
/// ]);
/// assert!(!result.is_success());
/// assert_eq!(result.errors().len(), 1);
/// ```
pub fn ensure(
    checks: impl IntoIterator<Item = Option<ValidationError>>,
) -> ValidationResult {
    ValidationResult {
        errors: checks.into_iter().flatten().collect(),
    }
}

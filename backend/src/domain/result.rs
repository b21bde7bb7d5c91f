//! Generic success-or-error envelope returned by every service operation.
//!
//! [`CoreResult`] carries exactly one of a value or a typed error, never
//! both and never neither; `is_success` is defined as "the error side is
//! absent". Services never panic or raise across the boundary — failures
//! ride inside the envelope, and adapters serialize it to the uniform
//! `{ success, value?, error? { kind, message } }` shape.

use serde::Serialize;
use serde::ser::SerializeStruct;

/// Implemented by every error taxonomy member that can ride inside a
/// [`CoreResult`].
///
/// `kind` is a stable machine-readable category; the human-readable
/// message comes from the error's `Display` impl.
pub trait CoreError: std::fmt::Display {
    /// Stable category identifier serialized next to the message.
    fn kind(&self) -> &'static str;
}

/// The outcome of a core operation: a value or a typed error.
///
/// # Examples
/// ```
/// use soundlink::domain::CoreResult;
///
/// let ok: CoreResult<i64, String> = CoreResult::Success(7);
/// assert!(ok.is_success());
/// assert_eq!(ok.value(), Some(&7));
/// assert_eq!(ok.error(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreResult<T, E> {
    /// The operation completed and produced a value.
    Success(T),
    /// The operation failed with a typed error.
    Failure(E),
}

impl<T, E> CoreResult<T, E> {
    /// Whether the error side is absent.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The value, when the operation succeeded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The error, when the operation failed.
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Convert into the standard library result for `?`-style chaining.
    ///
    /// # Errors
    /// Returns the envelope's error side unchanged.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for CoreResult<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> Serialize for CoreResult<T, E>
where
    T: Serialize,
    E: CoreError,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct ErrorDto<'a> {
            kind: &'static str,
            message: &'a str,
        }

        let mut envelope = serializer.serialize_struct("CoreResult", 2)?;
        envelope.serialize_field("success", &self.is_success())?;
        match self {
            Self::Success(value) => envelope.serialize_field("value", value)?,
            Self::Failure(error) => {
                let message = error.to_string();
                envelope.serialize_field(
                    "error",
                    &ErrorDto {
                        kind: error.kind(),
                        message: &message,
                    },
                )?;
            }
        }
        envelope.end()
    }
}

//! [`Error`]-related definitions.

use std::{fmt, num::TryFromIntError};

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{domain::client, infra::database};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                            violations: Vec::new(),
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,

    /// Field-level [`Violation`]s caused this [`Error`], if any.
    pub violations: Vec<Violation>,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
            violations: Vec::new(),
        }
    }

    /// Attaches the provided [`Violation`]s to this [`Error`].
    #[must_use]
    pub fn with_violations(
        mut self,
        violations: impl IntoIterator<Item = Violation>,
    ) -> Self {
        self.violations.extend(violations);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
            violations,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}{}",
            violations.iter().format_with("", |v, f| f(&format_args!(
                "\n{}: {}",
                v.field, v.message,
            ))),
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(3);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        if !self.violations.is_empty() {
            drop(
                ext.add_field(
                    "violations",
                    juniper::Value::list(
                        self.violations
                            .into_iter()
                            .map(Violation::into_value)
                            .collect(),
                    ),
                ),
            );
        }
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Field-level violation reported along with an [`Error`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violation {
    /// Path to the offending input field.
    pub field: String,

    /// Human-readable description of what's wrong.
    pub message: String,
}

impl Violation {
    /// Converts this [`Violation`] into a GraphQL error extension value.
    fn into_value<S: From<String>>(self) -> juniper::Value<S> {
        let mut obj = juniper::Object::with_capacity(2);
        drop(obj.add_field("field", juniper::Value::scalar(self.field)));
        drop(obj.add_field("message", juniper::Value::scalar(self.message)));
        juniper::Value::object(obj)
    }
}

impl From<&client::Violation> for Violation {
    fn from(violation: &client::Violation) -> Self {
        Self {
            field: violation.field().to_owned(),
            message: violation.to_string(),
        }
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error::internal(self))
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for serde_json::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError as _};
    use service::domain::client;

    use super::{Error, Violation};

    #[test]
    fn reports_violations_in_extensions() {
        let err = Error::internal(&"boom").with_violations([
            Violation::from(&client::Violation::InvalidName),
            Violation::from(&client::Violation::UnsupportedTerm(7)),
        ]);
        assert_eq!(err.violations[0].field, "name");
        assert_eq!(err.violations[1].field, "termMonths");

        let field_err: juniper::FieldError<DefaultScalarValue> =
            err.into_field_error();
        let ext = field_err.extensions().as_object_value().unwrap();
        assert_eq!(
            ext.get_field_value("code").unwrap().as_string_value(),
            Some("INTERNAL_SERVER_ERROR"),
        );
        assert_eq!(
            ext.get_field_value("violations")
                .unwrap()
                .as_list_value()
                .unwrap()
                .len(),
            2,
        );
    }

    #[test]
    fn omits_violations_when_none() {
        let field_err: juniper::FieldError<DefaultScalarValue> =
            Error::internal(&"boom").into_field_error();
        let ext = field_err.extensions().as_object_value().unwrap();

        assert!(ext.get_field_value("violations").is_none());
    }
}

//! Short-circuit control flow.
//!
//! Every handler returns `Result<_, Interrupt>`. An [`Interrupt`] is either a
//! [`Halt`], which stops the pipeline and responds immediately, or a
//! [`HandlerFault`], which is routed through the fault registry.

use std::fmt;

use http::StatusCode;

use crate::fault::{Fault, HandlerFault};

/// Stops request processing and responds with the given status and body.
///
/// # Example
///
/// ```
/// use switchyard_core::{Halt, Interrupt};
/// use http::StatusCode;
///
/// fn guard(authenticated: bool) -> Result<(), Interrupt> {
///     if !authenticated {
///         return Err(Halt::with_body(StatusCode::UNAUTHORIZED, "Go Away!").into());
///     }
///     Ok(())
/// }
///
/// assert!(guard(true).is_ok());
/// assert!(matches!(guard(false), Err(Interrupt::Halt(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    status: StatusCode,
    body: Option<String>,
}

impl Halt {
    /// Halts with status 200 and no body.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: StatusCode::OK,
            body: None,
        }
    }

    /// Halts with the given status and no body.
    #[must_use]
    pub const fn status(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    /// Halts with status 200 and the given body.
    #[must_use]
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body.into()),
        }
    }

    /// Halts with the given status and body.
    #[must_use]
    pub fn with_body(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /// Returns the halt status.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns the halt body, if any.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Splits the halt into its parts.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, Option<String>) {
        (self.status, self.body)
    }
}

impl Default for Halt {
    fn default() -> Self {
        Self::new()
    }
}

/// The error side of every handler result.
#[derive(Debug)]
pub enum Interrupt {
    /// Stop processing and respond.
    Halt(Halt),
    /// A fault raised by the handler.
    Fault(HandlerFault),
}

impl Interrupt {
    /// Shorthand for `Interrupt::Halt(Halt::with_body(status, body))`.
    #[must_use]
    pub fn halt(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Halt(Halt::with_body(status, body))
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt(halt) => write!(f, "halted with status {}", halt.status),
            Self::Fault(fault) => write!(f, "fault: {fault}"),
        }
    }
}

impl From<Halt> for Interrupt {
    fn from(halt: Halt) -> Self {
        Self::Halt(halt)
    }
}

impl From<HandlerFault> for Interrupt {
    fn from(fault: HandlerFault) -> Self {
        Self::Fault(fault)
    }
}

impl<F: Fault> From<F> for Interrupt {
    fn from(fault: F) -> Self {
        Self::Fault(HandlerFault::new(fault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::GenericFault;

    #[test]
    fn test_halt_defaults() {
        let halt = Halt::new();
        assert_eq!(halt.status_code(), StatusCode::OK);
        assert_eq!(halt.body_str(), None);
        assert_eq!(Halt::default(), halt);
    }

    #[test]
    fn test_halt_constructors() {
        assert_eq!(
            Halt::status(StatusCode::FORBIDDEN).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(Halt::body("done").body_str(), Some("done"));

        let (status, body) = Halt::with_body(StatusCode::UNAUTHORIZED, "Go Away!").into_parts();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.as_deref(), Some("Go Away!"));
    }

    #[test]
    fn test_fault_converts_with_question_mark() {
        fn raise() -> Result<(), Interrupt> {
            Err::<(), _>(GenericFault::new("boom"))?;
            Ok(())
        }

        match raise() {
            Err(Interrupt::Fault(fault)) => assert!(fault.is::<GenericFault>()),
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn test_interrupt_display() {
        let halt = Interrupt::halt(StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(halt.to_string(), "halted with status 401 Unauthorized");

        let fault: Interrupt = HandlerFault::msg("boom").into();
        assert_eq!(fault.to_string(), "fault: boom");
    }
}

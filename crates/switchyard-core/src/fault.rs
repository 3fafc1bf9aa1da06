//! Fault classes and handler faults.
//!
//! A *fault* is an error raised by a handler while serving a request. Every
//! fault type implements [`Fault`] and may name a parent class, forming an
//! explicit hierarchy that the fault registry walks when no handler is
//! registered for the exact class.
//!
//! ```
//! use switchyard_core::{Fault, FaultClass, HandlerFault};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("lookup failed")]
//! struct LookupFault;
//! impl Fault for LookupFault {}
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("book {0} not found")]
//! struct BookNotFound(u32);
//! impl Fault for BookNotFound {
//!     fn parent() -> Option<FaultClass> {
//!         Some(FaultClass::of::<LookupFault>())
//!     }
//! }
//!
//! let fault = HandlerFault::new(BookNotFound(9999));
//! assert!(fault.is::<BookNotFound>());
//! assert!(fault.is_a::<LookupFault>());
//! assert_eq!(fault.downcast_ref::<BookNotFound>().map(|b| b.0), Some(9999));
//! ```

use std::any::{type_name, TypeId};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::SwitchyardError;

/// An error type that handlers may raise.
pub trait Fault: StdError + Send + Sync + 'static {
    /// The parent class in the fault hierarchy. Root classes return `None`.
    fn parent() -> Option<FaultClass>
    where
        Self: Sized,
    {
        None
    }
}

/// Runtime identity of a [`Fault`] type.
///
/// Equality and hashing use the type id only.
#[derive(Clone, Copy)]
pub struct FaultClass {
    id: TypeId,
    name: &'static str,
    parent: fn() -> Option<FaultClass>,
}

impl FaultClass {
    /// Returns the class of `F`.
    #[must_use]
    pub fn of<F: Fault>() -> Self {
        Self {
            id: TypeId::of::<F>(),
            name: type_name::<F>(),
            parent: <F as Fault>::parent,
        }
    }

    /// Fully-qualified type name of the class.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the direct parent class.
    #[must_use]
    pub fn parent(&self) -> Option<FaultClass> {
        (self.parent)()
    }

    /// Iterates over the parent chain, nearest ancestor first.
    pub fn ancestors(&self) -> impl Iterator<Item = FaultClass> {
        std::iter::successors(self.parent(), FaultClass::parent)
    }

    /// Returns true if `self` is `other` or descends from it.
    #[must_use]
    pub fn is_a(&self, other: &FaultClass) -> bool {
        self == other || self.ancestors().any(|a| a == *other)
    }
}

impl PartialEq for FaultClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FaultClass {}

impl Hash for FaultClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FaultClass").field(&self.name).finish()
    }
}

impl fmt::Display for FaultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased fault together with its class.
pub struct HandlerFault {
    class: FaultClass,
    error: Box<dyn StdError + Send + Sync>,
}

impl HandlerFault {
    /// Wraps a fault value.
    pub fn new<F: Fault>(fault: F) -> Self {
        Self {
            class: FaultClass::of::<F>(),
            error: Box::new(fault),
        }
    }

    /// Creates a [`GenericFault`] carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(GenericFault::new(message))
    }

    /// Returns the fault class.
    #[must_use]
    pub const fn class(&self) -> FaultClass {
        self.class
    }

    /// Returns true if the fault is exactly of type `F`.
    #[must_use]
    pub fn is<F: Fault>(&self) -> bool {
        self.class == FaultClass::of::<F>()
    }

    /// Returns true if the fault is `F` or a descendant of `F`.
    #[must_use]
    pub fn is_a<F: Fault>(&self) -> bool {
        self.class.is_a(&FaultClass::of::<F>())
    }

    /// Borrows the fault as its concrete type.
    #[must_use]
    pub fn downcast_ref<F: Fault>(&self) -> Option<&F> {
        self.error.downcast_ref::<F>()
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl fmt::Debug for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFault")
            .field("class", &self.class)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for HandlerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl StdError for HandlerFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error.source()
    }
}

/// A root fault that carries only a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GenericFault {
    message: String,
}

impl GenericFault {
    /// Creates a new generic fault.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Fault for GenericFault {}

/// Raised by the dispatcher when a handler panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("handler panicked: {message}")]
pub struct HandlerPanic {
    message: String,
}

impl HandlerPanic {
    /// Creates a panic fault from a panic payload.
    #[must_use]
    pub fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self { message }
    }

    /// Returns the panic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Fault for HandlerPanic {}

// Body and query decoding failures raised inside handlers.
impl Fault for SwitchyardError {}

//! Common error infrastructure for gameplay-core.
//!
//! Domain errors (`InventoryError`, `DefinitionError`, `RequestRejection`)
//! live next to the code that produces them. This module only provides the
//! classification they share.
//!
//! Most gameplay preconditions are *not* errors: calling `start_fire` on an
//! unequipped weapon is a silent no-op, exactly like pressing a trigger on a
//! holstered gun. Errors are reserved for requests that arrive at the
//! authority and for malformed content.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same request may succeed later.
    ///
    /// Examples: weapon still equipping, reload already in progress
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: weapon not owned by the requester, unknown weapon id
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,

    /// Unrecoverable; the simulation cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all gameplay-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

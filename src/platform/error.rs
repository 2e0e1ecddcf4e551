//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// Platform implementations map their driver-specific errors to these
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Secure-element storage operation failed
    Storage(StorageError),
    /// Platform initialization failed
    InitializationFailed,
}

/// Secure-element storage errors
///
/// One call targets exactly one zone; a failed call is assumed to have left
/// that zone untouched (no partial write within a zone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Zone index does not exist on this part
    InvalidZone,
    /// Offset or length exceeds the zone capacity
    OutOfRange,
    /// The device reported a read or write failure
    Io,
}

impl From<StorageError> for PlatformError {
    fn from(e: StorageError) -> Self {
        PlatformError::Storage(e)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidZone => write!(f, "invalid zone index"),
            StorageError::OutOfRange => write!(f, "access beyond zone capacity"),
            StorageError::Io => write!(f, "secure element I/O failure"),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Storage(e) => write!(f, "storage error: {}", e),
            PlatformError::InitializationFailed => write!(f, "platform initialization failed"),
        }
    }
}

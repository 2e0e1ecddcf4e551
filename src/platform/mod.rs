//! Platform abstraction layer
//!
//! Interfaces the configuration core consumes but does not implement: the
//! secure-element zone primitive and the X.509 certificate parser. Hardware
//! implementations live with the board support code; this crate ships a mock
//! secure element for tests and an optional host-side certificate parser.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "x509"))]
pub mod x509;

// Re-export commonly used types
pub use error::{PlatformError, Result, StorageError};
pub use traits::{CertificateParser, NullCertParser, SecureStorage};

//! Platform abstraction traits
//!
//! This module defines the interfaces that platform implementations must
//! provide to the configuration core.

pub mod cert;
pub mod storage;

// Re-export trait interfaces
pub use cert::{CertificateParser, NullCertParser};
pub use storage::SecureStorage;

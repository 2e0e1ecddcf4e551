//! Certificate parser trait
//!
//! The settings loader derives the device identity from the subject Common
//! Name of the provisioned client/device certificate. Parsing X.509 is the
//! TLS stack's business; the loader only consumes this narrow interface.

use heapless::String;

use crate::config::zones::MAX_DEVICE_ID_LEN;

/// Subject Common-Name extraction from a PEM certificate
///
/// Implementations must perform a real X.509 subject-DN parse. Scanning the
/// PEM text for a `CN=` substring is not acceptable: it misfires on
/// certificates whose other DN attributes contain that text.
pub trait CertificateParser {
    /// Extract the subject CN from a PEM-encoded certificate
    ///
    /// Returns `None` when the input is not a parseable certificate or its
    /// subject carries no CN attribute. A CN longer than the device-identity
    /// buffer is truncated at capacity.
    fn common_name(&mut self, pem: &str) -> Option<String<MAX_DEVICE_ID_LEN>>;
}

/// Parser for builds without certificate support
///
/// Always reports "no CN". Suitable for profiles that never derive their
/// identity from a certificate.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCertParser;

impl CertificateParser for NullCertParser {
    fn common_name(&mut self, _pem: &str) -> Option<String<MAX_DEVICE_ID_LEN>> {
        None
    }
}

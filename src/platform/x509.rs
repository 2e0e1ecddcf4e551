//! X.509 common-name extraction backed by `x509-parser`
//!
//! Runs a real DER parse of the certificate's subject, so a literal `CN=`
//! inside some other attribute value cannot be mistaken for the common
//! name. Host-only; device builds without a parser use
//! [`NullCertParser`](crate::platform::traits::cert::NullCertParser) and
//! configure the device identity explicitly.

use heapless::String;
use x509_parser::pem::parse_x509_pem;

use crate::config::zones::MAX_DEVICE_ID_LEN;
use crate::platform::traits::CertificateParser;

/// Certificate parser over `x509-parser`
#[derive(Debug, Default)]
pub struct X509CertParser;

impl X509CertParser {
    pub fn new() -> Self {
        Self
    }
}

impl CertificateParser for X509CertParser {
    fn common_name(&mut self, pem: &str) -> Option<String<MAX_DEVICE_ID_LEN>> {
        let (_, der) = parse_x509_pem(pem.as_bytes()).ok()?;
        let cert = der.parse_x509().ok()?;
        let cn = cert.subject().iter_common_name().next()?.as_str().ok()?;

        let mut out = String::new();
        for c in cn.chars() {
            if out.push(c).is_err() {
                break;
            }
        }
        Some(out)
    }
}

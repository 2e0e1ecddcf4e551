//! Runtime settings loader
//!
//! `DeviceSettings` owns one buffer per logical setting and fills them all in
//! a single [`load_all`](DeviceSettings::load_all) pass over the active
//! profile. Consumers borrow values through accessors and never touch the
//! store during normal operation; after a provisioning change, run the
//! loader again.
//!
//! Beyond the raw reads, the loader derives two secondary values:
//! - broker host and port from the stored broker URL
//! - the device identity, either read directly, taken from the `DeviceId=`
//!   field of a connection string, or extracted from the subject CN of the
//!   provisioned certificate (per the profile's [`IdentitySource`])

use bitflags::bitflags;
use heapless::String;

use crate::log_warn;
use crate::platform::traits::{CertificateParser, SecureStorage};

use super::profiles::{IdentitySource, SettingId};
use super::store::ConfigStore;
use super::zones::{
    MAX_BROKER_URL_LEN, MAX_CA_CERT_LEN, MAX_CLIENT_CERT_LEN, MAX_CLIENT_KEY_LEN,
    MAX_DEVICE_ID_LEN, MAX_DEVICE_PASSWORD_LEN, MAX_REGISTRATION_ID_LEN, MAX_SCOPE_ID_LEN,
    MAX_SYMMETRIC_KEY_LEN, MAX_WIFI_PASSWORD_LEN, MAX_WIFI_SSID_LEN,
};

bitflags! {
    /// Set of logical settings, keyed by `SettingId` discriminant
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SettingSet: u16 {
        const WIFI_SSID = 1 << SettingId::WifiSsid as u16;
        const WIFI_PASSWORD = 1 << SettingId::WifiPassword as u16;
        const BROKER_URL = 1 << SettingId::BrokerUrl as u16;
        const DEVICE_ID = 1 << SettingId::DeviceId as u16;
        const DEVICE_PASSWORD = 1 << SettingId::DevicePassword as u16;
        const CA_CERT = 1 << SettingId::CaCert as u16;
        const CLIENT_CERT = 1 << SettingId::ClientCert as u16;
        const CLIENT_KEY = 1 << SettingId::ClientKey as u16;
        const CONNECTION_STRING = 1 << SettingId::ConnectionString as u16;
        const DPS_ENDPOINT = 1 << SettingId::DpsEndpoint as u16;
        const SCOPE_ID = 1 << SettingId::ScopeId as u16;
        const REGISTRATION_ID = 1 << SettingId::RegistrationId as u16;
        const SYMMETRIC_KEY = 1 << SettingId::SymmetricKey as u16;
        const DEVICE_CERT = 1 << SettingId::DeviceCert as u16;
    }
}

impl SettingSet {
    /// Singleton set for one setting
    pub fn from_id(id: SettingId) -> Self {
        Self::from_bits_truncate(1 << id as u16)
    }
}

/// Loader errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// The store has no active profile; all buffers were reset
    NoActiveProfile,
    /// Reads of the named settings failed; their buffers are empty, every
    /// other setting was still loaded
    Incomplete(SettingSet),
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoadError::NoActiveProfile => write!(f, "no active profile"),
            LoadError::Incomplete(set) => {
                write!(f, "failed to load {} setting(s)", set.bits().count_ones())
            }
        }
    }
}

/// All runtime configuration values for the active profile
///
/// Unmapped settings stay empty; `broker_port` defaults to 8883.
#[derive(Debug)]
pub struct DeviceSettings {
    wifi_ssid: String<MAX_WIFI_SSID_LEN>,
    wifi_password: String<MAX_WIFI_PASSWORD_LEN>,
    broker_url: String<MAX_BROKER_URL_LEN>,
    broker_host: String<MAX_BROKER_URL_LEN>,
    broker_port: u16,
    device_password: String<MAX_DEVICE_PASSWORD_LEN>,
    ca_cert: String<MAX_CA_CERT_LEN>,
    client_cert: String<MAX_CLIENT_CERT_LEN>,
    client_key: String<MAX_CLIENT_KEY_LEN>,
    connection_string: String<MAX_BROKER_URL_LEN>,
    dps_endpoint: String<MAX_BROKER_URL_LEN>,
    scope_id: String<MAX_SCOPE_ID_LEN>,
    registration_id: String<MAX_REGISTRATION_ID_LEN>,
    symmetric_key: String<MAX_SYMMETRIC_KEY_LEN>,
    device_id: String<MAX_DEVICE_ID_LEN>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceSettings {
    /// Fresh settings, all empty, broker port 8883
    pub fn new() -> Self {
        Self {
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            broker_url: String::new(),
            broker_host: String::new(),
            broker_port: 8883,
            device_password: String::new(),
            ca_cert: String::new(),
            client_cert: String::new(),
            client_key: String::new(),
            connection_string: String::new(),
            dps_endpoint: String::new(),
            scope_id: String::new(),
            registration_id: String::new(),
            symmetric_key: String::new(),
            device_id: String::new(),
        }
    }

    /// Load every available setting for the store's active profile
    ///
    /// Resets all buffers first, so stale values never survive a profile
    /// switch. Individual read failures clear only the affected field and
    /// are collected into [`LoadError::Incomplete`]; everything else is
    /// still loaded. Identity-derivation failures (no CN in the
    /// certificate, malformed connection string) leave `device_id` empty
    /// and do not fail the load.
    pub fn load_all<S: SecureStorage, C: CertificateParser>(
        &mut self,
        store: &ConfigStore,
        storage: &mut S,
        certs: &mut C,
    ) -> Result<(), LoadError> {
        self.reset();
        let profile = store.active_profile().ok_or(LoadError::NoActiveProfile)?;

        let mut failed = SettingSet::empty();
        let mut scratch = [0u8; MAX_CLIENT_CERT_LEN];

        load_field(store, storage, SettingId::WifiSsid, &mut scratch, &mut self.wifi_ssid, &mut failed);
        load_field(store, storage, SettingId::WifiPassword, &mut scratch, &mut self.wifi_password, &mut failed);
        load_field(store, storage, SettingId::BrokerUrl, &mut scratch, &mut self.broker_url, &mut failed);
        load_field(store, storage, SettingId::DevicePassword, &mut scratch, &mut self.device_password, &mut failed);
        load_field(store, storage, SettingId::CaCert, &mut scratch, &mut self.ca_cert, &mut failed);
        load_field(store, storage, SettingId::ClientKey, &mut scratch, &mut self.client_key, &mut failed);
        load_field(store, storage, SettingId::ConnectionString, &mut scratch, &mut self.connection_string, &mut failed);
        load_field(store, storage, SettingId::DpsEndpoint, &mut scratch, &mut self.dps_endpoint, &mut failed);
        load_field(store, storage, SettingId::ScopeId, &mut scratch, &mut self.scope_id, &mut failed);
        load_field(store, storage, SettingId::RegistrationId, &mut scratch, &mut self.registration_id, &mut failed);
        load_field(store, storage, SettingId::SymmetricKey, &mut scratch, &mut self.symmetric_key, &mut failed);

        // The X.509 hub/DPS profiles store a device certificate instead of a
        // client certificate; both land in the same buffer.
        load_field(store, storage, SettingId::ClientCert, &mut scratch, &mut self.client_cert, &mut failed);
        if !store.is_available(SettingId::ClientCert) {
            load_field(store, storage, SettingId::DeviceCert, &mut scratch, &mut self.client_cert, &mut failed);
        }

        let (host, port) = parse_broker_url(&self.broker_url);
        self.broker_port = port;
        copy_truncated(&mut self.broker_host, host);

        match profile.identity_source() {
            IdentitySource::Certificate => {
                if let Some(cn) = certs.common_name(&self.client_cert) {
                    let cn = truncate_at_delimiter(&cn);
                    copy_truncated(&mut self.device_id, cn);
                } else if !self.client_cert.is_empty() {
                    log_warn!("no common name in provisioned certificate");
                }
            }
            IdentitySource::ConnectionString => {
                if let Some(id) = connection_string_device_id(&self.connection_string) {
                    copy_truncated(&mut self.device_id, id);
                }
            }
            IdentitySource::Stored => {
                load_field(store, storage, SettingId::DeviceId, &mut scratch, &mut self.device_id, &mut failed);
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(LoadError::Incomplete(failed))
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn wifi_ssid(&self) -> &str {
        &self.wifi_ssid
    }

    pub fn wifi_password(&self) -> &str {
        &self.wifi_password
    }

    /// Stored broker URL, as saved
    pub fn broker_url(&self) -> &str {
        &self.broker_url
    }

    /// Host part of the broker URL, scheme and port stripped
    pub fn broker_host(&self) -> &str {
        &self.broker_host
    }

    /// Broker port, from the URL or the scheme default
    pub fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub fn device_password(&self) -> &str {
        &self.device_password
    }

    pub fn ca_cert(&self) -> &str {
        &self.ca_cert
    }

    /// Client certificate, or the device certificate under the X.509
    /// hub/DPS profiles
    pub fn client_cert(&self) -> &str {
        &self.client_cert
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    pub fn dps_endpoint(&self) -> &str {
        &self.dps_endpoint
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    pub fn registration_id(&self) -> &str {
        &self.registration_id
    }

    pub fn symmetric_key(&self) -> &str {
        &self.symmetric_key
    }

    /// Device identity, read or derived per the active profile
    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

/// Read one setting into its buffer, recording failures
///
/// Unmapped settings are skipped and stay empty; that is configuration, not
/// failure.
fn load_field<S: SecureStorage, const N: usize>(
    store: &ConfigStore,
    storage: &mut S,
    setting: SettingId,
    scratch: &mut [u8],
    out: &mut String<N>,
    failed: &mut SettingSet,
) {
    out.clear();
    if !store.is_available(setting) {
        return;
    }
    match store.read_str(storage, setting, scratch) {
        Ok(value) => copy_truncated(out, value),
        Err(e) => {
            log_warn!("loading setting {} failed: {}", setting.index(), e);
            *failed |= SettingSet::from_id(setting);
        }
    }
}

/// Copy into a fixed-capacity string, dropping a too-long tail
fn copy_truncated<const N: usize>(out: &mut String<N>, value: &str) {
    out.clear();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
}

/// Split a broker URL into host and port
///
/// Scheme prefixes are checked in fixed order: `mqtts://` and `ssl://`
/// default to port 8883, `mqtt://` to 1883, no scheme to 8883. An explicit
/// port must be an integer in [1, 65535] or it falls back to 8883.
pub fn parse_broker_url(url: &str) -> (&str, u16) {
    let (rest, default_port) = if let Some(r) = url.strip_prefix("mqtts://") {
        (r, 8883)
    } else if let Some(r) = url.strip_prefix("ssl://") {
        (r, 8883)
    } else if let Some(r) = url.strip_prefix("mqtt://") {
        (r, 1883)
    } else {
        (url, 8883)
    };

    match rest.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u32>()
                .ok()
                .filter(|p| (1..=65535).contains(p))
                .map(|p| p as u16)
                .unwrap_or(8883);
            (host, port)
        }
        None => (rest, default_port),
    }
}

/// End of a derived-identity value: first delimiter or end of input
fn truncate_at_delimiter(value: &str) -> &str {
    let end = value
        .find(|c| matches!(c, ';' | ',' | ' ' | '\r' | '\n' | '\'' | '"'))
        .unwrap_or(value.len());
    &value[..end]
}

/// Extract the device ID from an IoT Hub connection string
///
/// Matches `DeviceId=` first, then `deviceId=` as a compatibility fallback.
fn connection_string_device_id(conn: &str) -> Option<&str> {
    let start = conn
        .find("DeviceId=")
        .or_else(|| conn.find("deviceId="))?
        + "DeviceId=".len();
    Some(truncate_at_delimiter(&conn[start..]))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::profiles::ProfileId;
    use crate::platform::mock::MockSecureElement;
    use crate::platform::traits::NullCertParser;
    use crate::platform::x509::X509CertParser;

    const DEVICE_CERT_PEM: &str = "-----BEGIN CERTIFICATE-----\n\
MIIB6DCCAY2gAwIBAgIUUrjYr+uxc7Ym12pI66lhoGnOkG8wCgYIKoZIzj0EAwIw\n\
STEfMB0GA1UECgwWQ29udG9zbyBDTj1XaWRnZXRzIEx0ZDEZMBcGA1UEAwwQZGV2\n\
a2l0LWRldmljZS0wMTELMAkGA1UEBhMCVVMwHhcNMjYwODI5MTgyMDQ4WhcNNDYw\n\
ODI0MTgyMDQ4WjBJMR8wHQYDVQQKDBZDb250b3NvIENOPVdpZGdldHMgTHRkMRkw\n\
FwYDVQQDDBBkZXZraXQtZGV2aWNlLTAxMQswCQYDVQQGEwJVUzBZMBMGByqGSM49\n\
AgEGCCqGSM49AwEHA0IABG6QvS0HQjYAhGoPJoOzdRipj1YuB9Ti9g+wBFWNmiLa\n\
O3ISD23Iq2UA5Ea50CChH658l8A9F11saV5OTDF/OLyjUzBRMB0GA1UdDgQWBBQy\n\
n45Tvrzd4yDhrS781nO68am59TAfBgNVHSMEGDAWgBQyn45Tvrzd4yDhrS781nO6\n\
8am59TAPBgNVHRMBAf8EBTADAQH/MAoGCCqGSM49BAMCA0kAMEYCIQCy4VPUzowN\n\
7knhin7ylr5dzfKGrt4MYrcS/dvCHL9RJQIhAMbxGBBm7SA2invsPKuxFhZ49Lrz\n\
DQol8itK1l83L7gt\n\
-----END CERTIFICATE-----\n";

    fn store_with(profile: ProfileId) -> ConfigStore {
        let mut store = ConfigStore::new();
        store.select_profile(profile).unwrap();
        store
    }

    #[rstest]
    #[case("broker.example.com", "broker.example.com", 8883)]
    #[case("mqtt://h:1883", "h", 1883)]
    #[case("mqtts://h", "h", 8883)]
    #[case("ssl://h:9999", "h", 9999)]
    #[case("h:99999", "h", 8883)]
    #[case("", "", 8883)]
    fn test_parse_broker_url(#[case] url: &str, #[case] host: &str, #[case] port: u16) {
        assert_eq!(parse_broker_url(url), (host, port));
    }

    #[rstest]
    #[case("mqtt://h", "h", 1883)]
    #[case("h:0", "h", 8883)]
    #[case("h:abc", "h", 8883)]
    fn test_parse_broker_url_edge_ports(#[case] url: &str, #[case] host: &str, #[case] port: u16) {
        assert_eq!(parse_broker_url(url), (host, port));
    }

    #[rstest]
    #[case("HostName=hub.azure-devices.net;DeviceId=dev1;SharedAccessKey=abc", Some("dev1"))]
    #[case("HostName=hub.azure-devices.net;deviceId=dev2;SharedAccessKey=abc", Some("dev2"))]
    #[case("DeviceId=tail-at-end", Some("tail-at-end"))]
    #[case("HostName=hub.azure-devices.net;SharedAccessKey=abc", None)]
    #[case("", None)]
    fn test_connection_string_device_id(#[case] conn: &str, #[case] expected: Option<&str>) {
        assert_eq!(connection_string_device_id(conn), expected);
    }

    #[test]
    fn test_new_is_empty_with_default_port() {
        let settings = DeviceSettings::new();
        assert_eq!(settings.wifi_ssid(), "");
        assert_eq!(settings.broker_host(), "");
        assert_eq!(settings.device_id(), "");
        assert_eq!(settings.broker_port(), 8883);
    }

    #[test]
    fn test_load_all_requires_active_profile() {
        let store = ConfigStore::new();
        let mut element = MockSecureElement::new();
        let mut settings = DeviceSettings::new();

        assert_eq!(
            settings.load_all(&store, &mut element, &mut NullCertParser),
            Err(LoadError::NoActiveProfile)
        );
        assert_eq!(settings.wifi_ssid(), "");
        assert_eq!(settings.broker_port(), 8883);
    }

    #[test]
    fn test_load_all_mqtt_userpass() {
        let store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();

        store.save(&mut element, SettingId::WifiSsid, "plant-net").unwrap();
        store.save(&mut element, SettingId::WifiPassword, "hunter2").unwrap();
        store
            .save(&mut element, SettingId::BrokerUrl, "mqtt://broker.local:1884")
            .unwrap();
        store.save(&mut element, SettingId::DeviceId, "press-42").unwrap();
        store.save(&mut element, SettingId::DevicePassword, "secret").unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut NullCertParser)
            .unwrap();

        assert_eq!(settings.wifi_ssid(), "plant-net");
        assert_eq!(settings.wifi_password(), "hunter2");
        assert_eq!(settings.broker_url(), "mqtt://broker.local:1884");
        assert_eq!(settings.broker_host(), "broker.local");
        assert_eq!(settings.broker_port(), 1884);
        assert_eq!(settings.device_id(), "press-42");
        assert_eq!(settings.device_password(), "secret");
        // Unmapped settings stay empty
        assert_eq!(settings.ca_cert(), "");
        assert_eq!(settings.connection_string(), "");
    }

    #[test]
    fn test_identity_from_connection_string() {
        let store = store_with(ProfileId::IotHubSas);
        let mut element = MockSecureElement::new();
        store
            .save(
                &mut element,
                SettingId::ConnectionString,
                "HostName=hub.azure-devices.net;DeviceId=dev1;SharedAccessKey=abc",
            )
            .unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut NullCertParser)
            .unwrap();
        assert_eq!(settings.device_id(), "dev1");
    }

    #[test]
    fn test_identity_from_certificate_cn() {
        let store = store_with(ProfileId::IotHubX509);
        let mut element = MockSecureElement::new();
        store
            .save(&mut element, SettingId::DeviceCert, DEVICE_CERT_PEM)
            .unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut X509CertParser::new())
            .unwrap();
        // Device certificate lands in the client-cert buffer
        assert_eq!(settings.client_cert(), DEVICE_CERT_PEM);
        assert_eq!(settings.device_id(), "devkit-device-01");
    }

    #[test]
    fn test_identity_derivation_failure_not_fatal() {
        let store = store_with(ProfileId::MqttMutualTls);
        let mut element = MockSecureElement::new();
        store
            .save(&mut element, SettingId::ClientCert, "not a certificate")
            .unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut X509CertParser::new())
            .unwrap();
        assert_eq!(settings.device_id(), "");
        assert_eq!(settings.client_cert(), "not a certificate");
    }

    #[test]
    fn test_load_all_dps_symmetric_key() {
        let store = store_with(ProfileId::DpsSymmetricKey);
        let mut element = MockSecureElement::new();

        store
            .save(
                &mut element,
                SettingId::DpsEndpoint,
                "global.azure-devices-provisioning.net",
            )
            .unwrap();
        store.save(&mut element, SettingId::ScopeId, "0ne00AABBCC").unwrap();
        store
            .save(&mut element, SettingId::RegistrationId, "press-42")
            .unwrap();
        store
            .save(&mut element, SettingId::SymmetricKey, "c2VjcmV0a2V5")
            .unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut NullCertParser)
            .unwrap();

        assert_eq!(settings.dps_endpoint(), "global.azure-devices-provisioning.net");
        assert_eq!(settings.scope_id(), "0ne00AABBCC");
        assert_eq!(settings.registration_id(), "press-42");
        assert_eq!(settings.symmetric_key(), "c2VjcmV0a2V5");
        assert_eq!(settings.device_id(), "");
    }

    #[test]
    fn test_partial_degradation_on_read_failure() {
        let store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();

        store.save(&mut element, SettingId::WifiSsid, "plant-net").unwrap();
        store.save(&mut element, SettingId::DeviceId, "press-42").unwrap();
        // Break the broker-URL zone after provisioning
        element.fail_zone(5);

        let mut settings = DeviceSettings::new();
        let result = settings.load_all(&store, &mut element, &mut NullCertParser);
        assert!(matches!(result, Err(LoadError::Incomplete(_))));

        // Everything else still loaded
        assert_eq!(settings.wifi_ssid(), "plant-net");
        assert_eq!(settings.device_id(), "press-42");
        assert_eq!(settings.broker_url(), "");
    }

    #[test]
    fn test_reload_resets_previous_values() {
        let mut store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();
        store
            .save(&mut element, SettingId::BrokerUrl, "mqtts://old-broker")
            .unwrap();

        let mut settings = DeviceSettings::new();
        settings
            .load_all(&store, &mut element, &mut NullCertParser)
            .unwrap();
        assert_eq!(settings.broker_host(), "old-broker");

        // Switch to a profile without a broker URL and reload
        store.select_profile(ProfileId::IotHubSas).unwrap();
        settings
            .load_all(&store, &mut element, &mut NullCertParser)
            .unwrap();
        assert_eq!(settings.broker_url(), "");
        assert_eq!(settings.broker_host(), "");
        assert_eq!(settings.broker_port(), 8883);
    }
}

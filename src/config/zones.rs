//! Secure-element zone catalog
//!
//! The STSAFE secure element on the AZ3166 exposes a handful of data zones
//! with fixed, hardware-given byte capacities. Only the zones listed here are
//! usable for configuration data; the remaining indices are reserved by the
//! TLS pairing keys.

/// A physical secure-element data zone
///
/// Capacities are hardware constants. "No zone" is expressed by an empty
/// mapping slice, never by a sentinel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Zone {
    /// Zone 0, 976 bytes - large zone for certificates
    Z0,
    /// Zone 2, 192 bytes - medium zone
    Z2,
    /// Zone 3, 120 bytes - WiFi SSID
    Z3,
    /// Zone 5, 584 bytes - URLs, connection strings
    Z5,
    /// Zone 6, 680 bytes - device ID, certificates
    Z6,
    /// Zone 7, 784 bytes - certificates, keys
    Z7,
    /// Zone 8, 880 bytes - certificates, keys
    Z8,
    /// Zone 10, 88 bytes - WiFi password
    Z10,
}

impl Zone {
    /// Largest zone capacity, for sizing scratch buffers
    pub const MAX_CAPACITY: usize = 976;

    /// All catalog zones, in index order
    pub const ALL: [Zone; 8] = [
        Zone::Z0,
        Zone::Z2,
        Zone::Z3,
        Zone::Z5,
        Zone::Z6,
        Zone::Z7,
        Zone::Z8,
        Zone::Z10,
    ];

    /// Hardware zone index
    pub const fn index(self) -> u8 {
        match self {
            Zone::Z0 => 0,
            Zone::Z2 => 2,
            Zone::Z3 => 3,
            Zone::Z5 => 5,
            Zone::Z6 => 6,
            Zone::Z7 => 7,
            Zone::Z8 => 8,
            Zone::Z10 => 10,
        }
    }

    /// Fixed byte capacity
    pub const fn capacity(self) -> usize {
        match self {
            Zone::Z0 => 976,
            Zone::Z2 => 192,
            Zone::Z3 => 120,
            Zone::Z5 => 584,
            Zone::Z6 => 680,
            Zone::Z7 => 784,
            Zone::Z8 => 880,
            Zone::Z10 => 88,
        }
    }
}

/// Maximum WiFi SSID size (zone 3)
pub const MAX_WIFI_SSID_LEN: usize = Zone::Z3.capacity();

/// Maximum WiFi password size (zone 10)
pub const MAX_WIFI_PASSWORD_LEN: usize = Zone::Z10.capacity();

/// Maximum broker URL or IoT Hub connection string size (zone 5)
pub const MAX_BROKER_URL_LEN: usize = Zone::Z5.capacity();

/// Maximum device password size (zone 7, the larger of its mappings)
pub const MAX_DEVICE_PASSWORD_LEN: usize = Zone::Z7.capacity();

/// Maximum DPS scope-ID size (zone 5, the larger of its mappings)
pub const MAX_SCOPE_ID_LEN: usize = Zone::Z5.capacity();

/// Maximum DPS registration-ID size (zone 6)
pub const MAX_REGISTRATION_ID_LEN: usize = Zone::Z6.capacity();

/// Maximum DPS symmetric-key size (zone 7)
pub const MAX_SYMMETRIC_KEY_LEN: usize = Zone::Z7.capacity();

/// Maximum CA certificate size (zones 0+7+8)
pub const MAX_CA_CERT_LEN: usize =
    Zone::Z0.capacity() + Zone::Z7.capacity() + Zone::Z8.capacity();

/// Maximum client/device certificate size
///
/// Sized for the three-zone device certificate (0+7+8); the two-zone client
/// certificate (6+7) fits as well.
pub const MAX_CLIENT_CERT_LEN: usize = MAX_CA_CERT_LEN;

/// Maximum client private key size (zone 8)
pub const MAX_CLIENT_KEY_LEN: usize = Zone::Z8.capacity();

/// Maximum derived device-identity length
pub const MAX_DEVICE_ID_LEN: usize = 256;

//! Connection-profile catalog
//!
//! A connection profile assigns every logical setting an ordered list of
//! secure-element zones (or none). The built-in profiles cover the supported
//! MQTT and Azure authentication schemes; a sketch can register one custom
//! profile at startup.
//!
//! Zone allocation follows these rules:
//! - WiFi SSID is always zone 3 (120 bytes)
//! - WiFi password is always zone 10 (88 bytes)
//! - No two settings in a profile share a zone
//! - Large certificates span up to three zones, in mapping order

use super::zones::Zone;

/// Logical configuration fields
///
/// Discriminants are part of the external contract: the CLI and web layers
/// index their metadata tables by value. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingId {
    /// WiFi SSID
    WifiSsid = 0,
    /// WiFi password
    WifiPassword = 1,
    /// MQTT broker address
    BrokerUrl = 2,
    /// MQTT client/device ID
    DeviceId = 3,
    /// Device password
    DevicePassword = 4,
    /// CA/server certificate (may span multiple zones)
    CaCert = 5,
    /// Client certificate for mutual TLS
    ClientCert = 6,
    /// Client private key for mutual TLS
    ClientKey = 7,
    /// Azure IoT Hub connection string
    ConnectionString = 8,
    /// Azure DPS endpoint URL
    DpsEndpoint = 9,
    /// Azure DPS ID scope
    ScopeId = 10,
    /// Azure DPS registration ID
    RegistrationId = 11,
    /// Azure DPS symmetric key
    SymmetricKey = 12,
    /// Large device certificate spanning multiple zones
    DeviceCert = 13,
}

impl SettingId {
    /// Number of settings
    pub const COUNT: usize = 14;

    /// All settings, in discriminant order
    pub const ALL: [SettingId; Self::COUNT] = [
        SettingId::WifiSsid,
        SettingId::WifiPassword,
        SettingId::BrokerUrl,
        SettingId::DeviceId,
        SettingId::DevicePassword,
        SettingId::CaCert,
        SettingId::ClientCert,
        SettingId::ClientKey,
        SettingId::ConnectionString,
        SettingId::DpsEndpoint,
        SettingId::ScopeId,
        SettingId::RegistrationId,
        SettingId::SymmetricKey,
        SettingId::DeviceCert,
    ];

    /// Table index for this setting
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Ordered zones holding one setting's value
///
/// A value is split across the listed zones in order, filling each to
/// capacity before spilling into the next. An empty mapping means the
/// setting does not exist in the profile.
pub type ZoneMapping = &'static [Zone];

/// Supported connection profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ProfileId {
    /// No persistent configuration at all
    NoStorage = 0,
    /// MQTT with username/password
    MqttUserPass = 1,
    /// MQTT with username/password over TLS (server CA cert)
    MqttUserPassTls = 2,
    /// MQTT with mutual TLS (client cert + key + CA cert)
    MqttMutualTls = 3,
    /// Azure IoT Hub with SAS key (connection string)
    IotHubSas = 4,
    /// Azure IoT Hub with X.509 certificate
    IotHubX509 = 5,
    /// Azure DPS with symmetric key
    DpsSymmetricKey = 6,
    /// Azure DPS with X.509 certificate
    DpsX509 = 7,
    /// Azure DPS with enrollment-group symmetric key
    DpsGroupSas = 8,
    /// Caller-registered profile
    Custom = 9,
}

/// Where the loader takes the device identity from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentitySource {
    /// Subject CN of the provisioned client/device certificate
    Certificate,
    /// `DeviceId=` field of the IoT Hub connection string
    ConnectionString,
    /// The stored device-ID setting, when mapped
    Stored,
}

impl ProfileId {
    /// Identity-derivation rule for this profile
    pub fn identity_source(self) -> IdentitySource {
        match self {
            ProfileId::MqttMutualTls | ProfileId::IotHubX509 | ProfileId::DpsX509 => {
                IdentitySource::Certificate
            }
            ProfileId::IotHubSas => IdentitySource::ConnectionString,
            _ => IdentitySource::Stored,
        }
    }
}

/// One connection profile: identity plus a complete zone-mapping table
#[derive(Debug)]
pub struct ProfileDefinition {
    /// Profile identifier
    pub id: ProfileId,
    /// Human-readable name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Zone mapping per setting, indexed by `SettingId`
    pub mappings: [ZoneMapping; SettingId::COUNT],
}

impl ProfileDefinition {
    /// Zones holding `setting`, in storage order (empty when unmapped)
    pub fn mapping(&self, setting: SettingId) -> ZoneMapping {
        self.mappings[setting.index()]
    }
}

/// Marker for settings a profile does not store
const UNMAPPED: ZoneMapping = &[];

/// Built-in profile definitions
///
/// Indexed by `ProfileId` discriminant (`Custom` excluded).
static BUILTIN_PROFILES: [ProfileDefinition; 9] = [
    ProfileDefinition {
        id: ProfileId::NoStorage,
        name: "No Storage",
        description: "No persistent configuration; all settings unavailable",
        mappings: [UNMAPPED; SettingId::COUNT],
    },
    ProfileDefinition {
        id: ProfileId::MqttUserPass,
        name: "MQTT Username/Password",
        description: "MQTT broker with username and password authentication",
        mappings: [
            &[Zone::Z3],  // WifiSsid
            &[Zone::Z10], // WifiPassword
            &[Zone::Z5],  // BrokerUrl
            &[Zone::Z6],  // DeviceId
            &[Zone::Z7],  // DevicePassword
            UNMAPPED,     // CaCert
            UNMAPPED,     // ClientCert
            UNMAPPED,     // ClientKey
            UNMAPPED,     // ConnectionString
            UNMAPPED,     // DpsEndpoint
            UNMAPPED,     // ScopeId
            UNMAPPED,     // RegistrationId
            UNMAPPED,     // SymmetricKey
            UNMAPPED,     // DeviceCert
        ],
    },
    ProfileDefinition {
        id: ProfileId::MqttUserPassTls,
        name: "MQTT Username/Password over TLS",
        description: "MQTT broker with username/password over TLS with server certificate verification",
        mappings: [
            &[Zone::Z3],                     // WifiSsid
            &[Zone::Z10],                    // WifiPassword
            &[Zone::Z5],                     // BrokerUrl
            &[Zone::Z2],                     // DeviceId
            &[Zone::Z6],                     // DevicePassword
            &[Zone::Z0, Zone::Z7, Zone::Z8], // CaCert, 2640 bytes total
            UNMAPPED,                        // ClientCert
            UNMAPPED,                        // ClientKey
            UNMAPPED,                        // ConnectionString
            UNMAPPED,                        // DpsEndpoint
            UNMAPPED,                        // ScopeId
            UNMAPPED,                        // RegistrationId
            UNMAPPED,                        // SymmetricKey
            UNMAPPED,                        // DeviceCert
        ],
    },
    ProfileDefinition {
        id: ProfileId::MqttMutualTls,
        name: "MQTT Mutual TLS",
        description: "MQTT broker with mutual TLS (client certificate authentication)",
        mappings: [
            &[Zone::Z3],           // WifiSsid
            &[Zone::Z10],          // WifiPassword
            &[Zone::Z5],           // BrokerUrl
            UNMAPPED,              // DeviceId (derived from client cert CN)
            UNMAPPED,              // DevicePassword
            &[Zone::Z0],           // CaCert
            &[Zone::Z6, Zone::Z7], // ClientCert, 1464 bytes total
            &[Zone::Z8],           // ClientKey
            UNMAPPED,              // ConnectionString
            UNMAPPED,              // DpsEndpoint
            UNMAPPED,              // ScopeId
            UNMAPPED,              // RegistrationId
            UNMAPPED,              // SymmetricKey
            UNMAPPED,              // DeviceCert
        ],
    },
    ProfileDefinition {
        id: ProfileId::IotHubSas,
        name: "Azure IoT Hub (SAS)",
        description: "Azure IoT Hub with connection string (SAS token authentication)",
        mappings: [
            &[Zone::Z3],  // WifiSsid
            &[Zone::Z10], // WifiPassword
            UNMAPPED,     // BrokerUrl
            UNMAPPED,     // DeviceId (derived from connection string)
            UNMAPPED,     // DevicePassword
            UNMAPPED,     // CaCert
            UNMAPPED,     // ClientCert
            UNMAPPED,     // ClientKey
            &[Zone::Z5],  // ConnectionString
            UNMAPPED,     // DpsEndpoint
            UNMAPPED,     // ScopeId
            UNMAPPED,     // RegistrationId
            UNMAPPED,     // SymmetricKey
            UNMAPPED,     // DeviceCert
        ],
    },
    ProfileDefinition {
        id: ProfileId::IotHubX509,
        name: "Azure IoT Hub (X.509)",
        description: "Azure IoT Hub with X.509 certificate authentication",
        mappings: [
            &[Zone::Z3],                     // WifiSsid
            &[Zone::Z10],                    // WifiPassword
            UNMAPPED,                        // BrokerUrl
            UNMAPPED,                        // DeviceId (derived from device cert CN)
            UNMAPPED,                        // DevicePassword
            UNMAPPED,                        // CaCert
            UNMAPPED,                        // ClientCert
            UNMAPPED,                        // ClientKey
            &[Zone::Z5],                     // ConnectionString
            UNMAPPED,                        // DpsEndpoint
            UNMAPPED,                        // ScopeId
            UNMAPPED,                        // RegistrationId
            UNMAPPED,                        // SymmetricKey
            &[Zone::Z0, Zone::Z7, Zone::Z8], // DeviceCert, 2640 bytes total
        ],
    },
    ProfileDefinition {
        id: ProfileId::DpsSymmetricKey,
        name: "Azure DPS (Symmetric Key)",
        description: "Azure Device Provisioning Service with symmetric key authentication",
        mappings: [
            &[Zone::Z3],  // WifiSsid
            &[Zone::Z10], // WifiPassword
            UNMAPPED,     // BrokerUrl
            UNMAPPED,     // DeviceId
            UNMAPPED,     // DevicePassword
            UNMAPPED,     // CaCert
            UNMAPPED,     // ClientCert
            UNMAPPED,     // ClientKey
            UNMAPPED,     // ConnectionString
            &[Zone::Z5],  // DpsEndpoint
            &[Zone::Z2],  // ScopeId
            &[Zone::Z6],  // RegistrationId
            &[Zone::Z7],  // SymmetricKey
            UNMAPPED,     // DeviceCert
        ],
    },
    ProfileDefinition {
        id: ProfileId::DpsX509,
        name: "Azure DPS (X.509)",
        description: "Azure Device Provisioning Service with X.509 certificate authentication",
        mappings: [
            &[Zone::Z3],                     // WifiSsid
            &[Zone::Z10],                    // WifiPassword
            UNMAPPED,                        // BrokerUrl
            UNMAPPED,                        // DeviceId (derived from device cert CN)
            UNMAPPED,                        // DevicePassword
            UNMAPPED,                        // CaCert
            UNMAPPED,                        // ClientCert
            UNMAPPED,                        // ClientKey
            UNMAPPED,                        // ConnectionString
            &[Zone::Z2],                     // DpsEndpoint
            &[Zone::Z5],                     // ScopeId
            &[Zone::Z6],                     // RegistrationId
            UNMAPPED,                        // SymmetricKey
            &[Zone::Z0, Zone::Z7, Zone::Z8], // DeviceCert, 2640 bytes total
        ],
    },
    ProfileDefinition {
        id: ProfileId::DpsGroupSas,
        name: "Azure DPS (Group Key)",
        description: "Azure Device Provisioning Service with enrollment-group symmetric key",
        mappings: [
            &[Zone::Z3],  // WifiSsid
            &[Zone::Z10], // WifiPassword
            UNMAPPED,     // BrokerUrl
            UNMAPPED,     // DeviceId
            UNMAPPED,     // DevicePassword
            UNMAPPED,     // CaCert
            UNMAPPED,     // ClientCert
            UNMAPPED,     // ClientKey
            UNMAPPED,     // ConnectionString
            &[Zone::Z5],  // DpsEndpoint
            &[Zone::Z2],  // ScopeId
            &[Zone::Z6],  // RegistrationId
            &[Zone::Z7],  // SymmetricKey (group key)
            UNMAPPED,     // DeviceCert
        ],
    },
];

/// Runtime registry resolving profile identifiers to definitions
///
/// The built-in table is fixed; one slot accepts a caller-supplied custom
/// profile (`ProfileId::Custom`).
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    custom: Option<&'static ProfileDefinition>,
}

impl ProfileRegistry {
    /// Registry with only the built-in profiles
    pub const fn new() -> Self {
        Self { custom: None }
    }

    /// Registry with a custom profile filling the `Custom` slot
    pub const fn with_custom(custom: &'static ProfileDefinition) -> Self {
        Self {
            custom: Some(custom),
        }
    }

    /// Resolve a profile identifier
    ///
    /// Returns `None` for `Custom` when no custom profile is registered.
    pub fn resolve(&self, id: ProfileId) -> Option<&'static ProfileDefinition> {
        match id {
            ProfileId::Custom => self.custom,
            _ => Some(&BUILTIN_PROFILES[id as usize]),
        }
    }

    /// All registered profiles (built-ins plus the custom slot)
    pub fn iter(&self) -> impl Iterator<Item = &'static ProfileDefinition> + '_ {
        BUILTIN_PROFILES.iter().chain(self.custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_indexed_by_discriminant() {
        for (i, profile) in BUILTIN_PROFILES.iter().enumerate() {
            assert_eq!(profile.id as usize, i, "profile {} out of place", profile.name);
        }
    }

    /// No two mapped settings in a profile may share a zone: the zones are a
    /// partition, and an overlap silently corrupts whichever setting is
    /// written second.
    #[test]
    fn test_zone_partition_invariant() {
        let registry = ProfileRegistry::new();
        for profile in registry.iter() {
            let mut seen: std::vec::Vec<u8> = std::vec::Vec::new();
            for setting in SettingId::ALL {
                for zone in profile.mapping(setting) {
                    assert!(
                        !seen.contains(&zone.index()),
                        "profile '{}' maps zone {} twice",
                        profile.name,
                        zone.index()
                    );
                    seen.push(zone.index());
                }
            }
        }
    }

    #[test]
    fn test_mappings_within_span_limit() {
        let registry = ProfileRegistry::new();
        for profile in registry.iter() {
            for setting in SettingId::ALL {
                assert!(profile.mapping(setting).len() <= 3);
            }
        }
    }

    #[test]
    fn test_wifi_zones_fixed_across_profiles() {
        let registry = ProfileRegistry::new();
        for profile in registry.iter().filter(|p| p.id != ProfileId::NoStorage) {
            assert_eq!(profile.mapping(SettingId::WifiSsid), &[Zone::Z3]);
            assert_eq!(profile.mapping(SettingId::WifiPassword), &[Zone::Z10]);
        }
    }

    #[test]
    fn test_identity_sources() {
        assert_eq!(
            ProfileId::MqttMutualTls.identity_source(),
            IdentitySource::Certificate
        );
        assert_eq!(
            ProfileId::IotHubX509.identity_source(),
            IdentitySource::Certificate
        );
        assert_eq!(
            ProfileId::DpsX509.identity_source(),
            IdentitySource::Certificate
        );
        assert_eq!(
            ProfileId::IotHubSas.identity_source(),
            IdentitySource::ConnectionString
        );
        assert_eq!(
            ProfileId::MqttUserPass.identity_source(),
            IdentitySource::Stored
        );
        assert_eq!(
            ProfileId::DpsGroupSas.identity_source(),
            IdentitySource::Stored
        );
    }

    #[test]
    fn test_custom_slot_resolution() {
        static CUSTOM: ProfileDefinition = ProfileDefinition {
            id: ProfileId::Custom,
            name: "Test Custom",
            description: "Custom profile for tests",
            mappings: [
                &[Zone::Z3],
                &[Zone::Z10],
                UNMAPPED,
                &[Zone::Z2],
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
                UNMAPPED,
            ],
        };

        let empty = ProfileRegistry::new();
        assert!(empty.resolve(ProfileId::Custom).is_none());
        assert!(empty.resolve(ProfileId::MqttUserPass).is_some());

        let with_custom = ProfileRegistry::with_custom(&CUSTOM);
        let resolved = with_custom.resolve(ProfileId::Custom).unwrap();
        assert_eq!(resolved.name, "Test Custom");
        assert_eq!(with_custom.iter().count(), 10);
    }
}

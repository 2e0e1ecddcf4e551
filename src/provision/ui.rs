//! Per-setting UI metadata
//!
//! One table drives both provisioning front ends: the CLI finds entries by
//! command name, the web form by form-field name. The table is complete
//! over all settings; availability under the active profile is checked at
//! dispatch time, not here.

use bitflags::bitflags;

use crate::config::profiles::SettingId;

bitflags! {
    /// Presentation hints for a setting
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UiFlags: u8 {
        /// Value spans lines (certificates, keys); CLI input arrives with
        /// `\n` escapes, the web form uses a textarea
        const MULTI_LINE = 1 << 0;
        /// Never echo the stored value back (passwords, keys)
        const SENSITIVE = 1 << 1;
    }
}

/// UI metadata for one setting
#[derive(Debug)]
pub struct SettingUi {
    pub id: SettingId,
    /// Short human-readable label
    pub label: &'static str,
    /// Serial CLI command that sets this value
    pub cli_command: &'static str,
    /// Web form field name
    pub web_form_name: &'static str,
    /// Input hint shown in the web form
    pub placeholder: &'static str,
    /// Pre-filled value, where a sensible default exists
    pub default_value: Option<&'static str>,
    pub flags: UiFlags,
}

/// Built-in UI table, indexed by `SettingId` discriminant
pub static SETTING_UI: [SettingUi; SettingId::COUNT] = [
    SettingUi {
        id: SettingId::WifiSsid,
        label: "WiFi SSID",
        cli_command: "set_wifissid",
        web_form_name: "SSID",
        placeholder: "WiFi network name",
        default_value: None,
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::WifiPassword,
        label: "WiFi password",
        cli_command: "set_wifipwd",
        web_form_name: "PASS",
        placeholder: "WiFi password",
        default_value: None,
        flags: UiFlags::SENSITIVE,
    },
    SettingUi {
        id: SettingId::BrokerUrl,
        label: "MQTT broker",
        cli_command: "set_broker",
        web_form_name: "BrokerURL",
        placeholder: "mqtt://broker.example.com:1883",
        default_value: None,
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::DeviceId,
        label: "Device ID",
        cli_command: "set_deviceid",
        web_form_name: "DeviceID",
        placeholder: "my-device-01",
        default_value: None,
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::DevicePassword,
        label: "Device password",
        cli_command: "set_devicepwd",
        web_form_name: "DevicePassword",
        placeholder: "Device password",
        default_value: None,
        flags: UiFlags::SENSITIVE,
    },
    SettingUi {
        id: SettingId::CaCert,
        label: "CA certificate",
        cli_command: "set_cacert",
        web_form_name: "CACert",
        placeholder: "PEM certificate",
        default_value: None,
        flags: UiFlags::MULTI_LINE,
    },
    SettingUi {
        id: SettingId::ClientCert,
        label: "Client certificate",
        cli_command: "set_clientcert",
        web_form_name: "ClientCert",
        placeholder: "PEM certificate",
        default_value: None,
        flags: UiFlags::MULTI_LINE,
    },
    SettingUi {
        id: SettingId::ClientKey,
        label: "Client private key",
        cli_command: "set_clientkey",
        web_form_name: "ClientKey",
        placeholder: "PEM private key",
        default_value: None,
        flags: UiFlags::MULTI_LINE.union(UiFlags::SENSITIVE),
    },
    SettingUi {
        id: SettingId::ConnectionString,
        label: "IoT Hub connection string",
        cli_command: "set_connstring",
        web_form_name: "ConnectionString",
        placeholder: "HostName=...;DeviceId=...;SharedAccessKey=...",
        default_value: None,
        flags: UiFlags::SENSITIVE,
    },
    SettingUi {
        id: SettingId::DpsEndpoint,
        label: "DPS endpoint",
        cli_command: "set_dps_endpoint",
        web_form_name: "DPSEndpoint",
        placeholder: "DPS global endpoint",
        default_value: Some("global.azure-devices-provisioning.net"),
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::ScopeId,
        label: "DPS ID scope",
        cli_command: "set_scopeid",
        web_form_name: "ScopeId",
        placeholder: "0ne00000000",
        default_value: None,
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::RegistrationId,
        label: "DPS registration ID",
        cli_command: "set_regid",
        web_form_name: "RegistrationId",
        placeholder: "my-device-01",
        default_value: None,
        flags: UiFlags::empty(),
    },
    SettingUi {
        id: SettingId::SymmetricKey,
        label: "DPS symmetric key",
        cli_command: "set_symkey",
        web_form_name: "SymmetricKey",
        placeholder: "Base64 key",
        default_value: None,
        flags: UiFlags::SENSITIVE,
    },
    SettingUi {
        id: SettingId::DeviceCert,
        label: "Device certificate",
        cli_command: "set_devicecert",
        web_form_name: "DeviceCert",
        placeholder: "PEM certificate",
        default_value: None,
        flags: UiFlags::MULTI_LINE,
    },
];

/// Lookup view over the UI table
///
/// A custom profile may override individual entries (its own labels or
/// placeholders); overrides are consulted before the built-in table.
#[derive(Debug, Default)]
pub struct UiCatalog {
    overrides: &'static [SettingUi],
}

impl UiCatalog {
    /// Catalog with the built-in table only
    pub const fn new() -> Self {
        Self { overrides: &[] }
    }

    /// Catalog with per-setting overrides in front of the built-in table
    pub const fn with_overrides(overrides: &'static [SettingUi]) -> Self {
        Self { overrides }
    }

    /// Entry for a setting
    pub fn by_id(&self, id: SettingId) -> &'static SettingUi {
        self.overrides
            .iter()
            .find(|e| e.id == id)
            .unwrap_or(&SETTING_UI[id.index()])
    }

    /// Entry whose CLI command matches
    pub fn by_cli_command(&self, command: &str) -> Option<&'static SettingUi> {
        self.entry_where(|e| e.cli_command == command)
    }

    /// Entry whose web form field name matches
    pub fn by_form_name(&self, name: &str) -> Option<&'static SettingUi> {
        self.entry_where(|e| e.web_form_name == name)
    }

    /// Active entries in `SettingId` order
    pub fn iter(&self) -> impl Iterator<Item = &'static SettingUi> + '_ {
        SettingId::ALL.iter().map(move |&id| self.by_id(id))
    }

    fn entry_where(
        &self,
        pred: impl Fn(&&'static SettingUi) -> bool,
    ) -> Option<&'static SettingUi> {
        self.overrides
            .iter()
            .find(&pred)
            .or_else(|| SETTING_UI.iter().find(pred))
    }
}

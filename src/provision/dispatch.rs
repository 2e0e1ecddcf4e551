//! Command-to-save dispatch
//!
//! The common path behind both front ends: resolve the UI entry, check
//! availability, normalize the input, validate, save. The outcome enum is
//! everything a front end needs to render a response; no text is produced
//! here.

use heapless::String;

use crate::config::profiles::SettingId;
use crate::config::store::{ConfigError, ConfigStore};
use crate::config::zones::MAX_CLIENT_CERT_LEN;
use crate::log_info;
use crate::platform::traits::SecureStorage;

use super::ui::{SettingUi, UiCatalog, UiFlags};
use super::validator::{validate, ValidationError};

/// Bytes probed per setting when reporting status
pub const STATUS_PROBE_LEN: usize = 64;

/// Result of one set command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No UI entry matches the command or form field
    UnknownCommand,
    /// The setting exists but the active profile does not store it
    Unavailable,
    /// The value failed validation; nothing was written
    Invalid(ValidationError),
    /// Value written, `bytes` includes the terminator
    Saved { bytes: usize },
    /// Validation passed but the storage write failed
    SaveFailed(ConfigError),
}

/// Stored state of one setting, as shown by the status command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingStatus {
    /// Nothing stored (or the zone is unreadable)
    NotSet,
    /// A value is stored; sensitive values are never echoed
    Set,
    /// A multi-line value is stored; `preview` is its first line
    SetMultiLine { preview: String<STATUS_PROBE_LEN> },
}

/// Handle a CLI `set_*` command
///
/// CLI input is a single line, so multi-line values arrive with `\n`
/// escapes and are unescaped before validation.
pub fn set_from_cli<S: SecureStorage>(
    catalog: &UiCatalog,
    store: &ConfigStore,
    storage: &mut S,
    command: &str,
    raw_value: &str,
) -> DispatchOutcome {
    let entry = match catalog.by_cli_command(command) {
        Some(entry) => entry,
        None => return DispatchOutcome::UnknownCommand,
    };
    if entry.flags.contains(UiFlags::MULTI_LINE) {
        let value = unescape_newlines(raw_value);
        apply(store, storage, entry, &value)
    } else {
        apply(store, storage, entry, raw_value)
    }
}

/// Handle a web form field
///
/// Form values arrive with literal newlines; no unescaping.
pub fn set_from_form<S: SecureStorage>(
    catalog: &UiCatalog,
    store: &ConfigStore,
    storage: &mut S,
    form_name: &str,
    value: &str,
) -> DispatchOutcome {
    let entry = match catalog.by_form_name(form_name) {
        Some(entry) => entry,
        None => return DispatchOutcome::UnknownCommand,
    };
    apply(store, storage, entry, value)
}

fn apply<S: SecureStorage>(
    store: &ConfigStore,
    storage: &mut S,
    entry: &'static SettingUi,
    value: &str,
) -> DispatchOutcome {
    if !store.is_available(entry.id) {
        return DispatchOutcome::Unavailable;
    }
    if let Err(e) = validate(store, entry.id, value) {
        return DispatchOutcome::Invalid(e);
    }
    match store.save(storage, entry.id, value) {
        Ok(()) => {
            log_info!("{} saved, {} bytes", entry.label, value.len() + 1);
            DispatchOutcome::Saved {
                bytes: value.len() + 1,
            }
        }
        Err(e) => DispatchOutcome::SaveFailed(e),
    }
}

/// Convert `\n` escape sequences into newlines
///
/// A backslash before any other character is kept as-is. Output beyond the
/// largest storable value is dropped; the length check rejects such values
/// anyway.
pub fn unescape_newlines(raw: &str) -> String<MAX_CLIENT_CERT_LEN> {
    let mut out = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let mapped = if c == '\\' && chars.peek() == Some(&'n') {
            chars.next();
            '\n'
        } else {
            c
        };
        if out.push(mapped).is_err() {
            break;
        }
    }
    out
}

/// Status of every setting the active profile stores, in `SettingId` order
///
/// Reads only the first [`STATUS_PROBE_LEN`] bytes of each value; enough to
/// distinguish set from unset and to show the first line of a certificate.
pub fn status<S: SecureStorage>(
    catalog: &UiCatalog,
    store: &ConfigStore,
    storage: &mut S,
) -> heapless::Vec<(&'static str, SettingStatus), { SettingId::COUNT }> {
    let mut out = heapless::Vec::new();
    for entry in catalog.iter() {
        if !store.is_available(entry.id) {
            continue;
        }
        let mut probe = [0u8; STATUS_PROBE_LEN];
        let state = match store.read_str(storage, entry.id, &mut probe) {
            Ok("") | Err(_) => SettingStatus::NotSet,
            Ok(value) => {
                if entry.flags.contains(UiFlags::MULTI_LINE) {
                    let mut preview = String::new();
                    for c in value.lines().next().unwrap_or("").chars() {
                        if preview.push(c).is_err() {
                            break;
                        }
                    }
                    SettingStatus::SetMultiLine { preview }
                } else {
                    SettingStatus::Set
                }
            }
        };
        // One entry per setting, so the capacity always suffices
        let _ = out.push((entry.label, state));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profiles::ProfileId;
    use crate::platform::mock::MockSecureElement;

    const CA_PEM: &str = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----";

    fn store_with(profile: ProfileId) -> ConfigStore {
        let mut store = ConfigStore::new();
        store.select_profile(profile).unwrap();
        store
    }

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines("a\\nb").as_str(), "a\nb");
        assert_eq!(unescape_newlines("no escapes").as_str(), "no escapes");
        assert_eq!(unescape_newlines("trailing\\").as_str(), "trailing\\");
        assert_eq!(unescape_newlines("\\t stays").as_str(), "\\t stays");
        assert_eq!(unescape_newlines("").as_str(), "");
    }

    #[test]
    fn test_cli_set_and_read_back() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();

        let outcome = set_from_cli(&catalog, &store, &mut element, "set_wifissid", "plant-net");
        assert_eq!(outcome, DispatchOutcome::Saved { bytes: 10 });

        let mut buf = [0u8; 120];
        let stored = store
            .read_str(&mut element, SettingId::WifiSsid, &mut buf)
            .unwrap();
        assert_eq!(stored, "plant-net");
    }

    #[test]
    fn test_cli_multi_line_unescape() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPassTls);
        let mut element = MockSecureElement::new();

        let escaped = "-----BEGIN CERTIFICATE-----\\nAAAA\\n-----END CERTIFICATE-----";
        let outcome = set_from_cli(&catalog, &store, &mut element, "set_cacert", escaped);
        assert!(matches!(outcome, DispatchOutcome::Saved { .. }));

        let mut buf = [0u8; 2640];
        let stored = store
            .read_str(&mut element, SettingId::CaCert, &mut buf)
            .unwrap();
        assert_eq!(stored, CA_PEM);
    }

    #[test]
    fn test_cli_error_outcomes() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();

        assert_eq!(
            set_from_cli(&catalog, &store, &mut element, "set_warp_drive", "x"),
            DispatchOutcome::UnknownCommand
        );
        assert_eq!(
            set_from_cli(&catalog, &store, &mut element, "set_cacert", CA_PEM),
            DispatchOutcome::Unavailable
        );
        assert_eq!(
            set_from_cli(&catalog, &store, &mut element, "set_wifissid", ""),
            DispatchOutcome::Invalid(ValidationError::Empty)
        );
    }

    #[test]
    fn test_cli_save_failure_reported() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPass);
        let mut element = MockSecureElement::new();
        element.fail_zone(3);

        let outcome = set_from_cli(&catalog, &store, &mut element, "set_wifissid", "net");
        assert!(matches!(outcome, DispatchOutcome::SaveFailed(_)));
    }

    #[test]
    fn test_form_set_keeps_literal_newlines() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPassTls);
        let mut element = MockSecureElement::new();

        let outcome = set_from_form(&catalog, &store, &mut element, "CACert", CA_PEM);
        assert!(matches!(outcome, DispatchOutcome::Saved { .. }));

        let mut buf = [0u8; 2640];
        let stored = store
            .read_str(&mut element, SettingId::CaCert, &mut buf)
            .unwrap();
        assert_eq!(stored, CA_PEM);

        assert_eq!(
            set_from_form(&catalog, &store, &mut element, "NoSuchField", "x"),
            DispatchOutcome::UnknownCommand
        );
    }

    #[test]
    fn test_status_reporting() {
        let catalog = UiCatalog::new();
        let store = store_with(ProfileId::MqttUserPassTls);
        let mut element = MockSecureElement::new();

        store.save(&mut element, SettingId::WifiSsid, "plant-net").unwrap();
        store.save(&mut element, SettingId::CaCert, CA_PEM).unwrap();

        let report = status(&catalog, &store, &mut element);
        // WifiSsid, WifiPassword, BrokerUrl, DeviceId, DevicePassword, CaCert
        assert_eq!(report.len(), 6);

        let by_label = |label: &str| {
            report
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, s)| s.clone())
                .unwrap()
        };
        assert_eq!(by_label("WiFi SSID"), SettingStatus::Set);
        assert_eq!(by_label("MQTT broker"), SettingStatus::NotSet);
        match by_label("CA certificate") {
            SettingStatus::SetMultiLine { preview } => {
                assert_eq!(preview.as_str(), "-----BEGIN CERTIFICATE-----")
            }
            other => panic!("unexpected status {:?}", other),
        }
    }
}

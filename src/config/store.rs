//! Configuration storage engine
//!
//! `ConfigStore` holds the active connection profile and implements the
//! save/read path between logical settings and secure-element zones,
//! including multi-zone spanning for oversized values. The secure element
//! itself is reached through the [`SecureStorage`] trait and is passed into
//! each operation, so the store carries no I/O handle of its own.
//!
//! Values are stored as NUL-terminated strings, so a setting's usable
//! character length is `max_len - 1`.
//!
//! There is no atomicity across zones: a write failure partway through a
//! spanned save leaves the earlier zones written. The store reports this as
//! [`ConfigError::PartialWrite`] and callers recover by re-saving.

use core::fmt;

use crate::log_warn;
use crate::platform::error::StorageError;
use crate::platform::traits::SecureStorage;

use super::profiles::{ProfileDefinition, ProfileId, ProfileRegistry, SettingId, ZoneMapping};
use super::zones::Zone;

/// Configuration-layer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No profile has been selected yet
    NoActiveProfile,
    /// The requested profile is not registered
    UnknownProfile,
    /// The setting is not mapped in the active profile
    SettingUnavailable,
    /// Value plus terminator exceeds the mapped capacity
    ValueTooLong {
        /// Value length in bytes, excluding the terminator
        len: usize,
        /// Total mapped capacity, including the terminator slot
        max: usize,
    },
    /// Read buffer was empty
    EmptyBuffer,
    /// The first zone write or a read failed; nothing was changed
    Storage(StorageError),
    /// A zone write failed mid-sequence; earlier zones hold the first
    /// `written` bytes of the new value while later zones keep stale data.
    /// Not rolled back; re-save to restore consistency.
    PartialWrite {
        /// Bytes committed before the failure
        written: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoActiveProfile => write!(f, "no active profile"),
            ConfigError::UnknownProfile => write!(f, "profile not registered"),
            ConfigError::SettingUnavailable => {
                write!(f, "setting not available in the active profile")
            }
            ConfigError::ValueTooLong { len, max } => {
                write!(f, "value of {} bytes exceeds capacity of {}", len, max)
            }
            ConfigError::EmptyBuffer => write!(f, "read buffer is empty"),
            ConfigError::Storage(e) => write!(f, "storage error: {}", e),
            ConfigError::PartialWrite { written } => {
                write!(f, "write failed after {} bytes; state inconsistent", written)
            }
        }
    }
}

/// Storage engine bound to one profile registry
///
/// All state lives in this object; create one per secure element. `save` and
/// `read` borrow the storage handle mutably, which keeps configuration
/// activity single-writer by construction.
#[derive(Debug, Default)]
pub struct ConfigStore {
    registry: ProfileRegistry,
    active: Option<&'static ProfileDefinition>,
}

impl ConfigStore {
    /// Store with the built-in profiles only
    pub const fn new() -> Self {
        Self {
            registry: ProfileRegistry::new(),
            active: None,
        }
    }

    /// Store with a caller-supplied profile in the `Custom` slot
    pub const fn with_custom_profile(custom: &'static ProfileDefinition) -> Self {
        Self {
            registry: ProfileRegistry::with_custom(custom),
            active: None,
        }
    }

    /// Select the active profile
    ///
    /// Leaves the active profile unchanged on error. Switching profiles does
    /// not invalidate previously loaded [`DeviceSettings`]; re-run the
    /// loader afterwards.
    ///
    /// [`DeviceSettings`]: super::loader::DeviceSettings
    pub fn select_profile(&mut self, id: ProfileId) -> Result<(), ConfigError> {
        let definition = self
            .registry
            .resolve(id)
            .ok_or(ConfigError::UnknownProfile)?;
        self.active = Some(definition);
        crate::log_info!("active profile: {}", definition.name);
        Ok(())
    }

    /// Identifier of the active profile, `None` before the first selection
    pub fn active_profile(&self) -> Option<ProfileId> {
        self.active.map(|p| p.id)
    }

    /// Name of the active profile, `"Unknown"` when inactive
    pub fn profile_name(&self) -> &'static str {
        self.active.map(|p| p.name).unwrap_or("Unknown")
    }

    /// Whether the active profile stores this setting
    pub fn is_available(&self, setting: SettingId) -> bool {
        self.mapping(setting).is_ok()
    }

    /// Total mapped capacity in bytes, including the terminator slot
    ///
    /// `None` when unavailable. The longest storable value is
    /// `max_len(setting) - 1` characters.
    pub fn max_len(&self, setting: SettingId) -> Option<usize> {
        self.mapping(setting).ok().map(mapping_capacity)
    }

    /// Save a setting value
    ///
    /// Writes the value's bytes plus a NUL terminator across the mapped
    /// zones in declared order, filling each zone to capacity before
    /// spilling into the next. Availability and capacity are checked before
    /// any zone is touched.
    pub fn save<S: SecureStorage>(
        &self,
        storage: &mut S,
        setting: SettingId,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mapping = self.mapping(setting)?;
        let bytes = value.as_bytes();
        let total = bytes.len() + 1;
        let max = mapping_capacity(mapping);

        if total > max {
            return Err(ConfigError::ValueTooLong {
                len: bytes.len(),
                max,
            });
        }

        let mut written = 0usize;
        for &zone in mapping {
            if written == total {
                break;
            }
            let take = (total - written).min(zone.capacity());
            let end = written + take;

            let result = if end <= bytes.len() {
                storage.write_zone(zone.index(), &bytes[written..end])
            } else {
                // Final chunk: append the NUL terminator after the value tail
                let mut scratch = [0u8; Zone::MAX_CAPACITY];
                let tail = &bytes[written..];
                scratch[..tail.len()].copy_from_slice(tail);
                storage.write_zone(zone.index(), &scratch[..take])
            };

            match result {
                Ok(()) => written += take,
                Err(e) if written == 0 => return Err(ConfigError::Storage(e)),
                Err(_) => {
                    log_warn!("zone {} write failed after {} bytes", zone.index(), written);
                    return Err(ConfigError::PartialWrite { written });
                }
            }
        }

        // The greedy split must consume exactly the checked length; anything
        // else means the mapping table and the capacity sum disagree.
        debug_assert_eq!(written, total);
        Ok(())
    }

    /// Read a setting value into `buf`
    ///
    /// Reads the mapped zones in order until either the mapping or `buf` is
    /// exhausted, then force-terminates the final byte of `buf` so the
    /// result is a valid NUL-terminated string no matter what the zones
    /// held. Truncation by a short buffer is silent; size `buf` to at least
    /// [`max_len`](Self::max_len) to read a complete value. Returns the
    /// number of bytes read.
    pub fn read<S: SecureStorage>(
        &self,
        storage: &mut S,
        setting: SettingId,
        buf: &mut [u8],
    ) -> Result<usize, ConfigError> {
        let mapping = self.mapping(setting)?;
        if buf.is_empty() {
            return Err(ConfigError::EmptyBuffer);
        }

        let mut filled = 0usize;
        for &zone in mapping {
            if filled == buf.len() {
                break;
            }
            let take = (buf.len() - filled).min(zone.capacity());
            let n = storage
                .read_zone(zone.index(), 0, &mut buf[filled..filled + take])
                .map_err(ConfigError::Storage)?;
            filled += n;
        }

        buf[buf.len() - 1] = 0;
        Ok(filled)
    }

    /// Read a setting as a string slice
    ///
    /// Convenience over [`read`](Self::read): the returned slice ends at the
    /// stored terminator. Non-UTF-8 zone contents degrade to an empty
    /// string.
    pub fn read_str<'a, S: SecureStorage>(
        &self,
        storage: &mut S,
        setting: SettingId,
        buf: &'a mut [u8],
    ) -> Result<&'a str, ConfigError> {
        let filled = self.read(storage, setting, buf)?;
        let end = buf[..filled].iter().position(|&b| b == 0).unwrap_or(filled);
        Ok(core::str::from_utf8(&buf[..end]).unwrap_or(""))
    }

    fn mapping(&self, setting: SettingId) -> Result<ZoneMapping, ConfigError> {
        let profile = self.active.ok_or(ConfigError::NoActiveProfile)?;
        let mapping = profile.mapping(setting);
        if mapping.is_empty() {
            return Err(ConfigError::SettingUnavailable);
        }
        Ok(mapping)
    }
}

/// Sum of the mapped zones' capacities
fn mapping_capacity(mapping: ZoneMapping) -> usize {
    mapping.iter().map(|z| z.capacity()).sum()
}

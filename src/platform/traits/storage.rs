//! Secure-element storage trait
//!
//! This module defines the zone-level read/write primitive the configuration
//! store is built on. The secure element exposes a small set of fixed-size
//! data zones addressed by index; anything above that (profiles, spanning,
//! string termination) is the store's business, not the driver's.

use crate::platform::error::StorageError;

/// Zone-level storage interface
///
/// # Safety Invariants
///
/// - One call addresses exactly one zone.
/// - A call is atomic per zone: on error, the zone contents are unchanged.
/// - Only one owner per secure-element handle; no concurrent access.
pub trait SecureStorage {
    /// Write `data` to the beginning of a zone
    ///
    /// # Arguments
    ///
    /// * `zone_index` - Hardware zone index
    /// * `data` - Bytes to write, at most the zone capacity
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidZone` for an unknown index,
    /// `StorageError::OutOfRange` when `data` exceeds the zone capacity, or
    /// `StorageError::Io` when the device reports a failure.
    fn write_zone(&mut self, zone_index: u8, data: &[u8]) -> Result<(), StorageError>;

    /// Read bytes from a zone starting at `offset`
    ///
    /// Fills `buf` from the zone contents and returns the number of bytes
    /// read, which is `buf.len()` unless the request reaches the end of the
    /// zone.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidZone` for an unknown index,
    /// `StorageError::OutOfRange` when `offset` lies beyond the zone, or
    /// `StorageError::Io` when the device reports a failure.
    fn read_zone(
        &mut self,
        zone_index: u8,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;
}

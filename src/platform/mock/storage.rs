//! In-memory secure element with fault injection
//!
//! Implements [`SecureStorage`] over plain arrays sized from the zone
//! catalog, so store and loader logic can run as ordinary host tests. Fault
//! injection covers the two failure shapes the storage engine must handle:
//! a single permanently broken zone and a budget of writes after which every
//! write fails (a mid-sequence failure during a spanned save).

use crate::config::zones::Zone;
use crate::platform::error::StorageError;
use crate::platform::traits::SecureStorage;

/// Mock secure element backed by host memory
#[derive(Debug)]
pub struct MockSecureElement {
    zones: [[u8; Zone::MAX_CAPACITY]; Zone::ALL.len()],
    failing: [bool; Zone::ALL.len()],
    writes_remaining: Option<usize>,
}

impl MockSecureElement {
    /// Fresh element with all zones zeroed
    pub fn new() -> Self {
        Self {
            zones: [[0u8; Zone::MAX_CAPACITY]; Zone::ALL.len()],
            failing: [false; Zone::ALL.len()],
            writes_remaining: None,
        }
    }

    /// Make every access to the given zone fail
    ///
    /// # Panics
    ///
    /// Panics if `zone_index` is not in the zone catalog.
    pub fn fail_zone(&mut self, zone_index: u8) {
        self.failing[Self::slot(zone_index).unwrap()] = true;
    }

    /// Allow `n` more successful writes, then fail all writes
    pub fn fail_after(&mut self, n: usize) {
        self.writes_remaining = Some(n);
    }

    /// Raw contents of a zone, for layout assertions
    ///
    /// # Panics
    ///
    /// Panics if `zone_index` is not in the zone catalog.
    pub fn zone_contents(&self, zone_index: u8) -> &[u8] {
        let slot = Self::slot(zone_index).unwrap();
        &self.zones[slot][..Zone::ALL[slot].capacity()]
    }

    /// Preload a zone, simulating data written by earlier firmware
    ///
    /// # Panics
    ///
    /// Panics if `zone_index` is not in the catalog or `data` exceeds the
    /// zone capacity.
    pub fn preload_zone(&mut self, zone_index: u8, data: &[u8]) {
        let slot = Self::slot(zone_index).unwrap();
        assert!(data.len() <= Zone::ALL[slot].capacity());
        self.zones[slot][..data.len()].copy_from_slice(data);
    }

    fn slot(zone_index: u8) -> Option<usize> {
        Zone::ALL.iter().position(|z| z.index() == zone_index)
    }
}

impl Default for MockSecureElement {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureStorage for MockSecureElement {
    fn write_zone(&mut self, zone_index: u8, data: &[u8]) -> Result<(), StorageError> {
        let slot = Self::slot(zone_index).ok_or(StorageError::InvalidZone)?;
        if data.len() > Zone::ALL[slot].capacity() {
            return Err(StorageError::OutOfRange);
        }
        if self.failing[slot] {
            return Err(StorageError::Io);
        }
        if let Some(remaining) = self.writes_remaining.as_mut() {
            if *remaining == 0 {
                return Err(StorageError::Io);
            }
            *remaining -= 1;
        }
        self.zones[slot][..data.len()].copy_from_slice(data);
        Ok(())
    }

    fn read_zone(
        &mut self,
        zone_index: u8,
        offset: usize,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let slot = Self::slot(zone_index).ok_or(StorageError::InvalidZone)?;
        let capacity = Zone::ALL[slot].capacity();
        if offset + buf.len() > capacity {
            return Err(StorageError::OutOfRange);
        }
        if self.failing[slot] {
            return Err(StorageError::Io);
        }
        buf.copy_from_slice(&self.zones[slot][offset..offset + buf.len()]);
        Ok(buf.len())
    }
}

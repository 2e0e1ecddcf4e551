#![cfg_attr(not(test), no_std)]

//! az3166-config - Device-configuration storage for the AZ3166 IoT DevKit
//!
//! This library maps the board's logical configuration settings (WiFi
//! credentials, broker address, TLS certificates and keys, Azure IoT Hub/DPS
//! identities) onto the fixed-size data zones of the on-board secure element.
//! Each supported connection profile declares its own zone layout; oversized
//! values span multiple zones. A one-pass loader reads everything into
//! fixed-capacity runtime buffers and derives secondary values (broker
//! host/port, device identity).

// Platform abstraction layer (secure-element primitive, certificate parser)
pub mod platform;

// Zone catalog, connection profiles, storage engine, settings loader
pub mod config;

// Provisioning surface: per-setting UI metadata, validation, dispatch
pub mod provision;

// Logging macros (defmt on device, println! in host tests)
pub mod logging;

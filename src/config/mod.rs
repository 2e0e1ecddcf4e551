//! Device-configuration core
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │      CLI / web provisioning UI          │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │           ConfigStore                   │
//! │  - active connection profile            │
//! │  - per-setting zone mappings            │
//! │  - multi-zone split / reassembly        │
//! └──────────────┬─────────────────────────┘
//!                │
//!                ▼
//! ┌────────────────────────────────────────┐
//! │     Secure element (zones 0..10)        │
//! └────────────────────────────────────────┘
//! ```
//!
//! `DeviceSettings` sits beside the store: one `load_all` call pulls every
//! available setting into fixed-capacity buffers and derives the broker
//! host/port and the device identity.

pub mod loader;
pub mod profiles;
pub mod store;
pub mod zones;

pub use loader::{DeviceSettings, LoadError, SettingSet};
pub use profiles::{IdentitySource, ProfileDefinition, ProfileId, SettingId, ZoneMapping};
pub use store::{ConfigError, ConfigStore};
pub use zones::Zone;

//! Provisioning front end
//!
//! Shared plumbing behind the serial configuration CLI and the AP-mode web
//! form: per-setting UI metadata, format validation, and the
//! command-to-save dispatch path. Rendering (UART output, HTML) lives with
//! the respective front end, not here.

pub mod dispatch;
pub mod ui;
pub mod validator;

pub use dispatch::{set_from_cli, set_from_form, status, DispatchOutcome, SettingStatus};
pub use ui::{SettingUi, UiCatalog, UiFlags};
pub use validator::{validate, ValidationError};

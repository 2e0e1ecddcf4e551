//! Mock platform implementations for host-side testing

pub mod storage;

pub use storage::MockSecureElement;

//! `kiosk-auth`: the kiosk's access boundary.
//!
//! This crate is intentionally decoupled from the bridge and from storage: a
//! two-state [`Mode`] and a PIN [`AccessGate`] that flips it.

pub mod gate;
pub mod mode;

pub use gate::{AccessGate, AuthzError, require_admin};
pub use mode::Mode;

use thiserror::Error;

use crate::mode::Mode;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("incorrect PIN")]
    InvalidPin,

    #[error("forbidden: '{0}' requires admin mode")]
    Forbidden(String),
}

/// Compares a submitted PIN against the configured one and switches modes.
///
/// Not a security boundary: the PIN only keeps customers out of the edit
/// panel on a shared kiosk.
#[derive(Clone)]
pub struct AccessGate {
    pin: String,
}

impl AccessGate {
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// Switch to admin mode if `submitted` matches. A wrong PIN leaves the mode alone.
    pub fn enter_admin(&self, mode: &mut Mode, submitted: &str) -> Result<(), AuthzError> {
        if !pins_match(&self.pin, submitted) {
            tracing::warn!("admin login rejected: incorrect PIN");
            return Err(AuthzError::InvalidPin);
        }

        if !mode.is_admin() {
            tracing::info!("entering admin mode");
        }
        *mode = Mode::Admin;
        Ok(())
    }

    pub fn exit_admin(&self, mode: &mut Mode) {
        if mode.is_admin() {
            tracing::info!("leaving admin mode");
        }
        *mode = Mode::Customer;
    }
}

// Never print the PIN itself.
impl core::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccessGate").field("pin", &"<redacted>").finish()
    }
}

/// Check that `action` may run in `mode`.
pub fn require_admin(mode: Mode, action: &str) -> Result<(), AuthzError> {
    if mode.is_admin() {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(action.to_string()))
    }
}

/// Length check first, then compare every byte (no early exit on the first mismatch).
fn pins_match(expected: &str, submitted: &str) -> bool {
    let (a, b) = (expected.as_bytes(), submitted.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_pin_enters_admin_mode() {
        let gate = AccessGate::new("1234");
        let mut mode = Mode::Customer;

        gate.enter_admin(&mut mode, "1234").unwrap();
        assert_eq!(mode, Mode::Admin);
    }

    #[test]
    fn wrong_pin_keeps_customer_mode() {
        let gate = AccessGate::new("1234");
        let mut mode = Mode::Customer;

        for attempt in ["", "123", "12345", "4321"] {
            assert_eq!(gate.enter_admin(&mut mode, attempt), Err(AuthzError::InvalidPin));
            assert_eq!(mode, Mode::Customer);
        }
    }

    #[test]
    fn exit_returns_to_customer_mode() {
        let gate = AccessGate::new("0000");
        let mut mode = Mode::Admin;
        gate.exit_admin(&mut mode);
        assert_eq!(mode, Mode::Customer);
    }

    #[test]
    fn require_admin_names_the_action() {
        assert!(require_admin(Mode::Admin, "delete_item").is_ok());
        assert_eq!(
            require_admin(Mode::Customer, "delete_item"),
            Err(AuthzError::Forbidden("delete_item".to_string()))
        );
    }

    #[test]
    fn debug_output_redacts_pin() {
        let gate = AccessGate::new("9876");
        assert!(!format!("{gate:?}").contains("9876"));
    }

    #[test]
    fn mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Admin).unwrap(), r#""admin""#);
    }
}

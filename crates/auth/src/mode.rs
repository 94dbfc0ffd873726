use serde::{Deserialize, Serialize};

/// Who is operating the kiosk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Browsing the menu and building a cart.
    #[default]
    Customer,
    /// Managing catalog items.
    Admin,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Customer => "customer",
            Mode::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Mode::Admin)
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Process configuration, read from the environment.

use std::path::PathBuf;

use anyhow::Context;

use kiosk_cart::TaxRate;

/// PIN used when `KIOSK_ADMIN_PIN` is unset. Only fit for demos.
pub const DEFAULT_ADMIN_PIN: &str = "1234";

/// How many specials the menu view shows.
pub const DEFAULT_SPECIALS_LIMIT: usize = 5;

#[derive(Clone, PartialEq, Eq)]
pub struct KioskConfig {
    pub admin_pin: String,
    pub tax_rate: TaxRate,
    pub specials_limit: usize,
    /// Optional JSON seed menu (array of item drafts).
    pub menu_path: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            admin_pin: DEFAULT_ADMIN_PIN.to_string(),
            tax_rate: TaxRate::STANDARD,
            specials_limit: DEFAULT_SPECIALS_LIMIT,
            menu_path: None,
        }
    }
}

impl core::fmt::Debug for KioskConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KioskConfig")
            .field("admin_pin", &"<redacted>")
            .field("tax_rate", &self.tax_rate)
            .field("specials_limit", &self.specials_limit)
            .field("menu_path", &self.menu_path)
            .finish()
    }
}

impl KioskConfig {
    /// Read `KIOSK_*` variables from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        match lookup("KIOSK_ADMIN_PIN") {
            Some(pin) if !pin.is_empty() => config.admin_pin = pin,
            _ => tracing::warn!("KIOSK_ADMIN_PIN not set; using insecure dev default"),
        }

        if let Some(raw) = lookup("KIOSK_TAX_RATE_BPS") {
            let bps: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("KIOSK_TAX_RATE_BPS must be an integer, got {raw:?}"))?;
            config.tax_rate = TaxRate::from_basis_points(bps);
        }

        if let Some(raw) = lookup("KIOSK_SPECIALS_LIMIT") {
            config.specials_limit = raw
                .trim()
                .parse()
                .with_context(|| format!("KIOSK_SPECIALS_LIMIT must be an integer, got {raw:?}"))?;
        }

        config.menu_path = lookup("KIOSK_MENU_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = KioskConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, KioskConfig::default());
        assert_eq!(config.tax_rate.basis_points(), 1_000);
        assert_eq!(config.specials_limit, 5);
    }

    #[test]
    fn reads_every_variable() {
        let config = KioskConfig::from_lookup(lookup(&[
            ("KIOSK_ADMIN_PIN", "8642"),
            ("KIOSK_TAX_RATE_BPS", " 825 "),
            ("KIOSK_SPECIALS_LIMIT", "3"),
            ("KIOSK_MENU_PATH", "/etc/kiosk/menu.json"),
        ]))
        .unwrap();

        assert_eq!(config.admin_pin, "8642");
        assert_eq!(config.tax_rate, TaxRate::from_basis_points(825));
        assert_eq!(config.specials_limit, 3);
        assert_eq!(config.menu_path, Some(PathBuf::from("/etc/kiosk/menu.json")));
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = KioskConfig::from_lookup(lookup(&[("KIOSK_TAX_RATE_BPS", "ten")])).unwrap_err();
        assert!(err.to_string().contains("KIOSK_TAX_RATE_BPS"));

        let err = KioskConfig::from_lookup(lookup(&[("KIOSK_SPECIALS_LIMIT", "-1")])).unwrap_err();
        assert!(err.to_string().contains("KIOSK_SPECIALS_LIMIT"));
    }

    #[test]
    fn debug_redacts_pin() {
        let config = KioskConfig {
            admin_pin: "5555".to_string(),
            ..KioskConfig::default()
        };
        assert!(!format!("{config:?}").contains("5555"));
    }
}

//! Trade (métier) allow-list.
//!
//! Trades are an open set: the deployment configures which codes are accepted,
//! and every write or filter on `metier` is checked against that list.

use serde::{Deserialize, Serialize};

/// Longest trade code the `artisans.metier` column stores.
pub const METIER_MAX: usize = 100;

/// A configured trade: stable machine `code` plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub code: String,
    pub libelle: String,
}

impl Trade {
    pub fn new(code: impl Into<String>, libelle: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            libelle: libelle.into(),
        }
    }
}

pub fn default_trades() -> Vec<Trade> {
    vec![
        Trade::new("plombier", "Plombier"),
        Trade::new("electricien", "Électricien"),
        Trade::new("macon", "Maçon"),
        Trade::new("couturier", "Couturier"),
        Trade::new("menuisier", "Menuisier"),
        Trade::new("photographe", "Photographe"),
    ]
}

#[derive(Debug, Clone)]
pub struct TradeCatalog {
    trades: Vec<Trade>,
}

impl TradeCatalog {
    /// Builds a catalog, dropping blank, duplicate (first one wins) and
    /// overlong codes.
    pub fn new(trades: Vec<Trade>) -> Self {
        let mut kept: Vec<Trade> = Vec::with_capacity(trades.len());
        for trade in trades {
            let code = trade.code.trim();
            if code.is_empty() || kept.iter().any(|t| t.code == code) {
                continue;
            }
            if code.chars().count() > METIER_MAX {
                tracing::warn!(
                    "Ignoring trade code longer than {} characters: {}",
                    METIER_MAX,
                    code
                );
                continue;
            }
            kept.push(Trade::new(code, trade.libelle));
        }
        Self { trades: kept }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.trades.iter().any(|t| t.code == code)
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

}

impl Default for TradeCatalog {
    fn default() -> Self {
        Self::new(default_trades())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(catalog: &TradeCatalog) -> Vec<&str> {
        catalog.trades().iter().map(|t| t.code.as_str()).collect()
    }

    #[test]
    fn default_catalog_has_source_trades() {
        let catalog = TradeCatalog::default();
        assert_eq!(
            codes(&catalog),
            vec!["plombier", "electricien", "macon", "couturier", "menuisier", "photographe"]
        );
        assert!(catalog.contains("macon"));
        assert!(!catalog.contains("Macon"));
        assert!(!catalog.contains("astronaute"));
    }

    #[test]
    fn catalog_drops_blank_and_duplicate_codes() {
        let catalog = TradeCatalog::new(vec![
            Trade::new(" coiffeur ", "Coiffeur"),
            Trade::new("", "Vide"),
            Trade::new("coiffeur", "Doublon"),
            Trade::new("soudeur", "Soudeur"),
        ]);

        assert_eq!(codes(&catalog), vec!["coiffeur", "soudeur"]);
        assert_eq!(catalog.trades()[0].libelle, "Coiffeur");
    }

    #[test]
    fn catalog_keeps_long_codes_up_to_column_width() {
        let at_limit = "p".repeat(METIER_MAX);
        let catalog = TradeCatalog::new(vec![
            Trade::new("photographe-evenementiel", "Photographe événementiel"),
            Trade::new(at_limit.clone(), "Limite"),
            Trade::new("p".repeat(METIER_MAX + 1), "Trop long"),
        ]);

        assert!(catalog.contains("photographe-evenementiel"));
        assert!(catalog.contains(&at_limit));
        assert_eq!(catalog.trades().len(), 2);
    }
}

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Payment type code asking EBANX to let the customer pick any method.
pub const ALL_METHODS: &str = "_all";
/// The EBANX wallet; never offered through payment links.
pub const EBANX_ACCOUNT: &str = "ebanx-account";

pub const COUNTRY_BRAZIL: &str = "br";
pub const COUNTRY_MEXICO: &str = "mx";
pub const COUNTRY_PERU: &str = "pe";
pub const COUNTRY_COLOMBIA: &str = "co";
pub const COUNTRY_CHILE: &str = "cl";

/// Currencies accepted for any supported country.
pub const GLOBAL_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// What EBANX supports: countries, their local currencies, and the gateways
/// available for payment links.
///
/// All country keys are lowercase two-letter codes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Catalog {
    pub countries: BTreeSet<String>,
    pub local_currencies: BTreeMap<String, String>,
    pub payment_type_codes: BTreeMap<String, String>,
    pub gateways_by_country: BTreeMap<String, Vec<String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        let countries = [
            COUNTRY_BRAZIL,
            COUNTRY_MEXICO,
            COUNTRY_PERU,
            COUNTRY_COLOMBIA,
            COUNTRY_CHILE,
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let local_currencies = [
            (COUNTRY_BRAZIL, "BRL"),
            (COUNTRY_MEXICO, "MXN"),
            (COUNTRY_PERU, "PEN"),
            (COUNTRY_COLOMBIA, "COP"),
            (COUNTRY_CHILE, "CLP"),
        ];

        let payment_type_codes = [
            ("ebanx-banking-ticket", "boleto"),
            ("ebanx-credit-card-br", "_creditcard"),
            ("ebanx-credit-card-mx", "_creditcard"),
            ("ebanx-debit-card", "debitcard"),
            ("ebanx-oxxo", "oxxo"),
            ("ebanx-sencillito", "sencillito"),
            ("ebanx-servipag", "servipag"),
            ("ebanx-tef", "_tef"),
            ("ebanx-pagoefectivo", "pagoefectivo"),
            ("ebanx-safetypay", "_safetypay"),
            ("ebanx-eft", "eft"),
            (EBANX_ACCOUNT, "ebanxaccount"),
        ];

        let gateways_by_country = [
            (
                COUNTRY_BRAZIL,
                vec![
                    "ebanx-banking-ticket",
                    "ebanx-credit-card-br",
                    "ebanx-tef",
                    EBANX_ACCOUNT,
                ],
            ),
            (
                COUNTRY_MEXICO,
                vec!["ebanx-credit-card-mx", "ebanx-debit-card", "ebanx-oxxo"],
            ),
            (COUNTRY_CHILE, vec!["ebanx-sencillito", "ebanx-servipag"]),
            (COUNTRY_COLOMBIA, vec!["ebanx-eft"]),
            (COUNTRY_PERU, vec!["ebanx-safetypay", "ebanx-pagoefectivo"]),
        ];

        Self {
            countries,
            local_currencies: local_currencies
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            payment_type_codes: payment_type_codes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            gateways_by_country: gateways_by_country
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
                .collect(),
        }
    }
}

impl Catalog {
    pub fn supports_country(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    pub fn local_currency(&self, country: &str) -> Option<&str> {
        self.local_currencies.get(country).map(String::as_str)
    }

    /// Whether `currency` can be charged to customers billed in `country`.
    pub fn accepts_currency(&self, country: &str, currency: &str) -> bool {
        GLOBAL_CURRENCIES.contains(&currency) || self.local_currency(country) == Some(currency)
    }

    pub fn payment_type_code(&self, gateway: &str) -> Option<&str> {
        self.payment_type_codes.get(gateway).map(String::as_str)
    }

    /// `None` when the country places no restriction on gateways.
    pub fn allowed_gateways(&self, country: &str) -> Option<&[String]> {
        self.gateways_by_country.get(country).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_currencies() {
        let catalog = Catalog::default();
        assert!(catalog.accepts_currency("br", "BRL"));
        assert!(catalog.accepts_currency("br", "USD"));
        assert!(catalog.accepts_currency("mx", "EUR"));
        assert!(!catalog.accepts_currency("mx", "BRL"));
        assert!(!catalog.accepts_currency("us", "BRL"));
    }

    #[test]
    fn test_default_catalog_gateways() {
        let catalog = Catalog::default();
        assert_eq!(catalog.payment_type_code("ebanx-oxxo"), Some("oxxo"));
        assert_eq!(catalog.payment_type_code("paypal"), None);

        let peru = catalog.allowed_gateways("pe").unwrap();
        assert!(peru.iter().any(|g| g == "ebanx-pagoefectivo"));
        assert!(catalog.allowed_gateways("us").is_none());
    }
}

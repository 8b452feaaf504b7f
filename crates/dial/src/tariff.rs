use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct CurrencyCode(String);

crate::impl_string_newtype!(CurrencyCode);

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("KR")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeBudgets {
    pub internet_hours: u32,
    pub music_hours: u32,
    pub video_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{amount} {currency}")]
pub struct Price {
    pub amount: u32,
    pub currency: CurrencyCode,
}

/// Linear pricing and usage estimates for a data volume.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tariff {
    pub internet_hours_per_unit: f64,
    pub music_hours_per_unit: f64,
    pub video_hours_per_unit: f64,
    pub base_price: f64,
    pub price_per_unit: f64,
    pub currency: CurrencyCode,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            internet_hours_per_unit: 6.0,
            music_hours_per_unit: 3.0,
            video_hours_per_unit: 1.0,
            base_price: 10.0,
            price_per_unit: 7.0,
            currency: CurrencyCode::default(),
        }
    }
}

impl Tariff {
    pub fn budgets(&self, quantity: f64) -> TimeBudgets {
        TimeBudgets {
            internet_hours: whole(self.internet_hours_per_unit * quantity),
            music_hours: whole(self.music_hours_per_unit * quantity),
            video_hours: whole(self.video_hours_per_unit * quantity),
        }
    }

    pub fn price(&self, quantity: f64) -> Price {
        Price {
            amount: whole(self.base_price + self.price_per_unit * quantity),
            currency: self.currency.clone(),
        }
    }
}

// Saturates at zero; negative inputs only come from a misconfigured tariff.
fn whole(value: f64) -> u32 {
    value.floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields_for_fractional_quantity() {
        let tariff = Tariff::default();

        assert_eq!(
            tariff.budgets(5.2),
            TimeBudgets {
                internet_hours: 31,
                music_hours: 15,
                video_hours: 5,
            }
        );
        let price = tariff.price(5.2);
        assert_eq!(price.amount, 46);
        assert_eq!(price.to_string(), "46 KR");
    }

    #[test]
    fn test_derived_fields_at_presets() {
        let tariff = Tariff::default();

        assert_eq!(tariff.budgets(20.0).internet_hours, 120);
        assert_eq!(tariff.price(5.0).to_string(), "45 KR");
        assert_eq!(tariff.price(20.0).to_string(), "150 KR");
    }

    #[test]
    fn test_tariff_partial_override() {
        let tariff: Tariff =
            serde_json::from_str(r#"{ "price_per_unit": 9.5, "currency": "EUR" }"#).unwrap();

        assert_eq!(tariff.base_price, 10.0);
        assert_eq!(tariff.price(2.0).to_string(), "29 EUR");
    }
}

use crate::countries::{CountryCatalog, CountryCode};
use crate::geometry::DialStyle;
use crate::store::{PlanError, PlanProfile, PlanStore, ShortcutSet};
use crate::tariff::Tariff;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Vodafone,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    #[strum(
        to_string = "Data only",
        serialize = "DataOnly",
        serialize = "data-only",
        serialize = "data_only"
    )]
    DataOnly,
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct VolumeUnit(String);

crate::impl_string_newtype!(VolumeUnit);

impl Default for VolumeUnit {
    fn default() -> Self {
        Self::new("GB")
    }
}

/// Everything needed to build a plan store and draw its dial.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanConfig {
    pub shortcuts: Vec<f64>,
    pub unit: VolumeUnit,
    pub country: String,
    pub network: Network,
    pub plan_type: PlanType,
    pub tariff: Tariff,
    pub dial: DialStyle,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            shortcuts: vec![5.0, 10.0, 15.0, 20.0],
            unit: VolumeUnit::default(),
            country: "SE".to_string(),
            network: Network::default(),
            plan_type: PlanType::default(),
            tariff: Tariff::default(),
            dial: DialStyle::default(),
        }
    }
}

impl PlanConfig {
    pub fn shortcut_set(&self) -> Result<ShortcutSet, PlanError> {
        ShortcutSet::new(self.shortcuts.clone())
    }

    pub fn profile(&self, catalog: &CountryCatalog) -> Result<PlanProfile, PlanError> {
        let code: CountryCode = self.country.parse()?;
        Ok(PlanProfile {
            unit: self.unit.clone(),
            country: catalog.find(&code)?.clone(),
            network: self.network,
            plan_type: self.plan_type,
        })
    }

    pub fn build_store(&self, catalog: &CountryCatalog) -> Result<PlanStore, PlanError> {
        Ok(PlanStore::new(
            self.shortcut_set()?,
            self.tariff.clone(),
            self.profile(catalog)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::CountryError;

    #[test]
    fn test_plan_type_deserialization() {
        let cases = vec![
            ("\"DataOnly\"", PlanType::DataOnly),
            ("\"data-only\"", PlanType::DataOnly),
            ("\"DATA_ONLY\"", PlanType::DataOnly),
        ];

        for (json, expected) in cases {
            let deserialized: PlanType = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(PlanType::DataOnly.to_string(), "Data only");
    }

    #[test]
    fn test_network_deserialization() {
        let network: Network = serde_json::from_str("\"VODAFONE\"").unwrap();
        assert_eq!(network, Network::Vodafone);
        assert!(serde_json::from_str::<Network>("\"carrier-pigeon\"").is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlanConfig =
            serde_json::from_str(r#"{ "shortcuts": [1, 2, 3], "dial": { "stroke": 10 } }"#)
                .unwrap();

        assert_eq!(config.shortcuts, vec![1.0, 2.0, 3.0]);
        assert_eq!(config.unit.as_str(), "GB");
        assert_eq!(config.dial.stroke, 10.0);
        assert_eq!(config.dial.touch_stroke, 120.0);
        assert_eq!(config.tariff, Tariff::default());
    }

    #[test]
    fn test_build_store_from_defaults() {
        let catalog = CountryCatalog::builtin().unwrap();
        let store = PlanConfig::default().build_store(catalog).unwrap();

        let selection = store.snapshot();
        assert_eq!(selection.shortcuts.values(), &[5.0, 10.0, 15.0, 20.0]);
        assert_eq!(selection.country.name.as_str(), "Sweden");
        assert_eq!(selection.network, Network::Vodafone);
    }

    #[test]
    fn test_build_store_fails_fast() {
        let catalog = CountryCatalog::builtin().unwrap();

        let config = PlanConfig {
            shortcuts: vec![20.0, 10.0],
            ..PlanConfig::default()
        };
        assert!(matches!(
            config.build_store(catalog),
            Err(PlanError::NotAscending { .. })
        ));

        let config = PlanConfig {
            country: "Narnia".to_string(),
            ..PlanConfig::default()
        };
        assert!(matches!(
            config.build_store(catalog),
            Err(PlanError::Country(CountryError::InvalidCode(_)))
        ));

        let config = PlanConfig {
            country: "QQ".to_string(),
            ..PlanConfig::default()
        };
        assert!(matches!(
            config.build_store(catalog),
            Err(PlanError::Country(CountryError::UnknownCode(_)))
        ));
    }
}

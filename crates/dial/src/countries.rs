use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("countries.toml");
const REGIONAL_INDICATOR_A: u32 = 0x1F1E6;

#[derive(Error, Debug)]
pub enum CountryError {
    #[error("'{0}' is not a two-letter country code")]
    InvalidCode(String),
    #[error("No country with code {0}")]
    UnknownCode(CountryCode),
    #[error("Country catalog is empty")]
    EmptyCatalog,
    #[error("Country catalog error: {0}")]
    Catalog(#[from] config::ConfigError),
}

/// Upper-case ISO 3166-1 alpha-2 code.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, DeserializeFromStr, Display, Deref, AsRef,
)]
#[serde(into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Emoji flag built from the two regional indicator symbols of the code.
    pub fn flag(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| char::from_u32(REGIONAL_INDICATOR_A + (c as u32 - 'A' as u32)))
            .collect()
    }
}

impl FromStr for CountryCode {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(CountryError::InvalidCode(s.to_string()))
        }
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct CountryName(String);

crate::impl_string_newtype!(CountryName);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    pub code: CountryCode,
    pub name: CountryName,
}

impl Country {
    /// Flag followed by the name, as shown in pickers.
    pub fn label(&self) -> String {
        format!("{} {}", self.code.flag(), self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    countries: Vec<Country>,
}

/// All selectable countries, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    countries: Vec<Country>,
}

static BUILTIN: OnceLock<CountryCatalog> = OnceLock::new();

impl CountryCatalog {
    pub fn new(mut countries: Vec<Country>) -> Self {
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { countries }
    }

    pub fn parse_toml(source: &str) -> Result<Self, CountryError> {
        let file: CatalogFile = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        let catalog = Self::new(file.countries);
        if catalog.is_empty() {
            return Err(CountryError::EmptyCatalog);
        }
        Ok(catalog)
    }

    pub fn builtin() -> Result<&'static Self, CountryError> {
        if let Some(catalog) = BUILTIN.get() {
            return Ok(catalog);
        }
        let catalog = Self::parse_toml(BUILTIN_CATALOG)?;
        log::debug!("Loaded {} countries", catalog.len());
        Ok(BUILTIN.get_or_init(|| catalog))
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    pub fn find(&self, code: &CountryCode) -> Result<&Country, CountryError> {
        self.countries
            .iter()
            .find(|c| &c.code == code)
            .ok_or_else(|| CountryError::UnknownCode(code.clone()))
    }

    /// Every country for a blank query, otherwise case-insensitive name matches.
    pub fn search(&self, query: &str) -> Vec<Country> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.countries.clone();
        }
        self.countries
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}

/// Search-and-select state behind the country list.
#[derive(Debug, Clone)]
pub struct CountryPicker {
    catalog: CountryCatalog,
    search: String,
    results: Vec<Country>,
    selected: Country,
}

impl CountryPicker {
    pub fn new(catalog: CountryCatalog, selected: Country) -> Self {
        let results = catalog.search("");
        Self {
            catalog,
            search: String::new(),
            results,
            selected,
        }
    }

    pub fn results(&self) -> &[Country] {
        &self.results
    }

    pub fn selected(&self) -> &Country {
        &self.selected
    }

    pub fn is_selected(&self, country: &Country) -> bool {
        &self.selected == country
    }

    pub fn update_search(&mut self, text: &str) {
        if self.search == text {
            return;
        }
        self.search = text.to_string();
        self.results = self.catalog.search(text);
    }

    pub fn select(&mut self, code: &CountryCode) -> Result<Country, CountryError> {
        let country = self.catalog.find(code)?.clone();
        self.selected = country.clone();
        Ok(country)
    }
}

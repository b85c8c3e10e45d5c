use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::api::types::Endpoint;
use crate::core::geo::GeoCoord;

/// Country lookup used to place attack endpoints on the globe.
pub trait Geography {
    /// Representative coordinates of a country.
    fn locate(&self, code: &str) -> Option<GeoCoord>;

    /// Display name of a country.
    fn name(&self, code: &str) -> Option<&str>;

    /// Build a full endpoint for a country code, if it is known.
    fn endpoint(&self, code: &str) -> Option<Endpoint> {
        let coord = self.locate(code)?;
        let endpoint = Endpoint::new(code, coord.lat, coord.lng);
        Some(match self.name(code) {
            Some(name) => endpoint.with_country(name),
            None => endpoint,
        })
    }
}

/// One row of a country table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryEntry {
    /// ISO 3166-1 alpha-2 code (e.g., "IT").
    pub code: String,
    pub name: String,
    pub lat: f32,
    pub lng: f32,
}

/// A country table loaded from JSON.
///
/// ```json
/// { "countries": [ { "code": "IT", "name": "Italy", "lat": 41.87, "lng": 12.56 } ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryTable {
    countries: Vec<CountryEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CountryTable {
    pub fn new(countries: Vec<CountryEntry>) -> Self {
        let mut table = Self {
            countries,
            index: HashMap::new(),
        };
        table.reindex();
        table
    }

    /// Parse a country table from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut table: CountryTable = serde_json::from_str(json)?;
        table.reindex();
        Ok(table)
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, entry) in self.countries.iter().enumerate() {
            if self.index.insert(entry.code.clone(), i).is_some() {
                log::warn!("CountryTable: duplicate code '{}', keeping the last entry", entry.code);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&CountryEntry> {
        self.index.get(code).map(|&i| &self.countries[i])
    }

    /// Country codes in table order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|c| c.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

impl Geography for CountryTable {
    fn locate(&self, code: &str) -> Option<GeoCoord> {
        self.get(code).map(|c| GeoCoord::new(c.lat, c.lng))
    }

    fn name(&self, code: &str) -> Option<&str> {
        self.get(code).map(|c| c.name.as_str())
    }
}

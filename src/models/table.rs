//! The immutable profile table shared by every request.

use std::sync::Arc;

use crate::error::{Result, WellbeingError};
use crate::models::profile::{CountryProfile, OecdAverage};

/// All country profiles of one pipeline run, with their OECD average.
///
/// Built once and then only read; share it as `Arc<ProfileTable>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    profiles: Vec<CountryProfile>,
    average: OecdAverage,
}

impl ProfileTable {
    /// Create a table, deriving the average from the profiles
    #[must_use]
    pub fn new(profiles: Vec<CountryProfile>) -> Self {
        let average = OecdAverage::from_profiles(&profiles);
        Self { profiles, average }
    }

    /// Wrap the table for shared read-only use
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    #[must_use]
    pub fn profiles(&self) -> &[CountryProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryProfile> {
        self.profiles.iter()
    }

    #[must_use]
    pub const fn average(&self) -> &OecdAverage {
        &self.average
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Country names in table order
    #[must_use]
    pub fn countries(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.country.as_str()).collect()
    }

    /// Find a profile by country name or code.
    ///
    /// An exact name match wins; otherwise the lookup is case-insensitive on
    /// the name and the code.
    #[must_use]
    pub fn get(&self, country: &str) -> Option<&CountryProfile> {
        let needle = country.trim();
        self.profiles
            .iter()
            .find(|p| p.country == needle)
            .or_else(|| {
                self.profiles.iter().find(|p| {
                    p.country.eq_ignore_ascii_case(needle)
                        || p.country_code
                            .as_deref()
                            .is_some_and(|c| c.eq_ignore_ascii_case(needle))
                })
            })
    }

    /// Like [`ProfileTable::get`], failing with `UnknownCountry`
    pub fn profile(&self, country: &str) -> Result<&CountryProfile> {
        self.get(country)
            .ok_or_else(|| WellbeingError::UnknownCountry(country.to_string()))
    }
}

impl<'a> IntoIterator for &'a ProfileTable {
    type Item = &'a CountryProfile;
    type IntoIter = std::slice::Iter<'a, CountryProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

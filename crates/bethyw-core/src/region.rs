//! A local authority area with its names and measures

use crate::error::{Error, Result};
use crate::measure::Measure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Language tag for English names
pub const LANG_ENG: &str = "eng";
/// Language tag for Welsh names
pub const LANG_CYM: &str = "cym";

/// A region identified by its local authority code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    authority_code: String,
    names: BTreeMap<String, String>,
    measures: BTreeMap<String, Measure>,
}

impl Region {
    /// Create a region with no names or measures
    pub fn new(authority_code: impl Into<String>) -> Self {
        Self {
            authority_code: authority_code.into(),
            names: BTreeMap::new(),
            measures: BTreeMap::new(),
        }
    }

    pub fn authority_code(&self) -> &str {
        &self.authority_code
    }

    /// Used by the collection to key a default-constructed region
    pub(crate) fn assign_code(&mut self, authority_code: &str) {
        if self.authority_code.is_empty() {
            self.authority_code = authority_code.to_string();
        }
    }

    /// Store a name under a language tag (tag is lowercased)
    pub fn set_name(&mut self, lang: &str, name: impl Into<String>) {
        self.names.insert(lang.to_lowercase(), name.into());
    }

    /// Get the name for a language tag
    pub fn get_name(&self, lang: &str) -> Result<&str> {
        self.names
            .get(&lang.to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| Error::LanguageNotFound(lang.to_string()))
    }

    pub fn has_name(&self, lang: &str) -> bool {
        self.names.contains_key(&lang.to_lowercase())
    }

    /// Add a measure, or merge its years into the existing measure with the
    /// same code. On a merge the existing code and label are kept and the
    /// incoming values win for shared years.
    pub fn set_measure(&mut self, code: &str, measure: Measure) {
        match self.measures.get_mut(&code.to_lowercase()) {
            Some(existing) => existing.combine(&measure),
            None => {
                self.measures.insert(code.to_lowercase(), measure);
            }
        }
    }

    /// Get a measure by code. The error message keeps the caller's casing.
    pub fn get_measure(&self, code: &str) -> Result<&Measure> {
        self.measures
            .get(&code.to_lowercase())
            .ok_or_else(|| Error::MeasureNotFound(code.to_string()))
    }

    pub fn measures(&self) -> &BTreeMap<String, Measure> {
        &self.measures
    }

    /// Number of measures held
    pub fn size(&self) -> usize {
        self.measures.len()
    }

    /// Name shown in rendered output.
    ///
    /// With two or more names the English and Welsh names are joined as
    /// `eng / cym`; if only one of those is stored it is used alone, and
    /// failing both the first stored name is used.
    pub fn display_name(&self) -> String {
        match self.names.len() {
            0 => "Unnamed".to_string(),
            1 => self.names.values().next().cloned().unwrap_or_default(),
            _ => match (self.names.get(LANG_ENG), self.names.get(LANG_CYM)) {
                (Some(eng), Some(cym)) => format!("{} / {}", eng, cym),
                (Some(name), None) | (None, Some(name)) => name.clone(),
                (None, None) => self.names.values().next().cloned().unwrap_or_default(),
            },
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.display_name())?;
        writeln!(f, "Local authority code: {}", self.authority_code)?;

        if self.measures.is_empty() {
            return writeln!(f, "<no measures>");
        }

        for measure in self.measures.values() {
            writeln!(f, "{}", measure)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        let mut region = Region::new("W06000023");
        region.set_name("ENG", "Powys");
        assert_eq!(region.get_name("eng").unwrap(), "Powys");
        assert_eq!(region.get_name("Eng").unwrap(), "Powys");
        assert!(region.has_name("eng"));
    }

    #[test]
    fn test_missing_name() {
        let region = Region::new("W06000023");
        let err = region.get_name("cym").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_measure_merges_existing() {
        let mut region = Region::new("W06000023");

        let mut first = Measure::new("pop", "Population");
        first.set_value(2000, 1.0);
        first.set_value(2001, 2.0);
        region.set_measure("pop", first);

        let mut second = Measure::new("pop", "Another label");
        second.set_value(2001, 20.0);
        second.set_value(2002, 30.0);
        region.set_measure("POP", second);

        let merged = region.get_measure("pop").unwrap();
        assert_eq!(region.size(), 1);
        assert_eq!(merged.label(), "Population");
        assert_eq!(merged.get_value(2000).unwrap(), 1.0);
        assert_eq!(merged.get_value(2001).unwrap(), 20.0);
        assert_eq!(merged.get_value(2002).unwrap(), 30.0);
    }

    #[test]
    fn test_get_measure_normalizes_but_reports_original_key() {
        let mut region = Region::new("W06000023");
        region.set_measure("Dens", Measure::new("dens", "Density"));
        assert!(region.get_measure("DENS").is_ok());

        let err = region.get_measure("Area").unwrap_err();
        assert_eq!(err.to_string(), "No measure found matching Area");
    }

    #[test]
    fn test_display_name_variants() {
        let mut region = Region::new("W06000023");
        assert_eq!(region.display_name(), "Unnamed");

        region.set_name("eng", "Powys");
        assert_eq!(region.display_name(), "Powys");

        region.set_name("cym", "Powys");
        assert_eq!(region.display_name(), "Powys / Powys");
    }

    #[test]
    fn test_display_name_prefers_fixed_pair() {
        let mut region = Region::new("W06000015");
        region.set_name("fra", "Cardiff (fr)");
        region.set_name("cym", "Caerdydd");
        assert_eq!(region.display_name(), "Caerdydd");

        region.set_name("eng", "Cardiff");
        assert_eq!(region.display_name(), "Cardiff / Caerdydd");
    }

    #[test]
    fn test_display_without_measures() {
        let mut region = Region::new("W06000023");
        region.set_name("eng", "Powys");
        let text = region.to_string();
        assert_eq!(text, "Powys\nLocal authority code: W06000023\n<no measures>\n");
    }

    #[test]
    fn test_structural_equality() {
        let mut a = Region::new("W1");
        let mut b = Region::new("W1");
        a.set_name("eng", "A");
        b.set_name("eng", "A");
        assert_eq!(a, b);

        b.set_measure("pop", Measure::new("pop", "Population"));
        assert_ne!(a, b);
    }
}

//! Import filters for areas, measures and years

use std::collections::BTreeSet;

/// Inclusive range of years. A bound of 0 on either side means no filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub start: u32,
    pub end: u32,
}

impl YearRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// The `(0, 0)` range that accepts every year
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == 0 || self.end == 0
    }

    pub fn contains(&self, year: u32) -> bool {
        self.is_unbounded() || (self.start..=self.end).contains(&year)
    }
}

/// Filters applied while parsing, before any data is stored.
///
/// Empty sets and an unbounded year range accept everything, which is what
/// `ImportFilters::default()` gives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportFilters {
    /// Authority codes to import, matched exactly
    pub areas: BTreeSet<String>,
    /// Measure codes to import, matched case-insensitively
    pub measures: BTreeSet<String>,
    pub years: YearRange,
}

impl ImportFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Measure codes are stored lowercase
    pub fn with_measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.measures = measures
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .collect();
        self
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn accepts_area(&self, authority_code: &str) -> bool {
        self.areas.is_empty() || self.areas.contains(authority_code)
    }

    pub fn accepts_measure(&self, measure_code: &str) -> bool {
        self.measures.is_empty() || self.measures.contains(&measure_code.to_lowercase())
    }

    pub fn accepts_year(&self, year: u32) -> bool {
        self.years.contains(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_inclusive() {
        let range = YearRange::new(2000, 2010);
        assert!(!range.contains(1999));
        assert!(range.contains(2000));
        assert!(range.contains(2005));
        assert!(range.contains(2010));
        assert!(!range.contains(2011));
    }

    #[test]
    fn test_zero_range_accepts_everything() {
        let range = YearRange::all();
        assert!(range.is_unbounded());
        assert!(range.contains(1066));
        assert!(range.contains(2024));
    }

    #[test]
    fn test_default_filters_accept_all() {
        let filters = ImportFilters::default();
        assert!(filters.accepts_area("W06000023"));
        assert!(filters.accepts_measure("pop"));
        assert!(filters.accepts_year(1991));
    }

    #[test]
    fn test_measure_filter_case_insensitive() {
        let filters = ImportFilters::new().with_measures(["Dens"]);
        assert!(filters.accepts_measure("dens"));
        assert!(filters.accepts_measure("DENS"));
        assert!(!filters.accepts_measure("pop"));
    }

    #[test]
    fn test_area_filter_exact() {
        let filters = ImportFilters::new().with_areas(["W1"]);
        assert!(filters.accepts_area("W1"));
        assert!(!filters.accepts_area("W2"));
    }
}

use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Selection: "everything" or an explicit set of allowed values
// ---------------------------------------------------------------------------

/// Criterion for one categorical column.
///
/// A value literally spelled "All" is only matched by a `Subset` holding it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Only these values pass. An empty set matches nothing.
    Subset(BTreeSet<String>),
}

impl Selection {
    pub fn subset<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Subset(values.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Subset(set) => set.contains(value),
        }
    }

    /// Number of explicitly selected values (`None` for `All`).
    pub fn selected_count(&self) -> Option<usize> {
        match self {
            Selection::All => None,
            Selection::Subset(set) => Some(set.len()),
        }
    }

    /// Flip membership of one value. Toggling out of `All` starts from
    /// `universe` minus the value.
    pub fn toggle(&mut self, value: &str, universe: &BTreeSet<String>) {
        match self {
            Selection::All => {
                let mut set = universe.clone();
                set.remove(value);
                *self = Selection::Subset(set);
            }
            Selection::Subset(set) => {
                if !set.remove(value) {
                    set.insert(value.to_string());
                }
            }
        }
    }

    /// Drop selected values that are no longer among `options`.
    /// Returns `true` if anything was removed.
    pub fn retain_within(&mut self, options: &BTreeSet<String>) -> bool {
        match self {
            Selection::All => false,
            Selection::Subset(set) => {
                let before = set.len();
                set.retain(|v| options.contains(v));
                set.len() != before
            }
        }
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Row predicate built from the table widgets on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub continents: Selection,
    pub countries: Selection,
    pub min_year: i64,
    pub max_year: i64,
}

impl FilterCriteria {
    /// Admit every row of `dataset`.
    pub fn everything(dataset: &Dataset) -> Self {
        let (min_year, max_year) = dataset.year_bounds();
        FilterCriteria {
            continents: Selection::All,
            countries: Selection::All,
            min_year,
            max_year,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.continents.admits(&record.continent)
            && self.countries.admits(&record.country)
            && (self.min_year..=self.max_year).contains(&record.year)
    }
}

/// Rows satisfying `criteria`, in dataset order.
pub fn filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| criteria.matches(r))
        .collect()
}

/// Indices of the rows satisfying `criteria`, ascending.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{record, sample_records};

    fn dataset() -> Dataset {
        Dataset::new(sample_records()).unwrap()
    }

    #[test]
    fn test_single_country_single_year() {
        let ds = Dataset::new(vec![
            record("Chad", "Africa", 1952, 38.09, 2_682_462, 700.0),
            record("Chad", "Africa", 1957, 39.5, 2_894_650, 720.0),
        ])
        .unwrap();
        let criteria = FilterCriteria {
            continents: Selection::All,
            countries: Selection::subset(["Chad"]),
            min_year: 1952,
            max_year: 1952,
        };
        let rows = filter(&ds, &criteria);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 1952);
        assert_eq!(rows[0].pop, 2_682_462);
    }

    #[test]
    fn test_all_all_is_year_range_only() {
        let ds = dataset();
        let criteria = FilterCriteria {
            min_year: 1957,
            ..FilterCriteria::everything(&ds)
        };
        let rows = filter(&ds, &criteria);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.year == 1957));

        assert_eq!(filter(&ds, &FilterCriteria::everything(&ds)).len(), ds.len());
    }

    #[test]
    fn test_every_row_satisfies_conjunction() {
        let ds = dataset();
        let criteria = FilterCriteria {
            continents: Selection::subset(["Africa"]),
            countries: Selection::subset(["Kenya", "Japan"]),
            min_year: 1952,
            max_year: 1957,
        };
        let rows = filter(&ds, &criteria);
        assert_eq!(rows.len(), 2);
        for r in &rows {
            assert!(criteria.matches(r));
            assert!(ds.records().contains(*r));
            assert_eq!(r.country, "Kenya");
        }
    }

    #[test]
    fn test_empty_subset_matches_nothing() {
        let ds = dataset();
        let criteria = FilterCriteria {
            continents: Selection::Subset(BTreeSet::new()),
            ..FilterCriteria::everything(&ds)
        };
        assert!(filter(&ds, &criteria).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent_and_ordered() {
        let ds = dataset();
        let criteria = FilterCriteria {
            continents: Selection::subset(["Africa", "Asia"]),
            ..FilterCriteria::everything(&ds)
        };
        let first = filter(&ds, &criteria);
        let second = filter(&ds, &criteria);
        assert_eq!(first, second);

        let indices = filtered_indices(&ds, &criteria);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
        let via_indices: Vec<&Record> = indices.iter().map(|&i| &ds.records()[i]).collect();
        assert_eq!(via_indices, first);
    }

    #[test]
    fn test_literal_all_is_not_a_wildcard() {
        let ds = Dataset::new(vec![
            record("All", "Nowhere", 2000, 70.0, 1, 1.0),
            record("Chad", "Africa", 2000, 50.0, 1, 1.0),
        ])
        .unwrap();
        let criteria = FilterCriteria {
            countries: Selection::subset(["All"]),
            ..FilterCriteria::everything(&ds)
        };
        let rows = filter(&ds, &criteria);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "All");
    }

    #[test]
    fn test_toggle_and_retain() {
        let universe: BTreeSet<String> = ["Africa", "Asia"].into_iter().map(String::from).collect();
        let mut sel = Selection::All;
        sel.toggle("Asia", &universe);
        assert_eq!(sel, Selection::subset(["Africa"]));
        sel.toggle("Asia", &universe);
        assert_eq!(sel.selected_count(), Some(2));

        let options: BTreeSet<String> = ["Asia".to_string()].into_iter().collect();
        assert!(sel.retain_within(&options));
        assert_eq!(sel, Selection::subset(["Asia"]));
        assert!(!Selection::All.retain_within(&options));
    }
}

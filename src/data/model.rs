use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filter::Selection;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A selector referenced a column that is neither a dimension nor a metric
    /// (or not valid in that position).
    #[error("unknown field name: '{0}'")]
    InvalidFieldName(String),

    #[error("dataset contains no records")]
    EmptyDataset,
}

// ---------------------------------------------------------------------------
// Record – one row of the indicators table
// ---------------------------------------------------------------------------

/// A single country-year observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub country: String,
    pub continent: String,
    pub year: i64,
    #[serde(rename = "lifeExp")]
    pub life_exp: f64,
    pub pop: i64,
    #[serde(rename = "gdpPercap")]
    pub gdp_percap: f64,
}

impl Record {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::LifeExp => self.life_exp,
            Metric::Pop => self.pop as f64,
            Metric::GdpPercap => self.gdp_percap,
        }
    }

    pub fn dimension(&self, dim: Dimension) -> Value {
        match dim {
            Dimension::Country => Value::Text(self.country.clone()),
            Dimension::Continent => Value::Text(self.continent.clone()),
            Dimension::Year => Value::Integer(self.year),
        }
    }

    pub fn label(&self, field: LabelField) -> &str {
        match field {
            LabelField::Country => &self.country,
            LabelField::Continent => &self.continent,
        }
    }
}

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Categorical / ordinal columns usable as a grouping or x-axis key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Country,
    Continent,
    Year,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Country, Dimension::Continent, Dimension::Year];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Country => "country",
            Dimension::Continent => "continent",
            Dimension::Year => "year",
        }
    }
}

/// Numeric columns usable as a y-axis or aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    LifeExp,
    Pop,
    GdpPercap,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::LifeExp, Metric::Pop, Metric::GdpPercap];

    pub fn name(self) -> &'static str {
        match self {
            Metric::LifeExp => "lifeExp",
            Metric::Pop => "pop",
            Metric::GdpPercap => "gdpPercap",
        }
    }
}

/// Categorical columns that can label a line or colour a scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelField {
    Country,
    Continent,
}

impl LabelField {
    pub const ALL: [LabelField; 2] = [LabelField::Country, LabelField::Continent];

    pub fn name(self) -> &'static str {
        match self {
            LabelField::Country => "country",
            LabelField::Continent => "continent",
        }
    }
}

macro_rules! field_name_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = DataError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|field| field.name() == s)
                    .ok_or_else(|| DataError::InvalidFieldName(s.to_string()))
            }
        }
    };
}

field_name_impls!(Dimension);
field_name_impls!(Metric);
field_name_impls!(LabelField);

// ---------------------------------------------------------------------------
// Value – a grouping key taken from a dimension column
// ---------------------------------------------------------------------------

/// Integers sort before text, so a year axis never interleaves with names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the loaded, immutable snapshot
// ---------------------------------------------------------------------------

/// The full table plus the indices the widgets need.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    year_bounds: (i64, i64),
    continents: BTreeSet<String>,
    countries: BTreeSet<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Result<Self, DataError> {
        let (min_year, max_year) = records
            .iter()
            .map(|r| r.year)
            .fold(None, |acc: Option<(i64, i64)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
            .ok_or(DataError::EmptyDataset)?;

        let continents = records.iter().map(|r| r.continent.clone()).collect();
        let countries = records.iter().map(|r| r.country.clone()).collect();

        Ok(Dataset {
            records,
            year_bounds: (min_year, max_year),
            continents,
            countries,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every row, in the order a filter would return them.
    pub fn rows(&self) -> Vec<&Record> {
        self.records.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Inclusive `(min, max)` year covered by the table.
    pub fn year_bounds(&self) -> (i64, i64) {
        self.year_bounds
    }

    pub fn continents(&self) -> &BTreeSet<String> {
        &self.continents
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    /// Countries belonging to any continent the selection admits.
    pub fn countries_in(&self, continents: &Selection) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| continents.admits(&r.continent))
            .map(|r| r.country.clone())
            .collect()
    }

    /// Distinct values of a label column, sorted.
    pub fn label_values(&self, field: LabelField) -> &BTreeSet<String> {
        match field {
            LabelField::Country => &self.countries,
            LabelField::Continent => &self.continents,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Record;

    pub fn record(
        country: &str,
        continent: &str,
        year: i64,
        life_exp: f64,
        pop: i64,
        gdp_percap: f64,
    ) -> Record {
        Record {
            country: country.to_string(),
            continent: continent.to_string(),
            year,
            life_exp,
            pop,
            gdp_percap,
        }
    }

    /// Three countries over two continents and two years.
    pub fn sample_records() -> Vec<Record> {
        vec![
            record("Chad", "Africa", 1952, 38.09, 2_682_462, 700.0),
            record("Chad", "Africa", 1957, 39.5, 2_894_650, 720.0),
            record("Kenya", "Africa", 1952, 42.27, 6_464_046, 853.54),
            record("Kenya", "Africa", 1957, 44.69, 7_454_779, 944.44),
            record("Japan", "Asia", 1952, 63.03, 86_459_025, 3216.96),
            record("Japan", "Asia", 1957, 65.5, 91_563_009, 4317.69),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_records;
    use super::*;

    #[test]
    fn test_dataset_indices() {
        let ds = Dataset::new(sample_records()).unwrap();
        assert_eq!(ds.len(), 6);
        assert_eq!(ds.year_bounds(), (1952, 1957));
        assert_eq!(ds.continents().len(), 2);
        assert_eq!(
            ds.countries().iter().cloned().collect::<Vec<_>>(),
            vec!["Chad", "Japan", "Kenya"]
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        assert_eq!(Dataset::new(Vec::new()).unwrap_err(), DataError::EmptyDataset);
    }

    #[test]
    fn test_countries_constrained_by_continent() {
        let ds = Dataset::new(sample_records()).unwrap();
        let africa = Selection::subset(["Africa"]);
        let countries = ds.countries_in(&africa);
        assert_eq!(countries.len(), 2);
        assert!(!countries.contains("Japan"));
        assert!(ds.countries_in(&Selection::Subset(BTreeSet::new())).is_empty());
        assert_eq!(ds.countries_in(&Selection::All).len(), 3);
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!("gdpPercap".parse::<Metric>().unwrap(), Metric::GdpPercap);
        assert_eq!("year".parse::<Dimension>().unwrap(), Dimension::Year);
        assert_eq!("continent".parse::<LabelField>().unwrap(), LabelField::Continent);
        assert_eq!(
            "year".parse::<LabelField>().unwrap_err(),
            DataError::InvalidFieldName("year".into())
        );
        assert!("lifeexp".parse::<Metric>().is_err());
        for m in Metric::ALL {
            assert_eq!(m.to_string().parse::<Metric>().unwrap(), m);
        }
    }

    #[test]
    fn test_value_ordering() {
        let mut vals = vec![
            Value::Text("Asia".into()),
            Value::Integer(2007),
            Value::Integer(1952),
        ];
        vals.sort();
        assert_eq!(vals[0], Value::Integer(1952));
        assert_eq!(vals[2].to_string(), "Asia");
    }
}

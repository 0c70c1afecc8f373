use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Record;
use crate::error::RaceError;
use crate::region::{CountryTable, Region};

/// What to do with records whose country is missing from the region table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedPolicy {
    /// Leave the record out of every bucket.
    #[default]
    Exclude,
    /// Keep the record under `Region::Unknown`.
    Unknown,
}

impl FromStr for UnmappedPolicy {
    type Err = RaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(Self::Exclude),
            "unknown" => Ok(Self::Unknown),
            _ => Err(RaceError::InvalidData(format!(
                "Invalid unmapped policy: '{s}'. Must be 'exclude' or 'unknown'"
            ))),
        }
    }
}

/// A record that survived aggregation, tagged with its region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRecord {
    pub year: i32,
    pub country: String,
    pub population: u64,
    pub region: Region,
}

/// Per-year ranked lists, sorted descending by population.
///
/// Built once by [`aggregate`]; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearBuckets {
    by_year: BTreeMap<i32, Vec<RankedRecord>>,
}

impl YearBuckets {
    /// Ranked records for `year`. A year with no data is an empty slice.
    pub fn year(&self, year: i32) -> &[RankedRecord] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Inclusive `(first, last)` year, or `None` when there is no data.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = *self.by_year.keys().next()?;
        let last = *self.by_year.keys().next_back()?;
        Some((first, last))
    }

    /// Number of years with at least one record.
    pub fn len(&self) -> usize {
        self.by_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }
}

/// Group records by year and rank each year descending by population.
///
/// Region lookup is an exact match against `table`. Records for countries
/// the table does not know are handled per `policy`. When a `(year, country)`
/// pair repeats, the last occurrence wins and takes that occurrence's input
/// position; equal populations keep input order.
pub fn aggregate(records: &[Record], table: &CountryTable, policy: UnmappedPolicy) -> YearBuckets {
    let mut latest: HashMap<(i32, &str), (usize, RankedRecord)> = HashMap::new();
    let mut excluded = 0usize;

    for (seq, rec) in records.iter().enumerate() {
        let region = match (table.region(&rec.country), policy) {
            (Some(region), _) => region,
            (None, UnmappedPolicy::Unknown) => Region::Unknown,
            (None, UnmappedPolicy::Exclude) => {
                excluded += 1;
                continue;
            }
        };
        let ranked = RankedRecord {
            year: rec.year,
            country: rec.country.clone(),
            population: rec.population,
            region,
        };
        latest.insert((rec.year, rec.country.as_str()), (seq, ranked));
    }

    let mut grouped: BTreeMap<i32, Vec<(usize, RankedRecord)>> = BTreeMap::new();
    for ((year, _), entry) in latest {
        grouped.entry(year).or_default().push(entry);
    }

    let by_year: BTreeMap<i32, Vec<RankedRecord>> = grouped
        .into_iter()
        .map(|(year, mut entries)| {
            entries.sort_by(|(seq_a, a), (seq_b, b)| {
                b.population.cmp(&a.population).then(seq_a.cmp(seq_b))
            });
            (year, entries.into_iter().map(|(_, r)| r).collect())
        })
        .collect();

    if excluded > 0 {
        tracing::debug!(excluded, "excluded records for unmapped countries");
    }
    tracing::info!(years = by_year.len(), "aggregated population by year");

    YearBuckets { by_year }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(bucket: &[RankedRecord]) -> Vec<&str> {
        bucket.iter().map(|r| r.country.as_str()).collect()
    }

    #[test]
    fn unmapped_countries_are_excluded_by_default() {
        let records = vec![
            Record::new(1950, "China", 554_000_000),
            Record::new(1950, "India", 376_000_000),
            Record::new(1950, "Unknownland", 1000),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::default());
        assert_eq!(countries(buckets.year(1950)), vec!["China", "India"]);
        assert_eq!(buckets.year(1950)[0].region, Region::Asia);
    }

    #[test]
    fn unknown_policy_keeps_unmapped_countries() {
        let records = vec![
            Record::new(1950, "Unknownland", 1000),
            Record::new(1950, "Fiji", 289_000),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Unknown);
        let bucket = buckets.year(1950);
        assert_eq!(countries(bucket), vec!["Fiji", "Unknownland"]);
        assert_eq!(bucket[1].region, Region::Unknown);
    }

    #[test]
    fn sorted_descending_with_stable_ties() {
        let records = vec![
            Record::new(2000, "Chad", 10),
            Record::new(2000, "Mali", 30),
            Record::new(2000, "Togo", 10),
            Record::new(2000, "Peru", 20),
            Record::new(2000, "Oman", 10),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude);
        assert_eq!(
            countries(buckets.year(2000)),
            vec!["Mali", "Peru", "Chad", "Togo", "Oman"]
        );
    }

    #[test]
    fn duplicate_rows_are_last_write_wins() {
        let records = vec![
            Record::new(1990, "Chad", 50),
            Record::new(1990, "Togo", 10),
            Record::new(1990, "Mali", 10),
            Record::new(1990, "Chad", 10),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude);
        let bucket = buckets.year(1990);
        assert_eq!(countries(bucket), vec!["Togo", "Mali", "Chad"]);
        assert_eq!(bucket[2].population, 10);
    }

    #[test]
    fn groups_by_year_and_reports_range() {
        let records = vec![
            Record::new(1951, "Chad", 2),
            Record::new(1950, "Chad", 1),
            Record::new(2021, "Chad", 3),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude);
        assert_eq!(buckets.years().collect::<Vec<_>>(), vec![1950, 1951, 2021]);
        assert_eq!(buckets.year_range(), Some((1950, 2021)));
        assert!(buckets.year(1960).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_mapping() {
        let buckets = aggregate(&[], CountryTable::builtin(), UnmappedPolicy::Exclude);
        assert!(buckets.is_empty());
        assert_eq!(buckets.year_range(), None);
        assert!(buckets.year(1950).is_empty());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let records = vec![
            Record::new(1950, "Chad", 2),
            Record::new(1950, "Mali", 2),
            Record::new(1951, "Peru", 9),
        ];
        let table = CountryTable::builtin();
        assert_eq!(
            aggregate(&records, table, UnmappedPolicy::Exclude),
            aggregate(&records, table, UnmappedPolicy::Exclude)
        );
    }

    #[test]
    fn policy_parses_from_config() {
        assert_eq!("unknown".parse::<UnmappedPolicy>().unwrap(), UnmappedPolicy::Unknown);
        assert!("sum".parse::<UnmappedPolicy>().is_err());
    }
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use population_race::{
    aggregate, parse_csv, CountryTable, Engine, EngineOptions, EngineState, Record, Region,
    UnmappedPolicy, YearBuckets,
};

fn buckets_from_csv(csv: &str) -> YearBuckets {
    let records = parse_csv(csv).unwrap();
    aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude)
}

fn engine(buckets: YearBuckets, transition: Duration) -> Engine {
    Engine::new(
        Arc::new(buckets),
        EngineOptions {
            top_n: 12,
            transition,
        },
    )
}

#[test]
fn unmapped_country_is_left_out_of_its_year() {
    let buckets = buckets_from_csv(
        "Country name,Year,Population\n\
         Unknownland,1950,1000\n\
         India,1950,376000000\n\
         China,1950,554000000\n",
    );
    let countries: Vec<&str> = buckets
        .year(1950)
        .iter()
        .map(|r| r.country.as_str())
        .collect();
    assert_eq!(countries, vec!["China", "India"]);
}

#[test]
fn year_change_shows_from_values_then_exact_targets() {
    let buckets = buckets_from_csv(
        "Country name,Year,Population\n\
         China,1950,554000000\n\
         India,1950,376000000\n\
         China,1951,563000000\n\
         India,1951,382000000\n",
    );
    let mut engine = engine(buckets, Duration::from_millis(1000));

    let t0 = Instant::now();
    engine.select_year(1950, t0);
    engine.select_year(1951, t0);

    let at_start: Vec<u64> = engine.tick(t0).rows.iter().map(|r| r.displayed).collect();
    assert_eq!(at_start, vec![554_000_000, 376_000_000]);

    let at_end: Vec<u64> = engine
        .tick(t0 + Duration::from_millis(1000))
        .rows
        .iter()
        .map(|r| r.displayed)
        .collect();
    assert_eq!(at_end, vec![563_000_000, 382_000_000]);
    assert_eq!(engine.state(), EngineState::Settled(1951));
}

#[test]
fn excluding_asia_leaves_the_rest_sorted() {
    let asian = [
        "China", "India", "Japan", "Indonesia", "Pakistan", "Bangladesh", "Vietnam", "Iran",
    ];
    let others = ["United States", "Russia", "Brazil", "Germany", "Nigeria"];

    let mut records = Vec::new();
    for (i, c) in asian.iter().enumerate() {
        records.push(Record::new(1970, *c, 900_000_000 - i as u64 * 50_000_000));
    }
    for (i, c) in others.iter().enumerate() {
        records.push(Record::new(1970, *c, 200_000_000 - i as u64 * 30_000_000));
    }
    let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude);
    let mut engine = engine(buckets, Duration::ZERO);

    let t0 = Instant::now();
    engine.select_year(1970, t0);
    assert_eq!(engine.frame().len(), 12);

    engine.toggle_region(Region::Asia, t0);
    let frame = engine.tick(t0);
    let countries: Vec<&str> = frame.rows.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(countries, others.to_vec());
    assert!(frame
        .rows
        .windows(2)
        .all(|w| w[0].population >= w[1].population));
}

#[test]
fn empty_year_is_an_empty_list_with_unit_maximum() {
    let buckets = buckets_from_csv("Country name,Year,Population\nChina,1950,554000000\n");
    let mut engine = engine(buckets, Duration::from_millis(1000));

    let t0 = Instant::now();
    engine.select_year(1999, t0);
    let frame = engine.tick(t0);
    assert!(frame.is_empty());
    assert_eq!(frame.max_population(), 1);
}

#[test]
fn ranked_years_are_sorted_and_capped() {
    let mut csv = String::from("Country name,Year,Population\n");
    let table = CountryTable::builtin();
    let names = [
        "Chad", "Mali", "Peru", "Togo", "Oman", "Cuba", "Fiji", "Iran", "Iraq", "Laos", "Chile",
        "Spain", "Japan", "Nepal", "Qatar",
    ];
    for year in 1950..=1952 {
        for (i, name) in names.iter().enumerate() {
            assert!(table.contains(name));
            let pop = ((i as u64 * 7_919 + year as u64 * 104_729) % 1_000_003) + 1;
            csv.push_str(&format!("{name},{year},{pop}\n"));
        }
    }
    csv.push_str("Chad,1953,bad\n");

    let buckets = buckets_from_csv(&csv);
    assert_eq!(buckets.year_range(), Some((1950, 1952)));
    let mut engine = engine(buckets, Duration::ZERO);

    for year in 1950..=1952 {
        let bucket = engine.buckets().year(year);
        assert_eq!(bucket.len(), names.len());
        assert!(bucket.windows(2).all(|w| w[0].population >= w[1].population));

        engine.select_year(year, Instant::now());
        assert_eq!(engine.frame().len(), 12);
    }
}

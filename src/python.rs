//! Python bindings (`--features python`).
use std::sync::Arc;
use std::time::{Duration, Instant};

use polars::prelude::*;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::aggregation::{aggregate, UnmappedPolicy};
use crate::dataset::{self, Record};
use crate::engine::{DisplayFrame, EngineOptions};
use crate::error::RaceError;
use crate::race::Race;
use crate::region::{CountryTable, Region};
use crate::schema::{self, record};

#[pyclass(name = "PopulationRace")]
pub struct PyRace {
    race: Race,
}

#[pymethods]
impl PyRace {
    /// Load `path`, aggregate it and position the race on the first year.
    #[new]
    #[pyo3(signature = (path, top_n=12, transition_ms=900, unmapped="exclude"))]
    fn new(path: &str, top_n: usize, transition_ms: u64, unmapped: &str) -> PyResult<Self> {
        let policy: UnmappedPolicy = unmapped.parse()?;
        let records = dataset::load_csv_file(path)?;
        let buckets = aggregate(&records, CountryTable::builtin(), policy);
        let options = EngineOptions {
            top_n,
            transition: Duration::from_millis(transition_ms),
        };
        Ok(Self {
            race: Race::new(Arc::new(buckets), options, Instant::now()),
        })
    }

    // ── Events ──────────────────────────────────────────────────────────────

    /// Jump to `year`; returns the year actually selected.
    fn select_year(&mut self, year: i32) -> i32 {
        self.race.scrub(year, Instant::now())
    }

    /// Timer step. Returns the new year, or None while paused.
    fn advance(&mut self) -> Option<i32> {
        self.race.on_tick(Instant::now())
    }

    fn toggle_play(&mut self) -> bool {
        self.race.toggle_play()
    }

    fn toggle_region(&mut self, region: &str) -> PyResult<bool> {
        let region: Region = region.parse()?;
        Ok(self.race.toggle_region(region, Instant::now()))
    }

    // ── Frame ───────────────────────────────────────────────────────────────

    /// Live frame as a DataFrame: rank, country, region, population, displayed.
    fn tick(&mut self) -> PyResult<PyDataFrame> {
        let frame = self.race.frame(Instant::now());
        Ok(PyDataFrame(frame_to_df(frame)?))
    }

    fn total(&mut self) -> u64 {
        self.race.frame(Instant::now()).total()
    }

    fn max_population(&mut self) -> u64 {
        self.race.frame(Instant::now()).max_population()
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn year(&self) -> i32 {
        self.race.year()
    }

    #[getter]
    fn year_range(&self) -> (i32, i32) {
        (self.race.cursor().min(), self.race.cursor().max())
    }

    #[getter]
    fn is_playing(&self) -> bool {
        self.race.is_playing()
    }
}

/// Load a population CSV into a typed DataFrame (year, country, population).
#[pyfunction]
fn load_records(path: &str) -> PyResult<PyDataFrame> {
    let records = dataset::load_csv_file(path)?;
    Ok(PyDataFrame(records_to_df(&records)?))
}

fn records_to_df(records: &[Record]) -> Result<DataFrame, RaceError> {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect();
    let countries: Vec<&str> = records.iter().map(|r| r.country.as_str()).collect();
    let populations: Vec<u64> = records.iter().map(|r| r.population).collect();

    let df = DataFrame::new(vec![
        Column::new(record::YEAR.into(), &years),
        Column::new(record::COUNTRY.into(), &countries),
        Column::new(record::POPULATION.into(), &populations),
    ])?;
    Ok(df)
}

fn frame_to_df(frame: &DisplayFrame) -> Result<DataFrame, RaceError> {
    let ranks: Vec<u32> = frame.rows.iter().map(|r| r.rank as u32).collect();
    let countries: Vec<&str> = frame.rows.iter().map(|r| r.country.as_str()).collect();
    let regions: Vec<&str> = frame.rows.iter().map(|r| r.region.as_str()).collect();
    let populations: Vec<u64> = frame.rows.iter().map(|r| r.population).collect();
    let displayed: Vec<u64> = frame.rows.iter().map(|r| r.displayed).collect();

    let df = DataFrame::new(vec![
        Column::new("rank".into(), &ranks),
        Column::new(record::COUNTRY.into(), &countries),
        Column::new(record::REGION.into(), &regions),
        Column::new(record::POPULATION.into(), &populations),
        Column::new("displayed".into(), &displayed),
    ])?;
    Ok(df)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let source = PyModule::new(m.py(), "source")?;
    source.add("YEAR", schema::source::YEAR)?;
    source.add("COUNTRY", schema::source::COUNTRY)?;
    source.add("POPULATION", schema::source::POPULATION)?;
    m.add_submodule(&source)?;

    let record = PyModule::new(m.py(), "record")?;
    record.add("YEAR", schema::record::YEAR)?;
    record.add("COUNTRY", schema::record::COUNTRY)?;
    record.add("POPULATION", schema::record::POPULATION)?;
    record.add("REGION", schema::record::REGION)?;
    m.add_submodule(&record)?;

    let regions: Vec<&str> = Region::ALL.iter().map(|r| r.as_str()).collect();
    m.add("REGIONS", regions)?;

    Ok(())
}

#[pymodule]
fn population_race(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyRace>()?;
    m.add_function(wrap_pyfunction!(load_records, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}

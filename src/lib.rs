//! Bar chart race engine for national population figures.
//!
//! CSV text is parsed into [`dataset::Record`]s, grouped into ranked
//! [`aggregation::YearBuckets`], and played back through the
//! [`engine::Engine`], which tweens displayed values between years.

pub mod aggregation;
pub mod config;
pub mod cursor;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod format;
pub mod race;
pub mod region;
pub mod schema;
pub mod server;
pub mod timer;

#[cfg(feature = "python")]
mod python;

pub use aggregation::{aggregate, RankedRecord, UnmappedPolicy, YearBuckets};
pub use dataset::{load_csv_file, parse_csv, Record};
pub use engine::{DisplayFrame, Engine, EngineOptions, EngineState, FrameRow, RegionFilter};
pub use error::RaceError;
pub use race::Race;
pub use region::{CountryTable, Region};

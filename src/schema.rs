/// Column-name constants for population-race.
/// Single source of truth - also exported to Python when built with `python`.

// ── Source CSV columns ──────────────────────────────────────────────────────
pub mod source {
    pub const YEAR: &str = "Year";
    pub const COUNTRY: &str = "Country name";
    pub const POPULATION: &str = "Population";

    pub const REQUIRED: [&str; 3] = [YEAR, COUNTRY, POPULATION];
}

// ── Typed record columns ────────────────────────────────────────────────────
pub mod record {
    pub const YEAR: &str = "year";
    pub const COUNTRY: &str = "country";
    pub const POPULATION: &str = "population";
    pub const REGION: &str = "region";
}

// ── Race defaults ───────────────────────────────────────────────────────────
pub mod defaults {
    pub const TOP_N: usize = 12;
    pub const TRANSITION_MS: u64 = 900;
    pub const STEP_MS: u64 = 1500;
    pub const DETAIL_MS: u64 = 5000;
    pub const MIN_YEAR: i32 = 1950;
    pub const MAX_YEAR: i32 = 2021;
    pub const PORT: u16 = 3000;
    pub const CSV_PATH: &str = "public/population-and-demography.csv";
}

//! Ranking & interpolation engine.
//!
//! Holds the top-N rows of the selected year and tweens the displayed value
//! of each row from what was on screen to the new target. Time is always
//! passed in by the caller, so the engine itself never reads a clock.
//!
//! Interpolation is keyed by country: a country visible before and after a
//! year change moves from its live displayed value, a country entering the
//! ranking grows from zero, and a country leaving it disappears at once.
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::aggregation::{RankedRecord, YearBuckets};
use crate::region::Region;
use crate::schema::defaults;

/// Where the engine is in its animation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No year selected yet.
    Idle,
    /// Displayed values equal the targets of `year`.
    Settled(i32),
    /// Displayed values are on their way from `from`'s to `to`'s.
    Transitioning { from: i32, to: i32 },
}

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub top_n: usize,
    pub transition: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            top_n: defaults::TOP_N,
            transition: Duration::from_millis(defaults::TRANSITION_MS),
        }
    }
}

/// Set of regions currently shown. All regions are shown by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFilter {
    enabled: BTreeSet<Region>,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self {
            enabled: Region::ALL.into_iter().collect(),
        }
    }
}

impl RegionFilter {
    pub fn contains(&self, region: Region) -> bool {
        self.enabled.contains(&region)
    }

    /// Flip `region`; returns whether it is now shown.
    pub fn toggle(&mut self, region: Region) -> bool {
        if self.enabled.remove(&region) {
            false
        } else {
            self.enabled.insert(region);
            true
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = Region> + '_ {
        self.enabled.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

/// One visible bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRow {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub country: String,
    pub region: Region,
    /// Target population for the selected year.
    pub population: u64,
    /// Value currently on screen; equals `population` once settled.
    pub displayed: u64,
}

/// Live visual state for the selected year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    pub year: Option<i32>,
    pub rows: Vec<FrameRow>,
}

impl DisplayFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the values currently on screen.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.displayed).sum()
    }

    /// Largest target population among visible rows, never below 1.
    pub fn max_population(&self) -> u64 {
        self.rows.iter().map(|r| r.population).max().unwrap_or(0).max(1)
    }

    /// Width of the bar at `index` relative to the widest, in `[0, 1]`.
    pub fn bar_fraction(&self, index: usize) -> f64 {
        self.rows
            .get(index)
            .map(|r| (r.displayed as f64 / self.max_population() as f64).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Axis labels at 20% steps of the maximum.
    pub fn axis_ticks(&self) -> [u64; 5] {
        let max = self.max_population();
        [1u64, 2, 3, 4, 5].map(|k| (max as u128 * k as u128 / 5) as u64)
    }

    pub fn detail(&self, country: &str) -> Option<&FrameRow> {
        self.rows.iter().find(|r| r.country == country)
    }
}

/// Linear progress of a tween, clamped to `[0, 1]`. A zero duration is done.
pub fn progress(started: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// Rounded linear interpolation. Exactly `to` at progress 1.
pub fn interpolate(from: u64, to: u64, progress: f64) -> u64 {
    if progress >= 1.0 {
        return to;
    }
    if progress <= 0.0 {
        return from;
    }
    let value = from as f64 + (to as f64 - from as f64) * progress;
    value.round().clamp(from.min(to) as f64, from.max(to) as f64) as u64
}

struct Tween {
    started: Instant,
    from: Vec<u64>,
}

pub struct Engine {
    buckets: Arc<YearBuckets>,
    options: EngineOptions,
    filter: RegionFilter,
    state: EngineState,
    frame: DisplayFrame,
    tween: Option<Tween>,
}

impl Engine {
    pub fn new(buckets: Arc<YearBuckets>, options: EngineOptions) -> Self {
        Self {
            buckets,
            options,
            filter: RegionFilter::default(),
            state: EngineState::Idle,
            frame: DisplayFrame::default(),
            tween: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn filter(&self) -> &RegionFilter {
        &self.filter
    }

    pub fn buckets(&self) -> &YearBuckets {
        &self.buckets
    }

    /// Year currently shown or being moved to.
    pub fn current_year(&self) -> Option<i32> {
        match self.state {
            EngineState::Idle => None,
            EngineState::Settled(year) => Some(year),
            EngineState::Transitioning { to, .. } => Some(to),
        }
    }

    /// Top-N rows for `year` after the region filter, before any tweening.
    pub fn ranked(&self, year: i32) -> Vec<&RankedRecord> {
        self.buckets
            .year(year)
            .iter()
            .filter(|r| self.filter.contains(r.region))
            .take(self.options.top_n)
            .collect()
    }

    /// Switch to `year`.
    ///
    /// The first selection shows its values immediately. Later selections,
    /// including ones arriving mid-transition, tween from whatever is on
    /// screen at `now`.
    pub fn select_year(&mut self, year: i32, now: Instant) {
        self.advance(now);

        let live: HashMap<String, u64> = self
            .frame
            .rows
            .drain(..)
            .map(|row| (row.country, row.displayed))
            .collect();

        let rows: Vec<FrameRow> = self
            .ranked(year)
            .into_iter()
            .enumerate()
            .map(|(i, r)| FrameRow {
                rank: i + 1,
                country: r.country.clone(),
                region: r.region,
                population: r.population,
                displayed: r.population,
            })
            .collect();

        let previous = self.current_year();
        self.frame = DisplayFrame {
            year: Some(year),
            rows,
        };

        match previous {
            Some(from) if !self.options.transition.is_zero() => {
                let from_values: Vec<u64> = self
                    .frame
                    .rows
                    .iter()
                    .map(|row| live.get(&row.country).copied().unwrap_or(0))
                    .collect();
                for (row, &start) in self.frame.rows.iter_mut().zip(&from_values) {
                    row.displayed = start;
                }
                self.tween = Some(Tween {
                    started: now,
                    from: from_values,
                });
                self.state = EngineState::Transitioning { from, to: year };
            }
            _ => {
                self.tween = None;
                self.state = EngineState::Settled(year);
            }
        }
        tracing::trace!(year, rows = self.frame.len(), "selected year");
    }

    /// Show or hide a region; the current year is re-selected so the ranking
    /// reflects the new filter.
    pub fn toggle_region(&mut self, region: Region, now: Instant) -> bool {
        let shown = self.filter.toggle(region);
        if let Some(year) = self.current_year() {
            self.select_year(year, now);
        }
        shown
    }

    /// Advance the tween to `now` and return the live frame.
    pub fn tick(&mut self, now: Instant) -> &DisplayFrame {
        self.advance(now);
        &self.frame
    }

    /// Last computed frame, without advancing time.
    pub fn frame(&self) -> &DisplayFrame {
        &self.frame
    }

    fn advance(&mut self, now: Instant) {
        let Some(tween) = &self.tween else {
            return;
        };
        let p = progress(tween.started, now, self.options.transition);
        for (row, &from) in self.frame.rows.iter_mut().zip(&tween.from) {
            row.displayed = interpolate(from, row.population, p);
        }
        if p >= 1.0 {
            self.tween = None;
            if let EngineState::Transitioning { to, .. } = self.state {
                self.state = EngineState::Settled(to);
            }
        }
    }
}

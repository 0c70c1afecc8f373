use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregation::YearBuckets;
use crate::cursor::YearCursor;
use crate::engine::{DisplayFrame, Engine, EngineOptions, EngineState, FrameRow};
use crate::region::Region;
use crate::schema::defaults;

const DETAIL_TIMEOUT: Duration = Duration::from_millis(defaults::DETAIL_MS);

struct Popover {
    country: String,
    closes_at: Instant,
}

/// Playback controller: turns timer ticks, scrubs, play/pause and region
/// toggles into year selections on the engine.
///
/// All events go through `&mut self`, so they are applied in the order the
/// caller receives them.
pub struct Race {
    engine: Engine,
    cursor: YearCursor,
    playing: bool,
    popover: Option<Popover>,
}

impl Race {
    /// Build a race over the full year range of `buckets`, showing the
    /// first year and playing.
    pub fn new(buckets: Arc<YearBuckets>, options: EngineOptions, now: Instant) -> Self {
        let cursor = YearCursor::for_buckets(&buckets);
        Self::with_cursor(buckets, options, cursor, now)
    }

    pub fn with_cursor(
        buckets: Arc<YearBuckets>,
        options: EngineOptions,
        cursor: YearCursor,
        now: Instant,
    ) -> Self {
        let mut engine = Engine::new(buckets, options);
        engine.select_year(cursor.current(), now);
        Self {
            engine,
            cursor,
            playing: true,
            popover: None,
        }
    }

    /// Timer tick: move to the next year while playing.
    pub fn on_tick(&mut self, now: Instant) -> Option<i32> {
        if !self.playing {
            return None;
        }
        let year = self.cursor.advance();
        self.engine.select_year(year, now);
        Some(year)
    }

    /// Manual jump to `year` (clamped to the cursor range).
    pub fn scrub(&mut self, year: i32, now: Instant) -> i32 {
        let year = self.cursor.seek(year);
        self.engine.select_year(year, now);
        year
    }

    /// Flip play/pause; returns whether the race is now playing.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        tracing::debug!(playing = self.playing, "toggled playback");
        self.playing
    }

    pub fn toggle_region(&mut self, region: Region, now: Instant) -> bool {
        self.engine.toggle_region(region, now)
    }

    pub fn frame(&mut self, now: Instant) -> &DisplayFrame {
        self.engine.tick(now)
    }

    /// Open the detail popover for `country`, replacing any open one, or
    /// close it when it is already open. Returns whether it is now open.
    /// An open popover closes itself five seconds after it was opened.
    pub fn toggle_detail(&mut self, country: &str, now: Instant) -> bool {
        self.expire_detail(now);
        if self.popover.as_ref().is_some_and(|p| p.country == country) {
            self.popover = None;
            return false;
        }
        self.popover = Some(Popover {
            country: country.to_string(),
            closes_at: now + DETAIL_TIMEOUT,
        });
        true
    }

    pub fn close_detail(&mut self) {
        self.popover = None;
    }

    /// Row behind the open popover at `now`, if it is open and the country
    /// is still visible.
    pub fn detail(&mut self, now: Instant) -> Option<&FrameRow> {
        self.expire_detail(now);
        let country = &self.popover.as_ref()?.country;
        self.engine.frame().detail(country)
    }

    fn expire_detail(&mut self, now: Instant) {
        if self.popover.as_ref().is_some_and(|p| now >= p.closes_at) {
            self.popover = None;
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn year(&self) -> i32 {
        self.cursor.current()
    }

    pub fn cursor(&self) -> &YearCursor {
        &self.cursor
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{aggregate, UnmappedPolicy};
    use crate::dataset::Record;
    use crate::region::CountryTable;

    fn race(now: Instant) -> Race {
        let records = vec![
            Record::new(1950, "Chad", 10),
            Record::new(1951, "Chad", 20),
            Record::new(1952, "Chad", 30),
        ];
        let buckets = aggregate(&records, CountryTable::builtin(), UnmappedPolicy::Exclude);
        Race::new(
            Arc::new(buckets),
            EngineOptions {
                top_n: 12,
                transition: Duration::from_millis(900),
            },
            now,
        )
    }

    #[test]
    fn starts_settled_on_the_first_year() {
        let t0 = Instant::now();
        let race = race(t0);
        assert!(race.is_playing());
        assert_eq!(race.year(), 1950);
        assert_eq!(race.state(), EngineState::Settled(1950));
    }

    #[test]
    fn ticks_advance_and_wrap() {
        let t0 = Instant::now();
        let mut race = race(t0);
        assert_eq!(race.on_tick(t0), Some(1951));
        assert_eq!(race.on_tick(t0), Some(1952));
        assert_eq!(race.on_tick(t0), Some(1950));
    }

    #[test]
    fn paused_race_ignores_ticks_but_accepts_scrubs() {
        let t0 = Instant::now();
        let mut race = race(t0);
        assert!(!race.toggle_play());
        assert_eq!(race.on_tick(t0), None);
        assert_eq!(race.year(), 1950);

        assert_eq!(race.scrub(1952, t0), 1952);
        let frame = race.frame(t0 + Duration::from_millis(900));
        assert_eq!(frame.year, Some(1952));
        assert_eq!(frame.total(), 30);
    }

    #[test]
    fn detail_closes_itself_after_five_seconds() {
        let t0 = Instant::now();
        let mut race = race(t0);
        assert!(race.toggle_detail("Chad", t0));
        assert_eq!(race.detail(t0).map(|r| r.population), Some(10));
        assert!(race.detail(t0 + Duration::from_millis(4999)).is_some());
        assert!(race.detail(t0 + DETAIL_TIMEOUT).is_none());
    }

    #[test]
    fn toggling_the_open_country_closes_and_another_restarts_the_timeout() {
        let t0 = Instant::now();
        let mut race = race(t0);
        assert!(race.toggle_detail("Chad", t0));
        assert!(!race.toggle_detail("Chad", t0));
        assert!(race.detail(t0).is_none());

        assert!(race.toggle_detail("Chad", t0));
        let later = t0 + Duration::from_secs(4);
        assert!(race.toggle_detail("Niger", later));
        assert!(race.detail(later).is_none());
        assert!(race.toggle_detail("Chad", later));
        assert!(race.detail(t0 + Duration::from_secs(8)).is_some());

        race.close_detail();
        assert!(race.detail(later).is_none());
    }
}

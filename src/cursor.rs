use crate::aggregation::YearBuckets;
use crate::schema::defaults;

/// Selected year within an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCursor {
    min: i32,
    max: i32,
    current: i32,
}

impl YearCursor {
    /// Cursor over `[min, max]` starting at `min`. Bounds are swapped if
    /// given in the wrong order.
    pub fn new(min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            current: min,
        }
    }

    /// Range covered by the data, or 1950–2021 when there is none.
    pub fn for_buckets(buckets: &YearBuckets) -> Self {
        let (min, max) = buckets
            .year_range()
            .unwrap_or((defaults::MIN_YEAR, defaults::MAX_YEAR));
        Self::new(min, max)
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    /// Number of years in the range.
    pub fn span(&self) -> u64 {
        (i64::from(self.max) - i64::from(self.min) + 1) as u64
    }

    /// Step one year forward, wrapping from the last year to the first.
    pub fn advance(&mut self) -> i32 {
        self.current = if self.current < self.max {
            self.current + 1
        } else {
            self.min
        };
        self.current
    }

    /// Jump to `year`, clamped into range.
    pub fn seek(&mut self, year: i32) -> i32 {
        self.current = year.clamp(self.min, self.max);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_to_the_first_year() {
        let mut cursor = YearCursor::new(2019, 2021);
        assert_eq!(cursor.current(), 2019);
        assert_eq!(cursor.advance(), 2020);
        assert_eq!(cursor.advance(), 2021);
        assert_eq!(cursor.advance(), 2019);
    }

    #[test]
    fn seek_clamps() {
        let mut cursor = YearCursor::new(1950, 2021);
        assert_eq!(cursor.seek(1990), 1990);
        assert_eq!(cursor.seek(1800), 1950);
        assert_eq!(cursor.seek(3000), 2021);
    }

    #[test]
    fn single_year_range_stays_put() {
        let mut cursor = YearCursor::new(2000, 2000);
        assert_eq!(cursor.advance(), 2000);
    }

    #[test]
    fn span_covers_the_full_i32_range() {
        assert_eq!(YearCursor::new(1950, 2021).span(), 72);
        assert_eq!(YearCursor::new(i32::MAX, i32::MIN).span(), 1 << 32);
    }

    #[test]
    fn empty_data_falls_back_to_default_range() {
        let cursor = YearCursor::for_buckets(&YearBuckets::default());
        assert_eq!((cursor.min(), cursor.max()), (1950, 2021));
    }
}

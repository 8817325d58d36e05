use chrono::NaiveDate;

use crate::engine::geometry::days_between;

pub const MIN_PIXELS_PER_DAY: f32 = 2.0;
pub const MAX_PIXELS_PER_DAY: f32 = 80.0;

/// Manages the visible viewport of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineViewport {
    /// The leftmost visible date; the anchor of the shared horizontal axis.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    /// Pixels per day (controls zoom level).
    pub pixels_per_day: f32,
}

impl TimelineViewport {
    pub fn new(start: NaiveDate, end: NaiveDate, pixels_per_day: f32) -> Self {
        Self {
            start,
            end,
            pixels_per_day: pixels_per_day.clamp(MIN_PIXELS_PER_DAY, MAX_PIXELS_PER_DAY),
        }
    }

    /// Viewport padded around a project's date span.
    pub fn around(span: Option<(NaiveDate, NaiveDate)>, today: NaiveDate, pixels_per_day: f32) -> Self {
        let (min, max) = span.unwrap_or((today, today));
        Self::new(
            min - chrono::Duration::days(7),
            max + chrono::Duration::days(21),
            pixels_per_day,
        )
    }

    /// Convert a date to an x-pixel offset from the viewport start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        days_between(self.start, date) as f32 * self.pixels_per_day
    }

    /// Total width in pixels for the visible range, including the last day.
    pub fn total_width(&self) -> f32 {
        self.date_to_x(self.end) + self.pixels_per_day
    }

    /// Zoom in (increase pixels per day).
    pub fn zoom_in(&mut self) {
        self.pixels_per_day = (self.pixels_per_day * 1.2).min(MAX_PIXELS_PER_DAY);
    }

    /// Zoom out (decrease pixels per day).
    pub fn zoom_out(&mut self) {
        self.pixels_per_day = (self.pixels_per_day / 1.2).max(MIN_PIXELS_PER_DAY);
    }

    /// One zoom step per frame from an input zoom factor (1.0 = unchanged).
    pub fn apply_zoom_delta(&mut self, delta: f32) {
        if delta > 1.0 {
            self.zoom_in();
        } else if delta < 1.0 {
            self.zoom_out();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_date_to_x_scales_by_zoom() {
        let vp = TimelineViewport::new(day(1), day(31), 10.0);
        assert_eq!(vp.date_to_x(day(1)), 0.0);
        assert_eq!(vp.date_to_x(day(4)), 30.0);
        assert_eq!(vp.total_width(), 310.0);
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut vp = TimelineViewport::new(day(1), day(2), 79.0);
        vp.zoom_in();
        assert_eq!(vp.pixels_per_day, MAX_PIXELS_PER_DAY);
        let mut vp = TimelineViewport::new(day(1), day(2), 0.5);
        assert_eq!(vp.pixels_per_day, MIN_PIXELS_PER_DAY);
        vp.zoom_out();
        assert_eq!(vp.pixels_per_day, MIN_PIXELS_PER_DAY);
    }

    #[test]
    fn test_zoom_delta_direction() {
        let mut vp = TimelineViewport::new(day(1), day(2), 10.0);
        vp.apply_zoom_delta(1.0);
        assert_eq!(vp.pixels_per_day, 10.0);
        vp.apply_zoom_delta(1.1);
        assert!(vp.pixels_per_day > 10.0);
        vp.apply_zoom_delta(0.9);
        vp.apply_zoom_delta(0.9);
        assert!(vp.pixels_per_day < 10.0);
    }
}

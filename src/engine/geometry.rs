//! Pure mapping from task date ranges onto the chart's pixel space.
//!
//! All coordinates here are chart-local: x = 0 is the timeline anchor date,
//! y = 0 is the top of the header. The visualizer adds the screen origin.

use chrono::NaiveDate;
use egui::{pos2, vec2, Pos2, Rect};

use crate::model::{DependencyKind, Task};

/// Horizontal stub length of a connector before it turns.
const CONNECTOR_STUB: f32 = 10.0;

/// Horizontal placement of a task bar on the shared axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPosition {
    pub left: f32,
    pub width: f32,
}

impl BarPosition {
    /// Same position with the width raised to at least `min_width`.
    pub fn clamped(self, min_width: f32) -> Self {
        Self {
            left: self.left,
            width: self.width.max(min_width),
        }
    }
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Position of a task bar, inclusive of both its first and last day.
///
/// A task whose end precedes its start gets a zero or negative width; the
/// caller decides how to present that.
pub fn position(task: &Task, timeline_start: NaiveDate, day_width: f32) -> BarPosition {
    let left = days_between(timeline_start, task.start) as f32 * day_width;
    let width = (days_between(task.start, task.end) + 1) as f32 * day_width;
    BarPosition { left, width }
}

/// Vertical layout of the task rows below the timeline header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    pub header_height: f32,
    pub row_height: f32,
    pub row_gap: f32,
    /// Vertical inset so bars don't touch row edges.
    pub bar_inset: f32,
}

impl RowLayout {
    /// Height of one row band including its gap.
    pub fn pitch(&self) -> f32 {
        self.row_height + self.row_gap
    }

    pub fn row_top(&self, row: usize) -> f32 {
        self.header_height + row as f32 * self.pitch()
    }

    pub fn content_height(&self, rows: usize) -> f32 {
        self.row_top(rows)
    }

    /// Row under a chart-local y coordinate, if any.
    pub fn row_at(&self, y: f32, row_count: usize) -> Option<usize> {
        if y < self.header_height || self.pitch() <= 0.0 {
            return None;
        }
        let row = ((y - self.header_height) / self.pitch()).floor() as usize;
        (row < row_count).then_some(row)
    }
}

/// Chart-local rectangle of a bar in the given row.
pub fn bar_rect(position: BarPosition, row: usize, layout: &RowLayout) -> Rect {
    let top = layout.row_top(row) + layout.row_gap + layout.bar_inset;
    Rect::from_min_size(
        pos2(position.left, top),
        vec2(position.width, layout.row_height - layout.bar_inset * 2.0),
    )
}

/// Anchor on a bar for one side of a dependency.
fn anchor(rect: Rect, finish_side: bool) -> Pos2 {
    if finish_side {
        rect.right_center()
    } else {
        rect.left_center()
    }
}

/// Orthogonal connector from the upstream bar to the downstream bar.
///
/// The connector leaves the side named by the first half of the relation
/// (finish = right edge, start = left edge) and enters the side named by the
/// second half, so the arrow head always points at the constrained boundary.
pub fn edge_path(kind: DependencyKind, from_rect: Rect, to_rect: Rect) -> Vec<Pos2> {
    let p0 = anchor(from_rect, kind.from_finish());
    let end = anchor(to_rect, kind.to_finish());

    let out_dir = if kind.from_finish() { 1.0 } else { -1.0 };
    // Enter a start edge from the left, a finish edge from the right.
    let in_dir = if kind.to_finish() { 1.0 } else { -1.0 };

    let p1 = pos2(p0.x + out_dir * CONNECTOR_STUB, p0.y);
    let p4 = pos2(end.x + in_dir * CONNECTOR_STUB, end.y);
    let mid_y = if (p0.y - end.y).abs() < f32::EPSILON {
        p0.y
    } else {
        (p0.y + end.y) / 2.0
    };

    vec![p0, p1, pos2(p1.x, mid_y), pos2(p4.x, mid_y), p4, end]
}

/// Shortest distance from a point to a polyline.
pub fn distance_to_path(point: Pos2, path: &[Pos2]) -> f32 {
    match path {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => path
            .windows(2)
            .map(|seg| distance_to_segment(point, seg[0], seg[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

//! Mutable dashboard state reconciling partial redraws against the
//! last full one. Owned exclusively by the scheduler loop.

/// Cached table geometry, valid until the next full redraw recomputes
/// it (the width can change when the printed reading widens).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Inner table width, between the border columns.
    pub width: usize,
    /// Left column width in the split rows.
    pub left_width: usize,
    /// Right column width in the split rows.
    pub right_width: usize,
    /// Separator with the column junction, reused as the bottom border.
    pub split_separator: String,
}

/// Values carried between ticks.
///
/// `layout` stays `None` until the first full redraw; a partial redraw
/// must not run before then.
#[derive(Debug)]
pub struct DashboardState {
    /// Largest reading seen, historical or live. Never decreases.
    pub max_power: f64,
    /// Seconds until the next full data refresh.
    pub next_update_in: i64,
    /// Raw `endTime` of the last reading, exactly as the API sent it.
    pub last_update_end: String,
    /// Geometry cached by the last full redraw.
    pub layout: Option<Layout>,
}

impl DashboardState {
    pub fn new(max_power: f64) -> Self {
        Self {
            max_power,
            next_update_in: 0,
            last_update_end: String::new(),
            layout: None,
        }
    }

    /// Fold a live reading into the reference maximum.
    pub fn observe(&mut self, value: f64) {
        if value > self.max_power {
            self.max_power = value;
        }
    }
}

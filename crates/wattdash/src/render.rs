//! Table geometry and terminal emission.
//!
//! Row building is pure string work so tests can assert on it; the
//! `draw_*` functions are the only place terminal commands happen.
//! Output uses `\r\n` because the session runs in raw mode.

use std::io::{self, Write};

use chrono::{DateTime, FixedOffset};
use crossterm::{cursor, queue, style::Print, terminal};

use crate::state::Layout;

/// Gauge resolution in bar glyphs.
pub const BAR_WIDTH: usize = 12;

/// Narrowest inner width the layout will produce.
const MIN_TABLE_WIDTH: usize = 26;

/// Rows a partial redraw overwrites: the split row and the bottom
/// border. Full and partial redraws both park the cursor over these.
const TRAILING_ROWS: u16 = 2;

/// A fully built table plus the geometry that produced it.
#[derive(Debug)]
pub struct Table {
    pub rows: Vec<String>,
    pub layout: Layout,
}

/// Bar glyph count for a reading against the reference maximum.
///
/// `floor(value / max * BAR_WIDTH)` clamped to `[0, BAR_WIDTH]`; a zero
/// maximum renders an empty bar rather than dividing by zero.
pub fn bar_len(value: f64, max_power: f64) -> usize {
    if max_power <= 0.0 {
        return 0;
    }
    let ratio = (value / max_power).clamp(0.0, 1.0);
    ((ratio * BAR_WIDTH as f64).floor() as usize).min(BAR_WIDTH)
}

/// Countdown in `H:MM.SS` form, clamped at zero.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}.{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Geometry for a given inner width. The column boundary sits at
/// `round(width / 2)`.
pub fn layout_for(width: usize) -> Layout {
    let left_width = (width + 1) / 2;
    let right_width = width - left_width - 1;
    let split_separator = format!(
        "+{}+{}+",
        "-".repeat(left_width),
        "-".repeat(right_width)
    );
    Layout {
        width,
        left_width,
        right_width,
        split_separator,
    }
}

/// A two-column row rendered with the cached geometry.
pub fn split_row(layout: &Layout, left: &str, right: &str) -> String {
    format!(
        "|{:^lw$}|{:^rw$}|",
        left,
        right,
        lw = layout.left_width,
        rw = layout.right_width
    )
}

/// Build every row of the table for a full redraw.
pub fn build_table(
    value: f64,
    max_power: f64,
    observed: &DateTime<FixedOffset>,
    clock: &str,
    countdown_secs: i64,
) -> Table {
    let bar = "#".repeat(bar_len(value, max_power));
    let gauge_inner = format!("{:<bw$}  {:.1}", bar, value, bw = BAR_WIDTH);
    let width = (gauge_inner.len() + 2).max(MIN_TABLE_WIDTH);
    let layout = layout_for(width);

    let separator = format!("+{}+", "-".repeat(width));
    let date_row = format!(
        "|{:^w$}|",
        observed.format("%Y-%m-%d %H:%M").to_string(),
        w = width
    );
    let gauge_row = format!("|{:^w$}|", gauge_inner, w = width);
    let time_row = split_row(&layout, clock, &format_countdown(countdown_secs));

    let rows = vec![
        separator.clone(),
        date_row,
        separator,
        gauge_row,
        layout.split_separator.clone(),
        time_row,
        layout.split_separator.clone(),
    ];
    Table { rows, layout }
}

/// Emit a complete table and park the cursor over the trailing rows.
///
/// With `overwriting` set, the cursor first climbs from its parked
/// position back to the table top so the new table lands over the old
/// one; each row clears to the end of the line so a narrower table
/// leaves no residue from a wider predecessor.
pub fn draw_full(out: &mut impl Write, table: &Table, overwriting: bool) -> io::Result<()> {
    queue!(out, cursor::MoveToColumn(0))?;
    if overwriting {
        queue!(out, cursor::MoveUp(table.rows.len() as u16 - TRAILING_ROWS))?;
    }
    for row in &table.rows {
        queue!(
            out,
            Print(row),
            terminal::Clear(terminal::ClearType::UntilNewLine),
            Print("\r\n")
        )?;
    }
    queue!(out, cursor::MoveUp(TRAILING_ROWS))?;
    out.flush()
}

/// Rewrite only the time row and bottom border, then park the cursor
/// back over them.
pub fn draw_partial(
    out: &mut impl Write,
    layout: &Layout,
    clock: &str,
    countdown: &str,
) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveToColumn(0),
        Print(split_row(layout, clock, countdown)),
        Print("\r\n"),
        Print(&layout.split_separator),
        Print("\r\n"),
        cursor::MoveUp(TRAILING_ROWS)
    )?;
    out.flush()
}

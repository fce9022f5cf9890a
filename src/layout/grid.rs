//! # Grid Layout
//!
//! Column sizing and cell origins for grid containers. Supports:
//! - Fixed (dots), percentage, auto and fill column widths
//! - Row-major cell placement, `columns.len()` cells per row
//! - Row/column gaps and per-row height overrides
//!
//! Columns never collapse below their widest cell. When the fill split is
//! smaller than that minimum, the column keeps its minimum and the grid
//! overflows its nominal width.

use crate::model::TrackSize;

/// Number of columns a grid actually lays out. An empty template acts as a
/// single fill column.
pub fn column_count(template: &[TrackSize]) -> usize {
    template.len().max(1)
}

/// Track definition for column `i`, defaulting to `Fill`.
pub fn track(template: &[TrackSize], i: usize) -> TrackSize {
    template.get(i).copied().unwrap_or(TrackSize::Fill)
}

/// `(row, column)` of the cell at `index` in row-major order.
pub fn cell_position(index: usize, columns: usize) -> (usize, usize) {
    (index / columns, index % columns)
}

/// Number of rows needed for `cells` cells.
pub fn row_count(cells: usize, columns: usize) -> usize {
    cells.div_ceil(columns)
}

/// Width offered to a cell before columns are resolved: the fixed value for
/// fixed/percent tracks. Auto and fill tracks offer nothing, so a cell that
/// stretches to its available width (a rule, a `Fill` box) does not claim the
/// whole grid as its minimum.
pub fn provisional_width(track: TrackSize, content_width: f64) -> f64 {
    match track {
        TrackSize::Dots(w) => w.max(0.0),
        TrackSize::Percent(p) => (content_width.max(0.0) * p / 100.0).max(0.0),
        TrackSize::Auto | TrackSize::Fill => 0.0,
    }
}

/// Resolve column widths.
///
/// Algorithm:
/// 1. Fixed and percent columns → their resolved value
/// 2. Auto columns → `minimums[i]` (widest cell seen in the column)
/// 3. Fill columns → even split of what remains, floored at `minimums[i]`
pub fn resolve_columns(
    template: &[TrackSize],
    content_width: f64,
    gap: f64,
    minimums: &[f64],
) -> Vec<f64> {
    let count = column_count(template);
    let total_gap = if count > 1 {
        gap * (count - 1) as f64
    } else {
        0.0
    };

    let mut widths = vec![0.0_f64; count];
    let mut remaining = content_width - total_gap;
    let mut fill_count = 0usize;

    for (i, width) in widths.iter_mut().enumerate() {
        let min = minimums.get(i).copied().unwrap_or(0.0).max(0.0);
        match track(template, i) {
            TrackSize::Dots(_) | TrackSize::Percent(_) => {
                *width = provisional_width(track(template, i), content_width);
                remaining -= *width;
            }
            TrackSize::Auto => {
                *width = min;
                remaining -= min;
            }
            TrackSize::Fill => fill_count += 1,
        }
    }

    if fill_count > 0 {
        let share = remaining.max(0.0) / fill_count as f64;
        for (i, width) in widths.iter_mut().enumerate() {
            if matches!(track(template, i), TrackSize::Fill) {
                let min = minimums.get(i).copied().unwrap_or(0.0).max(0.0);
                *width = share.max(min);
            }
        }
    }

    widths
}

/// Offsets of each track from the grid's content origin, accounting for gaps.
pub fn track_offsets(sizes: &[f64], gap: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut x = 0.0;
    for size in sizes {
        offsets.push(x);
        x += size + gap;
    }
    offsets
}

/// Total extent of a track list including gaps.
pub fn total_extent(sizes: &[f64], gap: f64) -> f64 {
    let sum: f64 = sizes.iter().sum();
    if sizes.len() > 1 {
        sum + gap * (sizes.len() - 1) as f64
    } else {
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fixed() {
        let tracks = vec![TrackSize::Dots(100.0), TrackSize::Dots(200.0)];
        assert_eq!(resolve_columns(&tracks, 400.0, 0.0, &[]), vec![100.0, 200.0]);
    }

    #[test]
    fn test_resolve_percent() {
        let tracks = vec![TrackSize::Percent(25.0), TrackSize::Fill];
        assert_eq!(
            resolve_columns(&tracks, 800.0, 0.0, &[0.0, 0.0]),
            vec![200.0, 600.0]
        );
    }

    #[test]
    fn test_equal_fill_columns() {
        let tracks = vec![TrackSize::Fill; 4];
        let widths = resolve_columns(&tracks, 1000.0, 0.0, &[0.0; 4]);
        for w in widths {
            assert!((w - 250.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_fill_with_gap() {
        let tracks = vec![TrackSize::Fill, TrackSize::Fill];
        // 210 - 10 (gap) = 200, split equally = 100 each
        assert_eq!(resolve_columns(&tracks, 210.0, 10.0, &[0.0, 0.0]), vec![100.0, 100.0]);
    }

    #[test]
    fn test_auto_takes_minimum() {
        let tracks = vec![TrackSize::Auto, TrackSize::Fill];
        assert_eq!(
            resolve_columns(&tracks, 400.0, 0.0, &[80.0, 0.0]),
            vec![80.0, 320.0]
        );
    }

    #[test]
    fn test_fill_never_below_minimum() {
        // Share would be 100, but column 1 holds a 180-dot cell.
        let tracks = vec![TrackSize::Fill, TrackSize::Fill];
        let widths = resolve_columns(&tracks, 200.0, 0.0, &[20.0, 180.0]);
        assert_eq!(widths, vec![100.0, 180.0]);
        assert!(total_extent(&widths, 0.0) > 200.0);
    }

    #[test]
    fn test_empty_template_is_one_fill_column() {
        assert_eq!(resolve_columns(&[], 300.0, 0.0, &[]), vec![300.0]);
    }

    #[test]
    fn test_track_offsets() {
        let widths = vec![100.0, 200.0, 150.0];
        assert_eq!(track_offsets(&widths, 10.0), vec![0.0, 110.0, 320.0]);
        assert_eq!(total_extent(&widths, 10.0), 470.0);
    }

    #[test]
    fn test_provisional_width() {
        assert_eq!(provisional_width(TrackSize::Dots(120.0), 900.0), 120.0);
        assert_eq!(provisional_width(TrackSize::Percent(10.0), 900.0), 90.0);
        assert_eq!(provisional_width(TrackSize::Fill, 900.0), 0.0);
    }

    #[test]
    fn test_cell_positions() {
        assert_eq!(cell_position(0, 3), (0, 0));
        assert_eq!(cell_position(4, 3), (1, 1));
        assert_eq!(row_count(7, 3), 3);
        assert_eq!(row_count(0, 3), 0);
    }
}

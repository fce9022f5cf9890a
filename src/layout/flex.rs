//! # Flex Layout Utilities
//!
//! Line partitioning and main-axis distribution for flex rows. The measure
//! engine partitions lines; the layout engine distributes slack per line.

use serde::Serialize;

use crate::style::Justify;

/// A single line of items in a wrapping flex row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexLine {
    /// Index of the first item in this line.
    pub start: usize,
    /// One past the last item (exclusive end).
    pub end: usize,
    /// Packed width: item widths plus inter-item gaps.
    pub width: f64,
    /// Tallest item on the line.
    pub height: f64,
}

/// Partition items into wrap lines based on available width.
/// `items` holds each item's occupied `(width, height)` including margins.
/// Always adds at least one item per line (prevents infinite loops on oversized items).
pub fn partition_into_lines(items: &[(f64, f64)], gap: f64, available_width: f64) -> Vec<FlexLine> {
    if items.is_empty() {
        return vec![];
    }

    let mut lines = Vec::new();
    let mut current = FlexLine {
        start: 0,
        end: 0,
        width: 0.0,
        height: 0.0,
    };

    for (i, &(w, h)) in items.iter().enumerate() {
        let needed = if i == current.start { w } else { gap + w };
        if i > current.start && current.width + needed > available_width {
            current.end = i;
            lines.push(current);
            current = FlexLine {
                start: i,
                end: i,
                width: w,
                height: h,
            };
        } else {
            current.width += needed;
            current.height = current.height.max(h);
        }
    }

    // Close the last line
    current.end = items.len();
    lines.push(current);

    lines
}

/// A single unwrapped line covering every item.
pub fn single_line(items: &[(f64, f64)], gap: f64) -> FlexLine {
    let width: f64 = items.iter().map(|(w, _)| w).sum::<f64>() + total_gap(items.len(), gap);
    let height = items.iter().map(|(_, h)| *h).fold(0.0f64, f64::max);
    FlexLine {
        start: 0,
        end: items.len(),
        width,
        height,
    }
}

/// Total gap between `count` items.
pub fn total_gap(count: usize, gap: f64) -> f64 {
    if count > 1 {
        gap * (count - 1) as f64
    } else {
        0.0
    }
}

/// Width handed to each flex spacer: the free space split evenly.
pub fn spacer_share(content_width: f64, occupied: f64, spacers: usize) -> f64 {
    if spacers == 0 {
        return 0.0;
    }
    (content_width - occupied).max(0.0) / spacers as f64
}

/// Offset before the first item and extra space added between items.
/// Negative slack (overflow) packs to the start.
pub fn justify_offsets(justify: Justify, slack: f64, count: usize) -> (f64, f64) {
    let slack = slack.max(0.0);
    if count == 0 {
        return (0.0, 0.0);
    }
    match justify {
        Justify::Start => (0.0, 0.0),
        Justify::End => (slack, 0.0),
        Justify::Center => (slack / 2.0, 0.0),
        Justify::SpaceBetween => {
            if count > 1 {
                (0.0, slack / (count as f64 - 1.0))
            } else {
                (0.0, 0.0)
            }
        }
        Justify::SpaceAround => {
            let s = slack / count as f64;
            (s / 2.0, s)
        }
        Justify::SpaceEvenly => {
            let s = slack / (count as f64 + 1.0);
            (s, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(ws: &[f64]) -> Vec<(f64, f64)> {
        ws.iter().map(|&w| (w, 60.0)).collect()
    }

    #[test]
    fn test_partition_single_line_fits() {
        let lines = partition_into_lines(&widths(&[100.0, 100.0, 100.0]), 10.0, 400.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].end, 3);
        assert_eq!(lines[0].width, 320.0);
    }

    #[test]
    fn test_partition_two_line_split() {
        // 3 items × 100 + 2 gaps × 10 = 320; available = 250
        let lines = partition_into_lines(&widths(&[100.0, 100.0, 100.0]), 10.0, 250.0);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end), (0, 2));
        assert_eq!(lines[0].width, 210.0);
        assert_eq!((lines[1].start, lines[1].end), (2, 3));
        assert_eq!(lines[1].width, 100.0);
    }

    #[test]
    fn test_partition_tracks_line_height() {
        let items = vec![(100.0, 60.0), (100.0, 120.0), (100.0, 30.0)];
        let lines = partition_into_lines(&items, 0.0, 200.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].height, 120.0);
        assert_eq!(lines[1].height, 30.0);
    }

    #[test]
    fn test_partition_oversized_item() {
        let lines = partition_into_lines(&widths(&[500.0]), 10.0, 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].start, lines[0].end), (0, 1));
    }

    #[test]
    fn test_partition_empty_input() {
        assert!(partition_into_lines(&[], 10.0, 200.0).is_empty());
    }

    #[test]
    fn test_partition_exact_fit() {
        let lines = partition_into_lines(&widths(&[100.0, 100.0]), 10.0, 210.0);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_justify_space_between_single_child() {
        assert_eq!(justify_offsets(Justify::SpaceBetween, 300.0, 1), (0.0, 0.0));
    }

    #[test]
    fn test_justify_space_evenly() {
        // 3 items, 400 slack: 100 before, between and after.
        assert_eq!(justify_offsets(Justify::SpaceEvenly, 400.0, 3), (100.0, 100.0));
    }

    #[test]
    fn test_justify_space_around() {
        assert_eq!(justify_offsets(Justify::SpaceAround, 300.0, 3), (50.0, 100.0));
    }

    #[test]
    fn test_justify_overflow_packs_start() {
        assert_eq!(justify_offsets(Justify::End, -50.0, 2), (0.0, 0.0));
    }

    #[test]
    fn test_spacer_share() {
        assert_eq!(spacer_share(1000.0, 400.0, 2), 300.0);
        assert_eq!(spacer_share(100.0, 400.0, 1), 0.0);
        assert_eq!(spacer_share(100.0, 0.0, 0), 0.0);
    }
}

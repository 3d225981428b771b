//! The fixed registry of coordinate-traversal patterns.
//!
//! Ten patterns, indexed 0–9 in permanent order: the digit-to-pattern
//! binding is part of the cryptographic contract, since changing it would
//! change the password-to-key mapping of every existing document. The
//! registry is therefore a compile-time enum, not a runtime table.
//!
//! Each pattern is a pure function of the grid dimension: it yields an
//! ordered, finite sequence of `(row, column)` pairs and never looks at
//! cell contents.

use veilnote_common::{Error, Result};

/// A `(row, column)` pair within a square grid.
pub type Coordinate = (usize, usize);

/// Number of registered patterns.
pub const PATTERN_COUNT: usize = 10;

/// A coordinate-traversal order over an N×N grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Every cell, row-major.
    Fill,
    /// Cells where `row + col` is even.
    CheckerboardEven,
    /// Cells where `row + col` is odd.
    CheckerboardOdd,
    /// Full center row, then the full center column minus the center cell.
    Plus,
    /// The outer border, clockwise from the top-left by sides.
    Border,
    /// `(i, i)` top-left to bottom-right.
    MainDiagonal,
    /// `(i, N-1-i)` top-right to bottom-left.
    AntiDiagonal,
    /// Classic inward spiral.
    Spiral,
    /// Every even column, each top to bottom.
    VerticalStripes,
    /// Every even row, each left to right.
    HorizontalStripes,
}

/// The ten patterns in digit order. Never reordered.
const REGISTRY: [Pattern; PATTERN_COUNT] = [
    Pattern::Fill,
    Pattern::CheckerboardEven,
    Pattern::CheckerboardOdd,
    Pattern::Plus,
    Pattern::Border,
    Pattern::MainDiagonal,
    Pattern::AntiDiagonal,
    Pattern::Spiral,
    Pattern::VerticalStripes,
    Pattern::HorizontalStripes,
];

impl Pattern {
    /// Look up the pattern bound to a password digit.
    ///
    /// # Errors
    /// - `UnknownPattern` if `digit >= PATTERN_COUNT`. Unreachable after
    ///   password validation, but fails closed rather than indexing out of
    ///   bounds.
    pub fn from_digit(digit: u8) -> Result<Self> {
        REGISTRY
            .get(usize::from(digit))
            .copied()
            .ok_or(Error::UnknownPattern(digit))
    }

    /// The coordinates this pattern visits on a `size`×`size` grid, in
    /// traversal order.
    pub fn coordinates(self, size: usize) -> Box<dyn Iterator<Item = Coordinate>> {
        match self {
            Pattern::Fill => Box::new(row_major(size)),
            Pattern::CheckerboardEven => {
                Box::new(row_major(size).filter(|(row, col)| (row + col) % 2 == 0))
            }
            Pattern::CheckerboardOdd => {
                Box::new(row_major(size).filter(|(row, col)| (row + col) % 2 == 1))
            }
            Pattern::Plus => {
                let center = size / 2;
                Box::new(
                    (0..size)
                        .map(move |col| (center, col))
                        .chain((0..size).filter(move |&row| row != center).map(move |row| (row, center))),
                )
            }
            Pattern::Border => Box::new(border(size)),
            Pattern::MainDiagonal => Box::new((0..size).map(|i| (i, i))),
            Pattern::AntiDiagonal => Box::new((0..size).map(move |i| (i, size - 1 - i))),
            Pattern::Spiral => Box::new(spiral(size).into_iter()),
            Pattern::VerticalStripes => Box::new(
                (0..size)
                    .step_by(2)
                    .flat_map(move |col| (0..size).map(move |row| (row, col))),
            ),
            Pattern::HorizontalStripes => Box::new(
                (0..size)
                    .step_by(2)
                    .flat_map(move |row| (0..size).map(move |col| (row, col))),
            ),
        }
    }
}

fn row_major(size: usize) -> impl Iterator<Item = Coordinate> {
    (0..size).flat_map(move |row| (0..size).map(move |col| (row, col)))
}

fn border(size: usize) -> Box<dyn Iterator<Item = Coordinate>> {
    if size == 0 {
        return Box::new(std::iter::empty());
    }
    let last = size - 1;
    // Top row, then both side columns per interior row, then the bottom
    // row. A 1×1 grid visits its only cell twice; that ordering is part of
    // the derivation contract and must not be "fixed".
    Box::new(
        (0..size)
            .map(|col| (0, col))
            .chain((1..last).flat_map(move |row| [(row, 0), (row, last)]))
            .chain((0..size).map(move |col| (last, col))),
    )
}

fn spiral(size: usize) -> Vec<Coordinate> {
    let mut coords = Vec::with_capacity(size * size);
    if size == 0 {
        return coords;
    }
    let mut top: isize = 0;
    let mut bottom: isize = size as isize - 1;
    let mut left: isize = 0;
    let mut right: isize = size as isize - 1;
    while top <= bottom && left <= right {
        for col in left..=right {
            coords.push((top as usize, col as usize));
        }
        top += 1;
        for row in top..=bottom {
            coords.push((row as usize, right as usize));
        }
        right -= 1;
        if top <= bottom {
            for col in (left..=right).rev() {
                coords.push((bottom as usize, col as usize));
            }
            bottom -= 1;
        }
        if left <= right {
            for row in (top..=bottom).rev() {
                coords.push((row as usize, left as usize));
            }
            left += 1;
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect(pattern: Pattern, size: usize) -> Vec<Coordinate> {
        pattern.coordinates(size).collect()
    }

    fn in_bounds(coords: &[Coordinate], size: usize) -> bool {
        coords.iter().all(|&(row, col)| row < size && col < size)
    }

    #[test]
    fn test_from_digit_covers_all_ten() {
        for digit in 0..PATTERN_COUNT as u8 {
            Pattern::from_digit(digit).unwrap();
        }
        assert_eq!(Pattern::from_digit(0).unwrap(), Pattern::Fill);
        assert_eq!(Pattern::from_digit(7).unwrap(), Pattern::Spiral);
    }

    #[test]
    fn test_from_digit_rejects_out_of_range() {
        for digit in [10u8, 11, 255] {
            let err = Pattern::from_digit(digit).unwrap_err();
            assert!(matches!(err, veilnote_common::Error::UnknownPattern(d) if d == digit));
        }
    }

    #[test]
    fn test_fill_visits_whole_grid_row_major() {
        let coords = collect(Pattern::Fill, 4);
        assert_eq!(coords.len(), 16);
        assert_eq!(coords[0], (0, 0));
        assert_eq!(coords[1], (0, 1));
        assert_eq!(coords[15], (3, 3));
        assert_eq!(coords.iter().copied().collect::<HashSet<_>>().len(), 16);
    }

    #[test]
    fn test_checkerboards_partition_the_grid() {
        let size = 7;
        let even: HashSet<_> = collect(Pattern::CheckerboardEven, size).into_iter().collect();
        let odd: HashSet<_> = collect(Pattern::CheckerboardOdd, size).into_iter().collect();

        assert!(even.is_disjoint(&odd));
        assert_eq!(even.len() + odd.len(), size * size);
        assert!(even.contains(&(0, 0)));
        assert!(odd.contains(&(0, 1)));
    }

    #[test]
    fn test_plus_center_row_then_column() {
        let coords = collect(Pattern::Plus, 5);
        // Full center row first, then the center column minus the center
        // cell.
        assert_eq!(
            coords,
            vec![
                (2, 0),
                (2, 1),
                (2, 2),
                (2, 3),
                (2, 4),
                (0, 2),
                (1, 2),
                (3, 2),
                (4, 2),
            ]
        );
    }

    #[test]
    fn test_border_order_and_coverage() {
        let coords = collect(Pattern::Border, 4);
        assert_eq!(
            coords,
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (0, 3),
                (1, 0),
                (1, 3),
                (2, 0),
                (2, 3),
                (3, 0),
                (3, 1),
                (3, 2),
                (3, 3),
            ]
        );
    }

    #[test]
    fn test_border_single_cell_visits_twice() {
        assert_eq!(collect(Pattern::Border, 1), vec![(0, 0), (0, 0)]);
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(collect(Pattern::MainDiagonal, 3), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(collect(Pattern::AntiDiagonal, 3), vec![(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_spiral_order_small() {
        assert_eq!(
            collect(Pattern::Spiral, 3),
            vec![
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 2),
                (2, 2),
                (2, 1),
                (2, 0),
                (1, 0),
                (1, 1),
            ]
        );
    }

    #[test]
    fn test_spiral_visits_each_cell_exactly_once() {
        for size in [1usize, 2, 3, 4, 5, 10, 77] {
            let coords = collect(Pattern::Spiral, size);
            assert_eq!(coords.len(), size * size);
            let distinct: HashSet<_> = coords.iter().copied().collect();
            assert_eq!(distinct.len(), size * size);
            assert!(in_bounds(&coords, size));
        }
    }

    #[test]
    fn test_stripes() {
        assert_eq!(
            collect(Pattern::VerticalStripes, 3),
            vec![(0, 0), (1, 0), (2, 0), (0, 2), (1, 2), (2, 2)]
        );
        assert_eq!(
            collect(Pattern::HorizontalStripes, 3),
            vec![(0, 0), (0, 1), (0, 2), (2, 0), (2, 1), (2, 2)]
        );
    }

    #[test]
    fn test_empty_grid_yields_nothing() {
        for digit in 0..PATTERN_COUNT as u8 {
            let pattern = Pattern::from_digit(digit).unwrap();
            assert_eq!(pattern.coordinates(0).count(), 0);
        }
    }

    #[test]
    fn test_all_patterns_stay_in_bounds_at_full_size() {
        let size = crate::array::GRID_SIZE;
        for digit in 0..PATTERN_COUNT as u8 {
            let pattern = Pattern::from_digit(digit).unwrap();
            let coords: Vec<_> = pattern.coordinates(size).collect();
            assert!(!coords.is_empty());
            assert!(in_bounds(&coords, size));
        }
    }
}

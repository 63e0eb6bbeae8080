use std::ops::Deref;

use rayon::prelude::*;
use tracing::trace;

use super::error::{OptionError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(OptionError::MaskPattern(pattern).into()),
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(Self)
    }

    // Whether the module at (r, c) flips under this pattern
    pub fn mask_function(self) -> fn(i32, i32) -> bool {
        MASK_FUNCTIONS[self.0 as usize]
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i32, c: i32) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i32, _: i32) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i32, c: i32) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i32, c: i32) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i32, c: i32) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i32, c: i32) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i32, c: i32) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i32, c: i32) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

#[cfg(test)]
mod mask_pattern_tests {
    use super::MaskPattern;
    use crate::common::error::{OptionError, QRError};

    #[test]
    fn test_new() {
        assert_eq!(*MaskPattern::new(7).unwrap(), 7);
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidOption(OptionError::MaskPattern(8))));
        assert_eq!(MaskPattern::all().count(), 8);
    }

    #[test]
    fn test_mask_functions() {
        let row0 = |m: u8| {
            let f = MaskPattern::new(m).unwrap().mask_function();
            (0..6).map(|c| f(0, c)).collect::<Vec<_>>()
        };
        assert_eq!(row0(0), vec![true, false, true, false, true, false]);
        assert_eq!(row0(1), vec![true; 6]);
        assert_eq!(row0(2), vec![true, false, false, true, false, false]);
        assert_eq!(row0(4), vec![true, true, true, false, false, false]);
        assert_eq!(row0(5), vec![true; 6]);

        let f = MaskPattern::new(3).unwrap().mask_function();
        assert!(f(1, 2) && f(2, 4) && !f(1, 1));
        let f = MaskPattern::new(6).unwrap().mask_function();
        assert!(f(1, 1) && !f(1, 3) && f(2, 3));
        let f = MaskPattern::new(7).unwrap().mask_function();
        assert!(f(0, 0) && !f(1, 1) && f(1, 3));
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Scores every pattern on its own copy of the unmasked symbol and keeps the
// lowest penalty, ties going to the lower pattern index
pub fn apply_best_mask(qr: &QR) -> QR {
    let mut candidates = (0..8u8)
        .into_par_iter()
        .map(|m| {
            let mask = MaskPattern(m);
            let mut cand = qr.clone();
            cand.apply_mask(mask);
            let pen = compute_total_penalty(&cand);
            trace!(mask = *mask, penalty = pen, "Scored mask candidate");
            (pen, cand)
        })
        .collect::<Vec<_>>();

    let mut best = 0;
    for (i, (pen, _)) in candidates.iter().enumerate() {
        if *pen < candidates[best].0 {
            best = i;
        }
    }
    candidates.swap_remove(best).1
}

// Penalty rules
//------------------------------------------------------------------------------

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width();
    let grid = qr.grid().iter().map(|m| **m).collect::<Vec<_>>();
    let run_pen = compute_run_penalty(&grid, w);
    let blk_pen = compute_block_penalty(&grid, w);
    let fp_pen = compute_finder_pattern_penalty(&grid, w);
    let bal_pen = balance_penalty(qr.count_dark_modules(), w * w);
    run_pen + blk_pen + fp_pen + bal_pen
}

// Rows followed by columns, each as a list of colors
fn lines(grid: &[Color], w: usize) -> impl Iterator<Item = Vec<Color>> + '_ {
    let rows = (0..w).map(move |r| grid[r * w..(r + 1) * w].to_vec());
    let cols = (0..w).map(move |c| (0..w).map(|r| grid[r * w + c]).collect());
    rows.chain(cols)
}

// Each run of 5 or more same colored modules scores 3 plus its excess over 5
fn compute_run_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for line in lines(grid, w) {
        for run in line.chunk_by(|a, b| a == b) {
            if run.len() >= 5 {
                pen += run.len() as u32 - 2;
            }
        }
    }
    pen
}

fn compute_block_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = grid[r * w + c];
            if clr == grid[r * w + c + 1]
                && clr == grid[(r + 1) * w + c]
                && clr == grid[(r + 1) * w + c + 1]
            {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(grid: &[Color], w: usize) -> u32 {
    let mut pen = 0;
    for line in lines(grid, w) {
        for win in line.windows(FINDER_LIKE_PATTERN.len()) {
            if win == &FINDER_LIKE_PATTERN[..] || win.iter().rev().eq(FINDER_LIKE_PATTERN.iter()) {
                pen += 40;
            }
        }
    }
    pen
}

// 10 points for every full 5% the dark ratio strays from 50%
pub fn balance_penalty(dark: usize, total: usize) -> u32 {
    debug_assert!(total > 0, "Balance of an empty grid");

    let k = (dark * 100).abs_diff(total * 50) / (total * 5);
    k as u32 * 10
}


// Global constants
//------------------------------------------------------------------------------

static MASK_FUNCTIONS: [fn(i32, i32) -> bool; 8] = [
    mask_functions::checkerboard,
    mask_functions::horizontal_lines,
    mask_functions::vertical_lines,
    mask_functions::diagonal_lines,
    mask_functions::large_checkerboard,
    mask_functions::fields,
    mask_functions::diamonds,
    mask_functions::meadow,
];

static FINDER_LIKE_PATTERN: [Color; 11] = [
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Dark,
    Color::Dark,
    Color::Light,
    Color::Dark,
    Color::Light,
    Color::Light,
    Color::Light,
    Color::Light,
];

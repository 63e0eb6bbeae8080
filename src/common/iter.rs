use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Zigzags through two column wide strips from the bottom right corner, moving
// up the first strip, down the next and so on. The vertical timing column is
// skipped. Yields every cell outside column 6, reserved or not.
pub struct EncRegionIter {
    r: i16,
    // Right column of the current strip
    c: i16,
    width: i16,
    upward: bool,
    right: bool,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w, upward: true, right: true }
    }

    fn advance_row(&mut self) {
        let at_edge = if self.upward { self.r == 0 } else { self.r == self.width - 1 };
        if !at_edge {
            self.r += if self.upward { -1 } else { 1 };
            return;
        }
        self.upward = !self.upward;
        self.c -= 2;
        if self.c == VERT_TIMING_COL {
            self.c -= 1;
        }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        if self.right {
            self.right = false;
            return Some((self.r, self.c));
        }
        let res = (self.r, self.c - 1);
        self.right = true;
        self.advance_row();
        Some(res)
    }
}


// Global constants
//------------------------------------------------------------------------------

static VERT_TIMING_COL: i16 = 6;

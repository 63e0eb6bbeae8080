use std::ops::Deref;

use image::{GrayImage, Luma};

use crate::common::bit_utils::BitStream;
use crate::common::iter::EncRegionIter;
use crate::common::mask::{compute_total_penalty, MaskPattern};
use crate::common::metadata::{
    format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_QR_MAIN,
    FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL,
    VERSION_INFO_COORDS_TR,
};

// Module
//------------------------------------------------------------------------------

// Reserved modules belong to function patterns and format/version info. Data
// placement and masking only ever touch Light and Dark modules.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Unset,
    Light,
    Dark,
    ReservedLight,
    ReservedDark,
}

impl Module {
    pub fn data(clr: Color) -> Self {
        clr.select(Self::Light, Self::Dark)
    }

    pub fn reserved(clr: Color) -> Self {
        clr.select(Self::ReservedLight, Self::ReservedDark)
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, Self::ReservedLight | Self::ReservedDark)
    }
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Unset | Self::Light | Self::ReservedLight => &Color::Light,
            Self::Dark | Self::ReservedDark => &Color::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Unset; w * w], w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    // Modules per side
    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> String {
        match self.mask {
            Some(m) => format!("{{ Version: {}, Ec level: {:?}, Mask: {} }}", self.ver, self.ecl, *m),
            None => format!("{{ Version: {}, Ec level: {:?}, Mask: None }}", self.ver, self.ecl),
        }
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&&m| *m == Color::Dark).count()
    }

    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.w && c < self.w, "Module out of bounds: Row {r}, Col {c}");
        matches!(*self.grid[r * self.w + c], Color::Dark)
    }

    // Row major matrix of modules, true for dark
    pub fn modules(&self) -> Vec<Vec<bool>> {
        self.grid.chunks(self.w).map(|row| row.iter().map(|m| **m == Color::Dark).collect()).collect()
    }

    pub fn penalty(&self) -> u32 {
        compute_total_penalty(self)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Unset => '.',
                    Module::ReservedDark => 'f',
                    Module::ReservedLight => 'F',
                    Module::Dark => 'd',
                    Module::Light => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    // Negative coordinates wrap from the bottom or right edge
    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Finder centred at (r, c) along with its separator
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3_i16, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3_i16, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                let clr = match i16::max(i.abs(), j.abs()) {
                    4 | 2 => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, Module::reserved(clr));
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        let cells: Vec<(i16, i16)> = if r1 == r2 {
            (c1..=c2).map(|j| (r1, j)).collect()
        } else {
            (r1..=r2).map(|i| (i, c1)).collect()
        };
        for (r, c) in cells {
            if self.get(r, c).is_reserved() {
                continue;
            }
            let offset = if r1 == r2 { c } else { r };
            self.set(r, c, Module::reserved(Color::from(offset & 1 == 0)));
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Centres that land on a finder pattern
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                let clr = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Color::Dark,
                    _ => Color::Light,
                };
                self.set(r + i, c + j, Module::reserved(clr));
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_alignment_patterns();
        assert!(qr.grid().iter().all(|m| !m.is_reserved()));
    }

    #[test]
    fn test_alignment_pattern_3() {
        let mut qr = QR::new(Version::new(3).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............Ffffffff\n\
             fFFFFFfF.............FfFFFFFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFFFFFfF.............FfFFFFFf\n\
             fffffffF.............Ffffffff\n\
             FFFFFFFF.............FFFFFFFF\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             ....................fffff....\n\
             FFFFFFFF............fFFFf....\n\
             fffffffF............fFfFf....\n\
             fFFFFFfF............fFFFf....\n\
             fFfffFfF............fffff....\n\
             fFfffFfF.....................\n\
             fFfffFfF.....................\n\
             fFFFFFfF.....................\n\
             fffffffF.....................\n"
        );
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info(0);
    }

    // Also places the dark module beside the bottom left finder
    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_QR_SIDE);
        self.set(-8, 8, Module::reserved(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_BL);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_TR);
    }

    // Writes the number MSB first along the coordinates
    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i16, i16)]) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, Module::reserved(Color::from(number & mask != 0)));
            mask >>= 1;
        }
    }

    // Reads the number back MSB first from the coordinates
    #[cfg(test)]
    pub(crate) fn read_number(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |n, &(r, c)| (n << 1) | (*self.get(r, c) == Color::Dark) as u32)
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
        self.reserve_format_area();
        self.draw_version_info();
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    // Places the payload bits in zigzag order, then fills whatever the stream
    // didn't reach with light modules and returns how many were filled
    pub fn draw_encoding_region(&mut self, payload: BitStream) -> usize {
        debug_assert!(
            payload.len() <= self.ver.total_codewords() << 3,
            "Payload exceeds encoding region: Payload {}, Codewords {}",
            payload.len(),
            self.ver.total_codewords()
        );

        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if self.get(r, c) == Module::Unset {
                    self.set(r, c, module);
                    break;
                }
            }
        }

        let mut filled = 0;
        for (r, c) in coords {
            if self.get(r, c) == Module::Unset {
                self.set(r, c, Module::Light);
                filled += 1;
            }
        }

        debug_assert!(!self.grid.contains(&Module::Unset), "Unset module left in encoding region");
        filled
    }

    // Flips data modules under the pattern and writes the matching format info
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w;
        for r in 0..w {
            for c in 0..w {
                if !mask_fn(r as i32, c as i32) {
                    continue;
                }
                let m = &mut self.grid[r * w + c];
                *m = match *m {
                    Module::Light => Module::Dark,
                    Module::Dark => Module::Light,
                    other => other,
                };
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    // Grayscale image with a quiet zone, each module drawn as a square of
    // module_sz pixels
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::from_pixel(total_sz, total_sz, Luma([255]));
        for i in 0..qr_sz {
            for j in 0..qr_sz {
                let r = (i / module_sz) as usize;
                let c = (j / module_sz) as usize;
                let pixel = self.grid[r * self.w + c].select(Luma([255]), Luma([0]));
                canvas.put_pixel(j + qz_sz, i + qz_sz, pixel);
            }
        }

        canvas
    }

    // Light modules are drawn as full blocks, for terminals with dark backgrounds
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                canvas.push(self.grid[r * self.w + c].select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}

#[cfg(test)]
mod render_tests {
    use image::Luma;

    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_to_image() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_all_function_patterns();
        let img = qr.to_image(3);
        assert_eq!(img.dimensions(), (29 * 3, 29 * 3));
        assert_eq!(*img.get_pixel(0, 0), Luma([255]));
        assert_eq!(*img.get_pixel(11, 11), Luma([255]));
        assert_eq!(*img.get_pixel(12, 12), Luma([0]));
        // Second ring of the finder is light
        assert_eq!(*img.get_pixel(15, 15), Luma([255]));
    }

    #[test]
    fn test_to_str() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_all_function_patterns();
        let s = qr.to_str(1);
        let lines = s.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 29);
        assert!(lines.iter().all(|l| l.chars().count() == 29));
        assert!(lines[0].chars().all(|c| c == '█'));
        assert_eq!(lines[4].chars().nth(4), Some(' '));
        assert_eq!(lines[5].chars().nth(5), Some('█'));
    }
}

// Global constants
//------------------------------------------------------------------------------

// Quiet zone width in modules
pub static QUIET_ZONE: usize = 4;

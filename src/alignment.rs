//! Horizontal alignment of the ORP glyph onto the fixation point.
//!
//! Measuring rendered geometry needs a layout pass, so the engine only sees
//! it through [`GeometryProbe`]. Any surface (terminal cells, pixels, test
//! doubles) can implement the probe and reuse the same math.

use crate::render::Glyph;

/// Axis-aligned horizontal extent of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f64,
    pub width: f64,
}

impl BoundingBox {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn center(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn translated(&self, dx: f64) -> Self {
        Self {
            left: self.left + dx,
            width: self.width,
        }
    }
}

/// Read-only geometry of the word currently mounted in a surface.
pub trait GeometryProbe {
    fn measure_word_box(&self) -> BoundingBox;
    /// `None` when the mounted word has no ORP glyph.
    fn measure_orp_box(&self) -> Option<BoundingBox>;
    fn measure_surface_box(&self) -> BoundingBox;
}

/// A mount point the engine renders into. Mounting lays the glyphs out
/// untranslated so the probe reports their natural positions.
pub trait DisplaySurface: GeometryProbe {
    fn mount(&mut self, glyphs: &[Glyph]);
}

/// Result of aligning one mounted word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub offset: f64,
    /// Word box after applying `offset`.
    pub word_box: BoundingBox,
}

/// Shift that moves the ORP centre onto `surface.left + surface.width * fixation`.
pub fn horizontal_offset(surface: BoundingBox, orp: BoundingBox, fixation: f64) -> f64 {
    let target = surface.left + surface.width * fixation;
    target - orp.center()
}

/// Measure the mounted word and compute its alignment. Words without an ORP
/// glyph are left where they are.
pub fn align<P: GeometryProbe + ?Sized>(probe: &P, fixation: f64) -> Alignment {
    let word_box = probe.measure_word_box();
    let offset = probe
        .measure_orp_box()
        .map(|orp| horizontal_offset(probe.measure_surface_box(), orp, fixation))
        .unwrap_or(0.0);

    Alignment {
        offset,
        word_box: word_box.translated(offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SyntheticGeometry {
        word: BoundingBox,
        orp: Option<BoundingBox>,
        surface: BoundingBox,
    }

    impl GeometryProbe for SyntheticGeometry {
        fn measure_word_box(&self) -> BoundingBox {
            self.word
        }

        fn measure_orp_box(&self) -> Option<BoundingBox> {
            self.orp
        }

        fn measure_surface_box(&self) -> BoundingBox {
            self.surface
        }
    }

    #[test]
    fn offset_targets_35_percent_of_surface() {
        // target = 100 + 600 * 0.35 = 310, orp centre = 400 + 10 = 410
        let offset = horizontal_offset(
            BoundingBox::new(100.0, 600.0),
            BoundingBox::new(400.0, 20.0),
            0.35,
        );
        assert!((offset - -100.0).abs() < 1e-9);
    }

    #[test]
    fn offset_is_zero_when_already_fixed() {
        let offset = horizontal_offset(
            BoundingBox::new(0.0, 200.0),
            BoundingBox::new(65.0, 10.0),
            0.35,
        );
        assert!(offset.abs() < 1e-9);
    }

    #[test]
    fn align_translates_word_box() {
        let geometry = SyntheticGeometry {
            word: BoundingBox::new(250.0, 120.0),
            orp: Some(BoundingBox::new(274.0, 24.0)),
            surface: BoundingBox::new(0.0, 600.0),
        };
        let alignment = align(&geometry, 0.35);

        // target 210, orp centre 286
        assert!((alignment.offset - -76.0).abs() < 1e-9);
        assert!((alignment.word_box.left - 174.0).abs() < 1e-9);
        assert_eq!(alignment.word_box.width, 120.0);
    }

    #[test]
    fn missing_orp_leaves_word_in_place() {
        let geometry = SyntheticGeometry {
            word: BoundingBox::new(10.0, 0.0),
            orp: None,
            surface: BoundingBox::new(0.0, 80.0),
        };
        let alignment = align(&geometry, 0.35);
        assert_eq!(alignment.offset, 0.0);
        assert_eq!(alignment.word_box, BoundingBox::new(10.0, 0.0));
    }

    #[test]
    fn sub_pixel_offsets_are_preserved() {
        let offset = horizontal_offset(
            BoundingBox::new(0.0, 101.0),
            BoundingBox::new(30.0, 7.0),
            0.35,
        );
        // 35.35 - 33.5
        assert!((offset - 1.85).abs() < 1e-9);
    }
}

use unicode_width::UnicodeWidthChar;

use crate::alignment::{BoundingBox, DisplaySurface, GeometryProbe};
use crate::render::Glyph;

/// A display surface made of fixed-size character cells, such as a terminal
/// row. Widths come from `unicode-width`, so wide glyphs take two columns.
///
/// Like a flex-centred box, a mounted word starts out horizontally centred
/// in the surface; alignment then shifts it so the ORP sits on the fixation
/// column.
#[derive(Debug, Clone, Default)]
pub struct CellSurface {
    area: BoundingBox,
    glyphs: Vec<Glyph>,
    widths: Vec<usize>,
}

impl CellSurface {
    pub fn new(left: u16, width: u16) -> Self {
        Self {
            area: BoundingBox::new(f64::from(left), f64::from(width)),
            ..Self::default()
        }
    }

    /// Resize the surface, e.g. after a terminal resize. The mounted word is
    /// kept and re-measured against the new area.
    pub fn set_area(&mut self, left: u16, width: u16) {
        self.area = BoundingBox::new(f64::from(left), f64::from(width));
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyph_widths(&self) -> &[usize] {
        &self.widths
    }

    fn word_width(&self) -> usize {
        self.widths.iter().sum()
    }

    fn natural_left(&self) -> f64 {
        let spare = self.area.width - self.word_width() as f64;
        self.area.left + (spare / 2.0).floor()
    }
}

impl GeometryProbe for CellSurface {
    fn measure_word_box(&self) -> BoundingBox {
        BoundingBox::new(self.natural_left(), self.word_width() as f64)
    }

    fn measure_orp_box(&self) -> Option<BoundingBox> {
        let orp = self.glyphs.iter().position(|g| g.is_orp)?;
        let cols_before: usize = self.widths[..orp].iter().sum();
        Some(BoundingBox::new(
            self.natural_left() + cols_before as f64,
            self.widths[orp] as f64,
        ))
    }

    fn measure_surface_box(&self) -> BoundingBox {
        self.area
    }
}

impl DisplaySurface for CellSurface {
    fn mount(&mut self, glyphs: &[Glyph]) {
        self.glyphs = glyphs.to_vec();
        self.widths = glyphs
            .iter()
            .map(|g| g.ch.width().unwrap_or(0))
            .collect();
    }
}

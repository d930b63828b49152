//! Element and cell decorator implementations built on top of `genpdf` primitives.
//!
//! genpdf ships paragraphs, tables and images but has no notion of filled cells, per-cell
//! borders or "fit this image into a box". The statement template needs all three.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{CellDecorator, Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Margins, Mm, Position, RenderResult, Scale, Size};
use log::debug;

use crate::text::Label;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Inner padding of table cells in points.
pub const CELL_PADDING_PT: f64 = 3.0;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts PDF points (1/72 inch) into genpdf millimetres.
pub fn pt(points: f64) -> Mm {
    mm_from_f64(points * MM_PER_INCH / POINTS_PER_INCH)
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Scale factor that fits `natural` into `bounds` without distorting it.
pub fn fit_scale(natural: (f64, f64), bounds: (f64, f64)) -> f64 {
    let (width, height) = natural;
    let (max_width, max_height) = bounds;
    if width <= f64::EPSILON || height <= f64::EPSILON {
        return 1.0;
    }
    (max_width / width).min(max_height / height)
}

/// An image scaled to fit a fixed box and centered inside it.
///
/// The PDF image object does not support transparency, so the source is flattened to RGB
/// before it is handed to genpdf.
pub struct FittedImage {
    image: Image,
    offset: Position,
}

impl FittedImage {
    /// Prepares `source` for drawing inside a `bounds` sized box.
    pub fn new(source: &image::DynamicImage, bounds: Size) -> Result<Self, Error> {
        let flattened = image::DynamicImage::ImageRgb8(source.to_rgb8());
        let natural = estimated_image_size(&flattened, DEFAULT_IMAGE_DPI);
        let natural_mm = (mm_to_f64(natural.width), mm_to_f64(natural.height));
        let bounds_mm = (mm_to_f64(bounds.width), mm_to_f64(bounds.height));
        let scale = fit_scale(natural_mm, bounds_mm);

        let mut image = Image::from_dynamic_image(flattened)?;
        image.set_scale(Scale::new(scale, scale));

        let offset = Position::new(
            mm_from_f64((bounds_mm.0 - natural_mm.0 * scale) / 2.0),
            mm_from_f64((bounds_mm.1 - natural_mm.1 * scale) / 2.0),
        );
        Ok(Self { image, offset })
    }
}

impl Element for FittedImage {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        area.add_offset(self.offset);
        self.image.render(context, area, style)
    }
}

/// Smallest size [`FittedText`] shrinks a label to before it starts splitting words.
pub const MIN_FITTED_FONT_SIZE: u8 = 5;

/// Slack kept between the widest word and the column edge, in millimetres.
const FIT_TOLERANCE_MM: f64 = 0.1;

/// Chooses a font size and text so that no single word is wider than `available`.
///
/// genpdf drops a word that does not fit on an empty line. The label is first shrunk one point
/// at a time down to [`MIN_FITTED_FONT_SIZE`]; words still too wide at that size are split into
/// chunks that each fit. `measure` returns the width of a word at a font size, in the same unit
/// as `available`.
pub fn fit_words<F>(text: &str, size: u8, available: f64, measure: F) -> (u8, String)
where
    F: Fn(&str, u8) -> f64,
{
    let widest = |size: u8| {
        text.split_whitespace()
            .map(|word| measure(word, size))
            .fold(0.0, f64::max)
    };

    let mut size = size;
    while size > MIN_FITTED_FONT_SIZE && widest(size) > available {
        size -= 1;
    }
    if widest(size) <= available {
        return (size, text.to_owned());
    }

    let chunks: Vec<String> = text
        .split_whitespace()
        .flat_map(|word| split_word(word, size, available, &measure))
        .collect();
    (size, chunks.join(" "))
}

fn split_word<F>(word: &str, size: u8, available: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str, u8) -> f64,
{
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1 && measure(&current, size) > available {
            current.pop();
            chunks.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// A label that always prints all of its text inside the width it is given.
///
/// The paragraph is built on the first render, once the available width is known, and reused
/// when a table row continues on the next page.
pub struct FittedText {
    label: Label,
    paragraph: Option<Paragraph>,
}

impl FittedText {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            paragraph: None,
        }
    }

    fn prepare(&self, context: &genpdf::Context, available: Mm, style: Style) -> Paragraph {
        let base = style.and(self.label.style());
        let measure = |word: &str, size: u8| {
            let styled = StyledString::new(word.to_owned(), base.with_font_size(size));
            mm_to_f64(styled.width(&context.font_cache))
        };
        let (size, text) = fit_words(
            self.label.text(),
            self.label.size(),
            mm_to_f64(available) - FIT_TOLERANCE_MM,
            measure,
        );
        if size != self.label.size() {
            debug!(
                "Shrunk '{}' from {}pt to {}pt to fit its cell",
                self.label.text(),
                self.label.size(),
                size
            );
        }
        self.label.clone().with_text(text).sized(size).to_paragraph()
    }
}

impl Element for FittedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        if self.paragraph.is_none() {
            self.paragraph = Some(self.prepare(context, area.size().width, style));
        }
        match self.paragraph.as_mut() {
            Some(paragraph) => paragraph.render(context, area, style),
            None => Ok(RenderResult::default()),
        }
    }
}

/// Wraps a label in a cell that paints its background before drawing the text.
///
/// genpdf 0.2 draws hairlines only, so the fill is a stack of horizontal lines. Table headers
/// are single-line, so the fill height is derived from the label's line height plus the cell
/// padding rather than measured after rendering (which would paint over the text).
pub struct ShadedCell {
    fill: Color,
    text: FittedText,
    label_style: Style,
}

impl ShadedCell {
    pub fn new(label: Label, fill: Color) -> Self {
        Self {
            fill,
            label_style: label.style(),
            text: FittedText::new(label),
        }
    }
}

/// Distance between the lines that make up a filled area, in points.
const FILL_STEP_PT: f64 = 0.5;

/// Vertical offsets, in points, of the hairlines that fill a band `height_pt` tall.
fn fill_offsets(height_pt: f64) -> Vec<f64> {
    let mut offsets = Vec::new();
    let mut offset = FILL_STEP_PT / 2.0;
    while offset < height_pt {
        offsets.push(offset);
        offset += FILL_STEP_PT;
    }
    offsets
}

impl Element for ShadedCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let line_height = style.and(self.label_style).line_height(&context.font_cache);
        let height_pt =
            mm_to_f64(line_height) * POINTS_PER_INCH / MM_PER_INCH + CELL_PADDING_PT * 2.0;
        let width = area.size().width;

        let fill = Style::new().with_color(self.fill);
        for offset in fill_offsets(height_pt) {
            area.draw_line(
                vec![Position::new(0, pt(offset)), Position::new(width, pt(offset))],
                fill,
            );
        }

        let mut inner = area;
        inner.add_margins(cell_padding());
        let mut result = self.text.render(context, inner, style)?;
        result.size.height += pt(CELL_PADDING_PT * 2.0);
        result.size.width = width;
        Ok(result)
    }
}

/// Padding applied around every table cell.
pub fn cell_padding() -> Margins {
    let padding = pt(CELL_PADDING_PT);
    Margins::trbl(padding, padding, padding, padding)
}

/// Draws a rectangle around selected cells only, leaving the rest of the table unruled.
pub struct BoxedCells {
    cells: Vec<(usize, usize)>,
}

impl BoxedCells {
    /// Boxes the cells at the given `(column, row)` coordinates.
    pub fn new(cells: impl Into<Vec<(usize, usize)>>) -> Self {
        Self {
            cells: cells.into(),
        }
    }

    pub fn is_boxed(&self, column: usize, row: usize) -> bool {
        self.cells.contains(&(column, row))
    }
}

impl CellDecorator for BoxedCells {
    fn decorate_cell(
        &mut self,
        column: usize,
        row: usize,
        _has_more: bool,
        area: render::Area<'_>,
        _style: Style,
    ) {
        if !self.is_boxed(column, row) {
            return;
        }
        let size = area.size();
        area.draw_line(
            vec![
                Position::new(0, 0),
                Position::new(size.width, 0),
                Position::new(size.width, size.height),
                Position::new(0, size.height),
                Position::new(0, 0),
            ],
            Style::new(),
        );
    }
}

/// Fixed vertical gap between blocks.
pub struct VerticalSpace {
    height: Mm,
}

impl VerticalSpace {
    /// Creates a gap of `points` PDF points.
    pub fn points(points: f64) -> Self {
        Self { height: pt(points) }
    }
}

impl Element for VerticalSpace {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        result.size = Size::new(0, height);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_convert_to_millimetres() {
        assert!((mm_to_f64(pt(72.0)) - 25.4).abs() < 1e-9);
        assert!((mm_to_f64(pt(150.0)) - 52.916_666).abs() < 1e-3);
    }

    #[test]
    fn fit_scale_preserves_aspect_ratio() {
        // 2.5in x 1in box, wide logo limited by width
        assert!((fit_scale((100.0, 20.0), (63.5, 25.4)) - 0.635).abs() < 1e-9);
        // tall logo limited by height
        assert!((fit_scale((20.0, 50.8), (63.5, 25.4)) - 0.5).abs() < 1e-9);
        assert_eq!(fit_scale((0.0, 10.0), (63.5, 25.4)), 1.0);
    }

    #[test]
    fn boxed_cells_match_coordinates() {
        let boxed = BoxedCells::new(vec![(1, 0), (3, 1)]);
        assert!(boxed.is_boxed(1, 0));
        assert!(boxed.is_boxed(3, 1));
        assert!(!boxed.is_boxed(0, 0));
        assert!(!boxed.is_boxed(3, 0));
    }

    #[test]
    fn fill_covers_the_whole_band() {
        let offsets = fill_offsets(16.0);
        assert_eq!(offsets.len(), 32);
        assert_eq!(offsets.first().copied(), Some(0.25));
        assert!(offsets.last().is_some_and(|last| 16.0 - last <= FILL_STEP_PT));
        assert!(fill_offsets(0.0).is_empty());
    }

    /// Every character is 1 unit wide at 10pt and scales linearly with the font size.
    fn monospace(word: &str, size: u8) -> f64 {
        word.chars().count() as f64 * size as f64 / 10.0
    }

    #[test]
    fn text_that_fits_is_left_alone() {
        assert_eq!(
            fit_words("Salem route", 8, 10.0, monospace),
            (8, "Salem route".to_owned())
        );
    }

    #[test]
    fn wide_words_shrink_the_font() {
        // 13 characters at 8pt is 10.4 units
        let (size, text) = fit_words("1743657425.00", 8, 10.0, monospace);
        assert_eq!(size, 7);
        assert_eq!(text, "1743657425.00");
    }

    #[test]
    fn words_too_wide_at_the_minimum_size_are_split() {
        let (size, text) = fit_words("($1,000,000.00) due", 10, 3.0, monospace);
        assert_eq!(size, MIN_FITTED_FONT_SIZE);
        assert_eq!(text, "($1,00 0,000. 00) due");
        assert!(text
            .split_whitespace()
            .all(|chunk| monospace(chunk, size) <= 3.0));
        assert_eq!(text.replace(' ', ""), "($1,000,000.00)due");
    }
}

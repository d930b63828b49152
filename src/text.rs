//! Styled single-run text used for table cells, captions and page furniture.
//!
//! A [`Label`] carries the few attributes the statement template varies (weight, size, color
//! and alignment) without referencing the rendering crate, so layout code can build and test
//! labels as plain values. Conversion into [`genpdf`] elements happens at the edges.

use genpdf::elements::Paragraph;
use genpdf::style::{Color, Style, StyledString};
use genpdf::Alignment;

/// Body text size in points.
pub const BODY_FONT_SIZE: u8 = 10;

/// Red used for totals and the check amount.
pub const TOTAL_COLOR: Color = Color::Rgb(255, 0, 0);
/// Blue used for year-to-date figures.
pub const YTD_COLOR: Color = Color::Rgb(0, 0, 255);
/// Light grey behind table header rows.
pub const HEADER_FILL: Color = Color::Rgb(211, 211, 211);

/// Horizontal placement of a label inside the box it is drawn in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Anchor> for Alignment {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::Left => Alignment::Left,
            Anchor::Center => Alignment::Center,
            Anchor::Right => Alignment::Right,
        }
    }
}

/// A run of text with uniform styling.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    text: String,
    size: u8,
    bold: bool,
    color: Option<Color>,
    anchor: Anchor,
}

impl Label {
    /// Creates a regular, left-aligned label in the body font size.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: BODY_FONT_SIZE,
            bold: false,
            color: None,
            anchor: Anchor::Left,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Marks the label as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Sets the font size in points.
    pub fn sized(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    /// Replaces the text, keeping the styling.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Assigns a text color.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the horizontal alignment.
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builds the genpdf style for this label.
    pub fn style(&self) -> Style {
        let mut style = Style::new().with_font_size(self.size);
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        style
    }

    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.style())
    }

    /// Converts the label into an aligned paragraph.
    pub fn to_paragraph(&self) -> Paragraph {
        let mut paragraph = Paragraph::new(self.to_styled_string());
        paragraph.set_alignment(self.anchor.into());
        paragraph
    }
}

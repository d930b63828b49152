//! Page furniture: the header and footer stamped on every page of a statement.
//!
//! [`render_page_furniture`] is a pure function from the page number and the statement metadata
//! to a list of [`DrawCommand`]s. The page decorator in [`crate::builder`] is the only place that
//! turns those commands into drawing calls, once per page as genpdf lays the document out.
//!
//! All coordinates are PDF points measured from the top-left corner of the page.

use chrono::NaiveDateTime;

use crate::text::{Anchor, Label};

/// Company name printed in place of the logo and in the footer.
pub const COMPANY_NAME: &str = "SPF Transportation LLC";
pub const COMPANY_ADDRESS: &str = "8046 S Carnaby CT Hanover Park, IL 60133";
pub const COMPANY_PHONE: &str = "Phone #: (312)690-3717";
/// Organization the statements are issued to, printed under the title.
pub const ISSUER_LABEL: &str = "FITRIGHT LOGISTICS LLC";
pub const PRODUCT_LINE: &str = "ProTransport Trucking Software";
pub const PRODUCT_URL: &str = "www.pro-transport.com";

/// `strftime` pattern of the footer timestamp.
pub const PRINTED_AT_FORMAT: &str = "%m/%d/%y %H:%M";

/// Share of the font size that sits above the baseline for Helvetica.
const ASCENT_RATIO: f64 = 0.718;

const FURNITURE_FONT_SIZE: u8 = 8;
const TITLE_FONT_SIZE: u8 = 12;
const LOGO_FALLBACK_FONT_SIZE: u8 = 14;

/// Page size and body margins in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl PageGeometry {
    /// US letter with a top margin that clears the header block.
    pub const fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            margin_top: 150.0,
            margin_right: 30.0,
            margin_bottom: 50.0,
            margin_left: 30.0,
        }
    }

    /// Width available to the document body.
    pub fn body_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Per-statement values shown in the page furniture.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementMeta {
    /// Statement date as printed (`Date: ...`).
    pub date: String,
    pub truck_number: String,
    /// Instant the document was rendered, printed in the footer.
    pub printed_at: NaiveDateTime,
}

/// One drawing operation of the page furniture.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Draws `label` inside the box starting at `x` that is `width` wide, with the top of the
    /// line at `top`. The label's anchor positions the text inside the box.
    Text {
        x: f64,
        top: f64,
        width: f64,
        label: Label,
    },
    /// Draws the company logo fitted into the given box, or `fallback` when no logo can be
    /// drawn.
    Logo {
        x: f64,
        top: f64,
        width: f64,
        height: f64,
        fallback: Box<DrawCommand>,
    },
}

impl DrawCommand {
    /// Returns the label of a text command.
    pub fn label(&self) -> Option<&Label> {
        match self {
            DrawCommand::Text { label, .. } => Some(label),
            DrawCommand::Logo { .. } => None,
        }
    }
}

fn line_top(baseline: f64, size: u8) -> f64 {
    baseline - f64::from(size) * ASCENT_RATIO
}

fn left(geometry: &PageGeometry, x: f64, baseline: f64, label: Label) -> DrawCommand {
    DrawCommand::Text {
        x,
        top: line_top(baseline, label.size()),
        width: geometry.width - x,
        label: label.anchored(Anchor::Left),
    }
}

fn right(geometry: &PageGeometry, baseline: f64, label: Label) -> DrawCommand {
    DrawCommand::Text {
        x: 0.0,
        top: line_top(baseline, label.size()),
        width: geometry.width - geometry.margin_right,
        label: label.anchored(Anchor::Right),
    }
}

fn centered(geometry: &PageGeometry, baseline: f64, label: Label) -> DrawCommand {
    DrawCommand::Text {
        x: 0.0,
        top: line_top(baseline, label.size()),
        width: geometry.width,
        label: label.anchored(Anchor::Center),
    }
}

/// Builds the header and footer of page `page_index` (1-based).
///
/// The footer reads `Page {n} Of 1` on every page: the denominator is part of the printed form
/// and is not the page count.
pub fn render_page_furniture(
    page_index: usize,
    meta: &StatementMeta,
    geometry: &PageGeometry,
) -> Vec<DrawCommand> {
    let edge = geometry.margin_left;
    let bottom = geometry.height;
    let small = |text: &str| Label::new(text).sized(FURNITURE_FONT_SIZE);
    let title = |text: String| Label::new(text).sized(TITLE_FONT_SIZE);

    vec![
        DrawCommand::Logo {
            x: edge,
            top: 38.0,
            width: 180.0,
            height: 72.0,
            fallback: Box::new(left(
                geometry,
                edge + 10.0,
                60.0,
                Label::new(COMPANY_NAME)
                    .bold()
                    .sized(LOGO_FALLBACK_FONT_SIZE),
            )),
        },
        left(geometry, edge, 120.0, small(COMPANY_ADDRESS)),
        left(geometry, edge, 130.0, small(COMPANY_PHONE)),
        right(geometry, 50.0, title("Statement".to_owned()).bold()),
        right(geometry, 65.0, title(ISSUER_LABEL.to_owned())),
        right(geometry, 80.0, title(format!("Date: {}", meta.date))),
        right(geometry, 95.0, title(format!("Truck # {}", meta.truck_number))),
        left(geometry, edge, bottom - 30.0, small(COMPANY_NAME)),
        left(
            geometry,
            edge,
            bottom - 20.0,
            small(&meta.printed_at.format(PRINTED_AT_FORMAT).to_string()),
        ),
        centered(geometry, bottom - 30.0, small(PRODUCT_LINE)),
        centered(geometry, bottom - 20.0, small(PRODUCT_URL)),
        right(geometry, bottom - 20.0, small(&format!("Page {} Of 1", page_index))),
    ]
}

//! Statement rendering: turns a [`StatementRequest`] into PDF bytes.

use std::cell::Cell;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Style;
use genpdf::{self, Element, Margins, PageDecorator, Position, Size};
use log::{debug, warn};

use crate::currency::CurrencyFormat;
use crate::elements::{self, pt, FittedImage};
use crate::fonts;
use crate::furniture::{render_page_furniture, DrawCommand, PageGeometry, StatementMeta};
use crate::layout::{self, StatementTotals};
use crate::model::{RenderedStatement, StatementRequest};
use crate::text::BODY_FONT_SIZE;

/// File name of the company logo looked up next to the executable and the crate.
pub const LOGO_FILE_NAME: &str = "logo.png";

/// Renderer configured once per process and shared by every request.
///
/// Holds the font family, the currency format, the optional logo and the page geometry. None
/// of these change between renders; every call to [`generate`](Self::generate) builds its own
/// genpdf document, so one builder can serve concurrent callers.
#[derive(Clone)]
pub struct StatementBuilder {
    font_family: FontFamily<FontData>,
    currency: CurrencyFormat,
    logo: Option<Arc<image::DynamicImage>>,
    geometry: PageGeometry,
}

impl StatementBuilder {
    /// Creates a builder that renders with the given font family.
    pub fn new(font_family: FontFamily<FontData>) -> Self {
        Self {
            font_family,
            currency: CurrencyFormat::default(),
            logo: None,
            geometry: PageGeometry::letter(),
        }
    }

    /// Creates a builder with the font family found by [`fonts::default_font_family`].
    pub fn with_default_fonts() -> Result<Self, Error> {
        Ok(Self::new(fonts::default_font_family()?))
    }

    /// Creates a builder with the font family stored in `directory`.
    pub fn with_fonts_dir(directory: &Path) -> Result<Self, Error> {
        Ok(Self::new(fonts::font_family_from_dir(directory)?))
    }

    /// Sets the currency format used for every amount.
    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    /// Uses `logo` in the page header.
    pub fn with_logo(mut self, logo: image::DynamicImage) -> Self {
        self.logo = Some(Arc::new(logo));
        self
    }

    /// Loads the logo from `path`.
    ///
    /// A missing or undecodable file is not an error: the header then shows the company name.
    pub fn with_logo_path(mut self, path: &Path) -> Self {
        match elements::decode_image_from_path(path) {
            Ok(logo) => {
                debug!("Loaded logo from {}", path.display());
                self.logo = Some(Arc::new(logo));
            }
            Err(err) => {
                warn!("Logo unavailable ({}); drawing the company name instead", err);
                self.logo = None;
            }
        }
        self
    }

    /// Sets the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Renders `request` using the current local time.
    pub fn generate(&self, request: &StatementRequest) -> Result<RenderedStatement, Error> {
        self.generate_at(request, Local::now().naive_local())
    }

    /// Renders `request` as of `now`.
    ///
    /// `now` supplies the default statement date, the footer timestamp and the fallback for the
    /// date-range caption, so a single render never mixes two clock readings.
    pub fn generate_at(
        &self,
        request: &StatementRequest,
        now: NaiveDateTime,
    ) -> Result<RenderedStatement, Error> {
        let totals = StatementTotals::compute(request);
        let meta = StatementMeta {
            date: request.statement_info.date_or(now),
            truck_number: request.statement_info.truck_number().to_owned(),
            printed_at: now,
        };

        let mut document = genpdf::Document::new(self.font_family.clone());
        document.set_title(format!("Statement - Truck # {}", meta.truck_number));
        document.set_paper_size(Size::new(
            pt(self.geometry.width),
            pt(self.geometry.height),
        ));
        document.set_font_size(BODY_FONT_SIZE);

        document.push(layout::statement_body(
            request,
            &totals,
            &self.currency,
            &meta.date,
            now,
        )?);

        let pages = Rc::new(Cell::new(0));
        document.set_page_decorator(StatementPageDecorator::new(
            meta,
            self.geometry,
            self.logo.clone(),
            Rc::clone(&pages),
        ));

        let mut bytes = Vec::new();
        document.render(&mut bytes)?;

        debug!(
            "Rendered statement: {} trips, {} deductions, {} pages, {} bytes",
            request.trips.len(),
            request.deductions.len(),
            pages.get(),
            bytes.len()
        );

        Ok(RenderedStatement {
            bytes,
            pages: pages.get(),
            totals,
        })
    }
}

/// Locations searched for [`LOGO_FILE_NAME`] when no path is configured.
pub fn logo_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets").join(LOGO_FILE_NAME));
        }
    }

    candidates.push(
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join(LOGO_FILE_NAME),
    );

    candidates
}

/// Returns the configured logo path, or the first well-known location holding a logo.
pub fn resolve_logo_path(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        return Some(path.to_path_buf());
    }
    logo_candidates()
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Draws the page furniture and hands the margin-reduced body area back to genpdf.
struct StatementPageDecorator {
    page: usize,
    meta: StatementMeta,
    geometry: PageGeometry,
    logo: Option<Arc<image::DynamicImage>>,
    pages: Rc<Cell<usize>>,
}

impl StatementPageDecorator {
    fn new(
        meta: StatementMeta,
        geometry: PageGeometry,
        logo: Option<Arc<image::DynamicImage>>,
        pages: Rc<Cell<usize>>,
    ) -> Self {
        Self {
            page: 0,
            meta,
            geometry,
            logo,
            pages,
        }
    }

    fn draw(
        &self,
        context: &genpdf::Context,
        area: &genpdf::render::Area<'_>,
        command: &DrawCommand,
        style: Style,
    ) -> Result<(), Error> {
        match command {
            DrawCommand::Text {
                x,
                top,
                width,
                label,
            } => {
                let mut region = area.clone();
                region.add_offset(Position::new(pt(*x), pt(*top)));
                region.set_width(pt(*width));
                label.to_paragraph().render(context, region, style)?;
                Ok(())
            }
            DrawCommand::Logo {
                x,
                top,
                width,
                height,
                fallback,
            } => {
                if let Some(logo) = &self.logo {
                    let mut region = area.clone();
                    region.add_offset(Position::new(pt(*x), pt(*top)));
                    let drawn = FittedImage::new(logo, Size::new(pt(*width), pt(*height)))
                        .and_then(|mut image| image.render(context, region, style));
                    match drawn {
                        Ok(result) if !result.has_more => return Ok(()),
                        Ok(_) => warn!("Logo does not fit the header; drawing the company name"),
                        Err(err) => warn!("Failed to draw logo ({}); drawing the company name", err),
                    }
                }
                self.draw(context, area, fallback, style)
            }
        }
    }
}

impl PageDecorator for StatementPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        self.pages.set(self.page);

        for command in render_page_furniture(self.page, &self.meta, &self.geometry) {
            self.draw(context, &area, &command, style)?;
        }

        area.add_margins(Margins::trbl(
            pt(self.geometry.margin_top),
            pt(self.geometry.margin_right),
            pt(self.geometry.margin_bottom),
            pt(self.geometry.margin_left),
        ));
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_logo_path_wins() {
        let configured = Path::new("/srv/statement/logo.png");
        assert_eq!(
            resolve_logo_path(Some(configured)),
            Some(configured.to_path_buf())
        );
    }

    #[test]
    fn logo_candidates_end_with_crate_assets() {
        let candidates = logo_candidates();
        let last = candidates.last().expect("at least one candidate");
        assert!(last.ends_with("assets/logo.png"));
        assert!(last.starts_with(env!("CARGO_MANIFEST_DIR")));
    }
}

//! Body layout of a statement: recipient block, line-item tables, totals and summary.
//!
//! Row contents are computed as plain strings first ([`trip_row`], [`deduction_row`],
//! [`summary_rows`]) so the mapping rules can be tested without a font cache. The `*_table`
//! functions then wrap those strings into genpdf tables with the template's widths, fonts,
//! colors and borders.

use chrono::{NaiveDate, NaiveDateTime};
use genpdf::elements::{FrameCellDecorator, LinearLayout, TableLayout};
use genpdf::error::Error;
use genpdf::style::Color;
use genpdf::Element;

use crate::currency::CurrencyFormat;
use crate::elements::{cell_padding, BoxedCells, FittedText, ShadedCell, VerticalSpace};
use crate::model::{DeductionLine, StatementRequest, TripLine};
use crate::text::{Anchor, Label, HEADER_FILL, TOTAL_COLOR, YTD_COLOR};

pub const TRIP_HEADERS: [&str; 7] = [
    "Date",
    "Trip #",
    "Route",
    "Description",
    "Quantity",
    "Rate",
    "Amount",
];
/// Relative trip column widths in points.
pub const TRIP_COLUMN_WIDTHS: [usize; 7] = [50, 60, 150, 120, 50, 50, 60];

pub const DEDUCTION_HEADERS: [&str; 3] = ["Description", "Date", "Amount"];

/// Width of the amount cell in total bars and the summary block.
pub const TOTAL_CELL_WIDTH: usize = 70;

const HEADER_FONT_SIZE: u8 = 9;
const ROW_FONT_SIZE: u8 = 8;
const SUMMARY_FONT_SIZE: u8 = 9;
const CAPTION_COLOR: Color = Color::Rgb(96, 96, 96);

/// Sum of all trip widths; every other block is laid out against it.
pub fn trips_table_width() -> usize {
    TRIP_COLUMN_WIDTHS.iter().sum()
}

/// Deduction columns: the description absorbs whatever the date and amount leave over.
pub fn deduction_column_widths() -> [usize; 3] {
    [trips_table_width() - 110, 50, 60]
}

/// Summary columns: label, value, label, boxed value.
pub fn summary_column_widths() -> [usize; 4] {
    [150, 100, trips_table_width() - 150 - 100 - TOTAL_CELL_WIDTH, TOTAL_CELL_WIDTH]
}

/// Totals printed on a statement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatementTotals {
    /// Sum of trip amounts in input order.
    pub trips: f64,
    /// Sum of deduction amounts in input order, as signed by the caller.
    pub deductions: f64,
}

impl StatementTotals {
    pub fn compute(request: &StatementRequest) -> Self {
        Self {
            trips: request
                .trips
                .iter()
                .fold(0.0, |total, trip| total + trip.amount),
            deductions: request
                .deductions
                .iter()
                .fold(0.0, |total, deduction| total + deduction.amount),
        }
    }

    /// Net payable for the period.
    ///
    /// Deductions are added as given. They only reduce the check when the caller sends them as
    /// negative amounts; no sign correction happens here.
    pub fn check_amount(&self) -> f64 {
        self.trips + self.deductions
    }
}

/// Cell texts of one trip row, in [`TRIP_HEADERS`] order.
pub fn trip_row(trip: &TripLine, currency: &CurrencyFormat) -> [String; 7] {
    [
        trip.date.clone(),
        trip.trip_number.clone(),
        trip.route.clone(),
        trip.description.clone(),
        format!("{:.2}", trip.quantity),
        format!("{:.4}", trip.rate),
        currency.format(trip.amount),
    ]
}

/// Cell texts of one deduction row, in [`DEDUCTION_HEADERS`] order.
pub fn deduction_row(deduction: &DeductionLine, currency: &CurrencyFormat) -> [String; 3] {
    [
        deduction.description.clone(),
        deduction.date.clone(),
        currency.format(deduction.amount),
    ]
}

/// Cell texts of the two summary rows.
pub fn summary_rows(
    request: &StatementRequest,
    totals: &StatementTotals,
    currency: &CurrencyFormat,
) -> [[String; 4]; 2] {
    [
        [
            "Total Net Year-To-Date : ".to_owned(),
            currency.format(request.ytd.net),
            String::new(),
            String::new(),
        ],
        [
            "Total Gross Year-To-Date : ".to_owned(),
            currency.format(request.ytd.gross),
            "Check Amount:".to_owned(),
            currency.format(totals.check_amount()),
        ],
    ]
}

fn trip_column_anchor(column: usize) -> Anchor {
    match column {
        2 | 3 => Anchor::Left,
        _ => Anchor::Center,
    }
}

fn cell(label: Label) -> impl Element {
    FittedText::new(label).padded(cell_padding())
}

fn push_cells<E, I>(table: &mut TableLayout, cells: I) -> Result<(), Error>
where
    E: Element + 'static,
    I: IntoIterator<Item = E>,
{
    cells
        .into_iter()
        .fold(table.row(), |row, element| row.element(element))
        .push()
}

fn header_cells(headers: &[&str]) -> Vec<ShadedCell> {
    headers
        .iter()
        .map(|header| {
            let label = Label::new(*header)
                .bold()
                .sized(HEADER_FONT_SIZE)
                .anchored(Anchor::Center);
            ShadedCell::new(label, HEADER_FILL)
        })
        .collect()
}

fn grid_table(widths: &[usize]) -> TableLayout {
    let mut table = TableLayout::new(widths.to_vec());
    table.set_cell_decorator(FrameCellDecorator::new(true, true, false));
    table
}

/// The trips table: shaded header row plus one row per trip in input order.
pub fn trips_table(
    request: &StatementRequest,
    currency: &CurrencyFormat,
) -> Result<TableLayout, Error> {
    let mut table = grid_table(&TRIP_COLUMN_WIDTHS);
    push_cells(&mut table, header_cells(&TRIP_HEADERS))?;

    for trip in &request.trips {
        let cells = trip_row(trip, currency)
            .into_iter()
            .enumerate()
            .map(|(column, text)| {
                cell(
                    Label::new(text)
                        .sized(ROW_FONT_SIZE)
                        .anchored(trip_column_anchor(column)),
                )
            });
        push_cells(&mut table, cells)?;
    }

    Ok(table)
}

/// The deductions table: shaded header row plus one centered row per deduction.
pub fn deductions_table(
    request: &StatementRequest,
    currency: &CurrencyFormat,
) -> Result<TableLayout, Error> {
    let mut table = grid_table(&deduction_column_widths());
    push_cells(&mut table, header_cells(&DEDUCTION_HEADERS))?;

    for deduction in &request.deductions {
        let cells = deduction_row(deduction, currency).into_iter().map(|text| {
            cell(
                Label::new(text)
                    .sized(ROW_FONT_SIZE)
                    .anchored(Anchor::Center),
            )
        });
        push_cells(&mut table, cells)?;
    }

    Ok(table)
}

/// A one-row bar with a right-aligned `Total:` label and the boxed, red amount.
pub fn total_bar(total: f64, currency: &CurrencyFormat) -> Result<TableLayout, Error> {
    let width = trips_table_width();
    let mut table = TableLayout::new(vec![width - TOTAL_CELL_WIDTH, TOTAL_CELL_WIDTH]);
    table.set_cell_decorator(BoxedCells::new(vec![(1, 0)]));

    table
        .row()
        .element(cell(Label::new("Total:").bold().anchored(Anchor::Right)))
        .element(cell(
            Label::new(currency.format(total))
                .bold()
                .colored(TOTAL_COLOR)
                .anchored(Anchor::Center),
        ))
        .push()?;

    Ok(table)
}

/// Year-to-date figures and the check amount; only the check amount is boxed.
pub fn summary_table(
    request: &StatementRequest,
    totals: &StatementTotals,
    currency: &CurrencyFormat,
) -> Result<TableLayout, Error> {
    let mut table = TableLayout::new(summary_column_widths().to_vec());
    table.set_cell_decorator(BoxedCells::new(vec![(3, 1)]));

    for texts in summary_rows(request, totals, currency) {
        let [label, value, check_label, check_value] = texts;
        let base = |text: String| Label::new(text).bold().sized(SUMMARY_FONT_SIZE);
        push_cells(
            &mut table,
            vec![
                cell(base(label).anchored(Anchor::Right)),
                cell(base(value).colored(YTD_COLOR).anchored(Anchor::Left)),
                cell(base(check_label).anchored(Anchor::Right)),
                cell(
                    base(check_value)
                        .colored(TOTAL_COLOR)
                        .anchored(Anchor::Center),
                ),
            ],
        )?;
    }

    Ok(table)
}

/// Caption under the summary: `MM.DD-MM.DD` around the statement date.
///
/// The statement date is accepted as `MM/DD/YYYY` or `MM/DD/YY`; anything else falls back to
/// the render date.
pub fn date_range_caption(statement_date: &str, now: NaiveDateTime) -> String {
    let trimmed = statement_date.trim();
    let day = ["%m/%d/%Y", "%m/%d/%y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .unwrap_or_else(|| now.date());
    let stamp = day.format("%m.%d");
    format!("{}-{}", stamp, stamp)
}

fn bold_line(text: &str) -> impl Element {
    Label::new(text).bold().to_paragraph()
}

/// Assembles the whole statement body in template order.
pub fn statement_body(
    request: &StatementRequest,
    totals: &StatementTotals,
    currency: &CurrencyFormat,
    statement_date: &str,
    now: NaiveDateTime,
) -> Result<LinearLayout, Error> {
    let mut body = LinearLayout::vertical();

    for line in request.recipient.lines() {
        body.push(bold_line(line));
    }
    body.push(VerticalSpace::points(20.0));

    body.push(bold_line("Trips :"));
    body.push(VerticalSpace::points(5.0));
    body.push(trips_table(request, currency)?);
    body.push(total_bar(totals.trips, currency)?);
    body.push(VerticalSpace::points(10.0));

    body.push(bold_line("Scheduled Deductions :"));
    body.push(VerticalSpace::points(5.0));
    body.push(deductions_table(request, currency)?);
    body.push(total_bar(totals.deductions, currency)?);
    body.push(VerticalSpace::points(20.0));

    body.push(summary_table(request, totals, currency)?);

    body.push(VerticalSpace::points(30.0));
    body.push(
        Label::new(date_range_caption(statement_date, now))
            .sized(ROW_FONT_SIZE)
            .colored(CAPTION_COLOR)
            .to_paragraph(),
    );

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 9)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn empty_request_totals_are_zero() {
        let totals = StatementTotals::compute(&StatementRequest::default());
        assert_eq!(totals.trips, 0.0);
        assert_eq!(totals.deductions, 0.0);
        assert_eq!(totals.check_amount(), 0.0);
    }

    #[test]
    fn totals_sum_signed_amounts() {
        let request = StatementRequest::from_value(json!({
            "trips": [{"amount": 100.00}, {"amount": -25.50}],
            "deductions": [{"amount": -37.50}, {"amount": "-12.50"}]
        }));
        let totals = StatementTotals::compute(&request);
        assert_eq!(totals.trips, 74.5);
        assert_eq!(totals.deductions, -50.0);
        assert_eq!(totals.check_amount(), totals.trips + totals.deductions);
        assert_eq!(CurrencyFormat::new().format(totals.trips), "$74.50");
    }

    #[test]
    fn positive_deductions_are_added_as_given() {
        let request = StatementRequest::from_value(json!({
            "trips": [{"amount": 600}],
            "deductions": [{"amount": 37.5}]
        }));
        assert_eq!(StatementTotals::compute(&request).check_amount(), 637.5);
    }

    #[test]
    fn trip_row_formats_numbers() {
        let request = StatementRequest::from_value(json!({
            "trips": [{
                "date": "12/01/25",
                "trip_number": "1743657425.00",
                "route": "Salem, MA-Murfreesboro, TN",
                "description": "30% of $2,000.00",
                "quantity": 2000,
                "rate": 0.3,
                "amount": 600
            }]
        }));
        let row = trip_row(&request.trips[0], &CurrencyFormat::new());
        assert_eq!(
            row,
            [
                "12/01/25",
                "1743657425.00",
                "Salem, MA-Murfreesboro, TN",
                "30% of $2,000.00",
                "2000.00",
                "0.3000",
                "$600.00",
            ]
        );
    }

    #[test]
    fn garbage_trip_renders_zeros() {
        let request = StatementRequest::from_value(json!({
            "trips": [{"amount": "abc", "quantity": "x", "rate": "y"}]
        }));
        let row = trip_row(&request.trips[0], &CurrencyFormat::new());
        assert_eq!(row[4], "0.00");
        assert_eq!(row[5], "0.0000");
        assert_eq!(row[6], "$0.00");
    }

    #[test]
    fn negative_deduction_is_parenthesised() {
        let deduction = DeductionLine {
            description: "OCCUPATIONAL ACCIDENTAL INSURANCE".into(),
            date: "12/04/25".into(),
            amount: -37.5,
        };
        let row = deduction_row(&deduction, &CurrencyFormat::new());
        assert_eq!(row[2], "($37.50)");
    }

    #[test]
    fn summary_shows_ytd_and_check_amount() {
        let request = StatementRequest::default().with_ytd(22801.41, 28826.40);
        let totals = StatementTotals {
            trips: 600.0,
            deductions: -37.5,
        };
        let rows = summary_rows(&request, &totals, &CurrencyFormat::new());
        assert_eq!(rows[0][1], "$22,801.41");
        assert_eq!(rows[0][2], "");
        assert_eq!(rows[1][1], "$28,826.40");
        assert_eq!(rows[1][2], "Check Amount:");
        assert_eq!(rows[1][3], "$562.50");
    }

    #[test]
    fn dependent_widths_follow_the_trips_table() {
        assert_eq!(trips_table_width(), 540);
        assert_eq!(deduction_column_widths(), [430, 50, 60]);
        assert_eq!(deduction_column_widths().iter().sum::<usize>(), 540);
        assert_eq!(summary_column_widths(), [150, 100, 220, 70]);
    }

    #[test]
    fn route_and_description_are_left_aligned() {
        let anchors: Vec<_> = (0..7).map(trip_column_anchor).collect();
        assert_eq!(
            anchors,
            [
                Anchor::Center,
                Anchor::Center,
                Anchor::Left,
                Anchor::Left,
                Anchor::Center,
                Anchor::Center,
                Anchor::Center,
            ]
        );
    }

    #[test]
    fn caption_uses_statement_date() {
        assert_eq!(date_range_caption("12/05/2025", now()), "12.05-12.05");
        assert_eq!(date_range_caption("12/01/25", now()), "12.01-12.01");
    }

    #[test]
    fn caption_falls_back_to_render_date() {
        assert_eq!(date_range_caption("first week of December", now()), "12.09-12.09");
        assert_eq!(date_range_caption("", now()), "12.09-12.09");
    }
}

//! Trucking settlement statements rendered to PDF.
//!
//! A [`StatementRequest`] (trips, scheduled deductions and year-to-date figures, usually decoded
//! from a JSON payload) is laid out into a fixed, paginated statement template by a
//! [`StatementBuilder`]. Every field of the request is optional and malformed values degrade to
//! defaults, so a render only fails when the PDF engine itself does.
//!
//! ```no_run
//! use truck_statement::{StatementBuilder, StatementRequest};
//!
//! let builder = StatementBuilder::with_default_fonts()?;
//! let request = StatementRequest::from_slice(br#"{"trips": [{"amount": 600}]}"#);
//! let statement = builder.generate(&request)?;
//! std::fs::write("statement.pdf", &statement.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod coerce;
pub mod currency;
pub mod elements;
pub mod fonts;
pub mod furniture;
pub mod layout;
pub mod model;
pub mod text;

pub use builder::StatementBuilder;
pub use currency::CurrencyFormat;
pub use layout::StatementTotals;
pub use model::{
    DeductionLine, Recipient, RenderedStatement, StatementInfo, StatementRequest, TripLine,
    YearToDate,
};

/// Error returned when the PDF engine fails to lay out or write a statement.
pub use genpdf::error::{Error, ErrorKind};

//! Data structures describing the payload of a statement render request.
//!
//! The types mirror the JSON accepted by the HTTP endpoint. Every field is optional on the wire;
//! the serde adapters in [`crate::coerce`] resolve missing or malformed values to defaults so a
//! request can always be decoded. Fallback text for the recipient and statement header is not
//! baked into the decoded values: the accessors below apply it, which keeps "absent" and
//! "explicitly provided" distinguishable for callers that care.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;

/// Recipient name used when the payload does not provide one.
pub const DEFAULT_RECIPIENT_NAME: &str = "FITRIGHT LOGISTICS LLC";
/// First address line used when the payload does not provide one.
pub const DEFAULT_ADDRESS_LINE_1: &str = "3374 FLAMBOROUGH DR";
/// Second address line used when the payload does not provide one.
pub const DEFAULT_ADDRESS_LINE_2: &str = "Orlando, FL 32835";
/// Truck number printed in the header when the payload does not provide one.
pub const DEFAULT_TRUCK_NUMBER: &str = "196";
/// `strftime` pattern of the default statement date.
pub const STATEMENT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Top-level payload of a statement render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementRequest {
    /// Party the statement is addressed to.
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub recipient: Recipient,
    /// Header information (date and truck).
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub statement_info: StatementInfo,
    /// Trip lines in display order.
    #[serde(default, deserialize_with = "coerce::lenient_list")]
    pub trips: Vec<TripLine>,
    /// Scheduled deductions in display order. Amounts are expected to be signed by the caller.
    #[serde(default, deserialize_with = "coerce::lenient_list")]
    pub deductions: Vec<DeductionLine>,
    /// Year-to-date figures supplied by the caller.
    #[serde(default, deserialize_with = "coerce::lenient")]
    pub ytd: YearToDate,
}

impl StatementRequest {
    /// Decodes a request from an already-parsed JSON value.
    ///
    /// Values that are not JSON objects decode to the all-default request.
    pub fn from_value(value: Value) -> Self {
        coerce::object_or_default(value)
    }

    /// Decodes a request from raw body bytes, treating undecodable input as `{}`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                log::debug!("Request body is not valid JSON ({}); rendering defaults", err);
                Self::default()
            }
        }
    }

    /// Appends a trip line and returns the updated request.
    pub fn with_trip(mut self, trip: TripLine) -> Self {
        self.trips.push(trip);
        self
    }

    /// Appends a deduction line and returns the updated request.
    pub fn with_deduction(mut self, deduction: DeductionLine) -> Self {
        self.deductions.push(deduction);
        self
    }

    /// Sets the year-to-date figures and returns the updated request.
    pub fn with_ytd(mut self, net: f64, gross: f64) -> Self {
        self.ytd = YearToDate { net, gross };
        self
    }
}

/// Addressee block printed under the page header.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub address_line_1: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub address_line_2: Option<String>,
}

impl Recipient {
    /// Returns the recipient name or its fallback.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_RECIPIENT_NAME)
    }

    /// Returns the first address line or its fallback.
    pub fn address_line_1(&self) -> &str {
        self.address_line_1
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS_LINE_1)
    }

    /// Returns the second address line or its fallback.
    pub fn address_line_2(&self) -> &str {
        self.address_line_2
            .as_deref()
            .unwrap_or(DEFAULT_ADDRESS_LINE_2)
    }

    /// The three printed lines, in order.
    pub fn lines(&self) -> [&str; 3] {
        [self.name(), self.address_line_1(), self.address_line_2()]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementInfo {
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "coerce::lenient_text")]
    pub truck_number: Option<String>,
}

impl StatementInfo {
    /// Returns the statement date, formatting `now` as `MM/DD/YYYY` when none was supplied.
    pub fn date_or(&self, now: NaiveDateTime) -> String {
        match &self.date {
            Some(date) => date.clone(),
            None => now.format(STATEMENT_DATE_FORMAT).to_string(),
        }
    }

    /// Returns the truck number or its fallback.
    pub fn truck_number(&self) -> &str {
        self.truck_number.as_deref().unwrap_or(DEFAULT_TRUCK_NUMBER)
    }
}

/// One transportation job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripLine {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub trip_number: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub route: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub rate: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub amount: f64,
}

/// One adjustment against revenue, usually negative.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductionLine {
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "coerce::lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub amount: f64,
}

/// Cumulative figures shown in the summary block. They are displayed, never computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YearToDate {
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub net: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub gross: f64,
}

/// Output of a render: the PDF bytes plus figures useful for logging and tests.
#[derive(Clone, Debug)]
pub struct RenderedStatement {
    /// Complete PDF document.
    pub bytes: Vec<u8>,
    /// Number of pages the engine laid out.
    pub pages: usize,
    /// Totals printed on the statement.
    pub totals: crate::layout::StatementTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_decodes_to_defaults() {
        let request = StatementRequest::from_value(json!({}));
        assert_eq!(request, StatementRequest::default());
        assert_eq!(request.recipient.name(), DEFAULT_RECIPIENT_NAME);
        assert_eq!(request.statement_info.truck_number(), "196");
    }

    #[test]
    fn malformed_bytes_decode_to_defaults() {
        let request = StatementRequest::from_slice(b"{not json");
        assert_eq!(request, StatementRequest::default());
    }

    #[test]
    fn non_object_body_decodes_to_defaults() {
        assert_eq!(
            StatementRequest::from_value(json!([1, 2, 3])),
            StatementRequest::default()
        );
        assert_eq!(
            StatementRequest::from_value(json!("statement")),
            StatementRequest::default()
        );
    }

    #[test]
    fn bad_trip_fields_coerce_to_zero() {
        let request = StatementRequest::from_value(json!({
            "trips": [{"amount": "abc", "quantity": "x", "rate": "y", "route": "A-B"}]
        }));
        let trip = &request.trips[0];
        assert_eq!(trip.amount, 0.0);
        assert_eq!(trip.quantity, 0.0);
        assert_eq!(trip.rate, 0.0);
        assert_eq!(trip.route, "A-B");
        assert_eq!(trip.date, "");
    }

    #[test]
    fn one_bad_field_does_not_reset_its_neighbours() {
        let request = StatementRequest::from_value(json!({
            "trips": [{"amount": "600.00", "quantity": "x", "rate": 0.3}]
        }));
        let trip = &request.trips[0];
        assert_eq!(trip.amount, 600.0);
        assert_eq!(trip.quantity, 0.0);
        assert_eq!(trip.rate, 0.3);
    }

    #[test]
    fn wrongly_shaped_sections_become_defaults() {
        let request = StatementRequest::from_value(json!({
            "recipient": "nobody",
            "trips": {"amount": 5},
            "deductions": [42, {"amount": -37.5}],
            "ytd": [1, 2]
        }));
        assert_eq!(request.recipient, Recipient::default());
        assert!(request.trips.is_empty());
        assert_eq!(request.deductions.len(), 2);
        assert_eq!(request.deductions[0], DeductionLine::default());
        assert_eq!(request.deductions[1].amount, -37.5);
        assert_eq!(request.ytd, YearToDate::default());
    }

    #[test]
    fn recipient_fallbacks_apply_per_line() {
        let request = StatementRequest::from_value(json!({
            "recipient": {"name": "ACME FREIGHT", "address_line_2": null}
        }));
        assert_eq!(
            request.recipient.lines(),
            ["ACME FREIGHT", DEFAULT_ADDRESS_LINE_1, DEFAULT_ADDRESS_LINE_2]
        );
    }

    #[test]
    fn statement_date_defaults_to_now() {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 12, 7)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp");
        let info = StatementInfo::default();
        assert_eq!(info.date_or(now), "12/07/2025");

        let info = StatementInfo {
            date: Some("12/05/2025".into()),
            truck_number: Some("204".into()),
        };
        assert_eq!(info.date_or(now), "12/05/2025");
        assert_eq!(info.truck_number(), "204");
    }

    #[test]
    fn numeric_truck_number_uses_json_text() {
        let request = StatementRequest::from_value(json!({
            "statement_info": {"truck_number": 196}
        }));
        assert_eq!(request.statement_info.truck_number(), "196");
    }
}

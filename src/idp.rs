//! Optional filters for the IDP admin-level datasets.
//!
//! The IDP endpoints accept a family of optional query parameters; a filter
//! left as `None` is omitted from the request entirely, never sent as an
//! empty string. Admin 1 recognizes the admin 0 parameters plus its own name
//! and pcode, and admin 2 extends admin 1 the same way.
//!
//! By convention the server expects at least one of `operation`,
//! `country_name`, or `admin0_pcode` on every IDP request. The convention is
//! documentation only: the client sends whatever it is given and lets the
//! server decide.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for reporting-date filters.
const REPORTING_DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters for the IDP admin 0/1/2 endpoints.
///
/// Fields recognized only by deeper admin levels (e.g. `admin2_name`) are
/// ignored by shallower endpoints. Reporting dates travel as opaque
/// `YYYY-MM-DD` strings and are not parsed or validated locally; round
/// numbers are likewise passed through without range or ordering checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpFilters {
    /// Name of the DTM operation for which the data was collected.
    pub operation: Option<String>,

    /// Name of the country where the data was collected.
    pub country_name: Option<String>,

    /// Country code (ISO 3166-1 alpha-3).
    pub admin0_pcode: Option<String>,

    /// Name of a level 1 administrative boundary.
    pub admin1_name: Option<String>,

    /// Place code of a level 1 administrative boundary.
    pub admin1_pcode: Option<String>,

    /// Name of a level 2 administrative boundary.
    pub admin2_name: Option<String>,

    /// Place code of a level 2 administrative boundary.
    pub admin2_pcode: Option<String>,

    /// Start of the reporting period, `YYYY-MM-DD`.
    pub from_reporting_date: Option<String>,

    /// End of the reporting period, `YYYY-MM-DD`.
    pub to_reporting_date: Option<String>,

    /// First round number of the data-collection range.
    pub from_round_number: Option<u32>,

    /// Last round number of the data-collection range.
    pub to_round_number: Option<u32>,
}

impl IdpFilters {
    /// Filters scoped to a single DTM operation.
    pub fn for_operation(operation: &str) -> Self {
        Self {
            operation: Some(operation.to_string()),
            ..Self::default()
        }
    }

    /// Filters scoped to a single country by name.
    pub fn for_country(country_name: &str) -> Self {
        Self {
            country_name: Some(country_name.to_string()),
            ..Self::default()
        }
    }

    /// Filters scoped to a single country by ISO 3166-1 alpha-3 code.
    pub fn for_admin0_pcode(admin0_pcode: &str) -> Self {
        Self {
            admin0_pcode: Some(admin0_pcode.to_string()),
            ..Self::default()
        }
    }

    /// Restrict the reporting period, formatting both bounds to the wire's
    /// `YYYY-MM-DD` form.
    pub fn reporting_period(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from_reporting_date = Some(from.format(REPORTING_DATE_FORMAT).to_string());
        self.to_reporting_date = Some(to.format(REPORTING_DATE_FORMAT).to_string());
        self
    }

    /// Whether at least one of the identifying filters (`operation`,
    /// `country_name`, `admin0_pcode`) is set.
    ///
    /// The server conventionally rejects IDP requests without one; this
    /// helper is for callers that want to check up front. The client itself
    /// never enforces it.
    pub fn has_identifying_filter(&self) -> bool {
        self.operation.is_some() || self.country_name.is_some() || self.admin0_pcode.is_some()
    }

    /// Parameters recognized by the admin 0 endpoint, in wire order.
    pub(crate) fn admin0_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("Operation", self.operation.clone()),
            ("CountryName", self.country_name.clone()),
            ("Admin0Pcode", self.admin0_pcode.clone()),
            ("FromReportingDate", self.from_reporting_date.clone()),
            ("ToReportingDate", self.to_reporting_date.clone()),
            ("FromRoundNumber", self.from_round_number.map(|n| n.to_string())),
            ("ToRoundNumber", self.to_round_number.map(|n| n.to_string())),
        ]
    }

    /// Parameters recognized by the admin 1 endpoint, in wire order.
    pub(crate) fn admin1_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("Operation", self.operation.clone()),
            ("CountryName", self.country_name.clone()),
            ("Admin0Pcode", self.admin0_pcode.clone()),
            ("Admin1Name", self.admin1_name.clone()),
            ("Admin1Pcode", self.admin1_pcode.clone()),
            ("FromReportingDate", self.from_reporting_date.clone()),
            ("ToReportingDate", self.to_reporting_date.clone()),
            ("FromRoundNumber", self.from_round_number.map(|n| n.to_string())),
            ("ToRoundNumber", self.to_round_number.map(|n| n.to_string())),
        ]
    }

    /// Parameters recognized by the admin 2 endpoint, in wire order.
    pub(crate) fn admin2_params(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("Operation", self.operation.clone()),
            ("CountryName", self.country_name.clone()),
            ("Admin0Pcode", self.admin0_pcode.clone()),
            ("Admin1Name", self.admin1_name.clone()),
            ("Admin1Pcode", self.admin1_pcode.clone()),
            ("Admin2Name", self.admin2_name.clone()),
            ("Admin2Pcode", self.admin2_pcode.clone()),
            ("FromReportingDate", self.from_reporting_date.clone()),
            ("ToReportingDate", self.to_reporting_date.clone()),
            ("FromRoundNumber", self.from_round_number.map(|n| n.to_string())),
            ("ToRoundNumber", self.to_round_number.map(|n| n.to_string())),
        ]
    }
}

//! DTM API client.
//!
//! The Displacement Tracking Matrix (DTM) is IOM's system for tracking the
//! displacement and mobility of populations. Its public API serves the
//! country and operation catalogues plus internally-displaced-person (IDP)
//! figures at three administrative levels.
//!
//! # Datasets
//!
//! - Country list: all countries with publicly available DTM data
//! - Operation list: all DTM operations with publicly available data
//! - IDP admin 0/1/2: displacement figures at country, first-level, and
//!   second-level administrative granularity
//!
//! # API Reference
//!
//! See: <https://dtm.iom.int/data-and-analysis/dtm-api>
//!
//! # Behavior
//!
//! Every call issues exactly one HTTP GET and blocks (asynchronously) until
//! the response arrives; there is no retry, caching, or pagination, and no
//! timeout beyond what reqwest applies by default. The client holds no
//! shared mutable state, so clones can be used freely from concurrent tasks.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Error;
use crate::idp::IdpFilters;
use crate::tabular::{Record, RecordSet};

/// Base URL for the DTM API.
const DTM_API_BASE: &str = "https://dtmapi.iom.int/api";

/// Endpoint paths, one per dataset family.
const COUNTRY_LIST_PATH: &str = "/Common/GetAllCountryList";
const OPERATION_LIST_PATH: &str = "/Common/GetAllOperationList";
const IDP_ADMIN0_PATH: &str = "/IdpAdmin0Data/GetAdmin0Datav2";
const IDP_ADMIN1_PATH: &str = "/IdpAdmin1Data/GetAdmin1Datav2";
const IDP_ADMIN2_PATH: &str = "/IdpAdmin2Data/GetAdmin2Datav2";

/// Static User-Agent sent with every request. The DTM endpoints sit behind
/// bot filtering that tends to block generic client user agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Client for querying the DTM API.
#[derive(Debug, Clone)]
pub struct DtmClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DtmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DtmClient {
    /// Create a new DTM client.
    pub fn new() -> Self {
        Self::with_base_url(DTM_API_BASE)
    }

    /// Create a client with a custom base URL (for testing).
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("reqwest client with static user agent");

        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Retrieve all countries for which DTM data is publicly available,
    /// as a tabular [`RecordSet`].
    pub async fn get_all_countries(&self) -> Result<RecordSet, Error> {
        Ok(RecordSet::from_records(self.get_all_countries_raw().await?))
    }

    /// Retrieve all countries for which DTM data is publicly available,
    /// as the unshaped record array.
    pub async fn get_all_countries_raw(&self) -> Result<Vec<Record>, Error> {
        self.fetch(COUNTRY_LIST_PATH, &[]).await
    }

    /// Retrieve all operations for which DTM data is publicly available,
    /// as a tabular [`RecordSet`].
    pub async fn get_all_operations(&self) -> Result<RecordSet, Error> {
        Ok(RecordSet::from_records(self.get_all_operations_raw().await?))
    }

    /// Retrieve all operations for which DTM data is publicly available,
    /// as the unshaped record array.
    pub async fn get_all_operations_raw(&self) -> Result<Vec<Record>, Error> {
        self.fetch(OPERATION_LIST_PATH, &[]).await
    }

    /// Retrieve IDP figures at country level (admin 0), as a tabular
    /// [`RecordSet`].
    ///
    /// By convention at least one of `operation`, `country_name`, or
    /// `admin0_pcode` should be set on `filters`; the server rejects
    /// requests it cannot scope. The convention is not enforced locally.
    ///
    /// # Arguments
    ///
    /// * `filters` - Optional query filters; unset filters are omitted from
    ///   the request.
    pub async fn get_idp_admin0_data(&self, filters: &IdpFilters) -> Result<RecordSet, Error> {
        Ok(RecordSet::from_records(
            self.get_idp_admin0_data_raw(filters).await?,
        ))
    }

    /// Retrieve IDP figures at country level (admin 0), as the unshaped
    /// record array.
    pub async fn get_idp_admin0_data_raw(
        &self,
        filters: &IdpFilters,
    ) -> Result<Vec<Record>, Error> {
        self.fetch(IDP_ADMIN0_PATH, &filters.admin0_params()).await
    }

    /// Retrieve IDP figures at first-level administrative boundaries
    /// (admin 1), as a tabular [`RecordSet`].
    ///
    /// Recognizes the admin 0 filters plus `admin1_name` and `admin1_pcode`.
    /// The identifying-filter convention of
    /// [`get_idp_admin0_data`](Self::get_idp_admin0_data) applies.
    pub async fn get_idp_admin1_data(&self, filters: &IdpFilters) -> Result<RecordSet, Error> {
        Ok(RecordSet::from_records(
            self.get_idp_admin1_data_raw(filters).await?,
        ))
    }

    /// Retrieve IDP figures at first-level administrative boundaries
    /// (admin 1), as the unshaped record array.
    pub async fn get_idp_admin1_data_raw(
        &self,
        filters: &IdpFilters,
    ) -> Result<Vec<Record>, Error> {
        self.fetch(IDP_ADMIN1_PATH, &filters.admin1_params()).await
    }

    /// Retrieve IDP figures at second-level administrative boundaries
    /// (admin 2), as a tabular [`RecordSet`].
    ///
    /// Recognizes the admin 1 filters plus `admin2_name` and `admin2_pcode`.
    /// The identifying-filter convention of
    /// [`get_idp_admin0_data`](Self::get_idp_admin0_data) applies.
    pub async fn get_idp_admin2_data(&self, filters: &IdpFilters) -> Result<RecordSet, Error> {
        Ok(RecordSet::from_records(
            self.get_idp_admin2_data_raw(filters).await?,
        ))
    }

    /// Retrieve IDP figures at second-level administrative boundaries
    /// (admin 2), as the unshaped record array.
    pub async fn get_idp_admin2_data_raw(
        &self,
        filters: &IdpFilters,
    ) -> Result<Vec<Record>, Error> {
        self.fetch(IDP_ADMIN2_PATH, &filters.admin2_params()).await
    }

    /// Issue a GET for one endpoint and normalize the response envelope.
    async fn fetch(
        &self,
        path: &str,
        params: &[(&'static str, Option<String>)],
    ) -> Result<Vec<Record>, Error> {
        let url = build_url(&self.base_url, path, params);

        debug!(%url, "requesting DTM data");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let envelope = response.json::<DtmEnvelope>().await?;

        normalize(envelope)
    }
}

/// Assemble the request URL: set filters are appended URL-encoded, unset
/// filters are omitted entirely (never sent as empty strings).
fn build_url(base_url: &str, path: &str, params: &[(&'static str, Option<String>)]) -> String {
    let mut url = format!("{}{}", base_url, path);
    let mut separator = '?';

    for (name, value) in params {
        if let Some(value) = value {
            url.push(separator);
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
            separator = '&';
        }
    }

    url
}

/// Apply the envelope contract: success yields the result records, failure
/// yields the server's first error message, and a structurally incomplete
/// envelope is reported as malformed.
fn normalize(envelope: DtmEnvelope) -> Result<Vec<Record>, Error> {
    match envelope.is_success {
        Some(true) => envelope.result.ok_or(Error::Malformed("result")),
        Some(false) => {
            let message = envelope
                .error_messages
                .into_iter()
                .next()
                .unwrap_or_else(|| "server reported failure without an error message".to_string());
            warn!(%message, "DTM API rejected the request");
            Err(Error::Rejected(message))
        }
        None => Err(Error::Malformed("isSuccess")),
    }
}

// ============================================================================
// Response types
// ============================================================================

/// Response envelope wrapping every DTM API payload.
///
/// `is_success` and `result` deserialize as options so that an envelope
/// missing either field is detected instead of silently defaulting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DtmEnvelope {
    /// Whether the server accepted the request.
    is_success: Option<bool>,

    /// Result records; present when `is_success` is true.
    result: Option<Vec<Record>>,

    /// Server-supplied error messages; populated on failure.
    #[serde(default)]
    error_messages: Vec<String>,
}

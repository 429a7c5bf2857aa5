//! Blocking OpenSky Network client.
//!
//! [`OpenSkyClient`] talks to the REST `/states/all` endpoint: one GET per
//! query, filtered by a lat/lon bounding box, optionally authenticated with
//! basic auth. Construction probes the endpoint with a throwaway query so a
//! bad password or an unreachable network surfaces immediately instead of on
//! the first real fetch.
//!
//! The [`StateSource`] trait is the seam between this live client and the
//! offline fixture source; callers hold a `dyn StateSource` and never know
//! which one they got.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::errors::{Result, SkyringError};
use crate::geo::{bounding_box_around, BoundingBox, GeoPoint};
use crate::models::{StateSnapshot, StateVectorResponse};

/// Public OpenSky REST root.
pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";

/// Per-request timeout unless the caller picks another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Fixed 1°x1° box off the west African coast used by the construction
// probe. The content of the answer is irrelevant, only its status code.
const PROBE_BOX: BoundingBox = BoundingBox {
    min_lat: 0.0,
    min_lon: 0.0,
    max_lat: 1.0,
    max_lon: 1.0,
};

/// Anything that can answer a bounding-box state query.
pub trait StateSource {
    /// Fetches the current state snapshot for aircraft inside `bbox`.
    fn fetch_states_in_box(&self, bbox: &BoundingBox) -> Result<StateSnapshot>;

    /// Fetches the snapshot for everything within `radius_km` of `center`.
    ///
    /// Composes [`bounding_box_around`] with [`fetch_states_in_box`], so the
    /// covered area is the conservative bounding box, not an exact disk.
    ///
    /// [`fetch_states_in_box`]: StateSource::fetch_states_in_box
    fn fetch_states_in_range(&self, center: GeoPoint, radius_km: f64) -> Result<StateSnapshot> {
        let bbox = bounding_box_around(center, radius_km)?;
        self.fetch_states_in_box(&bbox)
    }
}

/// Basic-auth credentials for the OpenSky API.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Live HTTP [`StateSource`] backed by the OpenSky REST API.
#[derive(Debug)]
pub struct OpenSkyClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl OpenSkyClient {
    /// Connects to the public OpenSky endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Fails fast when the probe query does: [`SkyringError::Authentication`]
    /// if the endpoint answers 401, [`SkyringError::Connectivity`] for any
    /// other non-200 answer or transport failure.
    pub fn new(credentials: Option<Credentials>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, credentials, DEFAULT_TIMEOUT)
    }

    /// Connects to an explicit endpoint, probing it before returning.
    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self> {
        let provider = Self::unprobed(base_url, credentials, timeout)?;
        provider.probe()?;
        Ok(provider)
    }

    fn unprobed(
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(OpenSkyClient {
            client,
            base_url: base_url.into(),
            credentials,
        })
    }

    // One throwaway query against PROBE_BOX; the body is discarded.
    fn probe(&self) -> Result<()> {
        debug!(base_url = %self.base_url, "probing endpoint reachability and credentials");
        let response = self.states_request(&PROBE_BOX).send()?;
        classify_status(response.status())?;
        info!(base_url = %self.base_url, "endpoint reachable, credentials accepted");
        Ok(())
    }

    fn states_request(&self, bbox: &BoundingBox) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}/states/all", self.base_url);
        let mut request = self.client.get(url).query(&[
            ("lamin", bbox.min_lat),
            ("lomin", bbox.min_lon),
            ("lamax", bbox.max_lat),
            ("lomax", bbox.max_lon),
        ]);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }
        request
    }
}

impl StateSource for OpenSkyClient {
    fn fetch_states_in_box(&self, bbox: &BoundingBox) -> Result<StateSnapshot> {
        debug!(
            lamin = bbox.min_lat,
            lomin = bbox.min_lon,
            lamax = bbox.max_lat,
            lomax = bbox.max_lon,
            "requesting state vectors"
        );
        let response = self.states_request(bbox).send()?;
        classify_status(response.status())?;
        let body = response.text()?;
        let decoded: StateVectorResponse = serde_json::from_str(&body)?;
        decoded.decode()
    }
}

// 401 is the only status with a meaning of its own; every other non-200
// answer counts as connectivity trouble.
fn classify_status(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::UNAUTHORIZED => Err(SkyringError::Authentication(
            "the API rejected the supplied credentials (HTTP 401)".to_owned(),
        )),
        other => Err(SkyringError::Connectivity(format!(
            "the API answered with HTTP {other} instead of 200"
        ))),
    }
}

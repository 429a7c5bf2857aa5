//! Offline [`StateSource`] backed by a canned response file.
//!
//! Useful when developing against the rate-limited live API is a nuisance:
//! point it at a saved `/states/all` body and the rest of the program runs
//! unchanged.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::api::StateSource;
use crate::errors::{Result, SkyringError};
use crate::geo::BoundingBox;
use crate::models::{StateSnapshot, StateVectorResponse};

/// How many entries a fixture load keeps unless told otherwise.
pub const DEFAULT_MAX_AIRCRAFT: usize = 50;

/// Reads snapshots from a JSON file shaped like the live response body.
///
/// The raw state list is truncated to `max_aircraft` entries before any
/// decoding happens, so junk rows past the cutoff never fail a load.
pub struct FixtureSource {
    path: PathBuf,
    max_aircraft: usize,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limit(path, DEFAULT_MAX_AIRCRAFT)
    }

    pub fn with_limit(path: impl Into<PathBuf>, max_aircraft: usize) -> Self {
        FixtureSource {
            path: path.into(),
            max_aircraft,
        }
    }

    fn load(&self) -> Result<StateVectorResponse> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SkyringError::Fixture {
            path: self.path.clone(),
            source,
        })?;
        let mut response: StateVectorResponse = serde_json::from_str(&raw)?;
        if let Some(states) = response.states.as_mut() {
            states.truncate(self.max_aircraft);
        }
        Ok(response)
    }
}

impl StateSource for FixtureSource {
    /// The bounding box is ignored; fixture data is whatever the file holds,
    /// with no spatial filtering.
    fn fetch_states_in_box(&self, _bbox: &BoundingBox) -> Result<StateSnapshot> {
        debug!(
            path = %self.path.display(),
            limit = self.max_aircraft,
            "loading canned state vectors"
        );
        self.load()?.decode()
    }
}

//! Client library for the OpenSky Network `/states/all` endpoint.
//!
//! The pieces fit together like this: the `geo` module turns a center point
//! plus a radius into the lat/lon bounding box the API filters by, `api`
//! fetches one snapshot per query over blocking HTTP (or `fixture` serves
//! one from a canned file), `models` decodes the positional wire entries
//! into typed records, and `report` renders the result as plain text.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fixture;
pub mod geo;
pub mod logging;
pub mod models;
pub mod report;

pub use crate::api::{Credentials, OpenSkyClient, StateSource};
pub use crate::errors::{Result, SkyringError};
pub use crate::fixture::FixtureSource;
pub use crate::geo::{bounding_box_around, BoundingBox, GeoPoint};
pub use crate::models::{AircraftState, StateSnapshot, StateVectorResponse};

//! Whereami - find out which country you are in, and who lives next door.
//!
//! # Overview
//!
//! On request, whereami takes the caller's position, reverse-geocodes it to a
//! country code, fetches that country from the REST Countries API, fetches
//! one of its bordering countries (raced against a 10 second timeout), and
//! renders both as HTML cards onto a display surface.
//!
//! Every failure along the way ends up as a single human-readable message on
//! the same surface. Nothing is retried, cached or persisted.
//!
//! # Modules
//!
//! - [`model`]: Country records, coordinates and wire types
//! - [`error`]: The lookup error taxonomy
//! - [`fetch`]: JSON fetching over a pluggable HTTP transport
//! - [`timeout`]: Timeout guard and first-to-settle race
//! - [`geolocation`]: Sources of the caller's position
//! - [`render`]: Display surfaces and the country/error renderers
//! - [`finder`]: Lookup orchestration
//! - [`api`]: HTTP API handlers

pub mod api;
pub mod error;
pub mod fetch;
pub mod finder;
pub mod geolocation;
pub mod model;
pub mod render;
pub mod timeout;

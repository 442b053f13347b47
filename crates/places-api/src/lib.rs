//! Rust client for the place-lookup HTTP API
//!
//! This crate provides typed access to the upstream place-details endpoint and
//! a verbatim forwarding call used by the caching proxy for every other path.
//!
//! # Example
//!
//! ```no_run
//! use places_api::{DetailsOutcome, PlacesClient};
//!
//! # async fn example() -> Result<(), places_api::PlacesError> {
//! let client = PlacesClient::new();
//!
//! match client.place_details("ChIJN1t_tDeuEmsRUsoyG83frY4", &["name", "geometry/location"], "KEY").await? {
//!     DetailsOutcome::Found(place) => println!("{:?}", place.name),
//!     DetailsOutcome::Rejected(body) => println!("upstream said no: {}", body),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /maps/api/place/details/json` - Place details by identifier
//! - any other path - forwarded as-is by [`PlacesClient::forward`]

mod client;
mod error;
mod types;

pub use client::{PlacesClient, DETAILS_PATH};
pub use error::{PlacesError, Result};
pub use types::{DetailsOutcome, ForwardedResponse, PlaceGeometry, PlaceResult};

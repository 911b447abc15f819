//! Data models for generated user profiles.
//!
//! - `Profile`: one generated user, keyed by `login.username`
//! - `ProfilesResponse`: the `{ results, info }` envelope returned by the source
//! - `GeoPoint`: parsed coordinates for the map view
//! - `ProfileTheme`: accent selection derived from age and gender

pub mod profile;

pub use profile::{
    Coordinates, Dob, GeoPoint, Location, Login, Name, Picture, Profile, ProfileTheme,
    ProfilesResponse, ResponseInfo, Street,
};

#[cfg(test)]
pub(crate) use profile::fixtures;

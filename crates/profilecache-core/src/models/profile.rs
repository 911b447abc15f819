use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// Age above which a profile gets the `Elder` accent.
const ELDER_AGE: u32 = 50;

/// Age below which a profile gets the `Young` accent.
const YOUNG_AGE: u32 = 25;

// API Response wrappers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub results: Vec<Profile>,
    #[serde(default)]
    pub info: Option<ResponseInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub seed: Option<String>,
    pub results: Option<u32>,
    pub page: Option<u32>,
    pub version: Option<String>,
}

/// A generated user profile.
///
/// `login.username` is the identity of a profile. Equality and hashing look
/// at nothing else, so a regenerated record with the same username is the
/// same logical entity for favorites and gallery lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Profile {
    pub login: Login,
    pub name: Name,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub cell: Option<String>,
    pub gender: String,
    pub picture: Picture,
    pub location: Location,
    pub dob: Dob,
    #[serde(default)]
    pub nat: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Login {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Name {
    #[serde(default)]
    pub title: Option<String>,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Picture {
    pub large: String,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Location {
    pub street: Street,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Street {
    pub number: i64,
    pub name: String,
}

/// Coordinates exactly as transmitted: decimal strings, not numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS))]
pub struct Dob {
    pub date: String,
    pub age: u32,
}

/// Parsed latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Accent used by the rendering layer for a profile's backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum ProfileTheme {
    Elder,
    Young,
    Male,
    Female,
    Neutral,
}

impl Profile {
    pub fn username(&self) -> &str {
        &self.login.username
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
    }

    pub fn age(&self) -> u32 {
        self.dob.age
    }

    /// Address line as `number street, city, country`.
    pub fn full_address(&self) -> String {
        let loc = &self.location;
        format!(
            "{} {}, {}, {}",
            loc.street.number, loc.street.name, loc.city, loc.country
        )
    }

    pub fn geo_point(&self) -> Option<GeoPoint> {
        self.location.coordinates.to_point()
    }

    /// Age checks come first, so a 60 year old is `Elder` regardless of gender.
    pub fn theme(&self) -> ProfileTheme {
        if self.dob.age > ELDER_AGE {
            ProfileTheme::Elder
        } else if self.dob.age < YOUNG_AGE {
            ProfileTheme::Young
        } else {
            match self.gender.as_str() {
                "male" => ProfileTheme::Male,
                "female" => ProfileTheme::Female,
                _ => ProfileTheme::Neutral,
            }
        }
    }
}

impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.login.username == other.login.username
    }
}

impl Eq for Profile {}

impl Hash for Profile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login.username.hash(state);
    }
}

impl Coordinates {
    /// Parse both decimal strings. Returns `None` for unparsable or
    /// out-of-range values so callers can skip the map instead of failing.
    pub fn to_point(&self) -> Option<GeoPoint> {
        let latitude: f64 = self.latitude.trim().parse().ok()?;
        let longitude: f64 = self.longitude.trim().parse().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(GeoPoint {
            latitude,
            longitude,
        })
    }
}

impl ProfileTheme {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileTheme::Elder => "elder",
            ProfileTheme::Young => "young",
            ProfileTheme::Male => "male",
            ProfileTheme::Female => "female",
            ProfileTheme::Neutral => "neutral",
        }
    }
}

/// Builders for test fixtures shared by the crate's unit tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn profile(username: &str) -> Profile {
        profile_with_age(username, 30)
    }

    pub fn profile_with_age(username: &str, age: u32) -> Profile {
        Profile {
            login: Login {
                username: username.to_string(),
            },
            name: Name {
                title: Some("Mr".to_string()),
                first: "John".to_string(),
                last: "Doe".to_string(),
            },
            email: format!("{}@example.com", username),
            phone: "(555) 123-4567".to_string(),
            cell: None,
            gender: "male".to_string(),
            picture: Picture {
                large: format!("https://example.com/{}.jpg", username),
                medium: None,
                thumbnail: None,
            },
            location: Location {
                street: Street {
                    number: 8929,
                    name: "Valwood Pkwy".to_string(),
                },
                city: "Billings".to_string(),
                state: Some("Michigan".to_string()),
                country: "United States".to_string(),
                coordinates: Coordinates {
                    latitude: "-69.8246".to_string(),
                    longitude: "134.8719".to_string(),
                },
            },
            dob: Dob {
                date: "1992-03-08T15:13:16.688Z".to_string(),
                age,
            },
            nat: Some("US".to_string()),
        }
    }
}

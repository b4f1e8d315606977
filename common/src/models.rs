// Row types for the LightBnB schema

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A registered user
///
/// `password` holds the hash supplied by the caller at sign-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Fields required to insert a user
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Already hashed by the caller
    pub password: String,
}

/// A rentable property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Price in cents
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// Fields required to insert a property
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// A property as returned by a search, with its mean review rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// None when the property has no reviews
    pub average_rating: Option<f64>,
}

/// A guest's booking of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Optional search filters for properties
///
/// Blank strings deserialize as absent, so a search form posted with empty
/// fields applies no predicate for them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub owner_id: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub city: Option<String>,
    /// Whole dollars
    #[serde(default, deserialize_with = "blank_as_none")]
    pub minimum_price_per_night: Option<i32>,
    /// Whole dollars
    #[serde(default, deserialize_with = "blank_as_none")]
    pub maximum_price_per_night: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub minimum_rating: Option<f64>,
}

/// Accepts a value, a numeric string, or a blank string (→ None)
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + serde::de::DeserializeOwned,
    T::Err: std::fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Value(serde_json::Value),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        // Text keeps its spacing; numbers tolerate padding around the digits
        Some(Raw::Text(s)) => s
            .parse::<T>()
            .or_else(|_| s.trim().parse::<T>())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(Raw::Value(serde_json::Value::Null)) => Ok(None),
        Some(Raw::Value(v)) => serde_json::from_value(v)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

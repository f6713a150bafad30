//! Typed documents stored in the `reviews` and `dealerships` collections.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field names used when filtering or sorting documents in the store.
pub mod fields {
    pub const ID: &str = "id";
    pub const DEALERSHIP: &str = "dealership";
    pub const STATE: &str = "state";
}

/// External identifier of a dealership.
///
/// Seed data uses integers while clients may send strings. A string holding a
/// base-10 integer is cast to [`DealerId::Number`] when deserialized or parsed,
/// so `"1"` and `1` name the same dealer everywhere. `Text` only ever holds
/// non-numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DealerId {
    Number(i64),
    Text(String),
}

impl DealerId {
    /// Interpret a URL path segment. Base-10 integers map to [`DealerId::Number`],
    /// everything else is kept as text.
    pub fn from_path(segment: &str) -> Self {
        segment
            .parse::<i64>()
            .map(DealerId::Number)
            .unwrap_or_else(|_| DealerId::Text(segment.to_string()))
    }
}

impl<'de> Deserialize<'de> for DealerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => DealerId::Number(n),
            Raw::Text(s) => DealerId::from_path(&s),
        })
    }
}

impl fmt::Display for DealerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealerId::Number(n) => write!(f, "{n}"),
            DealerId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DealerId {
    fn from(value: i64) -> Self {
        DealerId::Number(value)
    }
}

impl From<&str> for DealerId {
    fn from(value: &str) -> Self {
        DealerId::from_path(value)
    }
}

impl From<&DealerId> for Value {
    fn from(id: &DealerId) -> Self {
        match id {
            DealerId::Number(n) => Value::from(*n),
            DealerId::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// Model year of the reviewed car; older data stores it as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CarYear {
    Number(i64),
    Text(String),
}

/// A persisted customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub dealership: DealerId,
    pub review: String,
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub car_make: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub car_year: Option<CarYear>,
}

/// A review submitted by a client, before an id has been allocated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub name: String,
    pub dealership: DealerId,
    pub review: String,
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub car_make: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub car_year: Option<CarYear>,
}

impl NewReview {
    pub fn into_review(self, id: i64) -> Review {
        Review {
            id,
            name: self.name,
            dealership: self.dealership,
            review: self.review,
            purchase: self.purchase,
            purchase_date: self.purchase_date,
            car_make: self.car_make,
            car_model: self.car_model,
            car_year: self.car_year,
        }
    }
}

/// A dealership. Only `id` and `state` are interpreted; every other field
/// (name, address, coordinates, ...) is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dealership {
    pub id: DealerId,
    pub state: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

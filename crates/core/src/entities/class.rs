use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_string, deserialize_timestamp};
use crate::store::Record;

/// A scheduled fitness class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessClass {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub instructor_name: String,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub capacity: u32,
    pub spots_remaining: u32,
    /// Price as reported by the server, in minor currency units.
    pub price_cents: Option<u64>,
    pub average_rating: Option<f64>,
    pub review_count: u32,
    pub image_url: Option<String>,
}

impl FitnessClass {
    /// Returns true if no spots are left.
    pub fn is_full(&self) -> bool {
        self.spots_remaining == 0
    }
}

impl Record for FitnessClass {
    const KIND: &'static str = "fitness_class";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Wire representation of a fitness class.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessClassDto {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    pub category: String,
    pub instructor_name: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub capacity: u32,
    #[serde(default)]
    pub spots_remaining: Option<u32>,
    #[serde(default)]
    pub price_cents: Option<u64>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub image_url: Option<String>,
}

impl From<FitnessClassDto> for FitnessClass {
    fn from(dto: FitnessClassDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            category: dto.category,
            instructor_name: dto.instructor_name,
            location: dto.location,
            start_time: dto.start_time,
            duration_minutes: dto.duration_minutes,
            spots_remaining: dto.spots_remaining.unwrap_or(dto.capacity).min(dto.capacity),
            capacity: dto.capacity,
            price_cents: dto.price_cents,
            average_rating: dto.average_rating,
            review_count: dto.review_count,
            image_url: dto.image_url,
        }
    }
}

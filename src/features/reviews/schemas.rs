use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::reviews::models::Review;

// -- =====================
// -- IN
// -- =====================
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReviewIn {
    pub rating: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ReviewUpdateIn {
    pub rating: Option<i32>,
    pub title: Option<String>,
    pub body: Option<String>,
}

// -- =====================
// -- OUT
// -- =====================
#[derive(Serialize, Debug)]
pub struct ReviewOut {
    pub id: Uuid,
    pub author_id: Uuid,
    pub listing_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub body: String,
    pub user_name: String,
    pub date: DateTime<Utc>,
}

impl From<Review> for ReviewOut {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            author_id: review.author_id,
            listing_id: review.listing_id,
            rating: review.rating,
            title: review.title,
            body: review.body,
            user_name: review.user_name,
            date: review.date,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewOut>,
}

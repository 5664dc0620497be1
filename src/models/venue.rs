use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::not_blank;

pub const DEFAULT_COUNTRY: &str = "USA";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a venue embedded in event views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl From<&Venue> for VenueSummary {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub capacity: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVenueRequest {
    #[validate(
        custom(function = "not_blank", message = "name is required"),
        length(max = 200, message = "name cannot exceed 200 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "address is required"),
        length(max = 500, message = "address cannot exceed 500 characters")
    )]
    pub address: String,
    #[validate(
        custom(function = "not_blank", message = "city is required"),
        length(max = 100, message = "city cannot exceed 100 characters")
    )]
    pub city: String,
    #[validate(
        custom(function = "not_blank", message = "state is required"),
        length(max = 100, message = "state cannot exceed 100 characters")
    )]
    pub state: String,
    #[validate(
        custom(function = "not_blank", message = "zipCode is required"),
        length(max = 20, message = "zipCode cannot exceed 20 characters")
    )]
    pub zip_code: String,
    #[validate(length(max = 100, message = "country cannot exceed 100 characters"))]
    pub country: Option<String>,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: i32,
    #[validate(length(max = 2000, message = "description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 500, message = "imageUrl cannot exceed 500 characters"))]
    pub image_url: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "contactEmail cannot exceed 255 characters")
    )]
    pub contact_email: Option<String>,
    #[validate(length(max = 20, message = "contactPhone cannot exceed 20 characters"))]
    pub contact_phone: Option<String>,
}

impl CreateVenueRequest {

    pub fn into_new_venue(self) -> NewVenue {
        NewVenue {
            name: self.name,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self
                .country
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            capacity: self.capacity,
            description: self.description,
            image_url: self.image_url,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVenueRequest {
    #[validate(
        custom(function = "not_blank", message = "name cannot be blank"),
        length(max = 200, message = "name cannot exceed 200 characters")
    )]
    pub name: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "address cannot be blank"),
        length(max = 500, message = "address cannot exceed 500 characters")
    )]
    pub address: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "city cannot be blank"),
        length(max = 100, message = "city cannot exceed 100 characters")
    )]
    pub city: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "state cannot be blank"),
        length(max = 100, message = "state cannot exceed 100 characters")
    )]
    pub state: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "zipCode cannot be blank"),
        length(max = 20, message = "zipCode cannot exceed 20 characters")
    )]
    pub zip_code: Option<String>,
    #[validate(
        custom(function = "not_blank", message = "country cannot be blank"),
        length(max = 100, message = "country cannot exceed 100 characters")
    )]
    pub country: Option<String>,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(length(max = 2000, message = "description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 500, message = "imageUrl cannot exceed 500 characters"))]
    pub image_url: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "contactEmail cannot exceed 255 characters")
    )]
    pub contact_email: Option<String>,
    #[validate(length(max = 20, message = "contactPhone cannot exceed 20 characters"))]
    pub contact_phone: Option<String>,
}

impl UpdateVenueRequest {

    pub fn apply_to(self, venue: &mut Venue) {
        if let Some(name) = self.name {
            venue.name = name;
        }
        if let Some(address) = self.address {
            venue.address = address;
        }
        if let Some(city) = self.city {
            venue.city = city;
        }
        if let Some(state) = self.state {
            venue.state = state;
        }
        if let Some(zip_code) = self.zip_code {
            venue.zip_code = zip_code;
        }
        if let Some(country) = self.country {
            venue.country = country;
        }
        if let Some(capacity) = self.capacity {
            venue.capacity = capacity;
        }
        if self.description.is_some() {
            venue.description = self.description;
        }
        if self.image_url.is_some() {
            venue.image_url = self.image_url;
        }
        if self.contact_email.is_some() {
            venue.contact_email = self.contact_email;
        }
        if self.contact_phone.is_some() {
            venue.contact_phone = self.contact_phone;
        }
    }
}

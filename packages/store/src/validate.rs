//! Form validation shared by the dialogs (before submit) and the server (before
//! the backend call). Messages are user-facing and shown inline.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{LatLng, NewProperty, PropertyUpdate};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid email pattern")
});

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("valid url pattern"));

/// A single invalid field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All invalid fields of one submission, in form order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for one field, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        f.write_str(&messages.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required");
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err("Invalid email address");
    }
    Ok(())
}

/// Parse the raw price input of a number field.
pub fn parse_price(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Price is required");
    }
    let price: f64 = raw.parse().map_err(|_| "Price must be a number")?;
    validate_price(price)?;
    Ok(price)
}

pub fn validate_price(price: f64) -> Result<(), &'static str> {
    if !price.is_finite() {
        return Err("Price must be a number");
    }
    if price < 0.0 {
        return Err("Price must be positive");
    }
    Ok(())
}

pub fn validate_image_url(url: &str) -> Result<(), &'static str> {
    if url.trim().is_empty() {
        return Err("Image URL is required");
    }
    if !URL_PATTERN.is_match(url.trim()) {
        return Err("Must be a valid URL");
    }
    Ok(())
}

fn validate_coordinates(position: LatLng, errors: &mut ValidationErrors) {
    if !position.lat.is_finite() || !(-90.0..=90.0).contains(&position.lat) {
        errors.push("latitude", "Latitude must be between -90 and 90");
    }
    if !position.lng.is_finite() || !(-180.0..=180.0).contains(&position.lng) {
        errors.push("longitude", "Longitude must be between -180 and 180");
    }
}

/// Build a [`NewProperty`] from the create dialog's raw inputs.
pub fn new_property_from_form(
    position: LatLng,
    price: &str,
    image_url: &str,
) -> Result<NewProperty, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    validate_coordinates(position, &mut errors);
    let price = parse_price(price).unwrap_or_else(|message| {
        errors.push("price", message);
        0.0
    });
    if let Err(message) = validate_image_url(image_url) {
        errors.push("image_url", message);
    }
    errors.into_result(|| NewProperty {
        latitude: position.lat,
        longitude: position.lng,
        price,
        image_url: image_url.trim().to_string(),
    })
}

/// Build a [`PropertyUpdate`] from the edit dialog's raw inputs.
pub fn update_from_form(price: &str, image_url: &str) -> Result<PropertyUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let price = parse_price(price).unwrap_or_else(|message| {
        errors.push("price", message);
        0.0
    });
    if let Err(message) = validate_image_url(image_url) {
        errors.push("image_url", message);
    }
    errors.into_result(|| PropertyUpdate {
        price,
        image_url: image_url.trim().to_string(),
    })
}

impl NewProperty {
    /// Re-check an already typed payload (server side).
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        validate_coordinates(LatLng::new(self.latitude, self.longitude), &mut errors);
        if let Err(message) = validate_price(self.price) {
            errors.push("price", message);
        }
        if let Err(message) = validate_image_url(&self.image_url) {
            errors.push("image_url", message);
        }
        errors.into_result(|| ())
    }
}

impl PropertyUpdate {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Err(message) = validate_price(self.price) {
            errors.push("price", message);
        }
        if let Err(message) = validate_image_url(&self.image_url) {
            errors.push("image_url", message);
        }
        errors.into_result(|| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email(""), Err("Email is required"));
        assert_eq!(validate_email("   "), Err("Email is required"));
        assert_eq!(validate_email("not-an-email"), Err("Invalid email address"));
        assert_eq!(validate_email("a@b"), Err("Invalid email address"));
        assert!(validate_email("M@Example.com").is_ok());
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(parse_price(""), Err("Price is required"));
        assert_eq!(parse_price("abc"), Err("Price must be a number"));
        assert_eq!(parse_price("-1"), Err("Price must be positive"));
        assert_eq!(parse_price(" 500000 "), Ok(500000.0));
        assert_eq!(parse_price("0"), Ok(0.0));
    }

    #[test]
    fn test_image_url_validation() {
        assert_eq!(validate_image_url(""), Err("Image URL is required"));
        assert_eq!(validate_image_url("ftp://x"), Err("Must be a valid URL"));
        assert_eq!(validate_image_url("https://"), Err("Must be a valid URL"));
        assert!(validate_image_url("http://example.com/a.jpg").is_ok());
    }

    #[test]
    fn test_new_property_from_form_collects_all_errors() {
        let errors = new_property_from_form(LatLng::new(-6.2, 106.8), "", "nope").unwrap_err();
        assert_eq!(errors.message_for("price"), Some("Price is required"));
        assert_eq!(errors.message_for("image_url"), Some("Must be a valid URL"));
        assert_eq!(errors.to_string(), "Price is required, Must be a valid URL");
    }

    #[test]
    fn test_new_property_from_form_keeps_position() {
        let input = new_property_from_form(
            LatLng::new(-6.2088, 106.8456),
            "500000",
            " https://example.com/house.jpg ",
        )
        .unwrap();
        assert_eq!(input.latitude, -6.2088);
        assert_eq!(input.longitude, 106.8456);
        assert_eq!(input.price, 500000.0);
        assert_eq!(input.image_url, "https://example.com/house.jpg");
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let input = NewProperty {
            latitude: 95.0,
            longitude: 10.0,
            price: 1.0,
            image_url: "https://example.com/a.jpg".into(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.message_for("latitude").is_some());
        assert!(errors.message_for("longitude").is_none());
    }

    #[test]
    fn test_update_validation() {
        assert!(update_from_form("10", "https://example.com/a.jpg").is_ok());
        let errors = PropertyUpdate {
            price: -5.0,
            image_url: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.0.len(), 2);
    }
}

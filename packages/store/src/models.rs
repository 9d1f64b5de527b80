//! # Domain models for property listings
//!
//! These types cross the server/client boundary via Dioxus server functions, so
//! they are `Serialize + Deserialize` and keep ids as plain strings (the backend's
//! key type never leaks into WASM builds).
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Property`] | A persisted row of the `properties` relation, owned by `user_id`. |
//! | [`NewProperty`] | Input for an insert. The owner is attached by the service, never by the form. |
//! | [`PropertyUpdate`] | Input for an edit. Carries only price and image, so coordinates cannot change after creation. |
//! | [`LatLng`] | A WGS84 coordinate pair. |
//! | [`Caller`] | The authenticated identity a data-access call is issued for. |
//!
//! [`format_price`] and [`format_coordinate`] produce the strings shown on markers
//! and in the create dialog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A property record as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Marker label, e.g. `Rp. 500,000`.
    pub fn price_label(&self) -> String {
        format!("Rp. {}", format_price(self.price))
    }
}

/// Fields collected by the create dialog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub image_url: String,
}

/// Fields collected by the edit dialog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyUpdate {
    pub price: f64,
    pub image_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Identity of the user on whose behalf a table operation runs.
///
/// `access_token` is forwarded to the backend so its row-level policy sees the
/// same user the client filters on.
#[derive(Clone, Debug, PartialEq)]
pub struct Caller {
    pub user_id: String,
    pub access_token: String,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }
}

/// Format a price with `,` thousands separators and at most three fraction digits.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let rounded = (price.abs() * 1000.0).round() / 1000.0;
    let whole = rounded.trunc();
    let fraction = ((rounded - whole) * 1000.0).round() as u64;

    let digits = format!("{whole:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if price < 0.0 && rounded > 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if fraction > 0 {
        let fraction = format!("{fraction:03}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// Six decimal places, as shown in the create dialog's location line.
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(500000.0), "500,000");
        assert_eq!(format_price(1234567.0), "1,234,567");
        assert_eq!(format_price(999.0), "999");
        assert_eq!(format_price(0.0), "0");
    }

    #[test]
    fn test_format_price_fraction_digits() {
        assert_eq!(format_price(1500.5), "1,500.5");
        assert_eq!(format_price(12.3456), "12.346");
        assert_eq!(format_price(7.0001), "7");
    }

    #[test]
    fn test_price_label() {
        let property = Property {
            id: "1".into(),
            user_id: "u".into(),
            latitude: -6.2088,
            longitude: 106.8456,
            price: 500000.0,
            image_url: "https://example.com/a.jpg".into(),
            created_at: Utc::now(),
        };
        assert_eq!(property.price_label(), "Rp. 500,000");
        assert_eq!(property.position(), LatLng::new(-6.2088, 106.8456));
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(-6.2088), "-6.208800");
        assert_eq!(format_coordinate(106.8456123456), "106.845612");
    }
}

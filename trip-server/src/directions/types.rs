//! Google Maps web service response DTOs.
//!
//! These map directly to the Geocoding and Directions JSON responses. Only
//! the fields we use are declared; everything else is ignored.

use serde::Deserialize;

/// Response from `/geocode/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    /// "OK", "ZERO_RESULTS", "REQUEST_DENIED", ...
    pub status: String,

    #[serde(default)]
    pub results: Vec<GeocodeResult>,

    pub error_message: Option<String>,
}

/// One candidate place.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: GeocodeGeometry,
    pub place_id: Option<String>,
    #[serde(default)]
    pub partial_match: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeGeometry {
    pub location: LatLngLiteral,
    /// "ROOFTOP", "APPROXIMATE", ...
    pub location_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLngLiteral {
    pub lat: f64,
    pub lng: f64,
}

/// Response from `/directions/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,

    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub summary: Option<String>,
    pub bounds: RouteBounds,
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

/// Viewport that contains the whole route.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RouteBounds {
    pub northeast: LatLngLiteral,
    pub southwest: LatLngLiteral,
}

/// Points in the encoded polyline format.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
}

/// A quantity with its display text, e.g. `{"text": "4.1 km", "value": 4100}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

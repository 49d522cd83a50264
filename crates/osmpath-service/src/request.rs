//! Request types and validation for the HTTP endpoints.

use serde::{Deserialize, Serialize};

use osmpath_lib::{BoundingBox, Coordinate, RouteQuery, SearchAlgorithm};

use crate::problem::ProblemDetails;

/// Validation trait for request types.
pub trait Validate {
    /// Validate the request, returning a `ProblemDetails` for invalid input.
    ///
    /// The `request_id` populates the `instance` field of any returned
    /// problem. Boxed to avoid a large `Result::Err` variant.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// A geographic point as sent by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointParam {
    pub lat: f64,
    pub lng: f64,
}

impl From<PointParam> for Coordinate {
    fn from(value: PointParam) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

/// Bounding box degree bounds as sent by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BBoxParam {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl From<BBoxParam> for BoundingBox {
    fn from(value: BBoxParam) -> Self {
        BoundingBox {
            north: value.north,
            south: value.south,
            east: value.east,
            west: value.west,
        }
    }
}

/// Request body shared by the path and comparison endpoints.
///
/// The comparison endpoint ignores `algorithm` since it always runs all four.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRequest {
    pub start: PointParam,
    pub end: PointParam,
    pub bbox: BBoxParam,

    /// Algorithm selector; unrecognized values fall back to Dijkstra.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "dijkstra".to_string()
}

impl PathRequest {
    /// Convert into the library request.
    pub fn to_query(&self) -> RouteQuery {
        RouteQuery {
            start: self.start.into(),
            end: self.end.into(),
            bbox: self.bbox.into(),
            algorithm: SearchAlgorithm::from_name(&self.algorithm),
        }
    }
}

impl Validate for PathRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        for (name, point) in [("start", self.start), ("end", self.end)] {
            if !point.lat.is_finite() || !point.lng.is_finite() {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{name}' coordinate must be finite"),
                    request_id,
                )));
            }
            if !(-90.0..=90.0).contains(&point.lat) {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{name}' latitude must be between -90 and 90"),
                    request_id,
                )));
            }
            if !(-180.0..=180.0).contains(&point.lng) {
                return Err(Box::new(ProblemDetails::bad_request(
                    format!("The '{name}' longitude must be between -180 and 180"),
                    request_id,
                )));
            }
        }

        let bbox = &self.bbox;
        let bounds = [bbox.north, bbox.south, bbox.east, bbox.west];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Box::new(ProblemDetails::bad_request(
                "All bounding box bounds must be finite",
                request_id,
            )));
        }
        if bbox.north <= bbox.south {
            return Err(Box::new(ProblemDetails::bad_request(
                "The bounding box 'north' bound must be greater than 'south'",
                request_id,
            )));
        }
        if bbox.east <= bbox.west {
            return Err(Box::new(ProblemDetails::bad_request(
                "The bounding box 'east' bound must be greater than 'west'",
                request_id,
            )));
        }

        Ok(())
    }
}

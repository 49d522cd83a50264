//! Overpass API client for fetching raw OpenStreetMap road data.
//!
//! The client issues a single synchronous query for all `highway`-tagged ways
//! intersecting a bounding box, plus the nodes those ways reference. There is
//! no retry policy here; upstream failures surface as [`Error`] variants and
//! retrying, if desired, belongs to the caller.

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const OVERPASS_URL_ENV: &str = "OSMPATH_OVERPASS_URL";

/// Server-side Overpass query budget in seconds.
const QUERY_TIMEOUT_SECS: u32 = 25;
/// Client-side budget for the whole HTTP exchange.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rectangular geographic region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// A single element of an Overpass response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OsmElement {
    /// A waypoint with a fixed coordinate.
    Node { id: i64, lat: f64, lon: f64 },
    /// An ordered polyline of node identifiers describing a piece of road.
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
    },
    /// Any element type the graph builder does not consume.
    #[serde(other)]
    Unsupported,
}

/// Raw record set returned by Overpass for a bounding box.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsmData {
    pub elements: Vec<OsmElement>,
}

/// HTTP client for the Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    /// Create a client against the default endpoint.
    ///
    /// Tests and self-hosted deployments may override the endpoint via the
    /// `OSMPATH_OVERPASS_URL` environment variable.
    pub fn new() -> Result<Self> {
        let endpoint =
            env::var(OVERPASS_URL_ENV).unwrap_or_else(|_| DEFAULT_OVERPASS_URL.to_string());
        Self::with_endpoint(endpoint)
    }

    /// Create a client against a specific interpreter endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("osmpath/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch all road-tagged ways intersecting `bbox`, plus their nodes.
    pub fn fetch(&self, bbox: &BoundingBox) -> Result<OsmData> {
        let query = road_query(bbox);
        debug!(endpoint = %self.endpoint, "querying overpass");

        let response = self.client.post(&self.endpoint).body(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let data: OsmData = serde_json::from_str(&body)?;
        info!(elements = data.elements.len(), "overpass response received");
        Ok(data)
    }
}

/// Render the Overpass QL query for all highways within `bbox`.
fn road_query(bbox: &BoundingBox) -> String {
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n\
         \x20 way[\"highway\"]({south},{west},{north},{east});\n\
         \x20 node(w);\n\
         );\n\
         out body;\n",
        timeout = QUERY_TIMEOUT_SECS,
        south = bbox.south,
        west = bbox.west,
        north = bbox.north,
        east = bbox.east,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_renders_bounds_in_overpass_order() {
        let bbox = BoundingBox {
            north: 21.05,
            south: 21.0,
            east: 105.9,
            west: 105.8,
        };
        let query = road_query(&bbox);
        assert!(query.contains("[out:json][timeout:25];"));
        assert!(query.contains("way[\"highway\"](21,105.8,21.05,105.9);"));
        assert!(query.contains("node(w);"));
        assert!(query.contains("out body;"));
    }

    #[test]
    fn response_deserializes_nodes_and_ways() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 21.0, "lon": 105.8},
                {"type": "node", "id": 2, "lat": 21.001, "lon": 105.8},
                {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "residential"}},
                {"type": "relation", "id": 99, "members": []}
            ]
        }"#;
        let data: OsmData = serde_json::from_str(body).expect("response parses");
        assert_eq!(data.elements.len(), 4);
        assert!(matches!(data.elements[0], OsmElement::Node { id: 1, .. }));
        assert!(matches!(
            &data.elements[2],
            OsmElement::Way { id: 10, nodes } if nodes == &vec![1, 2]
        ));
        assert!(matches!(data.elements[3], OsmElement::Unsupported));
    }

    #[test]
    fn way_without_nodes_defaults_to_empty() {
        let body = r#"{"elements": [{"type": "way", "id": 7}]}"#;
        let data: OsmData = serde_json::from_str(body).expect("response parses");
        assert!(matches!(
            &data.elements[0],
            OsmElement::Way { id: 7, nodes } if nodes.is_empty()
        ));
    }
}

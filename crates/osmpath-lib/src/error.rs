use thiserror::Error;

/// Convenient result alias for the osmpath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the Overpass endpoint answers with a non-success status.
    #[error("overpass endpoint returned status {status}")]
    UpstreamStatus { status: u16 },

    /// Raised when the bounding box contains no road data at all.
    #[error("no road data found in the requested bounding box")]
    EmptyRegion,

    /// Raised when a query coordinate cannot be snapped to any graph node.
    #[error("could not resolve the {which} coordinate to a graph node")]
    UnresolvableEndpoint { which: &'static str },

    /// Raised when no path exists between the resolved endpoint nodes.
    #[error("no route found between the resolved start and end nodes")]
    RouteNotFound,

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

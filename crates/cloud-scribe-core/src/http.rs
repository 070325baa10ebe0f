//! URL building and response helpers shared by the REST clients.

use crate::{CloudError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;
use reqwest::{Response, Url};

/// Parse a service endpoint into a base URL.
#[track_caller]
pub(crate) fn parse_endpoint(endpoint: &str) -> CoreResult<Url> {
    let url = Url::parse(endpoint).map_err(|e| CloudError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if url.cannot_be_a_base() {
        return Err(CloudError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "not a base URL".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(url)
}

/// Append percent-encoded path segments to `base`.
///
/// Each segment is encoded on its own, so a `/` inside an object key
/// becomes `%2F` rather than a path separator.
#[track_caller]
pub(crate) fn with_segments(base: &Url, segments: &[&str]) -> CoreResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| CloudError::InvalidEndpoint {
            endpoint: base.to_string(),
            reason: "not a base URL".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Append a resource path such as `projects/p/locations/l` to `base`.
///
/// Resource names never contain reserved characters other than `/`, so the
/// path is split and appended segment by segment.
#[track_caller]
pub(crate) fn with_resource_path(base: &Url, prefix: &str, resource: &str) -> CoreResult<Url> {
    let segments: Vec<&str> = std::iter::once(prefix)
        .chain(resource.split('/').filter(|s| !s.is_empty()))
        .collect();

    with_segments(base, &segments)
}

/// Drain a non-success response into `(status, body)` for error reporting.
pub(crate) async fn failure_details(response: Response) -> (u16, String) {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

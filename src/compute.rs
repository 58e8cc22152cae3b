mod int64;
mod network_endpoint;
mod operation;
mod url_map;

pub use network_endpoint::{NetworkEndpoint, NetworkEndpointsRequest};
pub use operation::{Operation, OperationError, OperationErrorItem, OperationStatus};
pub use url_map::{
    Duration, FaultAbort, FaultDelay, FaultInjectionPolicy, HostRule, MatchRule, PathMatch,
    PathMatcher, PathMatcherRules, PathRule, RegexMatch, RouteAction, RouteRule, UrlMap,
};

/// Fields of a Compute resource that this crate does not interpret.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Key-ordered plain representation of a resource.
pub fn to_value<T: serde::Serialize>(resource: &T) -> crate::error::Result<serde_json::Value> {
    serde_json::to_value(resource).map_err(Into::into)
}

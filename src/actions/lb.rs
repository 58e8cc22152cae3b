//! Fault injection on the url map of a global or regional application load balancer.
//!
//! The load balancer may take a couple of minutes to propagate the change after
//! the operation completes. Classic load balancers do not support fault injection.

use serde_json::Value;

use crate::{
    client::{OperationWaiter, ResourceGateway, Scope},
    compute::to_value,
    context::GcpContext,
    error::Result,
    logger,
    traffic::{AbortFault, DelayFault, Mutation},
};

pub const DEFAULT_TARGET_PATH: &str = "/*";

/// Path of a url map targeted by an action. `target_name` is the name of a
/// path matcher and `target_path` the path as written in one of its rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficTarget {
    pub url_map: String,
    pub target_name: String,
    pub target_path: String,
    pub regional: bool,
}

impl TrafficTarget {
    pub fn new(url_map: impl Into<String>, target_name: impl Into<String>) -> Self {
        Self {
            url_map: url_map.into(),
            target_name: target_name.into(),
            target_path: DEFAULT_TARGET_PATH.to_string(),
            regional: false,
        }
    }

    pub fn target_path(mut self, target_path: impl Into<String>) -> Self {
        self.target_path = target_path.into();
        self
    }

    pub fn regional(mut self, regional: bool) -> Self {
        self.regional = regional;
        self
    }
}

/// Delays a percentage of the requests going through the targeted path.
pub async fn inject_traffic_delay<C>(
    client: &C,
    context: &GcpContext,
    target: &TrafficTarget,
    delay: DelayFault,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    update_traffic_policy(client, context, target, Mutation::Delay(delay)).await
}

/// Answers a percentage of the requests going through the targeted path with
/// the given HTTP status.
pub async fn inject_traffic_faults<C>(
    client: &C,
    context: &GcpContext,
    target: &TrafficTarget,
    abort: AbortFault,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    update_traffic_policy(client, context, target, Mutation::Abort(abort)).await
}

/// Removes any fault injection policy from the targeted path.
pub async fn remove_fault_injection_traffic_policy<C>(
    client: &C,
    context: &GcpContext,
    target: &TrafficTarget,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    update_traffic_policy(client, context, target, Mutation::Remove).await
}

async fn update_traffic_policy<C>(
    client: &C,
    context: &GcpContext,
    target: &TrafficTarget,
    mutation: Mutation,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    let scope = Scope::resolve(target.regional, context)?;

    let mut url_map = client.get_url_map(&scope, &target.url_map).await?;

    mutation.apply(&mut url_map, &target.target_name, &target.target_path)?;

    let operation = client
        .update_url_map(&scope, &target.url_map, &url_map)
        .await?;

    logger!(info, "url map {} update submitted as {}", target.url_map, operation.name);

    client.wait(operation).await?;

    to_value(&url_map)
}

use serde_json::Value;

use crate::{
    client::{OperationWaiter, ResourceGateway, ZonalScope},
    compute::{to_value, NetworkEndpoint, NetworkEndpointsRequest},
    context::GcpContext,
    error::Result,
    logger,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    Attach,
    Detach,
}

/// Attaches the endpoints to the zonal network endpoint group in one batch.
pub async fn attach_network_endpoint_group<C>(
    client: &C,
    context: &GcpContext,
    network_endpoint_group: &str,
    zone: &str,
    endpoints: Option<Vec<NetworkEndpoint>>,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    change_membership(
        client,
        context,
        network_endpoint_group,
        zone,
        endpoints,
        Membership::Attach,
    )
    .await
}

/// Detaches the endpoints from the zonal network endpoint group in one batch.
pub async fn detach_network_endpoint_group<C>(
    client: &C,
    context: &GcpContext,
    network_endpoint_group: &str,
    zone: &str,
    endpoints: Option<Vec<NetworkEndpoint>>,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    change_membership(
        client,
        context,
        network_endpoint_group,
        zone,
        endpoints,
        Membership::Detach,
    )
    .await
}

async fn change_membership<C>(
    client: &C,
    context: &GcpContext,
    network_endpoint_group: &str,
    zone: &str,
    endpoints: Option<Vec<NetworkEndpoint>>,
    membership: Membership,
) -> Result<Value>
where
    C: ResourceGateway + OperationWaiter,
{
    let scope = ZonalScope::new(context, zone);

    let request = NetworkEndpointsRequest::from(endpoints.unwrap_or_default());

    if request.network_endpoints.is_empty() {
        logger!(warn, "no network endpoints given for {}", network_endpoint_group);
    }

    let operation = match membership {
        Membership::Attach => {
            client
                .attach_network_endpoints(&scope, network_endpoint_group, &request)
                .await?
        }
        Membership::Detach => {
            client
                .detach_network_endpoints(&scope, network_endpoint_group, &request)
                .await?
        }
    };

    logger!(
        info,
        "{:?} of {} endpoints on {} submitted as {}",
        membership,
        request.network_endpoints.len(),
        network_endpoint_group,
        operation.name
    );

    let operation = client.wait(operation).await?;

    to_value(&operation)
}

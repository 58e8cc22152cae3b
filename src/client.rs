mod compute_client;
mod scope;

pub use compute_client::ComputeClient;
pub use scope::{Scope, ZonalScope};

use async_trait::async_trait;

use crate::{
    compute::{NetworkEndpointsRequest, Operation, UrlMap},
    error::Result,
};

#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn get_url_map(&self, scope: &Scope, url_map: &str) -> Result<UrlMap>;

    async fn update_url_map(
        &self,
        scope: &Scope,
        url_map: &str,
        resource: &UrlMap,
    ) -> Result<Operation>;

    async fn attach_network_endpoints(
        &self,
        scope: &ZonalScope,
        network_endpoint_group: &str,
        request: &NetworkEndpointsRequest,
    ) -> Result<Operation>;

    async fn detach_network_endpoints(
        &self,
        scope: &ZonalScope,
        network_endpoint_group: &str,
        request: &NetworkEndpointsRequest,
    ) -> Result<Operation>;
}

#[async_trait]
pub trait OperationWaiter: Send + Sync {
    /// Blocks until the operation is done. A failed operation is an error.
    async fn wait(&self, operation: Operation) -> Result<Operation>;
}

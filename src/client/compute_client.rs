use async_trait::async_trait;
use http::{
    header::{ACCEPT, AUTHORIZATION},
    StatusCode,
};
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::time::{self, Instant};

use crate::{
    compute::{NetworkEndpointsRequest, Operation, UrlMap},
    config::OperationConfig,
    context::Credentials,
    error::{Error, Result},
    logger,
};

use super::{OperationWaiter, ResourceGateway, Scope, ZonalScope};

/// Compute Engine REST client.
#[derive(Clone)]
pub struct ComputeClient {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    operation: OperationConfig,
}

impl ComputeClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: Credentials,
        operation: OperationConfig,
    ) -> Self {
        let endpoint: String = endpoint.into();
        let endpoint = if let Some(endpoint) = endpoint.strip_suffix('/') {
            endpoint.to_string()
        } else {
            endpoint
        };

        Self {
            client,
            endpoint,
            credentials,
            operation,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = request
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.credentials.authorization()?)
            .build()?;

        logger!(debug, "HTTP request {} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;

        into_result(response).await
    }

    async fn wait_once(&self, operation: &Operation) -> Result<Operation> {
        let self_link = operation.self_link.as_deref().ok_or_else(|| {
            Error::RemoteOperation(format!("operation {} has no selfLink", operation.name))
        })?;

        self.send(self.client.post(format!("{}/wait", self_link)))
            .await
    }
}

#[async_trait]
impl ResourceGateway for ComputeClient {
    async fn get_url_map(&self, scope: &Scope, url_map: &str) -> Result<UrlMap> {
        let url = self.url(&scope.url_map_path(url_map));

        self.send(self.client.get(url)).await
    }

    async fn update_url_map(
        &self,
        scope: &Scope,
        url_map: &str,
        resource: &UrlMap,
    ) -> Result<Operation> {
        let url = self.url(&scope.url_map_path(url_map));

        self.send(self.client.put(url).json(resource)).await
    }

    async fn attach_network_endpoints(
        &self,
        scope: &ZonalScope,
        network_endpoint_group: &str,
        request: &NetworkEndpointsRequest,
    ) -> Result<Operation> {
        let url = self.url(&format!(
            "{}/attachNetworkEndpoints",
            scope.network_endpoint_group_path(network_endpoint_group)
        ));

        self.send(self.client.post(url).json(request)).await
    }

    async fn detach_network_endpoints(
        &self,
        scope: &ZonalScope,
        network_endpoint_group: &str,
        request: &NetworkEndpointsRequest,
    ) -> Result<Operation> {
        let url = self.url(&format!(
            "{}/detachNetworkEndpoints",
            scope.network_endpoint_group_path(network_endpoint_group)
        ));

        self.send(self.client.post(url).json(request)).await
    }
}

#[async_trait]
impl OperationWaiter for ComputeClient {
    async fn wait(&self, operation: Operation) -> Result<Operation> {
        let timeout = self.operation.timeout();
        let deadline = Instant::now() + timeout;

        let mut operation = operation;

        loop {
            if operation.is_done() {
                return match operation.failure() {
                    Some(failure) => Err(Error::RemoteOperation(failure)),
                    None => Ok(operation),
                };
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(Error::RemoteOperation(format!(
                    "timed out after {}s waiting for operation {} (last status {})",
                    timeout.as_secs(),
                    operation.name,
                    operation.status
                )));
            }

            logger!(debug, "waiting for operation {} ({})", operation.name, operation.status);

            let polled = time::timeout(deadline - now, self.wait_once(&operation)).await;

            operation = match polled {
                Ok(polled) => polled?,
                Err(_) => continue,
            };

            if !operation.is_done() {
                time::sleep(self.operation.poll_interval()).await;
            }
        }
    }
}

#[derive(Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
}

async fn into_result<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        return Err(error_from_status(status, &body));
    }

    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| Error::InvalidResource(e.to_string()))
}

fn error_from_status(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<GoogleErrorResponse>(body)
        .map(|res| res.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::PRECONDITION_FAILED {
        return Error::Conflict(format!(
            "the resource was modified concurrently, its fingerprint is stale: {}",
            message
        ));
    }

    Error::RemoteOperation(format!("HTTP {}: {}", status, message))
}

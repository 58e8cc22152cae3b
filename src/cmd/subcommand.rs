use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::Value;

use crate::{
    actions::{self, lb::DEFAULT_TARGET_PATH, TrafficTarget},
    client::{OperationWaiter, ResourceGateway, Scope},
    compute::NetworkEndpoint,
    context::GcpContext,
    traffic::{AbortFault, DelayFault},
};

use super::args::parse_network_endpoint;

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TargetArgs {
    /// Name of the url map
    #[arg(long)]
    pub url_map: String,

    /// Name of the path matcher in the url map
    #[arg(long)]
    pub target_name: String,

    /// Path within the path matcher, exactly as written in its rules
    #[arg(long, default_value = DEFAULT_TARGET_PATH)]
    pub target_path: String,

    /// Target a regional load balancer
    #[arg(long)]
    pub regional: bool,
}

impl From<TargetArgs> for TrafficTarget {
    fn from(args: TargetArgs) -> Self {
        TrafficTarget::new(args.url_map, args.target_name)
            .target_path(args.target_path)
            .regional(args.regional)
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct NetworkEndpointGroupArgs {
    /// Name of the zonal network endpoint group
    #[arg(long)]
    pub network_endpoint_group: String,

    /// Zone of the network endpoint group
    #[arg(long)]
    pub zone: String,

    /// Network endpoint (e.g. --endpoint instance=vm-1,ip_address=10.0.0.2,port=80). Repeatable.
    #[arg(long = "endpoint", value_parser = parse_network_endpoint)]
    pub endpoints: Vec<NetworkEndpoint>,
}

impl NetworkEndpointGroupArgs {
    fn endpoints(&self) -> Option<Vec<NetworkEndpoint>> {
        if self.endpoints.is_empty() {
            None
        } else {
            Some(self.endpoints.clone())
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SubCommand {
    /// Delay a percentage of the requests going through a url map path
    InjectTrafficDelay {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, default_value_t = 50.0)]
        impacted_percentage: f64,

        #[arg(long, default_value_t = 1)]
        delay_in_seconds: i64,

        #[arg(long, default_value_t = 0)]
        delay_in_nanos: i32,
    },

    /// Answer a percentage of the requests going through a url map path with an HTTP status
    InjectTrafficFaults {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, default_value_t = 50.0)]
        impacted_percentage: f64,

        #[arg(long, default_value_t = 400)]
        http_status: i64,
    },

    /// Remove any fault injection policy from a url map path
    RemoveFaultInjectionTrafficPolicy {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Attach network endpoints to a network endpoint group
    AttachNetworkEndpointGroup(NetworkEndpointGroupArgs),

    /// Detach network endpoints from a network endpoint group
    DetachNetworkEndpointGroup(NetworkEndpointGroupArgs),
}

impl SubCommand {
    /// Checks what can be checked before talking to the API.
    pub fn validate(&self, context: &GcpContext) -> Result<()> {
        match self {
            SubCommand::InjectTrafficDelay { target, .. }
            | SubCommand::InjectTrafficFaults { target, .. }
            | SubCommand::RemoveFaultInjectionTrafficPolicy { target } => {
                Scope::resolve(target.regional, context)?;
            }
            SubCommand::AttachNetworkEndpointGroup(_) | SubCommand::DetachNetworkEndpointGroup(_) => {}
        }

        Ok(())
    }

    pub async fn run<C>(self, client: &C, context: &GcpContext) -> Result<Value>
    where
        C: ResourceGateway + OperationWaiter,
    {
        let value = match self {
            SubCommand::InjectTrafficDelay {
                target,
                impacted_percentage,
                delay_in_seconds,
                delay_in_nanos,
            } => {
                let delay = DelayFault {
                    percentage: impacted_percentage,
                    seconds: delay_in_seconds,
                    nanos: delay_in_nanos,
                };

                actions::inject_traffic_delay(client, context, &target.into(), delay).await?
            }
            SubCommand::InjectTrafficFaults {
                target,
                impacted_percentage,
                http_status,
            } => {
                let abort = AbortFault {
                    percentage: impacted_percentage,
                    http_status,
                };

                actions::inject_traffic_faults(client, context, &target.into(), abort).await?
            }
            SubCommand::RemoveFaultInjectionTrafficPolicy { target } => {
                actions::remove_fault_injection_traffic_policy(client, context, &target.into())
                    .await?
            }
            SubCommand::AttachNetworkEndpointGroup(args) => {
                actions::attach_network_endpoint_group(
                    client,
                    context,
                    &args.network_endpoint_group,
                    &args.zone,
                    args.endpoints(),
                )
                .await?
            }
            SubCommand::DetachNetworkEndpointGroup(args) => {
                actions::detach_network_endpoint_group(
                    client,
                    context,
                    &args.network_endpoint_group,
                    &args.zone,
                    args.endpoints(),
                )
                .await?
            }
        };

        Ok(value)
    }
}

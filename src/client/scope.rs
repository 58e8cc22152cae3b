use crate::{
    context::GcpContext,
    error::{Error, Result},
};

/// Addressing of a url map: global load balancers and regional ones live
/// under different collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global { project: String },
    Regional { project: String, region: String },
}

impl Scope {
    pub fn resolve(regional: bool, context: &GcpContext) -> Result<Self> {
        let project = context.project_id.clone();

        if !regional {
            return Ok(Self::Global { project });
        }

        match &context.region {
            Some(region) => Ok(Self::Regional {
                project,
                region: region.clone(),
            }),
            None => Err(Error::Configuration(
                "when `regional` is set, a region must be given or the `gcp.region` configuration key must be set"
                    .to_string(),
            )),
        }
    }

    pub fn url_map_path(&self, url_map: &str) -> String {
        match self {
            Self::Global { project } => format!("projects/{}/global/urlMaps/{}", project, url_map),
            Self::Regional { project, region } => format!(
                "projects/{}/regions/{}/urlMaps/{}",
                project, region, url_map
            ),
        }
    }
}

/// Addressing of zonal resources such as network endpoint groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonalScope {
    pub project: String,
    pub zone: String,
}

impl ZonalScope {
    pub fn new(context: &GcpContext, zone: impl Into<String>) -> Self {
        Self {
            project: context.project_id.clone(),
            zone: zone.into(),
        }
    }

    pub fn network_endpoint_group_path(&self, network_endpoint_group: &str) -> String {
        format!(
            "projects/{}/zones/{}/networkEndpointGroups/{}",
            self.project, self.zone, network_endpoint_group
        )
    }
}

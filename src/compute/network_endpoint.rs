use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// NetworkEndpoint. Keys are accepted in either the wire (camelCase) or the
/// client library (snake_case) spelling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetworkEndpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "ip_address"
    )]
    pub ip_address: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "ipv6_address"
    )]
    pub ipv6_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "client_destination_port"
    )]
    pub client_destination_port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Body shared by `attachNetworkEndpoints` and `detachNetworkEndpoints`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEndpointsRequest {
    #[serde(default)]
    pub network_endpoints: Vec<NetworkEndpoint>,
}

impl From<Vec<NetworkEndpoint>> for NetworkEndpointsRequest {
    fn from(network_endpoints: Vec<NetworkEndpoint>) -> Self {
        Self { network_endpoints }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn snake_caseのキーも受け付ける() {
        let actual: NetworkEndpoint = serde_json::from_value(json!({
            "instance": "vm-1",
            "ip_address": "10.0.0.2",
            "port": 8080
        }))
        .unwrap();

        assert_eq!(
            actual,
            NetworkEndpoint {
                instance: Some("vm-1".into()),
                ip_address: Some("10.0.0.2".into()),
                port: Some(8080),
                ..Default::default()
            }
        );
    }

    #[test]
    fn camel_caseで書き出す() {
        let request = NetworkEndpointsRequest::from(vec![NetworkEndpoint {
            ip_address: Some("10.0.0.2".into()),
            port: Some(80),
            ..Default::default()
        }]);

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"networkEndpoints": [{"ipAddress": "10.0.0.2", "port": 80}]})
        );
    }

    #[test]
    fn 未知のキーはエラーになる() {
        let actual = serde_json::from_value::<NetworkEndpoint>(json!({"address": "10.0.0.2"}));

        assert!(actual.is_err());
    }
}

use anyhow::{Context as _, Result};
use serde_json::{Map, Value};

use crate::compute::NetworkEndpoint;

const INTEGER_KEYS: [&str; 3] = ["port", "client_destination_port", "clientDestinationPort"];

/// Parses `key=value,key=value` (e.g. `instance=vm-1,ip_address=10.0.0.2,port=80`)
/// or an inline JSON object into a network endpoint.
pub fn parse_network_endpoint(input: &str) -> Result<NetworkEndpoint> {
    let input = input.trim();

    if input.starts_with('{') {
        return serde_json::from_str(input)
            .with_context(|| format!("Invalid network endpoint JSON: {}", input));
    }

    let mut fields = Map::new();

    for entry in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = entry
            .split_once('=')
            .with_context(|| format!("Expected key=value but got '{}'", entry))?;

        let key = key.trim();

        let value = match value.parse::<i64>() {
            Ok(number) if INTEGER_KEYS.contains(&key) => Value::from(number),
            _ => Value::from(value),
        };

        fields.insert(key.to_string(), value);
    }

    if fields.is_empty() {
        return Err(anyhow::anyhow!("Network endpoint must not be empty"));
    }

    serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Invalid network endpoint: {}", input))
}

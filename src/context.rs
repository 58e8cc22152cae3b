use std::{env, fmt, future::Future};

use http::header::HeaderValue;
use serde::Deserialize;

use crate::{
    config::{GcpConfig, SecretsConfig},
    error::{Error, Result},
    logger,
};

const PROJECT_ENV_KEYS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "CLOUDSDK_CORE_PROJECT"];
const REGION_ENV_KEYS: [&str; 1] = ["CLOUDSDK_COMPUTE_REGION"];
const TOKEN_ENV_KEYS: [&str; 2] = ["GOOGLE_OAUTH_ACCESS_TOKEN", "CLOUDSDK_AUTH_ACCESS_TOKEN"];

const METADATA_BASE_URL: &str = "http://metadata.google.internal/computeMetadata/v1";
const METADATA_TOKEN_PATH: &str = "instance/service-accounts/default/token";
const METADATA_PROJECT_ID_PATH: &str = "project/project-id";

/// Values given explicitly to an action. They win over configuration and environment.
#[derive(Debug, Default, Clone)]
pub struct ContextOverrides {
    pub project_id: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpContext {
    pub project_id: String,
    pub region: Option<String>,
}

impl GcpContext {
    /// Resolves the project and region. When no project is given anywhere, the
    /// project of the GCE metadata server is used.
    pub async fn discover(
        config: &GcpConfig,
        overrides: &ContextOverrides,
        client: &reqwest::Client,
    ) -> Result<Self> {
        Self::discover_with(
            config,
            overrides,
            |key| env::var(key).ok(),
            || metadata_project_id(client),
        )
        .await
    }

    async fn discover_with<F, Fut, E>(
        config: &GcpConfig,
        overrides: &ContextOverrides,
        lookup: impl Fn(&str) -> Option<String>,
        metadata: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<String, E>>,
        E: fmt::Display,
    {
        let project_id = first_non_empty([
            overrides.project_id.clone(),
            config.project_id.clone(),
            from_env(&lookup, &PROJECT_ENV_KEYS),
        ]);

        let region = first_non_empty([
            overrides.region.clone(),
            config.region.clone(),
            from_env(&lookup, &REGION_ENV_KEYS),
        ]);

        let project_id = match project_id {
            Some(project_id) => project_id,
            None => {
                logger!(debug, "no project id configured, asking the metadata server");

                let discovered = metadata().await.map_err(|e| {
                    Error::Configuration(format!(
                        "project id is not set: pass it explicitly, set `gcp.project_id` or GOOGLE_CLOUD_PROJECT ({})",
                        e
                    ))
                })?;

                first_non_empty([Some(discovered.trim().to_string())]).ok_or_else(|| {
                    Error::Configuration(
                        "project id is not set and the metadata server returned an empty one"
                            .to_string(),
                    )
                })?
            }
        };

        Ok(Self { project_id, region })
    }
}

async fn metadata_project_id(client: &reqwest::Client) -> reqwest::Result<String> {
    metadata(client, METADATA_PROJECT_ID_PATH).await?.text().await
}

async fn metadata(client: &reqwest::Client, path: &str) -> reqwest::Result<reqwest::Response> {
    client
        .get(format!("{}/{}", METADATA_BASE_URL, path))
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .and_then(|res| res.error_for_status())
}

#[derive(Clone)]
pub struct Credentials {
    access_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"***")
            .finish()
    }
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl Credentials {
    pub fn from_access_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Looks for a token in the secrets, then in the environment, then asks the
    /// GCE metadata server for the default service account token.
    pub async fn resolve(secrets: &SecretsConfig, client: &reqwest::Client) -> Result<Self> {
        if let Some(token) = first_non_empty([
            secrets.access_token.clone(),
            from_env(&|key: &str| env::var(key).ok(), &TOKEN_ENV_KEYS),
        ]) {
            return Ok(Self::from_access_token(token));
        }

        logger!(debug, "no access token configured, asking the metadata server");

        let token: MetadataToken = metadata(client, METADATA_TOKEN_PATH)
            .await
            .map_err(|e| {
                Error::Configuration(format!(
                    "no credentials found and the metadata server is unreachable: {}",
                    e
                ))
            })?
            .json()
            .await?;

        Ok(Self::from_access_token(token.access_token))
    }

    pub fn authorization(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| Error::Configuration(format!("invalid access token: {}", e)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

fn from_env(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| lookup(key))
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    async fn metadata_unreachable() -> std::result::Result<String, &'static str> {
        Err("metadata server is unreachable")
    }

    async fn metadata_never_called() -> std::result::Result<String, &'static str> {
        panic!("metadata server must not be called")
    }

    #[rstest]
    #[case(Some("override"), Some("config"), &[("GOOGLE_CLOUD_PROJECT", "env")], "override")]
    #[case(None, Some("config"), &[("GOOGLE_CLOUD_PROJECT", "env")], "config")]
    #[case(None, None, &[("GOOGLE_CLOUD_PROJECT", "env")], "env")]
    #[case(None, None, &[("CLOUDSDK_CORE_PROJECT", "gcloud")], "gcloud")]
    #[case(Some(""), Some("config"), &[], "config")]
    #[tokio::test]
    async fn project_idは引数_設定_環境変数の順に解決する(
        #[case] overridden: Option<&str>,
        #[case] configured: Option<&str>,
        #[case] vars: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        let config = GcpConfig {
            project_id: configured.map(Into::into),
            region: None,
        };
        let overrides = ContextOverrides {
            project_id: overridden.map(Into::into),
            region: None,
        };

        let actual = GcpContext::discover_with(&config, &overrides, env(vars), metadata_unreachable)
            .await
            .unwrap();

        assert_eq!(actual.project_id, expected);
    }

    #[tokio::test]
    async fn project_idがなければメタデータサーバーのプロジェクトを使う() {
        let actual = GcpContext::discover_with(
            &GcpConfig::default(),
            &ContextOverrides::default(),
            env(&[("CLOUDSDK_COMPUTE_REGION", "asia-northeast1")]),
            || async { Ok::<_, &str>("metadata-project\n".to_string()) },
        )
        .await
        .unwrap();

        assert_eq!(
            actual,
            GcpContext {
                project_id: "metadata-project".into(),
                region: Some("asia-northeast1".into()),
            }
        );
    }

    #[tokio::test]
    async fn 設定済みのproject_idがあればメタデータサーバーに問い合わせない() {
        let actual = GcpContext::discover_with(
            &GcpConfig::default(),
            &ContextOverrides {
                project_id: Some("demo".into()),
                region: None,
            },
            env(&[]),
            metadata_never_called,
        )
        .await;

        assert_eq!(actual.unwrap().project_id, "demo");
    }

    #[tokio::test]
    async fn project_idが解決できなければconfiguration_errorを返す() {
        let actual = GcpContext::discover_with(
            &GcpConfig::default(),
            &ContextOverrides::default(),
            env(&[]),
            metadata_unreachable,
        )
        .await;

        assert!(matches!(
            actual,
            Err(Error::Configuration(message)) if message.contains("metadata server is unreachable")
        ));
    }

    #[tokio::test]
    async fn regionは解決できなくてもエラーにしない() {
        let config = GcpConfig {
            project_id: Some("demo".into()),
            region: None,
        };

        let actual = GcpContext::discover_with(
            &config,
            &ContextOverrides::default(),
            env(&[]),
            metadata_unreachable,
        )
        .await
        .unwrap();

        assert_eq!(
            actual,
            GcpContext {
                project_id: "demo".into(),
                region: None
            }
        );
    }

    #[tokio::test]
    async fn regionは環境変数から解決する() {
        let config = GcpConfig {
            project_id: Some("demo".into()),
            region: None,
        };

        let actual = GcpContext::discover_with(
            &config,
            &ContextOverrides::default(),
            env(&[("CLOUDSDK_COMPUTE_REGION", "europe-west1")]),
            metadata_unreachable,
        )
        .await
        .unwrap();

        assert_eq!(actual.region.as_deref(), Some("europe-west1"));
    }

    #[tokio::test]
    async fn secretsのトークンを使う() {
        let secrets = SecretsConfig {
            access_token: Some("ya29.token".into()),
        };

        let credentials = Credentials::resolve(&secrets, &reqwest::Client::new())
            .await
            .unwrap();

        assert_eq!(
            credentials.authorization().unwrap(),
            HeaderValue::from_static("Bearer ya29.token")
        );
    }
}

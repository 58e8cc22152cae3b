mod match_rule;

pub use match_rule::{MatchRule, PathMatch, RegexMatch};

use serde::{Deserialize, Serialize};

use super::{int64, Extra};

/// UrlMap as returned by `urlMaps.get` / `regionUrlMaps.get`.
///
/// Only the fields traversed by the fault injection locator are typed. Everything
/// else is kept in `extra` so that the resource can be written back unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_rules: Vec<HostRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_matchers: Vec<PathMatcher>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl UrlMap {
    pub fn path_matcher(&self, name: &str) -> Option<&PathMatcher> {
        self.path_matchers.iter().find(|pm| pm.name == name)
    }

    pub fn path_matcher_mut(&mut self, name: &str) -> Option<&mut PathMatcher> {
        self.path_matchers.iter_mut().find(|pm| pm.name == name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRule {
    #[serde(default)]
    pub hosts: Vec<String>,

    pub path_matcher: String,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPathMatcher", into = "RawPathMatcher")]
pub struct PathMatcher {
    pub name: String,
    pub rules: PathMatcherRules,
    pub extra: Extra,
}

/// A path matcher routes either with legacy path rules or with route rules, never both.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PathMatcherRules {
    #[default]
    None,
    PathRules(Vec<PathRule>),
    RouteRules(Vec<RouteRule>),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPathMatcher {
    name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    path_rules: Vec<PathRule>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    route_rules: Vec<RouteRule>,

    #[serde(flatten)]
    extra: Extra,
}

impl TryFrom<RawPathMatcher> for PathMatcher {
    type Error = String;

    fn try_from(raw: RawPathMatcher) -> Result<Self, Self::Error> {
        let RawPathMatcher {
            name,
            path_rules,
            route_rules,
            extra,
        } = raw;

        let rules = match (path_rules.is_empty(), route_rules.is_empty()) {
            (true, true) => PathMatcherRules::None,
            (false, true) => PathMatcherRules::PathRules(path_rules),
            (true, false) => PathMatcherRules::RouteRules(route_rules),
            (false, false) => {
                return Err(format!(
                    "path matcher `{}` declares both pathRules and routeRules",
                    name
                ))
            }
        };

        Ok(Self { name, rules, extra })
    }
}

impl From<PathMatcher> for RawPathMatcher {
    fn from(pm: PathMatcher) -> Self {
        let PathMatcher { name, rules, extra } = pm;

        let (path_rules, route_rules) = match rules {
            PathMatcherRules::None => (vec![], vec![]),
            PathMatcherRules::PathRules(rules) => (rules, vec![]),
            PathMatcherRules::RouteRules(rules) => (vec![], rules),
        };

        Self {
            name,
            path_rules,
            route_rules,
            extra,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    #[serde(default)]
    pub paths: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_action: Option<RouteAction>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl PathRule {
    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_rules: Vec<MatchRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_action: Option<RouteAction>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        self.match_rules.iter().any(|rule| rule.path.matches(path))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_injection_policy: Option<FaultInjectionPolicy>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultInjectionPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<FaultDelay>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort: Option<FaultAbort>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultDelay {
    #[serde(default)]
    pub percentage: f64,

    #[serde(default)]
    pub fixed_delay: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultAbort {
    #[serde(default)]
    pub percentage: f64,

    #[serde(default)]
    pub http_status: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    #[serde(default, with = "int64")]
    pub seconds: i64,

    #[serde(default)]
    pub nanos: i32,
}

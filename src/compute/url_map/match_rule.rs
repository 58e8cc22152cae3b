use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::compute::Extra;

/// HttpRouteRuleMatch. Only the path arm is interpreted; header and query
/// parameter matches are carried in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatchRule", into = "RawMatchRule")]
pub struct MatchRule {
    pub path: PathMatch,
    pub extra: Extra,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathMatch {
    Prefix(String),
    FullPath(String),
    Regex(RegexMatch),
    /// Accepted so that url maps using templates round-trip. Never matched locally.
    PathTemplate(String),
}

impl PathMatch {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
            Self::FullPath(full_path) => full_path == path,
            Self::Regex(regex) => regex.is_full_match(path),
            Self::PathTemplate(_) => false,
        }
    }
}

/// Regex compiled once, anchored on both ends so that it has to match the whole path.
#[derive(Clone, Debug)]
pub struct RegexMatch {
    pattern: String,
    regex: Regex,
}

impl RegexMatch {
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;

        Ok(Self { pattern, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_full_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for RegexMatch {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatchRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_path_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    regex_match: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_template_match: Option<String>,

    #[serde(flatten)]
    extra: Extra,
}

impl TryFrom<RawMatchRule> for MatchRule {
    type Error = String;

    fn try_from(raw: RawMatchRule) -> Result<Self, Self::Error> {
        let RawMatchRule {
            prefix_match,
            full_path_match,
            regex_match,
            path_template_match,
            extra,
        } = raw;

        let mut arms = Vec::with_capacity(1);

        if let Some(prefix) = prefix_match {
            arms.push(PathMatch::Prefix(prefix));
        }

        if let Some(full_path) = full_path_match {
            arms.push(PathMatch::FullPath(full_path));
        }

        if let Some(pattern) = regex_match {
            let regex = RegexMatch::new(pattern.as_str())
                .map_err(|e| format!("invalid regexMatch `{}`: {}", pattern, e))?;
            arms.push(PathMatch::Regex(regex));
        }

        if let Some(template) = path_template_match {
            arms.push(PathMatch::PathTemplate(template));
        }

        if arms.len() != 1 {
            return Err(format!(
                "match rule must set exactly one of prefixMatch, fullPathMatch, regexMatch or pathTemplateMatch, found {}",
                arms.len()
            ));
        }

        let path = arms.remove(0);

        Ok(Self { path, extra })
    }
}

impl From<MatchRule> for RawMatchRule {
    fn from(rule: MatchRule) -> Self {
        let MatchRule { path, extra } = rule;

        let mut raw = RawMatchRule {
            extra,
            ..Default::default()
        };

        match path {
            PathMatch::Prefix(prefix) => raw.prefix_match = Some(prefix),
            PathMatch::FullPath(full_path) => raw.full_path_match = Some(full_path),
            PathMatch::Regex(regex) => raw.regex_match = Some(regex.as_str().to_string()),
            PathMatch::PathTemplate(template) => raw.path_template_match = Some(template),
        }

        raw
    }
}

use anyhow::Result;
use serde_json::Value;
use strum::{Display, EnumString};

#[derive(Debug, Default, EnumString, Display, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    #[strum(serialize = "json")]
    Json,
    #[strum(serialize = "yaml", serialize = "yml")]
    Yaml,
}

impl OutputFormat {
    pub fn render(self, value: &Value) -> Result<String> {
        let rendered = match self {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn キーの順に並べたyamlを出力する() {
        let value = json!({"status": "DONE", "name": "operation-1"});

        let actual = OutputFormat::Yaml.render(&value).unwrap();

        assert_eq!(
            actual,
            indoc! {
                "
                name: operation-1
                status: DONE
                "
            }
        );
    }

    #[test]
    fn jsonを出力する() {
        let actual = OutputFormat::Json.render(&json!({"status": "DONE"})).unwrap();

        assert_eq!(actual, "{\n  \"status\": \"DONE\"\n}");
    }
}

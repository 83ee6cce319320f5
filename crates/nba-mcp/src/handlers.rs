//! MCP Tool Handlers
//!
//! The dispatcher runs one tool call end to end:
//! validate arguments, build the upstream URL, fetch, wrap the JSON body.
//! Validation and URL building happen before any network traffic, so a
//! rejected call never reaches the upstream API.

use std::sync::{Arc, LazyLock};

use chrono::{NaiveDate, Utc};
use regex::Regex;
use reqwest::Url;
use serde_json::{Map, Value};

use crate::endpoint::ToolArgs;
use crate::tools::{DATE_PATTERN, ParamKind, ParamSpec, ToolDefinition, ToolRegistry, ToolResult};
use crate::upstream::UpstreamClient;
use crate::{Error, Result};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(DATE_PATTERN).unwrap());

/// Executes tool calls against the upstream API
///
/// Holds no per-call state; one instance is shared by all concurrent calls.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    upstream: UpstreamClient,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, upstream: UpstreamClient) -> Self {
        Self { registry, upstream }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle a tool call and return the upstream body as pretty-printed JSON
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> Result<ToolResult> {
        tracing::info!(tool = tool_name, "Tool call");

        let url = self.resolve_url(tool_name, &arguments)?;
        let body = self.upstream.get_json(url).await?;

        Ok(ToolResult::text(serde_json::to_string_pretty(&body)?))
    }

    /// Validate a call and build its target URL, using today's UTC date
    /// for an omitted `date`.
    pub fn resolve_url(&self, tool_name: &str, arguments: &Value) -> Result<Url> {
        self.resolve_url_on(tool_name, arguments, today_utc())
    }

    /// Same as [`Dispatcher::resolve_url`] with an explicit "today"
    pub fn resolve_url_on(&self, tool_name: &str, arguments: &Value, today: NaiveDate) -> Result<Url> {
        let tool = self
            .registry
            .get(tool_name)
            .ok_or_else(|| Error::UnknownTool(tool_name.to_string()))?;
        let args = validate_arguments(tool, arguments, today)?;
        tool.endpoint.url(self.upstream.base_url(), &args)
    }
}

/// Current calendar day in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `YYYYMMDD`, zero-padded, no separators
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Check `arguments` against the tool's declared parameters.
///
/// Absent and `null` arguments are treated alike. Arguments the tool does
/// not declare are ignored.
fn validate_arguments(tool: &ToolDefinition, arguments: &Value, today: NaiveDate) -> Result<ToolArgs> {
    let empty = Map::new();
    let object = match arguments {
        Value::Null => &empty,
        Value::Object(map) => map,
        _ => {
            return Err(Error::invalid_params(
                "arguments",
                "expected an object of named arguments",
            ));
        }
    };

    let mut args = ToolArgs::new();
    for spec in &tool.params {
        match object.get(spec.name) {
            None | Some(Value::Null) if spec.required => {
                return Err(Error::invalid_params(spec.name, "required parameter is missing"));
            }
            None | Some(Value::Null) => {
                if spec.kind == ParamKind::Date {
                    args.insert(spec.name, format_date(today));
                }
            }
            Some(value) => {
                args.insert(spec.name, normalize(spec, value)?);
            }
        }
    }
    Ok(args)
}

fn normalize(spec: &ParamSpec, value: &Value) -> Result<String> {
    match spec.kind {
        ParamKind::Date => {
            let date = value
                .as_str()
                .ok_or_else(|| Error::invalid_params(spec.name, "expected a string in YYYYMMDD format"))?;
            if !DATE_RE.is_match(date) {
                return Err(Error::invalid_params(
                    spec.name,
                    format!("expected 8 digits (YYYYMMDD), got '{}'", date),
                ));
            }
            Ok(date.to_string())
        }
        ParamKind::Team => match value {
            Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Value::String(_) => Err(Error::invalid_params(spec.name, "must not be empty")),
            Value::Number(n) if n.is_u64() => Ok(n.to_string()),
            _ => Err(Error::invalid_params(
                spec.name,
                "expected a team id or abbreviation",
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    const BASE: &str = "http://127.0.0.1:9/nba";

    fn dispatcher() -> Dispatcher {
        let config = ServerConfig {
            base_url: BASE.into(),
            ..ServerConfig::default()
        };
        Dispatcher::new(
            Arc::new(ToolRegistry::default()),
            UpstreamClient::new(&config).unwrap(),
        )
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_zero_pads() {
        assert_eq!(format_date(day(2024, 1, 5)), "20240105");
        assert_eq!(format_date(day(999, 12, 31)), "09991231");
    }

    #[test]
    fn test_scoreboard_with_explicit_date() {
        let url = dispatcher()
            .resolve_url("espn_nba_scoreboard", &json!({"date": "20240101"}))
            .unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/scoreboard?dates=20240101"));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!(null))]
    #[case(json!({"date": null}))]
    fn test_scoreboard_defaults_to_given_day(#[case] arguments: Value) {
        let url = dispatcher()
            .resolve_url_on("espn_nba_scoreboard", &arguments, day(2025, 3, 7))
            .unwrap();
        assert_eq!(url.as_str(), format!("{BASE}/scoreboard?dates=20250307"));
    }

    #[test]
    fn test_scoreboard_defaults_to_today_utc() {
        let before = format_date(today_utc());
        let url = dispatcher().resolve_url("espn_nba_scoreboard", &json!({})).unwrap();
        let after = format_date(today_utc());

        let dates = url.query().unwrap().strip_prefix("dates=").unwrap().to_string();
        assert_eq!(dates.len(), 8);
        assert!(dates.chars().all(|c| c.is_ascii_digit()));
        assert!(dates == before || dates == after);
    }

    #[rstest]
    #[case(json!("2024-01-01"))]
    #[case(json!("2024011"))]
    #[case(json!("202401011"))]
    #[case(json!("2024o101"))]
    #[case(json!("２０２４０１０１"))]
    #[case(json!(""))]
    #[case(json!(20240101))]
    fn test_malformed_date_is_invalid(#[case] date: Value) {
        let err = dispatcher()
            .resolve_url("espn_nba_scoreboard", &json!({ "date": date }))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { ref param, .. } if param == "date"));
        assert_eq!(err.rpc_code(), -32602);
    }

    #[rstest]
    #[case("espn_nba_team")]
    #[case("espn_nba_roster")]
    #[case("espn_nba_schedule")]
    fn test_team_tools_without_team_are_invalid(#[case] tool: &str) {
        for arguments in [json!({}), json!(null), json!({"team": null}), json!({"team": "  "})] {
            let err = dispatcher().resolve_url(tool, &arguments).unwrap_err();
            assert!(
                matches!(err, Error::InvalidParams { ref param, .. } if param == "team"),
                "{tool} with {arguments} gave {err:?}"
            );
        }
    }

    #[rstest]
    #[case("espn_nba_team", json!({"team": "bos"}), "/teams/bos")]
    #[case("espn_nba_team", json!({"team": 2}), "/teams/2")]
    #[case("espn_nba_roster", json!({"team": " lal "}), "/lal/roster")]
    #[case("espn_nba_schedule", json!({"team": "13"}), "/13/schedule")]
    #[case("espn_nba_teams", json!({}), "/teams")]
    #[case("espn_nba_players", json!(null), "/players")]
    #[case("espn_nba_player_stats", json!({}), "/statistics/players")]
    #[case("espn_nba_news", json!({"unused": true}), "/news")]
    fn test_urls_per_tool(#[case] tool: &str, #[case] arguments: Value, #[case] suffix: &str) {
        let url = dispatcher().resolve_url(tool, &arguments).unwrap();
        assert_eq!(url.as_str(), format!("{BASE}{suffix}"));
    }

    #[rstest]
    #[case(json!({"team": true}))]
    #[case(json!({"team": -3}))]
    #[case(json!({"team": 2.5}))]
    #[case(json!({"team": ["lal"]}))]
    fn test_team_of_wrong_type_is_invalid(#[case] arguments: Value) {
        let err = dispatcher().resolve_url("espn_nba_team", &arguments).unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }

    #[test]
    fn test_non_object_arguments_are_invalid() {
        let err = dispatcher()
            .resolve_url("espn_nba_teams", &json!(["lal"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { ref param, .. } if param == "arguments"));
    }

    #[test]
    fn test_unknown_tool() {
        let err = dispatcher()
            .resolve_url("espn_nba_bogus", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTool(ref name) if name == "espn_nba_bogus"));
        assert_eq!(err.rpc_code(), -32601);
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_fails_before_fetch() {
        // BASE points at a closed port; reaching the network would be an Http error
        let err = dispatcher().invoke("espn_nba_bogus", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::UnknownTool(_)));
    }
}

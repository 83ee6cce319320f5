//! MCP Tool registry
//!
//! The fixed catalogue of read-only NBA lookups exposed by the server.
//! Every tool is a single GET against the upstream API; see
//! [`Endpoint`](crate::endpoint::Endpoint) for the URL rules.
//!
//! # Tools
//!
//! - `espn_nba_scoreboard` - Games and scores for a day (`date`, optional)
//! - `espn_nba_teams` - All teams
//! - `espn_nba_team` - One team (`team`)
//! - `espn_nba_roster` - Team roster (`team`)
//! - `espn_nba_schedule` - Team schedule (`team`)
//! - `espn_nba_players` - Players
//! - `espn_nba_player_stats` - Player statistics
//! - `espn_nba_news` - Latest news

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::endpoint::Endpoint;

/// `date` must be exactly eight ASCII digits
pub const DATE_PATTERN: &str = "^[0-9]{8}$";

/// How an argument is checked and normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Calendar day as `YYYYMMDD`
    Date,
    /// Team id or abbreviation; JSON numbers are accepted as ids
    Team,
}

/// Declared contract for one tool argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Format constraint advertised in the input schema
    pub fn pattern(&self) -> Option<&'static str> {
        match self.kind {
            ParamKind::Date => Some(DATE_PATTERN),
            ParamKind::Team => None,
        }
    }

    fn schema(&self) -> Value {
        let mut property = json!({
            "type": "string",
            "description": self.description,
        });
        if let Some(pattern) = self.pattern() {
            property["pattern"] = Value::from(pattern);
        }
        property
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    pub endpoint: Endpoint,
}

impl ToolDefinition {
    /// JSON Schema describing the tool arguments
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Entry as rendered in a `tools/list` response
    pub fn to_listing(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }
}

/// Immutable catalogue of tools, built once at startup
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        Self { tools }
    }

    /// All tools in declaration order
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Look up a tool by identifier
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(get_tool_definitions())
    }
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
        }
    }
}

const TEAM_PARAM: ParamSpec = ParamSpec {
    name: "team",
    description: "Team id or abbreviation (e.g. '13' or 'lal')",
    required: true,
    kind: ParamKind::Team,
};

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "espn_nba_scoreboard",
            description: "Get NBA games and scores for a given day",
            params: vec![ParamSpec {
                name: "date",
                description: "Date in YYYYMMDD format (defaults to today, UTC)",
                required: false,
                kind: ParamKind::Date,
            }],
            endpoint: Endpoint::Scoreboard,
        },
        ToolDefinition {
            name: "espn_nba_teams",
            description: "List all NBA teams",
            params: vec![],
            endpoint: Endpoint::Teams,
        },
        ToolDefinition {
            name: "espn_nba_team",
            description: "Get information about a specific NBA team",
            params: vec![TEAM_PARAM],
            endpoint: Endpoint::Team,
        },
        ToolDefinition {
            name: "espn_nba_roster",
            description: "Get the current roster of an NBA team",
            params: vec![TEAM_PARAM],
            endpoint: Endpoint::Roster,
        },
        ToolDefinition {
            name: "espn_nba_schedule",
            description: "Get the schedule of an NBA team",
            params: vec![TEAM_PARAM],
            endpoint: Endpoint::Schedule,
        },
        ToolDefinition {
            name: "espn_nba_players",
            description: "List NBA players",
            params: vec![],
            endpoint: Endpoint::Players,
        },
        ToolDefinition {
            name: "espn_nba_player_stats",
            description: "Get NBA player statistics",
            params: vec![],
            endpoint: Endpoint::PlayerStats,
        },
        ToolDefinition {
            name: "espn_nba_news",
            description: "Get the latest NBA news",
            params: vec![],
            endpoint: Endpoint::News,
        },
    ]
}

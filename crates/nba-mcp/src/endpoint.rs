//! Upstream endpoint rules
//!
//! Each tool maps to exactly one GET endpoint below the configured base URL.
//! Substituted values are pushed as single path segments, so they are
//! percent-encoded and can never climb out of the base path.

use std::collections::BTreeMap;

use reqwest::Url;

use crate::{Error, Result};

/// Default upstream: ESPN site API, basketball / NBA
pub const DEFAULT_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba";

/// Validated tool arguments, keyed by parameter name
pub type ToolArgs = BTreeMap<&'static str, String>;

/// URL rule for one tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `{base}/scoreboard?dates={date}`
    Scoreboard,
    /// `{base}/teams`
    Teams,
    /// `{base}/teams/{team}`
    Team,
    /// `{base}/{team}/roster`
    Roster,
    /// `{base}/{team}/schedule`
    Schedule,
    /// `{base}/players`
    Players,
    /// `{base}/statistics/players`
    PlayerStats,
    /// `{base}/news`
    News,
}

impl Endpoint {
    /// Build the target URL for this endpoint.
    ///
    /// `args` must already be validated: every argument the rule substitutes
    /// is expected to be present.
    pub fn url(&self, base: &Url, args: &ToolArgs) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("base URL cannot carry a path: {}", base))
            })?;
            segments.pop_if_empty();
            match self {
                Self::Scoreboard => {
                    segments.push("scoreboard");
                }
                Self::Teams => {
                    segments.push("teams");
                }
                Self::Team => {
                    segments.push("teams").push(arg(args, "team")?);
                }
                Self::Roster => {
                    segments.push(arg(args, "team")?).push("roster");
                }
                Self::Schedule => {
                    segments.push(arg(args, "team")?).push("schedule");
                }
                Self::Players => {
                    segments.push("players");
                }
                Self::PlayerStats => {
                    segments.push("statistics").push("players");
                }
                Self::News => {
                    segments.push("news");
                }
            }
        }

        if *self == Self::Scoreboard {
            url.query_pairs_mut().append_pair("dates", arg(args, "date")?);
        }

        Ok(url)
    }
}

fn arg<'a>(args: &'a ToolArgs, name: &str) -> Result<&'a str> {
    args.get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::invalid_params(name, "required parameter is missing"))
}

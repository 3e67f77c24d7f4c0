use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const GAMELOG_URL: &str = "http://stats.nba.com/stats/leaguegamelog";
pub const BOXSCORE_URL: &str = "http://stats.nba.com/stats/boxscoretraditionalv2";

const DEFAULT_SEASON_DIR: &str = "seasons";
const DEFAULT_GAME_DIR: &str = "games";
const DEFAULT_OUTPUT: &str = "nba_stats.csv";
const DEFAULT_SEASONS: &[&str] = &["2016-17"];
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 Firefox";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_FETCH_ATTEMPTS: u32 = 5;

pub type QueryParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub params: QueryParams,
    pub key_param: String,
}

impl Endpoint {
    pub fn gamelog() -> Self {
        Self {
            url: GAMELOG_URL.to_string(),
            params: params(&[
                ("Direction", "DESC"),
                ("LeagueID", "00"),
                ("PlayerOrTeam", "T"),
                ("Season", "2015-16"),
                ("SeasonType", "Regular Season"),
                ("Sorter", "DATE"),
            ]),
            key_param: "Season".to_string(),
        }
    }

    pub fn boxscore() -> Self {
        Self {
            url: BOXSCORE_URL.to_string(),
            params: params(&[
                ("EndPeriod", "10"),
                ("EndRange", "28800"),
                ("GameID", "0021501182"),
                ("RangeType", "0"),
                ("Season", "2015-16"),
                ("SeasonType", "Regular Season"),
                ("StartPeriod", "1"),
                ("StartRange", "0"),
            ]),
            key_param: "GameID".to_string(),
        }
    }

    pub fn params_for(&self, key: &str) -> QueryParams {
        let mut out = self.params.clone();
        out.insert(self.key_param.clone(), key.to_string());
        out
    }
}

fn params(pairs: &[(&str, &str)]) -> QueryParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub season_dir: PathBuf,
    pub game_dir: PathBuf,
    pub output_path: PathBuf,
    pub seasons: Vec<String>,
    pub gamelog: Endpoint,
    pub boxscore: Endpoint,
    pub user_agent: String,
    pub timeout: Duration,
    pub fetch_attempts: u32,
    pub sink_db: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            season_dir: PathBuf::from(DEFAULT_SEASON_DIR),
            game_dir: PathBuf::from(DEFAULT_GAME_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            seasons: DEFAULT_SEASONS.iter().map(|s| s.to_string()).collect(),
            gamelog: Endpoint::gamelog(),
            boxscore: Endpoint::boxscore(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_attempts: 1,
            sink_db: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut out = Self::default();
        if let Some(dir) = var("NBA_STATS_SEASON_DIR") {
            out.season_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("NBA_STATS_GAME_DIR") {
            out.game_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("NBA_STATS_OUTPUT") {
            out.output_path = PathBuf::from(path);
        }
        if let Some(raw) = var("NBA_STATS_SEASONS") {
            let seasons = parse_seasons(&raw);
            if !seasons.is_empty() {
                out.seasons = seasons;
            }
        }
        if let Some(agent) = var("NBA_STATS_USER_AGENT") {
            out.user_agent = agent;
        }
        if let Some(secs) = var("NBA_STATS_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok()) {
            out.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = var("NBA_STATS_FETCH_ATTEMPTS").and_then(|v| v.parse::<u32>().ok()) {
            out.fetch_attempts = n.clamp(1, MAX_FETCH_ATTEMPTS);
        }
        out.sink_db = var("NBA_STATS_SINK_DB").map(PathBuf::from);
        out
    }
}

pub fn parse_seasons(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let season = part.trim();
        if season.is_empty() || out.iter().any(|s| s == season) {
            continue;
        }
        out.push(season.to_string());
    }
    out
}

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use nba_stats::config::{GAMELOG_URL, QueryParams, Settings};
use nba_stats::fetcher::RemoteFetcher;
use nba_stats::FetchError;

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("nba_stats_it_{name}"));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

pub fn settings_in(dir: &PathBuf, seasons: &[&str]) -> Settings {
    Settings {
        season_dir: dir.join("seasons"),
        game_dir: dir.join("games"),
        output_path: dir.join("nba_stats.csv"),
        seasons: seasons.iter().map(|s| s.to_string()).collect(),
        ..Settings::default()
    }
}

/// Serves fixture bodies by `Season` / `GameID` parameter and counts calls.
#[derive(Default)]
pub struct StubFetcher {
    seasons: HashMap<String, String>,
    games: HashMap<String, String>,
    calls: Cell<usize>,
}

impl StubFetcher {
    pub fn with_fixtures() -> Self {
        let mut out = Self::default();
        for season in ["2016-17", "2015-16"] {
            out.seasons
                .insert(season.to_string(), read_fixture(&format!("season_{season}.json")));
        }
        for game in ["0021600001", "0021501182"] {
            out.games
                .insert(game.to_string(), read_fixture(&format!("game_{game}.json")));
        }
        out
    }

    pub fn without_game(mut self, game_id: &str) -> Self {
        self.games.remove(game_id);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RemoteFetcher for StubFetcher {
    fn fetch(&self, base_url: &str, params: &QueryParams) -> Result<Vec<u8>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        let body = if base_url == GAMELOG_URL {
            params.get("Season").and_then(|s| self.seasons.get(s))
        } else {
            params.get("GameID").and_then(|g| self.games.get(g))
        };
        body.map(|b| b.clone().into_bytes())
            .ok_or_else(|| FetchError::Status {
                url: base_url.to_string(),
                status: 404,
            })
    }
}

pub fn read_table(path: &PathBuf) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .quote(b'|')
        .from_path(path)
        .expect("table should open");
    rdr.records()
        .map(|r| r.expect("valid csv row").iter().map(str::to_string).collect())
        .collect()
}

use std::collections::HashMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::cache_store::{CacheStore, Namespace};
use crate::config::Endpoint;
use crate::error::{Result, StatsError};
use crate::fetcher::RemoteFetcher;
use crate::joiner::{GameDetail, join_game};
use crate::player_index::PlayerRegistry;
use crate::records::{ApiPayload, Record, require_str, str_field};
use crate::sink::{DocumentSink, GameDocument, NullSink};

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRow {
    pub game: Record,
    pub detail: GameDetail,
}

impl SeasonRow {
    pub fn game_id(&self) -> Option<&str> {
        str_field(&self.game, "GAME_ID")
    }

    pub fn matchup(&self) -> Option<&str> {
        str_field(&self.game, "MATCHUP")
    }
}

pub struct Resolver<F> {
    fetcher: F,
    cache: CacheStore,
    gamelog: Endpoint,
    boxscore: Endpoint,
    sink: Box<dyn DocumentSink>,
    fetches: usize,
}

impl<F: RemoteFetcher> Resolver<F> {
    pub fn new(fetcher: F, cache: CacheStore, gamelog: Endpoint, boxscore: Endpoint) -> Self {
        Self {
            fetcher,
            cache,
            gamelog,
            boxscore,
            sink: Box::new(NullSink),
            fetches: 0,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DocumentSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    pub fn resolve_season(
        &mut self,
        season_id: &str,
        players: &mut PlayerRegistry,
    ) -> Result<Vec<SeasonRow>> {
        let what = format!("season {season_id}");
        let bytes = self.load_or_fetch(Namespace::Season, season_id)?;
        let payload = ApiPayload::decode(&bytes, &what)?;
        let games = payload.result_set(0, &what)?.records(&what)?;

        // Each game is listed once per team; decode and persist it once.
        let mut details: HashMap<String, GameDetail> = HashMap::new();
        let mut out = Vec::with_capacity(games.len());
        for game in games {
            let game_id = require_str(&game, "GAME_ID", &what)?.to_string();
            let detail = match details.get(&game_id) {
                Some(detail) => detail.clone(),
                None => {
                    let raw = self.resolve_game(&game_id)?;
                    self.persist(&game_id, season_id, &raw);

                    let payload = ApiPayload::from_value(&raw, &format!("game {game_id}"))?;
                    let detail = join_game(&payload, &game_id, players)?;
                    details.insert(game_id, detail.clone());
                    detail
                }
            };
            out.push(SeasonRow { game, detail });
        }
        Ok(out)
    }

    pub fn resolve_game(&mut self, game_id: &str) -> Result<Value> {
        let bytes = self.load_or_fetch(Namespace::Game, game_id)?;
        serde_json::from_slice(&bytes).map_err(|source| StatsError::Json {
            what: format!("game {game_id}"),
            source,
        })
    }

    fn load_or_fetch(&mut self, namespace: Namespace, key: &str) -> Result<Vec<u8>> {
        if !self.cache.exists(namespace, key) {
            let endpoint = match namespace {
                Namespace::Season => &self.gamelog,
                Namespace::Game => &self.boxscore,
            };
            self.fetches += 1;
            match self.fetcher.fetch(&endpoint.url, &endpoint.params_for(key)) {
                Ok(body) => self.cache.write(namespace, key, &body)?,
                // The missing entry surfaces as NotFound on the read below.
                Err(err) => warn!(%namespace, key, error = %err, "fetch failed"),
            }
            info!("download {namespace} data: {key}");
        }
        self.cache.read(namespace, key)
    }

    fn persist(&mut self, game_id: &str, season_id: &str, payload: &Value) {
        let doc = GameDocument {
            game_id,
            season_id,
            payload,
        };
        if let Err(err) = self.sink.persist(&doc) {
            warn!(game_id, error = %err, "document sink rejected game");
        }
    }
}

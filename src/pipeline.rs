use std::path::PathBuf;

use tracing::info;

use crate::cache_store::CacheStore;
use crate::config::Settings;
use crate::error::Result;
use crate::fetcher::RemoteFetcher;
use crate::player_index::{PlayerRegistry, PlayerSlotIndex};
use crate::resolver::{Resolver, SeasonRow};
use crate::sink::DocumentSink;
use crate::table;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seasons: Vec<String>,
    pub season_rows: usize,
    pub rows_written: usize,
    pub player_slots: usize,
    pub fetches: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub rows: Vec<SeasonRow>,
    pub index: PlayerSlotIndex,
}

pub fn resolver_for<F: RemoteFetcher>(settings: &Settings, fetcher: F) -> Resolver<F> {
    Resolver::new(
        fetcher,
        CacheStore::new(&settings.season_dir, &settings.game_dir),
        settings.gamelog.clone(),
        settings.boxscore.clone(),
    )
}

pub fn resolve_all<F: RemoteFetcher>(
    resolver: &mut Resolver<F>,
    seasons: &[String],
) -> Result<Resolved> {
    let mut players = PlayerRegistry::new();
    let mut rows = Vec::new();
    for season in seasons {
        let season_rows = resolver.resolve_season(season, &mut players)?;
        info!(season = %season, games = season_rows.len(), "season resolved");
        rows.extend(season_rows);
    }
    let index = PlayerSlotIndex::build(&players);
    Ok(Resolved { rows, index })
}

pub fn run<F: RemoteFetcher>(
    settings: &Settings,
    fetcher: F,
    sink: Box<dyn DocumentSink>,
) -> Result<RunSummary> {
    let mut resolver = resolver_for(settings, fetcher).with_sink(sink);
    let resolved = resolve_all(&mut resolver, &settings.seasons)?;

    let rows_written =
        table::write_table_file(&resolved.rows, &resolved.index, &settings.output_path)?;
    info!(
        path = %settings.output_path.display(),
        rows = rows_written,
        players = resolved.index.len(),
        "table written"
    );

    Ok(RunSummary {
        seasons: settings.seasons.clone(),
        season_rows: resolved.rows.len(),
        rows_written,
        player_slots: resolved.index.len(),
        fetches: resolver.fetch_count(),
        output_path: settings.output_path.clone(),
    })
}

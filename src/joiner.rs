use crate::error::{Result, StatsError};
use crate::player_index::PlayerRegistry;
use crate::records::{ApiPayload, Record, require_str, str_field};

const PLAYER_SET: usize = 0;
const TEAM_SET: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GameDetail {
    pub player_stats: Vec<Record>,
    pub host: Record,
    pub guest: Record,
}

impl GameDetail {
    pub fn host_abbreviation(&self) -> Option<&str> {
        str_field(&self.host, "TEAM_ABBREVIATION")
    }

    pub fn guest_abbreviation(&self) -> Option<&str> {
        str_field(&self.guest, "TEAM_ABBREVIATION")
    }
}

/// Splits a boxscore into player and team rows and decides host and guest.
///
/// The boxscore lists the visiting side first, so the host is the team the
/// first listed player does not belong to: if that player plays for
/// `teams[0]` the host is `teams[1]`, otherwise `teams[0]`.
pub fn join_game(
    payload: &ApiPayload,
    game_id: &str,
    players: &mut PlayerRegistry,
) -> Result<GameDetail> {
    let what = format!("game {game_id}");
    let player_stats = payload.result_set(PLAYER_SET, &what)?.records(&what)?;
    let teams = payload.result_set(TEAM_SET, &what)?.records(&what)?;
    let team_count = teams.len();
    let mut teams = teams.into_iter();
    let (Some(first_listed), Some(second_listed)) = (teams.next(), teams.next()) else {
        return Err(StatsError::decode(
            &what,
            format!("expected 2 team rows, found {team_count}"),
        ));
    };

    for player in &player_stats {
        let team = require_str(player, "TEAM_ABBREVIATION", &what)?;
        let name = require_str(player, "PLAYER_NAME", &what)?;
        players.register(team, name);
    }

    let first = player_stats
        .first()
        .ok_or_else(|| StatsError::decode(&what, "no player rows"))?;
    let first_team = require_str(first, "TEAM_ABBREVIATION", &what)?;

    let (host, guest) = if str_field(&first_listed, "TEAM_ABBREVIATION") == Some(first_team) {
        (second_listed, first_listed)
    } else {
        (first_listed, second_listed)
    };

    Ok(GameDetail {
        player_stats,
        host,
        guest,
    })
}

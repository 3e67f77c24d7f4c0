use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use crate::error::{Result, StatsError};
use crate::player_index::PlayerSlotIndex;
use crate::records::{Record, cell_text, is_blank, require_str};
use crate::resolver::SeasonRow;

pub const OVERALL_COLUMNS: [&str; 6] = ["對手", "主場", "賽季", "主場分數", "客場分數", "勝負"];

/// Per-player block. The first label is empty so the column reads as the bare
/// player name (the participated flag).
pub const PLAYER_COLUMNS: [&str; 24] = [
    "", "先發", "主場", "位置", "背靠背", "時間", "投籃", "命中", "出手", "三分", "三分命中",
    "三分出手", "罰球", "罰球命中", "罰球出手", "籃板", "前場", "後場", "助攻", "搶斷", "蓋帽",
    "失誤", "犯規", "得分",
];

const PLAYER_STAT_KEYS: [&str; 18] = [
    "FG_PCT", "FGM", "FGA", "FG3_PCT", "FG3M", "FG3A", "FT_PCT", "FTM", "FTA", "REB", "OREB",
    "DREB", "AST", "STL", "BLK", "TO", "PF", "PTS",
];

const EMPTY_CELL: &str = "0";

// Not computed yet: needs the previous game date per team. Always true until then.
const BACK_TO_BACK_PLACEHOLDER: &str = "1";

pub fn row_width(index: &PlayerSlotIndex) -> usize {
    OVERALL_COLUMNS.len() + index.len() * PLAYER_COLUMNS.len()
}

pub fn header(index: &PlayerSlotIndex) -> Vec<String> {
    let mut out: Vec<String> = OVERALL_COLUMNS.iter().map(|c| c.to_string()).collect();
    out.reserve(index.len() * PLAYER_COLUMNS.len());
    for name in index.names() {
        for field in PLAYER_COLUMNS {
            out.push(format!("{name} {field}"));
        }
    }
    out
}

/// Opponent abbreviation: the token after the last whitespace of `MATCHUP`
/// (`"GSW vs. SAS"` and `"GSW @ SAS"` both give `SAS`).
pub fn parse_opponent(matchup: &str) -> Option<&str> {
    let last = matchup.chars().next_back()?;
    let body = &matchup[..matchup.len() - last.len_utf8()];
    let (idx, ws) = body
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())?;
    Some(&matchup[idx + ws.len_utf8()..])
}

/// `"MM:SS"` to fractional minutes with two decimals. Blank is `0.00`.
pub fn parse_minutes(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Some(format!("{:.2}", 0.0));
    }
    let (mins, secs) = match raw.split_once(':') {
        Some((m, s)) => (m.trim().parse::<f64>().ok()?, s.trim().parse::<f64>().ok()?),
        None => (raw.parse::<f64>().ok()?, 0.0),
    };
    if !mins.is_finite() || !secs.is_finite() {
        return None;
    }
    Some(format!("{:.2}", mins + secs / 60.0))
}

pub fn starter_flag(player: &Record) -> &'static str {
    if is_blank(player, "START_POSITION") {
        "0"
    } else {
        "1"
    }
}

pub fn player_block(player: &Record, row: &SeasonRow) -> Result<Option<Vec<String>>> {
    let team_id = player.get("TEAM_ID");
    let host_id = row.detail.host.get("TEAM_ID");
    let guest_id = row.detail.guest.get("TEAM_ID");
    if team_id.is_none() || (team_id != host_id && team_id != guest_id) {
        return Ok(None);
    }

    let is_host = if team_id == host_id { "1" } else { "0" };
    let position = if is_blank(player, "START_POSITION") {
        EMPTY_CELL.to_string()
    } else {
        cell_text(player, "START_POSITION")
    };
    let minutes = match player.get("MIN") {
        Some(Value::Number(n)) => n.as_f64().map(|m| format!("{m:.2}")),
        other => parse_minutes(other.and_then(Value::as_str)),
    }
    .ok_or_else(|| {
        StatsError::decode(
            format!("game {}", row.game_id().unwrap_or_default()),
            format!("unparseable MIN {:?}", cell_text(player, "MIN")),
        )
    })?;

    let mut out = Vec::with_capacity(PLAYER_COLUMNS.len());
    out.push("1".to_string());
    out.push(starter_flag(player).to_string());
    out.push(is_host.to_string());
    out.push(position);
    out.push(BACK_TO_BACK_PLACEHOLDER.to_string());
    out.push(minutes);
    out.extend(PLAYER_STAT_KEYS.iter().map(|key| cell_text(player, key)));
    Ok(Some(out))
}

/// One output row for a season row, or `None` when the row is filtered out
/// because its opponent is the host (the same game seen from the guest side).
pub fn flatten_row(row: &SeasonRow, index: &PlayerSlotIndex) -> Result<Option<Vec<String>>> {
    let what = format!("game {}", row.game_id().unwrap_or_default());
    let matchup = require_str(&row.game, "MATCHUP", &what)?;
    let opponent = parse_opponent(matchup)
        .ok_or_else(|| StatsError::decode(&what, format!("unparseable MATCHUP {matchup:?}")))?;

    let host = &row.detail.host;
    let guest = &row.detail.guest;
    if row.detail.host_abbreviation() == Some(opponent) {
        return Ok(None);
    }

    let wl = if row.game.get("WL").and_then(|v| v.as_str()) == Some("W") {
        "1"
    } else {
        "0"
    };

    let mut out = Vec::with_capacity(row_width(index));
    out.push(opponent.to_string());
    out.push(cell_text(host, "TEAM_ABBREVIATION"));
    out.push(cell_text(&row.game, "GAME_DATE"));
    out.push(cell_text(host, "PTS"));
    out.push(cell_text(guest, "PTS"));
    out.push(wl.to_string());

    let start = out.len();
    out.resize(row_width(index), EMPTY_CELL.to_string());

    for player in &row.detail.player_stats {
        let Some(block) = player_block(player, row)? else {
            continue;
        };
        let name = require_str(player, "PLAYER_NAME", &what)?;
        let slot = index
            .slot(name)
            .ok_or_else(|| StatsError::UnknownPlayer(name.to_string()))?;
        let offset = start + slot * PLAYER_COLUMNS.len();
        out[offset..offset + PLAYER_COLUMNS.len()].clone_from_slice(&block);
    }
    Ok(Some(out))
}

pub fn write_table<W: Write>(rows: &[SeasonRow], index: &PlayerSlotIndex, sink: W) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b',')
        .quote(b'|')
        .quote_style(QuoteStyle::Necessary)
        .from_writer(sink);

    wtr.write_record(header(index))?;
    let mut written = 0usize;
    for row in rows {
        if let Some(record) = flatten_row(row, index)? {
            wtr.write_record(&record)?;
            written += 1;
        }
    }
    wtr.flush().map_err(|err| StatsError::io("csv output", err))?;
    Ok(written)
}

pub fn write_table_file(rows: &[SeasonRow], index: &PlayerSlotIndex, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StatsError::io(parent, err))?;
    }
    // Rendered in memory first: a row that fails to flatten leaves any
    // previous table on disk untouched.
    let mut buf = Vec::new();
    let written = write_table(rows, index, &mut buf)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, &buf).map_err(|err| StatsError::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| StatsError::io(path, err))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_minutes, parse_opponent, starter_flag};

    #[test]
    fn minutes_convert_to_fraction() {
        assert_eq!(parse_minutes(Some("34:30")).as_deref(), Some("34.50"));
        assert_eq!(parse_minutes(Some("33:46")).as_deref(), Some("33.77"));
        assert_eq!(parse_minutes(Some("0:05")).as_deref(), Some("0.08"));
        assert_eq!(parse_minutes(Some("34.000000:12")).as_deref(), Some("34.20"));
        assert_eq!(parse_minutes(Some("12")).as_deref(), Some("12.00"));
    }

    #[test]
    fn blank_minutes_are_zero() {
        assert_eq!(parse_minutes(Some("")).as_deref(), Some("0.00"));
        assert_eq!(parse_minutes(None).as_deref(), Some("0.00"));
        assert_eq!(parse_minutes(Some("DNP")), None);
    }

    #[test]
    fn opponent_is_trailing_token() {
        assert_eq!(parse_opponent("GSW vs. SAS"), Some("SAS"));
        assert_eq!(parse_opponent("SAS @ GSW"), Some("GSW"));
        assert_eq!(parse_opponent("SAS @ GSW "), Some("GSW "));
        assert_eq!(parse_opponent("SAS"), None);
        assert_eq!(parse_opponent(""), None);
    }

    #[test]
    fn starter_flag_follows_start_position() {
        let starter = json!({"START_POSITION": "G"});
        let bench = json!({"START_POSITION": ""});
        let missing = json!({"START_POSITION": null});
        assert_eq!(starter_flag(starter.as_object().unwrap()), "1");
        assert_eq!(starter_flag(bench.as_object().unwrap()), "0");
        assert_eq!(starter_flag(missing.as_object().unwrap()), "0");
    }
}

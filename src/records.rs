use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, StatsError};

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPayload {
    #[serde(rename = "resultSets", default)]
    pub result_sets: Vec<ResultSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub name: Option<String>,
    pub headers: Vec<String>,
    #[serde(rename = "rowSet")]
    pub rows: Vec<Vec<Value>>,
}

impl ApiPayload {
    pub fn decode(bytes: &[u8], what: &str) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| StatsError::Json {
            what: what.to_string(),
            source,
        })
    }

    pub fn from_value(value: &Value, what: &str) -> Result<Self> {
        Self::deserialize(value).map_err(|source| StatsError::Json {
            what: what.to_string(),
            source,
        })
    }

    pub fn result_set(&self, index: usize, what: &str) -> Result<&ResultSet> {
        self.result_sets.get(index).ok_or_else(|| {
            StatsError::decode(
                what,
                format!(
                    "expected result set #{index}, payload has {}",
                    self.result_sets.len()
                ),
            )
        })
    }
}

impl ResultSet {
    pub fn records(&self, what: &str) -> Result<Vec<Record>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                if row.len() != self.headers.len() {
                    return Err(StatsError::decode(
                        what,
                        format!(
                            "row {idx} has {} cells for {} headers",
                            row.len(),
                            self.headers.len()
                        ),
                    ));
                }
                let record: Record = self.headers.iter().cloned().zip(row.iter().cloned()).collect();
                Ok(record)
            })
            .collect()
    }
}

pub fn str_field<'a>(record: &'a Record, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

pub fn require_str<'a>(record: &'a Record, key: &str, what: &str) -> Result<&'a str> {
    str_field(record, key).ok_or_else(|| StatsError::decode(what, format!("missing {key}")))
}

pub fn cell_text(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn is_blank(record: &Record, key: &str) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiPayload, cell_text, is_blank};
    use crate::error::StatsError;

    #[test]
    fn records_zip_headers_positionally() {
        let raw = json!({
            "resultSets": [{
                "name": "LeagueGameLog",
                "headers": ["GAME_ID", "PTS", "WL"],
                "rowSet": [["0021600001", 100, "L"], ["0021600002", 98, null]]
            }]
        });
        let payload = ApiPayload::decode(raw.to_string().as_bytes(), "season").expect("decode");
        let rows = payload.result_set(0, "season").unwrap().records("season").unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(cell_text(&rows[0], "GAME_ID"), "0021600001");
        assert_eq!(cell_text(&rows[0], "PTS"), "100");
        assert_eq!(cell_text(&rows[1], "WL"), "");
    }

    #[test]
    fn width_mismatch_is_decode_error() {
        let raw = br#"{"resultSets":[{"headers":["A","B"],"rowSet":[["x"]]}]}"#;
        let payload = ApiPayload::decode(raw, "game").unwrap();
        let err = payload.result_set(0, "game").unwrap().records("game").unwrap_err();
        assert!(matches!(err, StatsError::Decode { .. }));
    }

    #[test]
    fn missing_result_set_and_bad_json() {
        let payload = ApiPayload::decode(br#"{"resultSets":[]}"#, "game").unwrap();
        assert!(matches!(
            payload.result_set(1, "game"),
            Err(StatsError::Decode { .. })
        ));
        assert!(matches!(
            ApiPayload::decode(b"{\"resultSets\": [", "game"),
            Err(StatsError::Json { .. })
        ));
    }

    #[test]
    fn float_cells_keep_json_text() {
        let rec = json!({"FG_PCT": 0.565, "FT_PCT": 1.0, "START_POSITION": ""});
        let rec = rec.as_object().unwrap();
        assert_eq!(cell_text(rec, "FG_PCT"), "0.565");
        assert_eq!(cell_text(rec, "FT_PCT"), "1.0");
        assert!(is_blank(rec, "START_POSITION"));
        assert!(is_blank(rec, "COMMENT"));
    }
}

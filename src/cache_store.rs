use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Season,
    Game,
}

impl Namespace {
    pub fn label(self) -> &'static str {
        match self {
            Namespace::Season => "season",
            Namespace::Game => "game",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    season_dir: PathBuf,
    game_dir: PathBuf,
}

impl CacheStore {
    pub fn new(season_dir: impl Into<PathBuf>, game_dir: impl Into<PathBuf>) -> Self {
        Self {
            season_dir: season_dir.into(),
            game_dir: game_dir.into(),
        }
    }

    pub fn dir(&self, namespace: Namespace) -> &Path {
        match namespace {
            Namespace::Season => &self.season_dir,
            Namespace::Game => &self.game_dir,
        }
    }

    pub fn path(&self, namespace: Namespace, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir(namespace).join(key))
    }

    pub fn exists(&self, namespace: Namespace, key: &str) -> bool {
        self.path(namespace, key).is_ok_and(|path| path.is_file())
    }

    pub fn read(&self, namespace: Namespace, key: &str) -> Result<Vec<u8>> {
        let path = self.path(namespace, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StatsError::NotFound {
                namespace,
                key: key.to_string(),
            }),
            Err(err) => Err(StatsError::io(path, err)),
        }
    }

    /// Overwrites any existing entry. The write lands in a sibling temp file
    /// first so readers never observe a partial entry.
    pub fn write(&self, namespace: Namespace, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(namespace, key)?;
        let dir = self.dir(namespace);
        fs::create_dir_all(dir).map_err(|err| StatsError::io(dir, err))?;

        let tmp = dir.join(format!("{key}.tmp"));
        fs::write(&tmp, bytes).map_err(|err| StatsError::io(&tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| StatsError::io(&path, err))?;
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let trimmed = key.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || key.contains("..")
        || key.contains(['/', '\\'])
    {
        return Err(StatsError::InvalidKey(key.to_string()));
    }
    Ok(())
}

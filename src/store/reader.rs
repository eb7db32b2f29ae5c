//! Season snapshot files.
//!
//! Two layouts are accepted: JSON Lines with one playlist object per line,
//! or a single JSON array of playlists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::StoreError;
use crate::models::{Playlist, Season};

/// Reads a season snapshot from disk.
pub struct SeasonReader {
    path: PathBuf,
}

impl SeasonReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every playlist. Players in each playlist are sorted by
    /// descending total points before the season is returned.
    pub fn read(&self) -> Result<Season, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::PathNotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut playlists = if contents.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Playlist>>(&contents)?
        } else {
            self.parse_lines(&contents)
        };

        for playlist in &mut playlists {
            playlist.sort_players();
        }

        debug!("Read {} playlists from {:?}", playlists.len(), self.path);
        Ok(Season::new(playlists))
    }

    fn parse_lines(&self, contents: &str) -> Vec<Playlist> {
        let mut playlists = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(playlist) => playlists.push(playlist),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        playlists
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_jsonl_skips_bad_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "season.jsonl",
            concat!(
                r#"{"name":"Tuesday Grind","date":"2025-03-04","length":8,"players":[{"name":"A","totalPoints":90}]}"#,
                "\n",
                "not json\n",
                "\n",
                r#"{"name":"Wednesday","date":"2025-03-05","length":6,"players":[]}"#,
                "\n",
            ),
        );

        let season = SeasonReader::new(path).read().unwrap();
        assert_eq!(season.len(), 2);
        assert_eq!(season.playlists[0].name, "Tuesday Grind");
        assert_eq!(season.playlists[1].length, 6);
    }

    #[test]
    fn test_read_json_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "season.json",
            r#"[
                {"name":"One","date":"2025-03-01","length":8,"players":[]},
                {"name":"Two","date":"2025-03-02","length":8,"players":[]}
            ]"#,
        );

        let season = SeasonReader::new(path).read().unwrap();
        assert_eq!(season.len(), 2);
    }

    #[test]
    fn test_read_sorts_players() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "season.jsonl",
            r#"{"name":"P","date":"2025-03-04","length":8,"players":[{"name":"low","totalPoints":10},{"name":"high","totalPoints":70,"lastEventPoints":15}]}"#,
        );

        let season = SeasonReader::new(path).read().unwrap();
        let players = &season.playlists[0].players;
        assert_eq!(players[0].name, "high");
        assert_eq!(players[0].last_event_points, Some(15.0));
        assert_eq!(players[1].name, "low");
    }

    #[test]
    fn test_read_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = SeasonReader::new(tmp.path().join("absent.jsonl"));

        assert!(matches!(reader.read(), Err(StoreError::PathNotFound(_))));
    }

    #[test]
    fn test_read_broken_array_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "season.json", "[{\"name\":");

        assert!(matches!(
            SeasonReader::new(path).read(),
            Err(StoreError::Json(_))
        ));
    }
}

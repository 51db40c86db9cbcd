// src/data/metadata.rs
//! Video metadata: uploading channel and music genres.
//!
//! Input is one JSON object per line, as returned by the video API:
//! `{"id": "...", "snippet": {"channelId": "..."}, "topics": ["Pop_music", ...]}`.
//! Only videos present in the view table are kept.

use std::path::Path;

use serde::Deserialize;

use super::views::ViewTable;
use crate::error::{RecnetError, Result};
use crate::graph::persistent::ContentLookup;
use crate::graph::types::NodeId;

/// Genres counted when comparing videos; other topics are ignored.
pub const GENRES: [&str; 8] = [
    "Pop_music",
    "Rock_music",
    "Hip_hop_music",
    "Independent_music",
    "Country_music",
    "Electronic_music",
    "Soul_music",
    "Others",
];

#[derive(Debug, Deserialize)]
struct VideoLine {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "channelId")]
    channel_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct VideoContent {
    channel_id: String,
    genres: Vec<String>,
}

/// Channel and genres per node id.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    content: Vec<Option<VideoContent>>,
    unknown: usize,
}

impl MetadataTable {
    /// Reads and parses a metadata file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, or a parse error.
    pub fn load(path: &Path, views: &ViewTable) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RecnetError::io(e, path))?;
        let table = Self::parse(&content, views)?;
        tracing::info!(
            path = %path.display(),
            videos = table.known(),
            untracked = table.unknown,
            "video metadata loaded"
        );
        Ok(table)
    }

    /// Parses metadata lines against the node ids of `views`.
    ///
    /// # Errors
    /// Returns `DataIntegrity` naming the first unparsable line.
    pub fn parse(content: &str, views: &ViewTable) -> Result<Self> {
        let mut table = Self {
            content: vec![None; views.len()],
            unknown: 0,
        };

        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let video: VideoLine = serde_json::from_str(line)
                .map_err(|e| RecnetError::integrity(format!("metadata line {}: {e}", lineno + 1)))?;
            let Some(slot) = views
                .node_of(&video.id)
                .and_then(|node| table.content.get_mut(node as usize))
            else {
                table.unknown += 1;
                continue;
            };
            let genres = video
                .topics
                .into_iter()
                .filter(|t| GENRES.contains(&t.as_str()))
                .collect();
            *slot = Some(VideoContent {
                channel_id: video.snippet.channel_id,
                genres,
            });
        }
        Ok(table)
    }

    /// Number of nodes with metadata.
    #[must_use]
    pub fn known(&self) -> usize {
        self.content.iter().flatten().count()
    }

    fn get(&self, node: NodeId) -> Option<&VideoContent> {
        self.content.get(node as usize).and_then(Option::as_ref)
    }
}

impl ContentLookup for MetadataTable {
    fn channel(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|c| c.channel_id.as_str())
    }

    fn genres(&self, node: NodeId) -> &[String] {
        self.get(node).map(|c| c.genres.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> ViewTable {
        ViewTable::parse("0\ta\t1\t1\n1\tb\t1\t1\n2\tc\t1\t1\n").unwrap()
    }

    #[test]
    fn test_parse_keeps_tracked_videos_and_known_genres() {
        let content = concat!(
            "{\"id\":\"b\",\"snippet\":{\"channelId\":\"UC1\"},\"topics\":[\"Pop_music\",\"Music\"]}\n",
            "{\"id\":\"zz\",\"snippet\":{\"channelId\":\"UC9\"}}\n",
            "{\"id\":\"a\",\"snippet\":{\"channelId\":\"UC1\"}}\n",
        );
        let table = MetadataTable::parse(content, &views()).unwrap();

        assert_eq!(table.known(), 2);
        assert_eq!(table.channel(1), Some("UC1"));
        assert_eq!(table.genres(1), ["Pop_music".to_string()]);
        assert!(table.genres(0).is_empty());
        assert_eq!(table.channel(2), None);
        assert_eq!(table.unknown, 1);
    }

    #[test]
    fn test_bad_line_names_line_number() {
        let err = MetadataTable::parse("{\"id\":\"a\"}\n", &views()).unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }
}

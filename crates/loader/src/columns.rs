//! CSV header to canonical column mapping.
//!
//! Exports name their columns differently. [`ALIAS_SETS`] lists the known
//! layouts in priority order; the first set whose every alias is present
//! in the header row wins. Matching ignores case and surrounding spaces.

use crate::error::LoadError;

/// One known CSV layout: the source header for each canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasSet {
    pub name: &'static str,
    pub track_name: &'static str,
    pub artist: &'static str,
    pub album: &'static str,
    pub danceability: &'static str,
    pub tempo: &'static str,
}

/// Known layouts, tried in order.
///
/// Every pairing of `track_name`/`name`, `artists`/`artist` and
/// `album_name`/`album` appears once; named exports come first.
pub const ALIAS_SETS: &[AliasSet] = &[
    AliasSet {
        name: "spotify-tracks-dataset",
        track_name: "track_name",
        artist: "artists",
        album: "album_name",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "spotify-web-api",
        track_name: "name",
        artist: "artists",
        album: "album",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "canonical",
        track_name: "track_name",
        artist: "artist",
        album: "album",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "name-artist-album_name",
        track_name: "name",
        artist: "artist",
        album: "album_name",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "name-artist-album",
        track_name: "name",
        artist: "artist",
        album: "album",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "track_name-artists-album",
        track_name: "track_name",
        artist: "artists",
        album: "album",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "track_name-artist-album_name",
        track_name: "track_name",
        artist: "artist",
        album: "album_name",
        danceability: "danceability",
        tempo: "tempo",
    },
    AliasSet {
        name: "name-artists-album_name",
        track_name: "name",
        artist: "artists",
        album: "album_name",
        danceability: "danceability",
        tempo: "tempo",
    },
];

/// Record positions of the canonical fields for one CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Name of the [`AliasSet`] that matched.
    pub alias_set: &'static str,
    pub track_name: usize,
    pub artist: usize,
    pub album: usize,
    pub danceability: usize,
    pub tempo: usize,
}

/// Whether a header names an anonymous leading index column, as written
/// by dataframe exports (`""`, `Unnamed: 0`).
pub fn is_index_column(header: &str) -> bool {
    let header = header.trim();
    header.is_empty()
        || header
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("unnamed"))
}

/// Resolve `headers` against [`ALIAS_SETS`].
///
/// A leading anonymous index column is ignored. Fails with
/// [`LoadError::ColumnMapping`] if no set is fully satisfied.
pub fn resolve_columns(headers: &[&str]) -> Result<ColumnMap, LoadError> {
    let skip = usize::from(headers.first().is_some_and(|h| is_index_column(h)));
    let position = |alias: &str| {
        headers
            .iter()
            .enumerate()
            .skip(skip)
            .find(|(_, header)| header.trim().eq_ignore_ascii_case(alias))
            .map(|(index, _)| index)
    };

    for set in ALIAS_SETS {
        let resolved = (|| {
            Some(ColumnMap {
                alias_set: set.name,
                track_name: position(set.track_name)?,
                artist: position(set.artist)?,
                album: position(set.album)?,
                danceability: position(set.danceability)?,
                tempo: position(set.tempo)?,
            })
        })();

        if let Some(map) = resolved {
            return Ok(map);
        }
    }

    Err(LoadError::ColumnMapping {
        found: headers.join(", "),
        expected: describe_alias_sets(),
    })
}

fn describe_alias_sets() -> String {
    ALIAS_SETS
        .iter()
        .map(|s| {
            format!(
                "{} ({}, {}, {}, {}, {})",
                s.name, s.track_name, s.artist, s.album, s.danceability, s.tempo
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

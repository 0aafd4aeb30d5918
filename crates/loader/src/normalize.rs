//! Per-record cleanup: trimming, primary-artist extraction, numeric
//! coercion and in-file duplicate merging.

use std::collections::HashMap;

use csv::StringRecord;
use trackstat_db::models::track::NewTrack;

use crate::columns::ColumnMap;

/// Characters stripped from both ends of an artist value.
const ARTIST_WRAPPERS: &[char] = &['[', ']', '\'', '"'];

/// Convert one CSV record into a [`NewTrack`].
///
/// Returns `None` when the track name or primary artist is missing after
/// cleanup; such rows are dropped.
pub fn normalize_record(map: &ColumnMap, record: &StringRecord) -> Option<NewTrack> {
    let field = |index: usize| record.get(index).unwrap_or("");

    let track_name = field(map.track_name).trim();
    if is_missing(track_name) {
        return None;
    }
    let artist = normalize_artist(field(map.artist))?;

    let album = field(map.album).trim();
    let album = (!is_missing(album)).then(|| album.to_string());

    Some(NewTrack {
        track_name: track_name.to_string(),
        artist,
        album,
        danceability: parse_feature(field(map.danceability)),
        tempo: parse_feature(field(map.tempo)),
    })
}

/// Reduce a raw artist value to its primary artist.
///
/// Handles plain names, `;`/`,`-separated lists and stringified Python
/// lists such as `['Drake', 'Rihanna']`.
pub fn normalize_artist(raw: &str) -> Option<String> {
    let inner = raw.trim().trim_matches(ARTIST_WRAPPERS);
    let first = inner.split([',', ';']).next().unwrap_or("");
    let artist = first.trim().trim_matches(ARTIST_WRAPPERS).trim();

    (!is_missing(artist)).then(|| artist.to_string())
}

/// Empty or a pandas-style `nan` marker.
fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("nan")
}

/// Parse a numeric feature. Unparseable or non-finite values become `None`.
pub fn parse_feature(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Collapse rows sharing a natural key, keeping the last occurrence's
/// values at the first occurrence's position.
///
/// Returns the merged rows and how many rows were folded away.
pub fn merge_duplicates(rows: Vec<NewTrack>) -> (Vec<NewTrack>, usize) {
    let total = rows.len();
    let mut positions: HashMap<(String, String, Option<String>), usize> = HashMap::new();
    let mut merged: Vec<NewTrack> = Vec::with_capacity(total);

    for row in rows {
        let key = (
            row.track_name.clone(),
            row.artist.clone(),
            row.album.clone(),
        );
        match positions.get(&key) {
            Some(&index) => merged[index] = row,
            None => {
                positions.insert(key, merged.len());
                merged.push(row);
            }
        }
    }

    let folded = total - merged.len();
    (merged, folded)
}

//! Song structure: order table and per-track patterns.

use alloc::string::String;
use arrayvec::ArrayVec;

use crate::chip::MAX_CHANNELS;
use crate::gap_list::{AllocError, GapList};
use crate::pattern::{Pattern, PatternRow};

/// One order-table row: a pattern id per track.
pub type OrderRow = ArrayVec<u8, MAX_CHANNELS>;

/// The patterns of one track, indexed by pattern id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    pub patterns: GapList<Pattern>,
}

/// One independently playable song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    /// Song title
    pub title: String,
    /// Rows in every pattern of this song (1-256)
    pub rows_per_pattern: u16,
    /// Initial speed (ticks per row)
    pub speed: u8,
    /// Initial tempo
    pub tempo: u8,
    /// Order table, one row per play position
    pub order: GapList<OrderRow>,
    /// Per-track pattern pools
    pub tracks: GapList<Track>,
    limit: usize,
}

impl Song {
    /// Create a song with `track_count` empty tracks.
    ///
    /// `limit` caps every container the song allocates.
    pub fn new(
        title: &str,
        track_count: usize,
        rows_per_pattern: u16,
        speed: u8,
        tempo: u8,
        limit: usize,
    ) -> Result<Self, AllocError> {
        let mut tracks = GapList::with_limit(limit);
        for _ in 0..track_count {
            tracks.push(Track {
                patterns: GapList::with_limit(limit),
            })?;
        }
        Ok(Self {
            title: String::from(title),
            rows_per_pattern,
            speed,
            tempo,
            order: GapList::with_limit(limit),
            tracks,
            limit,
        })
    }

    /// Number of tracks; also the width of every order row.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get a pattern if it has been allocated.
    pub fn pattern(&self, track: usize, pattern: u8) -> Option<&Pattern> {
        self.tracks.get(track)?.patterns.get(pattern as usize)
    }

    /// Get a pattern for writing, allocating it and every lower-numbered
    /// pattern on the track as blank patterns first.
    ///
    /// Returns `Ok(None)` if `track` is out of range.
    pub fn pattern_mut(
        &mut self,
        track: usize,
        pattern: u8,
    ) -> Result<Option<&mut Pattern>, AllocError> {
        let rows = self.rows_per_pattern as usize;
        let limit = self.limit;
        let Some(track) = self.tracks.get_mut(track) else {
            return Ok(None);
        };
        let index = pattern as usize;
        if track.patterns.len() <= index {
            let blank = Pattern::blank(rows, limit)?;
            track.patterns.fill_to(index + 1, &blank)?;
        }
        Ok(track.patterns.get_mut(index))
    }

    /// Get a row of an allocated pattern.
    pub fn row(&self, track: usize, pattern: u8, row: usize) -> Option<&PatternRow> {
        self.pattern(track, pattern)?.row(row)
    }

    /// Append an order row, allocating every pattern it references.
    pub fn push_order(&mut self, row: OrderRow) -> Result<(), AllocError> {
        for (track, &pattern) in row.iter().enumerate() {
            self.pattern_mut(track, pattern)?;
        }
        self.order.push(row)?;
        Ok(())
    }

    /// Number of allocated patterns on the busiest track.
    pub fn pattern_count(&self) -> usize {
        self.tracks.iter().map(|t| t.patterns.len()).max().unwrap_or(0)
    }
}

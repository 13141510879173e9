use std::sync::Arc;

use crate::error::TmxError;
use crate::resolve::tileset::{ResolvedTile, ResolvedTileset};

/// Bits 29..31 of a GID carry the flip flags.
pub const GID_INDEX_MASK: u32 = 0x1FFF_FFFF;

/// Where a global tile index points: a tile of one of the map's tilesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRef {
    pub tileset: usize,
    pub local_id: u32,
}

/// Frozen GID → tile lookup for one map.
///
/// Index 0 is always empty. Gaps between tilesets and image-collection
/// placeholders are empty too.
#[derive(Debug, Clone)]
pub struct GidTable {
    tilesets: Vec<Arc<ResolvedTileset>>,
    first_gids: Vec<u32>,
    entries: Vec<Option<TileRef>>,
}

impl GidTable {
    pub fn builder() -> GidTableBuilder {
        GidTableBuilder::default()
    }

    /// Number of slots including index 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn tilesets(&self) -> &[Arc<ResolvedTileset>] {
        &self.tilesets
    }

    pub fn first_gid(&self, tileset: usize) -> Option<u32> {
        self.first_gids.get(tileset).copied()
    }

    /// Look up an index that has already been masked.
    pub fn entry(&self, index: u32) -> Option<TileRef> {
        self.entries.get(index as usize).copied().flatten()
    }

    /// Look up a raw GID, ignoring its flip bits.
    ///
    /// `Ok(None)` for 0 and placeholders, `CorruptData` past the end of the table.
    pub fn resolve(&self, gid: u32) -> Result<Option<&ResolvedTile>, TmxError> {
        let index = gid & GID_INDEX_MASK;
        if index as usize >= self.entries.len() {
            return Err(TmxError::CorruptData(format!(
                "GID {index} is outside the {} entries of the tile table",
                self.entries.len()
            )));
        }
        Ok(self.tile(index))
    }

    pub fn tile(&self, index: u32) -> Option<&ResolvedTile> {
        let tile_ref = self.entry(index)?;
        self.tilesets[tile_ref.tileset].tile(tile_ref.local_id)
    }

    /// Whether `index` falls in the table but names no tile.
    pub fn is_placeholder(&self, index: u32) -> bool {
        index != 0 && (index as usize) < self.entries.len() && self.entry(index).is_none()
    }
}

/// Appends tilesets in declaration order, then freezes into a [`GidTable`].
#[derive(Debug)]
pub struct GidTableBuilder {
    tilesets: Vec<Arc<ResolvedTileset>>,
    first_gids: Vec<u32>,
    entries: Vec<Option<TileRef>>,
}

impl Default for GidTableBuilder {
    fn default() -> Self {
        Self {
            tilesets: Vec::new(),
            first_gids: Vec::new(),
            entries: vec![None],
        }
    }
}

impl GidTableBuilder {
    /// Insert every tile of `tileset` starting at `first_gid`.
    ///
    /// `first_gid` must lie at or past the end of the previous tileset; any
    /// gap in between is padded with empty slots.
    pub fn push_tileset(
        &mut self,
        first_gid: u32,
        tileset: Arc<ResolvedTileset>,
    ) -> Result<&mut Self, TmxError> {
        if first_gid == 0 || (first_gid as usize) < self.entries.len() {
            return Err(TmxError::MalformedDocument(format!(
                "tileset '{}' starts at firstgid {first_gid}, overlapping GIDs below {}",
                tileset.name,
                self.entries.len()
            )));
        }
        let end = u64::from(first_gid) + u64::from(tileset.tile_count());
        if end > u64::from(GID_INDEX_MASK) + 1 {
            return Err(TmxError::MalformedDocument(format!(
                "tileset '{}' exceeds the 29-bit GID range",
                tileset.name
            )));
        }

        let index = self.tilesets.len();
        self.entries.resize(first_gid as usize, None);
        self.entries
            .extend(tileset.tiles.iter().enumerate().map(|(local_id, tile)| {
                tile.as_ref().map(|_| TileRef {
                    tileset: index,
                    local_id: local_id as u32,
                })
            }));
        self.first_gids.push(first_gid);
        self.tilesets.push(tileset);
        Ok(self)
    }

    pub fn build(self) -> GidTable {
        GidTable {
            tilesets: self.tilesets,
            first_gids: self.first_gids,
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::{URect, UVec2, Vec2};

    use super::*;
    use crate::resolve::tileset::{TileSprite, TilesetKind};
    use crate::source::TextureKey;

    fn tileset(name: &str, count: u32, gaps: &[u32]) -> Arc<ResolvedTileset> {
        let tiles = (0..count)
            .map(|id| {
                (!gaps.contains(&id)).then(|| ResolvedTile {
                    id,
                    sprite: TileSprite {
                        texture: TextureKey {
                            path: format!("{name}.png").into(),
                            transparent_color: None,
                        },
                        texture_size: UVec2::splat(16),
                        rect: URect::new(0, 0, 16, 16),
                        pivot: Vec2::splat(0.5),
                    },
                    type_name: None,
                    collision: Vec::new(),
                    animation: Vec::new(),
                    properties: Vec::new(),
                })
            })
            .collect();
        Arc::new(ResolvedTileset {
            name: name.into(),
            tile_size: UVec2::splat(16),
            columns: count,
            rows: 1,
            pivot: Vec2::splat(0.5),
            kind: TilesetKind::Collection,
            tiles,
            properties: Vec::new(),
        })
    }

    #[test]
    fn test_two_tilesets_with_gap() {
        let mut builder = GidTable::builder();
        builder.push_tileset(1, tileset("a", 5, &[])).unwrap();
        builder.push_tileset(10, tileset("b", 3, &[])).unwrap();
        let table = builder.build();

        assert_eq!(table.len(), 13);
        assert!(table.entry(0).is_none());
        for index in 1..=5 {
            assert_eq!(table.entry(index).unwrap().tileset, 0);
        }
        for index in 6..=9 {
            assert!(table.is_placeholder(index), "index {index}");
        }
        assert_eq!(
            table.entry(12),
            Some(TileRef {
                tileset: 1,
                local_id: 2
            })
        );
        assert_eq!(table.first_gid(1), Some(10));
    }

    #[test]
    fn test_resolve_masks_flip_bits() {
        let mut builder = GidTable::builder();
        builder.push_tileset(1, tileset("a", 5, &[])).unwrap();
        let table = builder.build();

        let tile = table.resolve(0xA000_0005).unwrap().unwrap();
        assert_eq!(tile.id, 4);
        assert!(table.resolve(0).unwrap().is_none());
        assert!(matches!(
            table.resolve(0x8000_0006),
            Err(TmxError::CorruptData(_))
        ));
    }

    #[test]
    fn test_collection_placeholders_stay_empty() {
        let mut builder = GidTable::builder();
        builder.push_tileset(1, tileset("c", 4, &[1, 2])).unwrap();
        let table = builder.build();

        assert_eq!(table.len(), 5);
        assert!(table.tile(1).is_some());
        assert!(table.is_placeholder(2));
        assert!(table.is_placeholder(3));
        assert!(table.resolve(3).unwrap().is_none());
        assert!(table.tile(4).is_some());
    }

    #[test]
    fn test_overlapping_first_gid_is_rejected() {
        let mut builder = GidTable::builder();
        builder.push_tileset(1, tileset("a", 5, &[])).unwrap();
        assert!(matches!(
            builder.push_tileset(4, tileset("b", 2, &[])),
            Err(TmxError::MalformedDocument(_))
        ));
        assert!(matches!(
            GidTable::builder().push_tileset(0, tileset("z", 1, &[])),
            Err(TmxError::MalformedDocument(_))
        ));
    }
}

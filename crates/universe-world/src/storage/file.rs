//! Durable edit store backed by one file per world seed.
//!
//! File layout: 4-byte magic, 1-byte format version, then a bincode-encoded
//! list of [`StoredChunk`]s ordered by chunk X. The whole file is rewritten on
//! every save through a temp file and a rename, so a crash leaves either the
//! old or the new contents on disk, never a mix.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crossbeam::channel::Receiver;
use parking_lot::RwLock;
use tracing::{debug, trace};
use universe_core::types::Tile;
use universe_core::{Error, Result};

use super::{ensure_storable, EditStore, StoredChunk, Subscribers, TileChanged, TileOverride};
use crate::WorldSeed;

/// Leading bytes of every edit file.
pub const FILE_MAGIC: [u8; 4] = *b"UVED";

/// Format version for compatibility checking.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = FILE_MAGIC.len() + 1;

/// Edit store persisted to `<dir>/uni-verse-<seed>.bin`.
#[derive(Debug)]
pub struct FileEditStore {
    path: PathBuf,
    chunks: RwLock<BTreeMap<i32, StoredChunk>>,
    subscribers: Subscribers,
}

impl FileEditStore {
    /// Open (or start) the edit file for `seed` inside `dir`.
    pub fn open(dir: impl AsRef<Path>, seed: WorldSeed) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(seed));

        let chunks = if path.exists() {
            let chunks = decode(&fs::read(&path)?)?;
            debug!(path = %path.display(), chunks = chunks.len(), "loaded edit file");
            chunks
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            chunks: RwLock::new(chunks),
            subscribers: Subscribers::default(),
        })
    }

    /// File name used for a world seed.
    pub fn file_name(seed: WorldSeed) -> String {
        format!("uni-verse-{seed}.bin")
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, chunks: &BTreeMap<i32, StoredChunk>) -> Result<()> {
        let bytes = encode(chunks)?;
        let tmp = self.path.with_extension("bin.tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EditStore for FileEditStore {
    fn get_chunk(&self, chunk_x: i32) -> Result<Option<StoredChunk>> {
        Ok(self.chunks.read().get(&chunk_x).cloned())
    }

    fn save_tile(&self, chunk_x: i32, x: u32, y: u32, tile: Tile) -> Result<()> {
        ensure_storable(tile)?;
        {
            let mut chunks = self.chunks.write();
            let previous = chunks.get(&chunk_x).cloned();
            let mut updated = previous
                .clone()
                .unwrap_or_else(|| StoredChunk::new(chunk_x));
            updated.upsert(TileOverride::new(x, y, tile));
            chunks.insert(chunk_x, updated);

            if let Err(err) = self.write_atomic(&chunks) {
                match previous {
                    Some(previous) => chunks.insert(chunk_x, previous),
                    None => chunks.remove(&chunk_x),
                };
                return Err(Error::Storage(format!(
                    "failed to write {}: {err}",
                    self.path.display()
                )));
            }
        }
        trace!(chunk_x, x, y, kind = tile.kind.name(), "committed tile override");

        self.subscribers.publish(TileChanged {
            chunk_x,
            x,
            y,
            tile,
        });
        Ok(())
    }

    fn subscribe(&self) -> Receiver<TileChanged> {
        self.subscribers.subscribe()
    }
}

fn encode(chunks: &BTreeMap<i32, StoredChunk>) -> Result<Vec<u8>> {
    let list: Vec<&StoredChunk> = chunks.values().collect();
    let data = bincode::serialize(&list).map_err(|e| Error::Serialization(e.to_string()))?;
    let mut result = Vec::with_capacity(HEADER_LEN + data.len());
    result.extend_from_slice(&FILE_MAGIC);
    result.push(FORMAT_VERSION);
    result.extend(data);
    Ok(result)
}

fn decode(bytes: &[u8]) -> Result<BTreeMap<i32, StoredChunk>> {
    if bytes.len() < HEADER_LEN || bytes[..FILE_MAGIC.len()] != FILE_MAGIC {
        return Err(Error::InvalidData("not a universe edit file".into()));
    }
    let version = bytes[FILE_MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(Error::InvalidData(format!(
            "unsupported edit file version {version}, expected {FORMAT_VERSION}"
        )));
    }
    let list: Vec<StoredChunk> = bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(list.into_iter().map(|chunk| (chunk.x, chunk)).collect())
}

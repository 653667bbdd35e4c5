use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::memory::Bus;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot open image {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("image has no origin word ({len} byte(s))")]
    MissingOrigin { len: usize },
}

/// Where an image landed and how many words followed the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub origin: u16,
    pub words: usize,
}

/// Load a big-endian image: one origin word, then the words to place there.
/// A trailing odd byte is ignored. Later loads may overwrite earlier ones.
pub fn load_image<B: Bus>(bus: &mut B, bytes: &[u8]) -> Result<LoadedImage, LoadError> {
    let mut words = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    let origin = words
        .next()
        .ok_or(LoadError::MissingOrigin { len: bytes.len() })?;

    let mut addr = origin;
    let mut count = 0usize;
    for w in words {
        bus.write(addr, w);
        addr = addr.wrapping_add(1);
        count += 1;
    }

    debug!("loaded {count} word(s) at {origin:#06x}");
    Ok(LoadedImage {
        origin,
        words: count,
    })
}

pub fn load_image_file<B: Bus>(bus: &mut B, path: &Path) -> Result<LoadedImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_image(bus, &bytes)
}

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::warn;

use crate::{assets::decode, beat::model::Project};

/// Decoded straight-alpha RGBA8 image, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes (`width * height * 4`).
    pub rgba8: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Opaque neutral placeholder substituted for images that fail to load.
    pub fn placeholder() -> Self {
        const SIDE: u32 = 8;
        let px = (SIDE * SIDE) as usize;
        let mut rgba8 = Vec::with_capacity(px * 4);
        for _ in 0..px {
            rgba8.extend_from_slice(&[24, 26, 34, 255]);
        }
        Self {
            width: SIDE,
            height: SIDE,
            rgba8: Arc::new(rgba8),
        }
    }
}

/// Pre-decoded B-roll images keyed by source path.
///
/// All IO and decoding is front-loaded here so the per-frame compositing
/// path stays deterministic and IO-free. Preparation fails soft per image:
/// a source that cannot be read or decoded is logged and replaced with an
/// opaque placeholder, and never aborts the export.
#[derive(Clone, Debug, Default)]
pub struct OverlayStore {
    images: HashMap<String, PreparedImage>,
}

impl OverlayStore {
    /// Prepare every unique B-roll image referenced by enabled beats of
    /// `project`, resolving relative sources against `root`.
    pub fn prepare(project: &Project, root: impl Into<PathBuf>) -> Self {
        let sources: Vec<String> = project
            .timeline
            .referenced_images()
            .into_iter()
            .map(str::to_owned)
            .collect();
        Self::prepare_sources(&sources, root)
    }

    /// Prepare an explicit list of image sources.
    pub fn prepare_sources(sources: &[String], root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut images = HashMap::with_capacity(sources.len());
        for source in sources {
            if images.contains_key(source) {
                continue;
            }
            let prepared = match load_one(&root, source) {
                Ok(img) => img,
                Err(err) => {
                    warn!(source, %err, "B-roll image failed to load; using placeholder");
                    PreparedImage::placeholder()
                }
            };
            images.insert(source.clone(), prepared);
        }
        Self { images }
    }

    /// Insert an already-decoded image under `source`, replacing any
    /// previous entry. Used for images that arrive as bytes (generated
    /// B-roll) rather than files.
    pub fn insert(&mut self, source: impl Into<String>, image: PreparedImage) {
        self.images.insert(source.into(), image);
    }

    /// Look up a prepared image by its source path.
    pub fn get(&self, source: &str) -> Option<&PreparedImage> {
        self.images.get(source)
    }

    /// Number of prepared entries (placeholders included).
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn load_one(root: &Path, source: &str) -> crate::foundation::error::ReelResult<PreparedImage> {
    use anyhow::Context as _;
    let path = root.join(source);
    let bytes =
        std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
    decode::decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

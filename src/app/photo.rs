//! Photo proofs attached to cells
//!
//! Photos are opaque encoded blobs. Capturing, decoding and compressing them
//! is the image provider's business; the game only keeps the bytes keyed by
//! cell index.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Encoded image data as produced by an image provider
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Where the image can be loaded again, if the provider knows
    pub source: Option<PathBuf>,
}

impl PhotoBlob {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for PhotoBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoBlob")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture cancelled")]
    Cancelled,
    #[error("No image available for cell {0}")]
    NoImage(usize),
    #[error("Failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Captured image is empty")]
    Empty,
}

/// Produces a photo for a cell (camera, file picker, ...)
pub trait ImageProvider {
    /// Captures or selects a photo proving the challenge at `index`
    ///
    /// # Errors
    /// Any failure to produce an image; the cell stays incomplete.
    fn capture(&mut self, index: usize) -> Result<PhotoBlob, CaptureError>;
}

/// Image provider backed by files on disk, one path per cell
#[derive(Debug, Clone, Default)]
pub struct FileImageProvider {
    paths: BTreeMap<usize, PathBuf>,
}

impl FileImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, path: impl Into<PathBuf>) {
        self.paths.insert(index, path.into());
    }

    /// Cells that have a file assigned, in ascending order
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.paths.keys().copied()
    }
}

impl<P: Into<PathBuf>> Extend<(usize, P)> for FileImageProvider {
    fn extend<I: IntoIterator<Item = (usize, P)>>(&mut self, iter: I) {
        for (index, path) in iter {
            self.insert(index, path);
        }
    }
}

impl ImageProvider for FileImageProvider {
    fn capture(&mut self, index: usize) -> Result<PhotoBlob, CaptureError> {
        let path = self.paths.get(&index).ok_or(CaptureError::NoImage(index))?;
        let bytes = fs::read(path).map_err(|source| CaptureError::Io {
            path: path.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(PhotoBlob::new(mime_for(path), bytes).with_source(path))
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Photos attached to cells of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoAlbum {
    photos: BTreeMap<usize, PhotoBlob>,
}

impl PhotoAlbum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, photo: PhotoBlob) -> Option<PhotoBlob> {
        self.photos.insert(index, photo)
    }

    pub fn remove(&mut self, index: usize) -> Option<PhotoBlob> {
        self.photos.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&PhotoBlob> {
        self.photos.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.photos.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Cells whose photo can be reloaded, with the path to reload it from
    pub fn sources(&self) -> BTreeMap<usize, PathBuf> {
        self.photos
            .iter()
            .filter_map(|(&index, photo)| photo.source.clone().map(|path| (index, path)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(mime_for(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("b.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("c")), "application/octet-stream");
    }

    #[test]
    fn file_provider_without_path_fails() {
        let mut provider = FileImageProvider::new();
        assert!(matches!(provider.capture(3), Err(CaptureError::NoImage(3))));
    }

    #[test]
    fn file_provider_reads_bytes() {
        let path = std::env::temp_dir().join(format!("photo_bingo_proof_{}.jpg", std::process::id()));
        fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let mut provider = FileImageProvider::new();
        provider.insert(0, &path);
        let blob = provider.capture(0).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(blob.mime_type, "image/jpeg");
        assert_eq!(blob.len(), 3);
        assert_eq!(blob.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn album_insert_and_remove() {
        let mut album = PhotoAlbum::new();
        assert!(album.insert(2, PhotoBlob::new("image/png", vec![1])).is_none());
        assert!(album.contains(2));
        assert_eq!(album.len(), 1);
        assert!(album.remove(2).is_some());
        assert!(album.is_empty());
    }

    #[test]
    fn album_sources_skip_unsourced_photos() {
        let mut album = PhotoAlbum::new();
        album.insert(0, PhotoBlob::new("image/png", vec![1]));
        album.insert(5, PhotoBlob::new("image/jpeg", vec![1]).with_source("shots/dog.jpg"));
        assert_eq!(album.sources(), BTreeMap::from([(5, PathBuf::from("shots/dog.jpg"))]));
    }

    #[test]
    fn blob_debug_hides_bytes() {
        let blob = PhotoBlob::new("image/png", vec![0; 1024]);
        assert_eq!(
            format!("{blob:?}"),
            "PhotoBlob { mime_type: \"image/png\", len: 1024, source: None }"
        );
    }
}

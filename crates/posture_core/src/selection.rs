use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The image the user picked. Cloning shares the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl SelectedImage {
    /// Read a local file; the MIME type follows its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("cannot read image: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name);
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Produces the on-screen preview for a selection.
///
/// The preview is released by dropping it, so whoever holds the value owns the
/// resource.
pub trait PreviewFactory {
    type Preview;

    fn create(&mut self, image: &SelectedImage) -> Result<Self::Preview>;
}

struct Selection<P> {
    image: SelectedImage,
    preview: Option<P>,
}

/// Holds at most one selected image together with its preview.
pub struct SelectionStage<F: PreviewFactory> {
    factory: F,
    current: Option<Selection<F::Preview>>,
}

impl<F: PreviewFactory> SelectionStage<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            current: None,
        }
    }

    /// Replace the selection. The previous preview is released before the new
    /// one is created; `None` clears the selection.
    pub fn select(&mut self, input: Option<SelectedImage>) {
        drop(self.current.take());

        let Some(image) = input else {
            return;
        };
        let preview = match self.factory.create(&image) {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!("No preview for {}: {e:#}", image.name());
                None
            }
        };
        self.current = Some(Selection { image, preview });
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.current.as_ref().map(|s| &s.image)
    }

    pub fn preview(&self) -> Option<&F::Preview> {
        self.current.as_ref().and_then(|s| s.preview.as_ref())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn from_path_reads_bytes_and_name() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("frame.PNG");
        fs::write(&path, [1u8, 2, 3])?;

        let image = SelectedImage::from_path(&path)?;
        assert_eq!(image.name(), "frame.PNG");
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.bytes(), &[1, 2, 3]);
        Ok(())
    }

    #[test]
    fn from_path_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(SelectedImage::from_path(dir.path().join("nope.jpg")).is_err());
    }

    #[rstest]
    #[case("a.jpg", "image/jpeg")]
    #[case("a.JPEG", "image/jpeg")]
    #[case("a.webp", "image/webp")]
    #[case("a.tiff", "image/tiff")]
    #[case("icon.ico", "image/x-icon")]
    #[case("pose.svg", "image/svg+xml")]
    #[case("notes.txt", "text/plain")]
    #[case("noext", "application/octet-stream")]
    fn mime_follows_extension(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(mime_for_name(name), expected);
    }

    #[rstest]
    #[case("shot.avif")]
    #[case("shot.ico")]
    #[case("pose.svg")]
    #[case("frame.JPG")]
    fn less_common_images_upload_as_images(#[case] name: &str) {
        let image = SelectedImage::from_bytes(name, vec![0u8; 4]);
        assert!(image.mime().starts_with("image/"), "{name}: {}", image.mime());
    }

    #[test]
    fn reselection_releases_previous_preview_once() {
        let counters = Counters::default();
        let mut stage = SelectionStage::new(CountingFactory::new(counters.clone()));

        stage.select(Some(image("a.jpg")));
        stage.select(Some(image("b.jpg")));
        stage.select(Some(image("c.jpg")));

        assert_eq!(counters.acquired.get(), 3);
        assert_eq!(counters.released.get(), 2);
        assert_eq!(stage.preview().map(|p| p.name.as_str()), Some("c.jpg"));
        assert_eq!(stage.image().map(|i| i.name()), Some("c.jpg"));
    }

    #[test]
    fn clearing_releases_preview_and_image() {
        let counters = Counters::default();
        let mut stage = SelectionStage::new(CountingFactory::new(counters.clone()));

        stage.select(Some(image("a.jpg")));
        stage.select(None);
        stage.select(None);

        assert!(stage.image().is_none());
        assert!(stage.preview().is_none());
        assert_eq!(counters.released.get(), 1);
        assert_eq!(counters.live(), 0);
    }

    #[test]
    fn teardown_releases_live_preview() {
        let counters = Counters::default();
        {
            let mut stage = SelectionStage::new(CountingFactory::new(counters.clone()));
            stage.select(Some(image("a.jpg")));
            assert_eq!(counters.live(), 1);
        }
        assert_eq!(counters.acquired.get(), 1);
        assert_eq!(counters.released.get(), 1);
    }

    #[test]
    fn undecodable_image_is_still_selected() {
        let counters = Counters::default();
        let mut factory = CountingFactory::new(counters.clone());
        factory.undecodable.push("broken.jpg".into());
        let mut stage = SelectionStage::new(factory);

        stage.select(Some(image("a.jpg")));
        stage.select(Some(image("broken.jpg")));

        assert_eq!(stage.image().map(|i| i.name()), Some("broken.jpg"));
        assert!(stage.preview().is_none());
        assert_eq!(counters.live(), 0);
    }
}

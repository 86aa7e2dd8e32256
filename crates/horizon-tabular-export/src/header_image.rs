//! Header image loading for reports.
//!
//! Loading is a two-phase operation. Phase one fetches and decodes the image
//! on a dedicated worker thread. Phase two waits for the result for at most
//! the configured timeout. A late, failed or undecodable image never blocks
//! or fails an export: the outcome is [`HeaderImageOutcome::Skipped`] and the
//! report is rendered with the image area left empty.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use crate::error::ImageLoadError;
use crate::logging::targets;

/// Largest edge, in pixels, of an embedded header image.
pub const MAX_IMAGE_EDGE: u32 = 1024;

/// Default time allowed for loading a header image.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Somewhere header image bytes can be fetched from.
///
/// `fetch` runs on a worker thread and may block.
pub trait HeaderImageSource: Send + Sync {
    /// A short description for logs, such as a path or URL.
    fn describe(&self) -> String;

    /// Returns the encoded image bytes.
    fn fetch(&self) -> Result<Vec<u8>, ImageLoadError>;
}

/// Reads the image from a file.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    /// Creates a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HeaderImageSource for FileImageSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, ImageLoadError> {
        std::fs::read(&self.path).map_err(|e| ImageLoadError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

/// Serves image bytes already held in memory.
#[derive(Clone)]
pub struct BytesImageSource {
    bytes: Arc<[u8]>,
}

impl BytesImageSource {
    /// Creates a source serving `bytes`.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for BytesImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesImageSource")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl HeaderImageSource for BytesImageSource {
    fn describe(&self) -> String {
        format!("{} in-memory bytes", self.bytes.len())
    }

    fn fetch(&self) -> Result<Vec<u8>, ImageLoadError> {
        Ok(self.bytes.to_vec())
    }
}

/// Fetches the image over HTTP(S).
#[cfg(feature = "networking")]
#[derive(Debug, Clone)]
pub struct UrlImageSource {
    url: String,
    request_timeout: Duration,
}

#[cfg(feature = "networking")]
impl UrlImageSource {
    /// Creates a source for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }

    /// Sets the HTTP request timeout.
    ///
    /// This bounds the worker thread, not the export: the export only waits
    /// for the timeout given to [`load_header_image`].
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "networking")]
impl HeaderImageSource for UrlImageSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, ImageLoadError> {
        use horizon_tabular_net::HttpClient;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ImageLoadError::Worker(format!("failed to create runtime: {e}")))?;

        let fetched = rt.block_on(async {
            let client = HttpClient::builder()
                .request_timeout(self.request_timeout)
                .build()?;
            client.fetch(self.url.as_str(), "image/*").await
        });
        fetched
            .map(|bytes| bytes.to_vec())
            .map_err(|e| ImageLoadError::Fetch(e.to_string()))
    }
}

/// A decoded header image: 8-bit RGB pixels, row-major, no alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub rgb: Vec<u8>,
}

impl HeaderImage {
    /// Decodes an encoded image (PNG, JPEG, ...).
    ///
    /// Images larger than [`MAX_IMAGE_EDGE`] are scaled down. Transparent
    /// pixels are composited onto white.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageLoadError> {
        let mut img =
            image::load_from_memory(bytes).map_err(|e| ImageLoadError::Decode(e.to_string()))?;
        if img.width() > MAX_IMAGE_EDGE || img.height() > MAX_IMAGE_EDGE {
            img = img.thumbnail(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE);
        }

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageLoadError::Decode("image has no pixels".to_string()));
        }

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in rgba.pixels() {
            let [r, g, b, a] = pixel.0;
            rgb.extend([over_white(r, a), over_white(g, a), over_white(b, a)]);
        }

        Ok(Self { width, height, rgb })
    }
}

impl fmt::Debug for HeaderImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Result of [`load_header_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderImageOutcome {
    /// The image arrived in time.
    Loaded(HeaderImage),
    /// The image is not used; the report is rendered without it.
    Skipped(ImageLoadError),
}

impl HeaderImageOutcome {
    /// Returns the image if it was loaded.
    pub fn image(&self) -> Option<&HeaderImage> {
        match self {
            Self::Loaded(image) => Some(image),
            Self::Skipped(_) => None,
        }
    }

    /// Returns `true` if the image was loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Fetches and decodes `source` on a worker thread, waiting at most
/// `timeout` for the result.
///
/// Never fails: every problem becomes [`HeaderImageOutcome::Skipped`]. A
/// worker that misses the deadline keeps running detached and its result is
/// discarded.
pub fn load_header_image(
    source: Arc<dyn HeaderImageSource>,
    timeout: Duration,
) -> HeaderImageOutcome {
    let description = source.describe();
    let started = Instant::now();
    let (tx, rx) = crossbeam_channel::bounded(1);

    let spawned = thread::Builder::new()
        .name("header-image-loader".to_string())
        .spawn(move || {
            let result = source.fetch().and_then(|bytes| HeaderImage::decode(&bytes));
            // The receiver is gone if the deadline passed.
            let _ = tx.send(result);
        });

    if let Err(e) = spawned {
        return skipped(&description, ImageLoadError::Worker(e.to_string()));
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(image)) => {
            tracing::debug!(
                target: targets::IMAGE,
                source = %description,
                width = image.width,
                height = image.height,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "header image loaded"
            );
            HeaderImageOutcome::Loaded(image)
        }
        Ok(Err(error)) => skipped(&description, error),
        Err(RecvTimeoutError::Timeout) => skipped(&description, ImageLoadError::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => skipped(
            &description,
            ImageLoadError::Worker("loader stopped without a result".to_string()),
        ),
    }
}

fn skipped(description: &str, error: ImageLoadError) -> HeaderImageOutcome {
    tracing::warn!(
        target: targets::IMAGE,
        source = %description,
        error = %error,
        "header image skipped"
    );
    HeaderImageOutcome::Skipped(error)
}

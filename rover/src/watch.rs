use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use memory::{RecencyBuffer, StorageError};
use sensor::{Camera, CaptureError, FrameSource};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::{LoopError, RecognitionError};

/// Labels requested from the recognizer per photo.
pub const MAX_LABELS: usize = 5;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Relative box of one located instance, as fractions of the image size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One thing the recognizer believes is in the photo.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub name: String,
    pub confidence: f32,
    pub instances: Vec<BoundingBox>,
}

impl Label {
    /// A label with no located instances yet.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
            instances: Vec::new(),
        }
    }

    /// Add one place the label was found.
    pub fn with_instance(mut self, instance: BoundingBox) -> Self {
        self.instances.push(instance);
        self
    }

    /// Whether the label points at something concrete in the frame rather
    /// than describing the scene.
    pub fn is_located(&self) -> bool {
        !self.instances.is_empty()
    }
}

/// Image-labeling backend.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, photo: &Path, max_labels: usize) -> Result<Vec<Label>, RecognitionError>;
}

/// Speech output.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn say(&self, text: &str);
}

/// [`Recognizer`] that never sees anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRecognizer;

#[async_trait]
impl Recognizer for NoopRecognizer {
    async fn recognize(&self, photo: &Path, _max_labels: usize) -> Result<Vec<Label>, RecognitionError> {
        debug!(photo = %photo.display(), "noop recognizer");
        Ok(Vec::new())
    }
}

/// [`Speaker`] that logs each phrase.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingSpeaker;

#[async_trait]
impl Speaker for LoggingSpeaker {
    async fn say(&self, text: &str) {
        info!(%text, "speaker say");
    }
}

/// Periodically photographs the scene and speaks the located labels.
pub struct Watcher<C, R, S> {
    source: Arc<Mutex<FrameSource<C>>>,
    photos: PathBuf,
    buffer: RecencyBuffer,
    recognizer: R,
    speaker: S,
    interval: Duration,
}

impl<C: Camera + 'static, R: Recognizer, S: Speaker> Watcher<C, R, S> {
    /// Photos go to `photos`, created if missing.
    pub fn new(camera: C, photos: impl Into<PathBuf>, recognizer: R, speaker: S) -> Result<Self, StorageError> {
        let photos = photos.into();
        std::fs::create_dir_all(&photos).map_err(|source| StorageError::Io {
            path: photos.clone(),
            source,
        })?;
        Ok(Self {
            source: Arc::new(Mutex::new(FrameSource::new(camera))),
            photos,
            buffer: RecencyBuffer::default(),
            recognizer,
            speaker,
            interval: DEFAULT_INTERVAL,
        })
    }

    /// Time between photos.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Keep at most `capacity` photos on disk.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.buffer = RecencyBuffer::new(capacity);
        self
    }

    /// Photos currently kept on disk.
    pub fn buffer(&self) -> &RecencyBuffer {
        &self.buffer
    }

    /// Take one photo and speak what was located in it. Returns the spoken
    /// label names.
    pub async fn step(&mut self) -> Result<Vec<String>, LoopError> {
        let photo = self.capture().await?;
        self.buffer.admit(photo.clone());
        let labels = self.recognizer.recognize(&photo, MAX_LABELS).await?;
        let located: Vec<String> = labels
            .into_iter()
            .take(MAX_LABELS)
            .filter(Label::is_located)
            .map(|label| label.name)
            .collect();
        for name in &located {
            self.speaker.say(name).await;
        }
        Ok(located)
    }

    /// The camera blocks, so the capture runs on the blocking pool.
    async fn capture(&self) -> Result<PathBuf, CaptureError> {
        let source = Arc::clone(&self.source);
        let dest = self.photos.clone();
        tokio::task::spawn_blocking(move || {
            source
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .capture(&dest)
        })
        .await
        .map_err(|e| CaptureError::Driver(format!("capture task failed: {e}")))?
    }

    /// Step every interval until `shutdown` resolves. Failed steps are
    /// logged and the loop keeps going.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(photos = %self.photos.display(), every = ?self.interval, "watch started");
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.step().await {
                        warn!(error = %e, "watch step failed");
                    }
                }
            }
        }
        info!("watch stopped");
    }
}

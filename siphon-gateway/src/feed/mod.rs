pub mod mock;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One raw upload produced by a feed, exactly as a device would send it.
#[derive(Debug, Clone)]
pub struct FeedUpload {
    pub device_identity: Option<Box<str>>,
    pub body: Vec<u8>,
}

/// Source of raw device uploads outside the HTTP path.
///
/// Implementations of this trait spawn background tasks that push uploads
/// into an mpsc channel. The receiver is returned from the `start` method
/// and drained by the gateway's collector, which runs the same decode
/// pipeline as the HTTP ingest endpoint.
#[async_trait]
pub trait UploadFeed: Send + Sync + 'static {
    /// Error type for this feed implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Start producing uploads.
    ///
    /// The background tasks run until the cancellation token is cancelled.
    async fn start(
        &self,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<FeedUpload>, Self::Error>;
}

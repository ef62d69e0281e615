use crate::errors::ConcatError;
use arboard::Clipboard;
use async_trait::async_trait;
use tokio::io::{self, AsyncWriteExt};
use tracing::debug;

/// Destination of the rendered document.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn deliver(&self, content: &str) -> Result<(), ConcatError>;

    /// Status line printed after a successful delivery.
    fn confirmation(&self) -> Option<&'static str> {
        None
    }
}

pub struct ClipboardSink;

#[async_trait]
impl OutputSink for ClipboardSink {
    async fn deliver(&self, content: &str) -> Result<(), ConcatError> {
        debug!("Initializing clipboard");
        let mut clipboard =
            Clipboard::new().map_err(|e| ConcatError::ClipboardInitError(e.to_string()))?;
        clipboard
            .set_text(content.to_owned())
            .map_err(|e| ConcatError::ClipboardWriteError(e.to_string()))?;
        Ok(())
    }

    fn confirmation(&self) -> Option<&'static str> {
        Some("Concatenated content copied to clipboard.")
    }
}

pub struct StdoutSink;

#[async_trait]
impl OutputSink for StdoutSink {
    async fn deliver(&self, content: &str) -> Result<(), ConcatError> {
        let mut stdout = io::stdout();
        stdout.write_all(content.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

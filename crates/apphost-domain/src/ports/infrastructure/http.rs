//! HTTP layer port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Outbound HTTP access shared by core services and plugins
#[async_trait]
pub trait HttpClient: Component {
    /// GET a URL and return the body as text
    async fn get_string(&self, url: &str, cancellation: CancellationToken) -> Result<String>;

    /// GET a URL and return the raw body
    async fn get_bytes(&self, url: &str, cancellation: CancellationToken) -> Result<Vec<u8>>;
}

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::{BlockAnnouncement, PEER_ENDPOINT};
use crate::error::NetworkError;

/// Delivers one announcement to one peer.
pub trait Transport {
    fn send(
        &self,
        peer: &str,
        announcement: &BlockAnnouncement,
    ) -> impl Future<Output = Result<(), NetworkError>> + Send;
}

/// POSTs announcements as JSON to `<peer>/api/v1/peer/`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, peer: &str, announcement: &BlockAnnouncement) -> Result<(), NetworkError> {
        let url = format!("{}{}", peer.trim_end_matches('/'), PEER_ENDPOINT);
        let response = self.client.post(url).json(announcement).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Rejected {
                peer: peer.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

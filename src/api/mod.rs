//! Typed clients for the audio service's REST API
//!
//! Each client turns one call into an [`ApiRequest`](crate::gateway::ApiRequest),
//! sends it through an [`HttpGateway`], and parses the JSON reply. Any
//! non-success status becomes
//! [`SoundEditError::RequestFailed`](crate::error::SoundEditError::RequestFailed).
//! No retries, no cancellation.

pub mod audio_files;
pub mod mix;
pub mod multitrack;

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{Result, SoundEditError};
use crate::gateway::{HttpGateway, ReqwestGateway};

pub use audio_files::{AudioFilesApi, AudioUpload, ConvertOptions, UploadOptions};
pub use mix::{AudioMixRequest, AudioMixResponse, MixApi, TrackConfig};
pub use multitrack::{ConversionRequest, ExportState, ExportStatus, MultitrackApi};

/// Audio file management endpoints.
pub const AUDIO_FILES_BASE: &str = "/api/v1/audio-files";
/// Mixing and preview-file endpoints.
pub const AUDIO_EDITOR_BASE: &str = "/api/v1/audio-editor";
/// Multitrack project endpoints.
pub const MULTITRACK_BASE: &str = "/api/v1/multitrack";

/// Check that `id` can be placed in a request path as one segment.
///
/// Ids come from the service and never need escaping; anything that would
/// change the URL structure is refused rather than sent.
pub fn path_segment(id: &str) -> Result<&str> {
    let breaks_path = id.is_empty()
        || id == "."
        || id == ".."
        || id
            .chars()
            .any(|c| {
                matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
            });

    if breaks_path {
        Err(SoundEditError::InvalidId { id: id.to_string() })
    } else {
        Ok(id)
    }
}

/// The `{success, message, data}` wrapper most endpoints reply with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// A reply with only a status flag and message.
pub type StatusMessage = ApiEnvelope<serde_json::Value>;

/// Entry point bundling the three API groups over one gateway.
pub struct SoundEditClient<G> {
    gateway: G,
}

impl SoundEditClient<ReqwestGateway> {
    /// Client for a live service.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(ReqwestGateway::new(config)?))
    }
}

impl<G: HttpGateway> SoundEditClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn audio_files(&self) -> AudioFilesApi<'_, G> {
        AudioFilesApi::new(&self.gateway)
    }

    pub fn mix(&self) -> MixApi<'_, G> {
        MixApi::new(&self.gateway)
    }

    pub fn multitrack(&self) -> MultitrackApi<'_, G> {
        MultitrackApi::new(&self.gateway)
    }
}

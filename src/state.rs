//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::observer::ObserverSlot;
use crate::core::session::SessionRegistry;
use crate::core::voice::{VoiceClient, VoiceClientConfig, VoiceClientError};

/// State injected into every handler: configuration, the single-slot session
/// registry, the observer slot and the call-creation client. No ambient
/// globals.
pub struct AppState {
    pub config: ServerConfig,
    pub registry: SessionRegistry,
    pub observer: ObserverSlot,
    pub voice: VoiceClient,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Arc<Self>, VoiceClientError> {
        let voice = VoiceClient::new(VoiceClientConfig {
            api_key: config.voice.api_key.clone(),
            base_url: config.voice.base_url.clone(),
            http_timeout_secs: config.voice.http_timeout_secs,
        })?;
        Ok(Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            observer: ObserverSlot::new(),
            voice,
        }))
    }
}

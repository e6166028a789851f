//! External voice provider configurations for call creation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Configuration for an external TTS voice provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalVoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eleven_labs: Option<ElevenLabsVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cartesia: Option<CartesiaVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_ht: Option<PlayHtVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lmnt: Option<LmntVoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<GenericVoice>,
}

impl ExternalVoice {
    pub fn eleven_labs(voice_id: impl Into<String>) -> Self {
        Self {
            eleven_labs: Some(ElevenLabsVoice {
                voice_id: voice_id.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn cartesia(voice_id: impl Into<String>) -> Self {
        Self {
            cartesia: Some(CartesiaVoice {
                voice_id: voice_id.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn play_ht(user_id: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            play_ht: Some(PlayHtVoice {
                user_id: user_id.into(),
                voice_id: voice_id.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn lmnt(voice_id: impl Into<String>) -> Self {
        Self {
            lmnt: Some(LmntVoice {
                voice_id: voice_id.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn generic(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            generic: Some(GenericVoice {
                url: url.into(),
                body: Some(body),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevenLabsVoice {
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_speaker_boost: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pronunciation_dictionaries: Vec<PronunciationDictionary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_streaming_latency: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sample_rate: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationDictionary {
    pub dictionary_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartesiaVoice {
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayHtVoice {
    pub user_id: String,
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_guidance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_guidance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_guidance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_conditioning_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmntVoice {
    pub voice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversational: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericVoice {
    pub url: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_words_per_minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_labs_voice_wire_shape() {
        let voice = ExternalVoice::eleven_labs("voice-1");
        let json = serde_json::to_value(&voice).unwrap();
        assert_eq!(json["elevenLabs"]["voiceId"], "voice-1");
        assert!(json.get("cartesia").is_none());
        assert!(json["elevenLabs"].get("pronunciationDictionaries").is_none());
    }
}

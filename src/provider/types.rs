use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VoiceCatalog {
    pub voices: Vec<Voice>,
}

/// The provider's subscription record. Only the character counters are
/// typed; every other field is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub character_count: u64,
    pub character_limit: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subscription {
    pub fn new(character_count: u64, character_limit: u64) -> Self {
        Self {
            character_count,
            character_limit,
            extra: Map::new(),
        }
    }

    /// Characters still available; zero when usage has run past the limit.
    pub fn available(&self) -> u64 {
        self.character_limit.saturating_sub(self.character_count)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesisBody<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_extra_fields_ignored() {
        let voice: Voice = serde_json::from_value(serde_json::json!({
            "voice_id": "v1",
            "name": "Alice",
            "labels": {"accent": "british"},
            "category": "premade"
        }))
        .unwrap();
        assert_eq!(voice.voice_id, "v1");
        assert_eq!(voice.category.as_deref(), Some("premade"));
        assert!(voice.preview_url.is_none());
    }

    #[test]
    fn test_subscription_preserves_payload() {
        let raw = serde_json::json!({
            "tier": "creator",
            "character_count": 4990,
            "character_limit": 5000,
            "next_character_count_reset_unix": 1_700_000_000
        });
        let sub: Subscription = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(sub.available(), 10);
        assert_eq!(serde_json::to_value(&sub).unwrap(), raw);
    }

    #[test]
    fn test_available_saturates() {
        assert_eq!(Subscription::new(120, 100).available(), 0);
    }
}

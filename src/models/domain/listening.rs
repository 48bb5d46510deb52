use serde::{Deserialize, Serialize};

/// Listening exercise. `audio_url` stays empty: no speech synthesis backs it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListeningPrompt {
    pub text: String,
    pub answer: String,
    pub audio_url: Option<String>,
}

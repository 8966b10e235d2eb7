//! Scene input pushed by the speech/sentiment collaborator.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    #[serde(alias = "Negative", alias = "NEGATIVE")]
    Negative,
    #[default]
    #[serde(alias = "Neutral", alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "Positive", alias = "POSITIVE")]
    Positive,
}

impl SentimentClass {
    pub const ALL: [SentimentClass; 3] = [
        SentimentClass::Negative,
        SentimentClass::Neutral,
        SentimentClass::Positive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SentimentClass::Negative => "negative",
            SentimentClass::Neutral => "neutral",
            SentimentClass::Positive => "positive",
        }
    }
}

/// Immutable snapshot of everything the engine needs from upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneParameters {
    pub sentiment_class: SentimentClass,
    pub sentiment_score: f32,
    pub text: String,
    pub motion_enabled: bool,
    pub high_intensity: bool,
    pub interactivity_enabled: bool,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            sentiment_class: SentimentClass::Neutral,
            sentiment_score: 0.0,
            text: String::new(),
            motion_enabled: true,
            high_intensity: false,
            interactivity_enabled: false,
        }
    }
}

impl SceneParameters {
    pub fn new(sentiment_class: SentimentClass, sentiment_score: f32) -> Self {
        Self {
            sentiment_class,
            sentiment_score,
            ..Self::default()
        }
        .sanitized()
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_motion(mut self, enabled: bool) -> Self {
        self.motion_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_high_intensity(mut self, enabled: bool) -> Self {
        self.high_intensity = enabled;
        self
    }

    #[must_use]
    pub fn with_interactivity(mut self, enabled: bool) -> Self {
        self.interactivity_enabled = enabled;
        self
    }

    /// Clamps the score into `[-1, 1]`; a NaN score is treated as neutral 0.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.sentiment_score = if self.sentiment_score.is_nan() {
            0.0
        } else {
            self.sentiment_score.clamp(-1.0, 1.0)
        };
        self
    }

    /// Score magnitude in `[0, 1]`.
    pub fn magnitude(&self) -> f32 {
        self.sentiment_score.abs().min(1.0)
    }

    /// True when the change is large enough to rebuild terrain and particles.
    pub fn differs_materially(&self, other: &SceneParameters, threshold: f32) -> bool {
        self.sentiment_class != other.sentiment_class
            || (self.sentiment_score - other.sentiment_score).abs() > threshold
    }

    /// Weight in `[1, 2]` derived from utterance length.
    pub fn text_weight(&self) -> f32 {
        let chars = self.text.chars().count().min(200);
        1.0 + chars as f32 / 200.0
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneUpdate {
    pub sentiment_class: Option<SentimentClass>,
    pub sentiment_score: Option<f32>,
    pub text: Option<String>,
    pub motion_enabled: Option<bool>,
    pub high_intensity: Option<bool>,
    pub interactivity_enabled: Option<bool>,
}

impl SceneUpdate {
    pub fn is_empty(&self) -> bool {
        *self == SceneUpdate::default()
    }

    pub fn apply_to(&self, current: &SceneParameters) -> SceneParameters {
        SceneParameters {
            sentiment_class: self.sentiment_class.unwrap_or(current.sentiment_class),
            sentiment_score: self.sentiment_score.unwrap_or(current.sentiment_score),
            text: self.text.clone().unwrap_or_else(|| current.text.clone()),
            motion_enabled: self.motion_enabled.unwrap_or(current.motion_enabled),
            high_intensity: self.high_intensity.unwrap_or(current.high_intensity),
            interactivity_enabled: self
                .interactivity_enabled
                .unwrap_or(current.interactivity_enabled),
        }
        .sanitized()
    }
}

impl From<SceneParameters> for SceneUpdate {
    fn from(p: SceneParameters) -> Self {
        Self {
            sentiment_class: Some(p.sentiment_class),
            sentiment_score: Some(p.sentiment_score),
            text: Some(p.text),
            motion_enabled: Some(p.motion_enabled),
            high_intensity: Some(p.high_intensity),
            interactivity_enabled: Some(p.interactivity_enabled),
        }
    }
}

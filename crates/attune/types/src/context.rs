//! Decision context and the feature vector derived from it.

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::mood::MoodState;
use crate::profile::{Traits, UserProfile};

/// Number of components in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 9;

/// Form factor of the device the interface runs on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

/// Recent interaction counters supplied by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSummary {
    pub clicks_per_minute: f64,
    pub keystrokes_per_minute: f64,
    pub scroll_events: u32,
    pub session_minutes: f64,
}

/// Everything the generators may look at for one decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub mood: MoodState,
    pub profile: UserProfile,
    /// Current page or document identifier, if known.
    pub page: Option<String>,
    pub interactions: InteractionSummary,
    /// Wall-clock time in the user's timezone.
    pub local_time: NaiveDateTime,
    pub device: DeviceClass,
}

impl Context {
    pub fn new(mood: MoodState, profile: UserProfile, local_time: NaiveDateTime) -> Self {
        Self {
            mood,
            profile,
            page: None,
            interactions: InteractionSummary::default(),
            local_time,
            device: DeviceClass::default(),
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_device(mut self, device: DeviceClass) -> Self {
        self.device = device;
        self
    }

    pub fn hour(&self) -> u32 {
        self.local_time.hour()
    }

    /// Page identifier lowercased, empty when unknown.
    pub fn page_lower(&self) -> String {
        self.page.as_deref().unwrap_or_default().to_ascii_lowercase()
    }

    /// The subset of this context stored alongside a history record.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            mood: self.mood.clone(),
            traits: self.profile.traits.clone(),
            page: self.page.clone(),
            local_time: self.local_time,
            device: self.device,
        }
    }
}

/// Immutable copy of the decision-relevant parts of a [`Context`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub mood: MoodState,
    pub traits: Traits,
    pub page: Option<String>,
    pub local_time: NaiveDateTime,
    pub device: DeviceClass,
}

// ── Feature Vector ──────────────────────────────────────────────────────

/// Nine ordered scalars describing a context:
/// `[mood code, energy, valence, arousal, neuroticism, extraversion,
/// openness, hour/24, weekday/7]`, weekday counted from Sunday = 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_snapshot(snapshot: &ContextSnapshot) -> Self {
        Self::build(&snapshot.mood, &snapshot.traits, snapshot.local_time)
    }

    pub fn from_context(context: &Context) -> Self {
        Self::build(&context.mood, &context.profile.traits, context.local_time)
    }

    fn build(mood: &MoodState, traits: &Traits, at: NaiveDateTime) -> Self {
        Self([
            mood.primary_mood.feature_code(),
            mood.energy,
            mood.valence,
            mood.arousal,
            traits.neuroticism,
            traits.extraversion,
            traits.openness,
            f64::from(at.hour()) / 24.0,
            f64::from(at.weekday().num_days_from_sunday()) / 7.0,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The mood-code component.
    pub fn mood_code(&self) -> f64 {
        self.0[0]
    }

    /// Cosine similarity; zero when either vector has zero norm.
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f64 {
        let (mut dot, mut na, mut nb) = (0.0, 0.0, 0.0);
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            dot += a * b;
            na += a * a;
            nb += b * b;
        }
        if na == 0.0 || nb == 0.0 {
            return 0.0;
        }
        dot / (na.sqrt() * nb.sqrt())
    }
}

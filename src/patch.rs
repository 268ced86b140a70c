//! Partial updates for one section of the intake record.
//!
//! Every patch field is optional; `None` leaves the current value alone. A
//! patch deserializes from the same camelCase JSON the section uses, so a UI
//! can send only the fields the user just edited.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::*;
use crate::steps::SectionKey;

macro_rules! section_patch {
    (
        $(#[$meta:meta])* $patch:ident => $section:ident {
            $($(#[$field_meta:meta])* $field:ident: $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $patch {
            $($(#[$field_meta])* pub $field: Option<$ty>,)*
        }

        impl $patch {
            /// Shallow-merge into `section`, returning the names of the fields written.
            pub fn merge_into(self, section: &mut $section) -> Vec<&'static str> {
                let mut touched = Vec::new();
                $(
                    if let Some(value) = self.$field {
                        section.$field = value;
                        touched.push(stringify!($field));
                    }
                )*
                touched
            }
        }
    };
}

section_patch!(PersonalInfoPatch => PersonalInfo {
    name: String,
    birth_date: String,
    gender: Gender,
    occupation: String,
    phone: String,
    city: String,
    state: String,
});

section_patch!(HealthHistoryPatch => HealthHistory {
    pre_existing_conditions: Vec<String>,
    allergies: Vec<String>,
    medications: Vec<String>,
    recent_surgeries: String,
    other_conditions: String,
});

section_patch!(GoalsPatch => Goals {
    goal: GoalType,
    current_weight: f64,
    height: f64,
    target_weight: f64,
    target_timeframe: String,
});

section_patch!(EatingHabitsPatch => EatingHabits {
    meals_per_day: u32,
    water_liters_per_day: f64,
    dietary_restrictions: Vec<String>,
    preferred_foods: Vec<String>,
    avoided_foods: Vec<String>,
    eating_out_frequency: EatingOutFrequency,
});

// A present key always yields `Some`, so `null` is kept apart from a
// missing key.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

section_patch!(
    /// `smoker: Some(None)` clears the answer again. In JSON that is
    /// `"smoker": null`; leaving the key out keeps the current answer.
    LifestylePatch => Lifestyle {
        activity_level: ActivityLevel,
        sleep_hours: f64,
        sleep_quality: SleepQuality,
        stress_level: u8,
        #[serde(
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        smoker: Option<bool>,
        alcohol_frequency: AlcoholFrequency,
    }
);

/// A partial update addressed to exactly one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "data", rename_all = "camelCase")]
pub enum SectionPatch {
    PersonalInfo(PersonalInfoPatch),
    HealthHistory(HealthHistoryPatch),
    Goals(GoalsPatch),
    EatingHabits(EatingHabitsPatch),
    Lifestyle(LifestylePatch),
}

impl SectionPatch {
    pub fn section(&self) -> SectionKey {
        match self {
            SectionPatch::PersonalInfo(_) => SectionKey::PersonalInfo,
            SectionPatch::HealthHistory(_) => SectionKey::HealthHistory,
            SectionPatch::Goals(_) => SectionKey::Goals,
            SectionPatch::EatingHabits(_) => SectionKey::EatingHabits,
            SectionPatch::Lifestyle(_) => SectionKey::Lifestyle,
        }
    }

    /// Apply to the owning section of `record`; sibling sections are untouched.
    pub fn apply(self, record: &mut IntakeRecord) -> Vec<&'static str> {
        match self {
            SectionPatch::PersonalInfo(p) => p.merge_into(&mut record.personal_info),
            SectionPatch::HealthHistory(p) => p.merge_into(&mut record.health_history),
            SectionPatch::Goals(p) => p.merge_into(&mut record.goals),
            SectionPatch::EatingHabits(p) => p.merge_into(&mut record.eating_habits),
            SectionPatch::Lifestyle(p) => p.merge_into(&mut record.lifestyle),
        }
    }
}

impl From<PersonalInfoPatch> for SectionPatch {
    fn from(p: PersonalInfoPatch) -> Self {
        SectionPatch::PersonalInfo(p)
    }
}

impl From<HealthHistoryPatch> for SectionPatch {
    fn from(p: HealthHistoryPatch) -> Self {
        SectionPatch::HealthHistory(p)
    }
}

impl From<GoalsPatch> for SectionPatch {
    fn from(p: GoalsPatch) -> Self {
        SectionPatch::Goals(p)
    }
}

impl From<EatingHabitsPatch> for SectionPatch {
    fn from(p: EatingHabitsPatch) -> Self {
        SectionPatch::EatingHabits(p)
    }
}

impl From<LifestylePatch> for SectionPatch {
    fn from(p: LifestylePatch) -> Self {
        SectionPatch::Lifestyle(p)
    }
}

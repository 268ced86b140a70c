use serde::{Deserialize, Serialize};

/// The five named slices of an [`IntakeRecord`](crate::models::IntakeRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    PersonalInfo,
    HealthHistory,
    Goals,
    EatingHabits,
    Lifestyle,
}

/// One screen of the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: u8,
    pub title: &'static str,
    pub section: SectionKey,
}

pub const STEPS: [StepDescriptor; 5] = [
    StepDescriptor {
        id: 1,
        title: "Dados Pessoais",
        section: SectionKey::PersonalInfo,
    },
    StepDescriptor {
        id: 2,
        title: "Histórico de Saúde",
        section: SectionKey::HealthHistory,
    },
    StepDescriptor {
        id: 3,
        title: "Objetivos",
        section: SectionKey::Goals,
    },
    StepDescriptor {
        id: 4,
        title: "Hábitos Alimentares",
        section: SectionKey::EatingHabits,
    },
    StepDescriptor {
        id: 5,
        title: "Estilo de Vida",
        section: SectionKey::Lifestyle,
    },
];

pub const FIRST_STEP: u8 = 1;
pub const STEP_COUNT: u8 = STEPS.len() as u8;

/// Look up a step by its 1-based id.
pub fn step(id: u8) -> Option<&'static StepDescriptor> {
    STEPS.iter().find(|s| s.id == id)
}

/// The step that owns `section`.
pub fn step_for(section: SectionKey) -> &'static StepDescriptor {
    let index = match section {
        SectionKey::PersonalInfo => 0,
        SectionKey::HealthHistory => 1,
        SectionKey::Goals => 2,
        SectionKey::EatingHabits => 3,
        SectionKey::Lifestyle => 4,
    };
    &STEPS[index]
}

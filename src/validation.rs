use std::collections::BTreeMap;

use crate::models::*;
use crate::steps::SectionKey;

/// Field name to message. Empty means the section is valid.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Validate the slice of `record` owned by `section`. Other sections are never read.
pub fn validate_section(section: SectionKey, record: &IntakeRecord) -> FieldErrors {
    match section {
        SectionKey::PersonalInfo => validate_personal_info(&record.personal_info),
        SectionKey::HealthHistory => validate_health_history(&record.health_history),
        SectionKey::Goals => validate_goals(&record.goals),
        SectionKey::EatingHabits => validate_eating_habits(&record.eating_habits),
        SectionKey::Lifestyle => validate_lifestyle(&record.lifestyle),
    }
}

pub fn validate_personal_info(info: &PersonalInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required_text(&mut errors, "name", &info.name, "Name is required");
    required_text(
        &mut errors,
        "birth_date",
        &info.birth_date,
        "Birth date is required",
    );
    required_choice(&mut errors, "gender", &info.gender, "Gender is required");
    required_text(
        &mut errors,
        "occupation",
        &info.occupation,
        "Occupation is required",
    );
    required_text(&mut errors, "phone", &info.phone, "Phone is required");
    required_text(&mut errors, "city", &info.city, "City is required");
    required_text(&mut errors, "state", &info.state, "State is required");
    errors
}

/// Medical history is optional, so this never reports anything.
pub fn validate_health_history(_history: &HealthHistory) -> FieldErrors {
    FieldErrors::new()
}

pub fn validate_goals(goals: &Goals) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required_choice(&mut errors, "goal", &goals.goal, "Goal is required");
    positive(
        &mut errors,
        "current_weight",
        goals.current_weight,
        "Current weight must be greater than zero",
    );
    positive(
        &mut errors,
        "height",
        goals.height,
        "Height must be greater than zero",
    );
    positive(
        &mut errors,
        "target_weight",
        goals.target_weight,
        "Target weight must be greater than zero",
    );
    required_text(
        &mut errors,
        "target_timeframe",
        &goals.target_timeframe,
        "Target timeframe is required",
    );
    errors
}

pub fn validate_eating_habits(habits: &EatingHabits) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if habits.meals_per_day == 0 {
        errors.insert(
            "meals_per_day",
            "Meals per day must be greater than zero".to_string(),
        );
    }
    positive(
        &mut errors,
        "water_liters_per_day",
        habits.water_liters_per_day,
        "Water intake must be greater than zero",
    );
    required_choice(
        &mut errors,
        "eating_out_frequency",
        &habits.eating_out_frequency,
        "Eating out frequency is required",
    );
    errors
}

pub fn validate_lifestyle(lifestyle: &Lifestyle) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required_choice(
        &mut errors,
        "activity_level",
        &lifestyle.activity_level,
        "Activity level is required",
    );
    positive(
        &mut errors,
        "sleep_hours",
        lifestyle.sleep_hours,
        "Sleep hours must be greater than zero",
    );
    required_choice(
        &mut errors,
        "sleep_quality",
        &lifestyle.sleep_quality,
        "Sleep quality is required",
    );
    if !(1..=10).contains(&lifestyle.stress_level) {
        errors.insert(
            "stress_level",
            "Stress level must be between 1 and 10".to_string(),
        );
    }
    if lifestyle.smoker.is_none() {
        errors.insert("smoker", "Please tell us whether you smoke".to_string());
    }
    required_choice(
        &mut errors,
        "alcohol_frequency",
        &lifestyle.alcohol_frequency,
        "Alcohol frequency is required",
    );
    errors
}

fn required_text(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message.to_string());
    }
}

fn required_choice<C: Choice>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &C,
    message: &str,
) {
    if !value.is_set() {
        errors.insert(field, message.to_string());
    }
}

// NaN fails too.
fn positive(errors: &mut FieldErrors, field: &'static str, value: f64, message: &str) {
    if !(value > 0.0) {
        errors.insert(field, message.to_string());
    }
}

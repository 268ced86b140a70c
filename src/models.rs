use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single-choice answer with an explicit "not chosen yet" state.
///
/// The unset state is the `Default` of every choice enum.
pub trait Choice: Default + PartialEq {
    fn is_set(&self) -> bool {
        *self != Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "masculino", alias = "male")]
    Male,
    #[serde(rename = "feminino", alias = "female")]
    Female,
    #[serde(rename = "outro", alias = "other")]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    #[default]
    #[serde(rename = "")]
    Unset,
    LoseWeight,
    GainMass,
    MaintainWeight,
    GeneralHealth,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EatingOutFrequency {
    #[default]
    #[serde(rename = "")]
    Unset,
    Rarely,
    Sometimes,
    Often,
    AlmostAlways,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    #[default]
    #[serde(rename = "")]
    Unset,
    Sedentary,
    Light,
    Moderate,
    Intense,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepQuality {
    #[default]
    #[serde(rename = "")]
    Unset,
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlcoholFrequency {
    #[default]
    #[serde(rename = "")]
    Unset,
    None,
    Rarely,
    Moderate,
    Frequent,
}

impl Choice for Gender {}
impl Choice for GoalType {}
impl Choice for EatingOutFrequency {}
impl Choice for ActivityLevel {}
impl Choice for SleepQuality {}
impl Choice for AlcoholFrequency {}

/// Step 1: who the patient is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    /// ISO date, `YYYY-MM-DD`
    pub birth_date: String,
    pub gender: Gender,
    pub occupation: String,
    pub phone: String,
    pub city: String,
    pub state: String,
}

impl PersonalInfo {
    /// Age in whole years on `today`, if the birth date parses.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d").ok()?;
        today.years_since(born)
    }
}

/// Step 2: medical background. Everything here is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthHistory {
    pub pre_existing_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub recent_surgeries: String,
    pub other_conditions: String,
}

/// Step 3: body measurements and what the patient wants to achieve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Goals {
    pub goal: GoalType,
    /// Weight in kg
    pub current_weight: f64,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub target_weight: f64,
    pub target_timeframe: String,
}

impl Goals {
    /// Body-mass index from current weight and height.
    pub fn bmi(&self) -> Option<f64> {
        if self.current_weight > 0.0 && self.height > 0.0 {
            let meters = self.height / 100.0;
            Some(self.current_weight / (meters * meters))
        } else {
            None
        }
    }

    /// Signed kg between current and target weight (negative means losing).
    pub fn weight_to_go(&self) -> Option<f64> {
        (self.current_weight > 0.0 && self.target_weight > 0.0)
            .then(|| self.target_weight - self.current_weight)
    }
}

/// Step 4: day-to-day eating routine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EatingHabits {
    pub meals_per_day: u32,
    pub water_liters_per_day: f64,
    pub dietary_restrictions: Vec<String>,
    pub preferred_foods: Vec<String>,
    pub avoided_foods: Vec<String>,
    pub eating_out_frequency: EatingOutFrequency,
}

/// Step 5: activity, sleep and habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifestyle {
    pub activity_level: ActivityLevel,
    pub sleep_hours: f64,
    pub sleep_quality: SleepQuality,
    /// 1 (calm) to 10 (very stressed)
    pub stress_level: u8,
    /// `None` until the patient answers
    pub smoker: Option<bool>,
    pub alcohol_frequency: AlcoholFrequency,
}

impl Default for Lifestyle {
    fn default() -> Self {
        Self {
            activity_level: ActivityLevel::Unset,
            sleep_hours: 0.0,
            sleep_quality: SleepQuality::Unset,
            stress_level: 5,
            smoker: None,
            alcohol_frequency: AlcoholFrequency::Unset,
        }
    }
}

/// The complete anamnesis payload collected across all steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRecord {
    pub personal_info: PersonalInfo,
    pub health_history: HealthHistory,
    pub goals: Goals,
    pub eating_habits: EatingHabits,
    pub lifestyle: Lifestyle,
}

/// Envelope used by every read endpoint of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            message: None,
        }
    }
}

/// A patient as listed on the nutritionist dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub goal: Option<GoalType>,
    /// Whether the intake form was submitted
    #[serde(default)]
    pub has_anamnesis: bool,
    pub last_checkin: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealKind {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    Supper,
}

/// One food item within a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub name: String,
    /// Free-text amount, e.g. "2 fatias"
    pub quantity: String,
    /// Calories (kcal)
    pub calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub patient_id: String,
    pub kind: MealKind,
    /// Scheduled time, "HH:MM"
    pub time: Option<String>,
    pub items: Vec<MealItem>,
    pub notes: Option<String>,
}

impl Meal {
    pub fn total_calories(&self) -> f64 {
        self.items.iter().filter_map(|i| i.calories).sum()
    }
}

/// Payload for creating or replacing a meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub patient_id: String,
    pub kind: MealKind,
    pub time: Option<String>,
    pub items: Vec<MealItem>,
    pub notes: Option<String>,
}

/// The plan a nutritionist prescribed for a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub patient_id: String,
    pub meals: Vec<Meal>,
    /// Daily calorie target (kcal)
    pub calorie_target: Option<f64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A periodic patient check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    /// Weight in kg
    pub weight: Option<f64>,
    /// 1 to 5
    pub adherence: Option<u8>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub adherence: Option<u8>,
    pub notes: Option<String>,
}

/// A single point of a dashboard chart series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Aggregates shown on the dashboards. Fields a role does not see are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_patients: Option<u32>,
    pub pending_anamneses: Option<u32>,
    pub checkins_this_week: Option<u32>,
    pub weight_history: Vec<ChartPoint>,
    pub adherence_history: Vec<ChartPoint>,
}

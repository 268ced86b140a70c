use std::future::Future;

use anyhow::{anyhow, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::{Role, Session, SessionAuth};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::*;
use crate::submit::SubmitIntake;

#[derive(Clone)]
pub struct ZapNutreClient {
    pub auth: SessionAuth,
    client: Client,
    config: ClientConfig,
}

impl ZapNutreClient {
    /// A client with no session yet. Call [`SessionAuth::login`] on `auth`
    /// before using authenticated endpoints.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Resume an existing session.
    pub fn with_session(config: ClientConfig, session: Session) -> Result<Self> {
        Self::build(config, Some(session))
    }

    /// Sign in with email and password.
    pub async fn login(config: ClientConfig, email: &str, password: &str) -> Result<Self> {
        let client = Self::new(config)?;
        client.auth.login(email, password).await?;
        Ok(client)
    }

    fn build(config: ClientConfig, session: Option<Session>) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let auth = SessionAuth::new(client.clone(), config.clone(), session);
        Ok(Self {
            auth,
            client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a completed intake form for the signed-in patient.
    pub async fn submit_anamnesis(&self, record: &IntakeRecord) -> Result<()> {
        self.execute(Method::POST, "anamnesis", Some(record)).await?;
        info!("Anamnesis submitted");
        Ok(())
    }

    /// Patients of the signed-in nutritionist.
    pub async fn list_patients(&self) -> Result<ApiResponse<Vec<PatientSummary>>> {
        self.get("patients").await
    }

    pub async fn get_patient(&self, patient_id: &str) -> Result<ApiResponse<PatientSummary>> {
        self.get(&format!("patients/{}", patient_id)).await
    }

    /// The intake record a patient submitted.
    pub async fn get_anamnesis(&self, patient_id: &str) -> Result<ApiResponse<IntakeRecord>> {
        self.get(&format!("patients/{}/anamnesis", patient_id)).await
    }

    pub async fn get_meal_plan(&self, patient_id: &str) -> Result<ApiResponse<MealPlan>> {
        self.get(&format!("patients/{}/meal-plan", patient_id)).await
    }

    pub async fn list_meals(&self, patient_id: &str) -> Result<ApiResponse<Vec<Meal>>> {
        self.get(&format!("patients/{}/meals", patient_id)).await
    }

    pub async fn create_meal(&self, meal: &NewMeal) -> Result<ApiResponse<Meal>> {
        self.send_json(Method::POST, "meals", meal).await
    }

    /// Replace an existing meal.
    pub async fn update_meal(&self, meal_id: &str, meal: &NewMeal) -> Result<ApiResponse<Meal>> {
        self.send_json(Method::PUT, &format!("meals/{}", meal_id), meal)
            .await
    }

    pub async fn delete_meal(&self, meal_id: &str) -> Result<()> {
        self.execute::<()>(Method::DELETE, &format!("meals/{}", meal_id), None)
            .await?;
        Ok(())
    }

    pub async fn list_checkins(&self, patient_id: &str) -> Result<ApiResponse<Vec<CheckIn>>> {
        self.get(&format!("patients/{}/checkins", patient_id)).await
    }

    pub async fn create_checkin(
        &self,
        patient_id: &str,
        checkin: &NewCheckIn,
    ) -> Result<ApiResponse<CheckIn>> {
        self.send_json(
            Method::POST,
            &format!("patients/{}/checkins", patient_id),
            checkin,
        )
        .await
    }

    /// Dashboard aggregates for the signed-in user's role.
    pub async fn get_dashboard(&self) -> Result<ApiResponse<DashboardSummary>> {
        let session = self.session().await?;
        let path = match session.role() {
            Role::Nutritionist => "dashboard/nutritionist",
            Role::Patient => "dashboard/patient",
        };
        self.get(path).await
    }

    pub async fn session(&self) -> Result<Session> {
        self.auth
            .current_session()
            .await
            .ok_or_else(|| anyhow!("Not signed in or session expired"))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.execute::<()>(Method::GET, path, None).await?;
        Ok(resp.json().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.execute(method, path, Some(body)).await?;
        Ok(resp.json().await?)
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let token = self.auth.access_token().await?;
        debug!(%method, path, "API request");

        let mut req: RequestBuilder = self
            .client
            .request(method.clone(), self.config.url(path))
            .bearer_auth(&token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(ApiError::new(method.as_str(), path, status, text).into());
        }

        Ok(resp)
    }
}

impl SubmitIntake for ZapNutreClient {
    fn submit_intake(&self, record: IntakeRecord) -> impl Future<Output = Result<()>> + Send {
        async move { self.submit_anamnesis(&record).await }
    }
}

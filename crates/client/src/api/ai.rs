//! AI assistant endpoints
//!
//! Analysis results are returned as raw JSON; their shape depends on the
//! configured AI provider on the backend.

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::chat::{AiResult, DiagnosisVerification, SymptomCheckRequest};
use medportal_core::{ChatbotRequest, ChatbotResponse};
use serde_json::json;

#[derive(Debug, Clone, Copy)]
pub struct AiApi<'a> {
    client: &'a PortalClient,
}

impl<'a> AiApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    pub async fn symptom_checker(
        &self,
        request: &SymptomCheckRequest,
    ) -> Result<AiResult, ClientError> {
        let request = ApiRequest::post("/ai/symptom-checker").json(request)?;
        self.client.send(request).await
    }

    pub async fn chatbot(&self, request: &ChatbotRequest) -> Result<ChatbotResponse, ClientError> {
        let request = ApiRequest::post("/ai/chatbot").json(request)?;
        self.client.send(request).await
    }

    pub async fn risk_assessment(&self, patient_id: i64) -> Result<AiResult, ClientError> {
        let request =
            ApiRequest::post("/ai/risk-assessment").json(&json!({ "patient_id": patient_id }))?;
        self.client.send(request).await
    }

    pub async fn treatment_recommendations(
        &self,
        diagnosis_id: i64,
    ) -> Result<AiResult, ClientError> {
        let request = ApiRequest::post("/ai/treatment-recommendations")
            .json(&json!({ "diagnosis_id": diagnosis_id }))?;
        self.client.send(request).await
    }

    pub async fn diagnoses(&self, patient_id: i64) -> Result<AiResult, ClientError> {
        self.client
            .send(ApiRequest::get(format!("/ai/diagnoses/{patient_id}")))
            .await
    }

    pub async fn verify_diagnosis(
        &self,
        diagnosis_id: i64,
        verification: &DiagnosisVerification,
    ) -> Result<AiResult, ClientError> {
        let request =
            ApiRequest::put(format!("/ai/verify-diagnosis/{diagnosis_id}")).json(verification)?;
        self.client.send(request).await
    }
}

//! Patient records

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::{ListParams, Page, Patient, PatientInput};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PatientEnvelope {
    patient: Patient,
}

#[derive(Debug, Clone, Copy)]
pub struct PatientsApi<'a> {
    client: &'a PortalClient,
}

impl<'a> PatientsApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<Patient>, ClientError> {
        let request = ApiRequest::get("/patients/").query(params)?;
        self.client.send(request).await
    }

    pub async fn get(&self, id: i64) -> Result<Patient, ClientError> {
        let envelope: PatientEnvelope = self
            .client
            .send(ApiRequest::get(format!("/patients/{id}")))
            .await?;
        Ok(envelope.patient)
    }

    pub async fn create(&self, data: &PatientInput) -> Result<Patient, ClientError> {
        let request = ApiRequest::post("/patients/").json(data)?;
        let envelope: PatientEnvelope = self.client.send(request).await?;
        Ok(envelope.patient)
    }

    pub async fn update(&self, id: i64, data: &PatientInput) -> Result<Patient, ClientError> {
        let request = ApiRequest::put(format!("/patients/{id}")).json(data)?;
        let envelope: PatientEnvelope = self.client.send(request).await?;
        Ok(envelope.patient)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client
            .send_empty(ApiRequest::delete(format!("/patients/{id}")))
            .await
    }
}

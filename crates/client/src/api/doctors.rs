use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::{Doctor, DoctorQuery, Page};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DoctorEnvelope {
    doctor: Doctor,
}

#[derive(Debug, Deserialize)]
struct Specializations {
    specializations: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct DoctorsApi<'a> {
    client: &'a PortalClient,
}

impl<'a> DoctorsApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &DoctorQuery) -> Result<Page<Doctor>, ClientError> {
        let request = ApiRequest::get("/doctors/").query(query)?;
        self.client.send(request).await
    }

    pub async fn get(&self, id: i64) -> Result<Doctor, ClientError> {
        let envelope: DoctorEnvelope = self
            .client
            .send(ApiRequest::get(format!("/doctors/{id}")))
            .await?;
        Ok(envelope.doctor)
    }

    pub async fn specializations(&self) -> Result<Vec<String>, ClientError> {
        let body: Specializations = self
            .client
            .send(ApiRequest::get("/doctors/specializations"))
            .await?;
        Ok(body.specializations)
    }
}

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use medportal_core::{Appointment, AppointmentInput, AppointmentQuery, Page};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AppointmentEnvelope {
    appointment: Appointment,
}

#[derive(Debug, Clone, Copy)]
pub struct AppointmentsApi<'a> {
    client: &'a PortalClient,
}

impl<'a> AppointmentsApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &AppointmentQuery) -> Result<Page<Appointment>, ClientError> {
        let request = ApiRequest::get("/appointments/").query(query)?;
        self.client.send(request).await
    }

    pub async fn create(&self, data: &AppointmentInput) -> Result<Appointment, ClientError> {
        let request = ApiRequest::post("/appointments/").json(data)?;
        let envelope: AppointmentEnvelope = self.client.send(request).await?;
        Ok(envelope.appointment)
    }

    pub async fn update(
        &self,
        id: i64,
        data: &AppointmentInput,
    ) -> Result<Appointment, ClientError> {
        let request = ApiRequest::put(format!("/appointments/{id}")).json(data)?;
        let envelope: AppointmentEnvelope = self.client.send(request).await?;
        Ok(envelope.appointment)
    }
}

//! Hospital portal endpoints
//!
//! The hospital portal keeps its own session under the `hospital_*` keys,
//! always in durable storage, independent of the patient session.

use crate::client::PortalClient;
use crate::error::ClientError;
use crate::request::ApiRequest;
use crate::storage::{StorageArea, keys};
use medportal_core::{
    Doctor, Hospital, HospitalLoginResponse, HospitalProfileResponse, Page, StaffMember,
    StaffQuery,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct HospitalEnvelope {
    hospital: Hospital,
}

#[derive(Debug, Clone, Copy)]
pub struct HospitalApi<'a> {
    client: &'a PortalClient,
}

impl<'a> HospitalApi<'a> {
    pub(crate) const fn new(client: &'a PortalClient) -> Self {
        Self { client }
    }

    /// `POST /hospital-auth/login` and store the hospital session durably
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<HospitalLoginResponse, ClientError> {
        let request = ApiRequest::post("/hospital-auth/login")
            .public()
            .json(&json!({ "email": email, "password": password }))?;
        let response: HospitalLoginResponse = self.client.send(request).await?;

        let storages = self.client.storages();
        let area = StorageArea::Durable;
        storages.set(area, keys::HOSPITAL_ACCESS_TOKEN, &response.access_token)?;
        storages.set(area, keys::HOSPITAL_REFRESH_TOKEN, &response.refresh_token)?;
        storages.set(area, keys::HOSPITAL_USER, &serde_json::to_string(&response.user)?)?;
        storages.set(
            area,
            keys::HOSPITAL_DATA,
            &serde_json::to_string(&response.hospital)?,
        )?;
        info!(user_id = response.user.id, "hospital portal logged in");
        Ok(response)
    }

    /// Remove every `hospital_*` entry; the patient session is untouched
    pub fn logout(&self) -> Result<(), ClientError> {
        let durable = self.client.storages().area(StorageArea::Durable);
        for key in keys::HOSPITAL_ENTRIES {
            durable.remove(key)?;
        }
        Ok(())
    }

    /// Hospital record cached at login, if any
    pub fn stored_hospital(&self) -> Option<Hospital> {
        let raw = self
            .client
            .storages()
            .get(StorageArea::Durable, keys::HOSPITAL_DATA)?;
        match serde_json::from_str::<Option<Hospital>>(&raw) {
            Ok(hospital) => hospital,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable cached hospital");
                None
            }
        }
    }

    pub async fn profile(&self) -> Result<HospitalProfileResponse, ClientError> {
        self.client
            .send(ApiRequest::get("/hospital-auth/hospital-profile"))
            .await
    }

    pub async fn staff(&self, query: &StaffQuery) -> Result<Page<StaffMember>, ClientError> {
        let request = ApiRequest::get("/hospital/staff").query(query)?;
        self.client.send(request).await
    }

    pub async fn toggle_staff_status(&self, staff_id: i64) -> Result<Value, ClientError> {
        self.client
            .send(ApiRequest::put(format!(
                "/hospital/staff/{staff_id}/toggle-status"
            )))
            .await
    }

    /// Listed hospitals, as shown to patients choosing where to book
    pub async fn hospitals(&self) -> Result<Page<Hospital>, ClientError> {
        self.client
            .send(ApiRequest::get("/hospital-auth/hospitals"))
            .await
    }

    pub async fn hospital(&self, id: i64) -> Result<Hospital, ClientError> {
        let envelope: HospitalEnvelope = self
            .client
            .send(ApiRequest::get(format!("/hospital-auth/hospitals/{id}")))
            .await?;
        Ok(envelope.hospital)
    }

    pub async fn hospital_doctors(&self, id: i64) -> Result<Page<Doctor>, ClientError> {
        self.client
            .send(ApiRequest::get(format!(
                "/hospital-auth/hospitals/{id}/doctors"
            )))
            .await
    }
}

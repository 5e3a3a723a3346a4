//! Endpoint groups
//!
//! Thin typed wrappers over [`PortalClient::send`]; they shape paths and
//! payloads and carry no other logic.

pub mod admin;
pub mod ai;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod hospital;
pub mod patients;

use crate::client::PortalClient;

pub use admin::AdminApi;
pub use ai::AiApi;
pub use appointments::AppointmentsApi;
pub use auth::AuthApi;
pub use doctors::DoctorsApi;
pub use hospital::HospitalApi;
pub use patients::PatientsApi;

impl PortalClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn patients(&self) -> PatientsApi<'_> {
        PatientsApi::new(self)
    }

    pub fn doctors(&self) -> DoctorsApi<'_> {
        DoctorsApi::new(self)
    }

    pub fn appointments(&self) -> AppointmentsApi<'_> {
        AppointmentsApi::new(self)
    }

    pub fn ai(&self) -> AiApi<'_> {
        AiApi::new(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn hospital(&self) -> HospitalApi<'_> {
        HospitalApi::new(self)
    }
}

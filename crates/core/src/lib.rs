//! MedPortal core types and utilities

pub mod auth;
pub mod chat;
pub mod error;
pub mod records;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use auth::{
    HospitalLoginResponse, HospitalProfileResponse, LoginIdentifier, LoginRequest, LoginResponse,
    ProfileResponse, RefreshResponse, RegisterData, User,
};
pub use chat::{ChatRole, ChatTurn, ChatbotReply, ChatbotRequest, ChatbotResponse};
pub use error::{CoreError, CoreResult};
pub use records::{
    Appointment, AppointmentInput, AppointmentQuery, Doctor, DoctorQuery, Hospital, ListParams,
    Listed, Page, Patient, PatientInput, StaffMember, StaffQuery,
};

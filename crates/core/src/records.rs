//! Domain records returned by the feature endpoints
//!
//! The backend adds fields freely, so every record keeps unknown keys in a
//! flattened `extra` map instead of failing to decode.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Records that appear in paginated list responses under a fixed key
pub trait Listed: DeserializeOwned {
    /// Key of the item array in the list response, e.g. `"patients"`
    const LIST_KEY: &'static str;
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
    pub per_page: u64,
}

impl<'de, T: Listed> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        let raw_items = body
            .remove(T::LIST_KEY)
            .ok_or_else(|| D::Error::missing_field(T::LIST_KEY))?;
        let items: Vec<T> = serde_json::from_value(raw_items).map_err(D::Error::custom)?;

        let field = |name: &str| body.get(name).and_then(Value::as_u64);
        let total = field("total").unwrap_or(items.len() as u64);
        let per_page = field("per_page").unwrap_or(items.len() as u64);

        Ok(Self {
            total,
            pages: field("pages").unwrap_or(1),
            current_page: field("current_page").unwrap_or(1),
            per_page,
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hospital_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listed for Patient {
    const LIST_KEY: &'static str = "patients";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(default)]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub consultation_fee: Option<f64>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listed for Doctor {
    const LIST_KEY: &'static str = "doctors";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub appointment_id: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listed for Appointment {
    const LIST_KEY: &'static str = "appointments";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listed for Hospital {
    const LIST_KEY: &'static str = "hospitals";
}

/// A member of a hospital's staff as listed by the hospital portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listed for StaffMember {
    const LIST_KEY: &'static str = "staff";
}

impl Listed for crate::auth::User {
    const LIST_KEY: &'static str = "users";
}

/// Pagination and search parameters shared by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DoctorQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_only: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaffQuery {
    #[serde(flatten)]
    pub list: ListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Body for creating or updating a patient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

/// Body for booking or rescheduling an appointment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_reads_items_under_the_record_key() {
        let page: Page<Doctor> = serde_json::from_value(json!({
            "doctors": [{"id": 3, "full_name": "Dr. Rao", "specialization": "Cardiology"}],
            "total": 21,
            "pages": 3,
            "current_page": 2,
            "per_page": 10
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].specialization.as_deref(), Some("Cardiology"));
        assert_eq!(page.total, 21);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn page_without_pagination_fields_describes_itself() {
        let page: Page<Hospital> = serde_json::from_value(json!({
            "hospitals": [{"id": 1, "name": "City"}, {"id": 2, "name": "North"}]
        }))
        .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn page_missing_its_key_is_rejected() {
        let result: Result<Page<Patient>, _> = serde_json::from_value(json!({"doctors": []}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_preserved() {
        let patient: Patient = serde_json::from_value(json!({
            "id": 9,
            "allergies": "penicillin"
        }))
        .unwrap();
        assert_eq!(patient.extra["allergies"], "penicillin");
    }

    #[test]
    fn query_params_skip_unset_filters() {
        let query = DoctorQuery {
            list: ListParams {
                page: Some(2),
                ..ListParams::default()
            },
            available_only: Some(true),
            ..DoctorQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, json!({"page": 2, "available_only": true}));
    }
}

//! Request description replayed by the pipeline
//!
//! A request is kept as plain data so the pipeline can build it again for the
//! retry after a token refresh.

use crate::error::ClientError;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// How a request is authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAuth {
    /// Bearer token from the credential policy, refreshed once on 401
    Session,
    /// No bearer token and no refresh cycle (login, registration)
    Public,
}

/// Which pass over a request this is
///
/// The value is handed to each exchange and never modified; a second refresh
/// is impossible because only [`Attempt::Initial`] can ask for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    /// Replay after a refresh, carrying the freshly minted access token
    Retried { access_token: String },
}

impl Attempt {
    pub const fn may_refresh(&self) -> bool {
        matches!(self, Self::Initial)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) auth: RequestAuth,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            auth: RequestAuth::Session,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Send without credentials and skip the refresh cycle
    pub fn public(mut self) -> Self {
        self.auth = RequestAuth::Public;
        self
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append query parameters from a flat serializable struct
    ///
    /// `None`/`null` fields are skipped; strings are sent verbatim and other
    /// scalars use their JSON text (`true`, `10`).
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ClientError> {
        match serde_json::to_value(params)? {
            Value::Object(map) => {
                for (key, value) in map {
                    match value {
                        Value::Null => {}
                        Value::String(s) => self.query.push((key, s)),
                        other => self.query.push((key, other.to_string())),
                    }
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(ClientError::Configuration(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn auth(&self) -> RequestAuth {
        self.auth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medportal_core::{DoctorQuery, ListParams};

    #[test]
    fn query_flattens_and_skips_unset_fields() {
        let query = DoctorQuery {
            list: ListParams {
                page: Some(1),
                search: Some("card io".into()),
                ..ListParams::default()
            },
            available_only: Some(false),
            ..DoctorQuery::default()
        };
        let request = ApiRequest::get("/doctors/").query(&query).unwrap();
        let mut pairs = request.query.clone();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("available_only".to_string(), "false".to_string()),
                ("page".to_string(), "1".to_string()),
                ("search".to_string(), "card io".to_string()),
            ]
        );
    }

    #[test]
    fn non_object_query_is_rejected() {
        let result = ApiRequest::get("/x").query(&[1, 2]);
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }

    #[test]
    fn only_initial_attempt_may_refresh() {
        assert!(Attempt::Initial.may_refresh());
        assert!(
            !Attempt::Retried {
                access_token: "A2".into()
            }
            .may_refresh()
        );
    }

    #[test]
    fn requests_default_to_session_auth() {
        assert_eq!(ApiRequest::get("/auth/profile").auth(), RequestAuth::Session);
        assert_eq!(
            ApiRequest::post("/auth/login").public().auth(),
            RequestAuth::Public
        );
    }
}

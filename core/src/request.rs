//! Per-call inputs: path parameters, query, headers and the JSON body.

use serde::Serialize;

use crate::error::ApiError;
use crate::models::patch::Patch;

pub(crate) const JSON: &str = "application/json";
pub(crate) const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// A serialized request body and the content type it is sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    pub json: String,
    pub content_type: &'static str,
}

/// Inputs for a single operation call.
///
/// Path parameters are matched by placeholder name against the operation's
/// template; `version` and `generation` are added by the client and must not
/// be set here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for the common single `{id}` parameter.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new().path_param("id", id)
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.path_params.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.path_params.push((name, value)),
        }
        self
    }

    /// Append a query parameter. Repeated names are all sent.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Replace every query parameter called `name` with a single value.
    pub fn set_query(&mut self, name: &str, value: impl Into<String>) {
        self.query.retain(|(k, _)| k != name);
        self.query.push((name.to_string(), value.into()));
    }

    pub fn start(self, token: impl Into<String>) -> Self {
        self.query("start", token)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.query("limit", limit.to_string())
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(RequestBody {
            json,
            content_type: JSON,
        });
        Ok(self)
    }

    /// Send only the set fields of `patch`, as a JSON merge patch.
    pub fn patch<P: Patch>(mut self, patch: &P) -> Result<Self, ApiError> {
        let map = patch.as_patch()?;
        let json = serde_json::to_string(&map).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(RequestBody {
            json,
            content_type: MERGE_PATCH_JSON,
        });
        Ok(self)
    }

    /// The value for placeholder `name`, which must be present and non-empty.
    /// `.` and `..` are refused since they cannot stand as a path segment.
    pub fn require_path_param(&self, name: &str) -> Result<&str, ApiError> {
        let value = self
            .path_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::MissingParameter(name.to_string()))?;
        if value == "." || value == ".." {
            return Err(ApiError::InvalidField(
                "path parameter",
                format!("`{name}` cannot be `{value}`"),
            ));
        }
        Ok(value)
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patch::NamePatch;

    #[test]
    fn path_param_replaces_existing_value() {
        let options = RequestOptions::with_id("a").path_param("id", "b");
        assert_eq!(options.require_path_param("id").unwrap(), "b");
    }

    #[test]
    fn empty_path_param_is_missing() {
        let options = RequestOptions::with_id("");
        let err = options.require_path_param("id").unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter(name) if name == "id"));
    }

    #[test]
    fn dot_segments_are_refused() {
        for value in [".", ".."] {
            let err = RequestOptions::with_id(value).require_path_param("id").unwrap_err();
            assert!(matches!(err, ApiError::InvalidField("path parameter", _)), "{value}");
        }
        let options = RequestOptions::with_id("...");
        assert_eq!(options.require_path_param("id").unwrap(), "...");
    }

    #[test]
    fn set_query_replaces_all_values() {
        let mut options = RequestOptions::new().start("a").start("b").limit(10);
        options.set_query("start", "c");
        assert_eq!(options.query_value("start"), Some("c"));
        assert_eq!(options.query_pairs().len(), 2);
    }

    #[test]
    fn patch_uses_merge_patch_content_type() {
        let options = RequestOptions::new().patch(&NamePatch::name("renamed")).unwrap();
        let body = options.request_body().unwrap();
        assert_eq!(body.content_type, MERGE_PATCH_JSON);
        assert_eq!(body.json, r#"{"name":"renamed"}"#);
    }

    #[test]
    fn body_serializes_as_json() {
        let options = RequestOptions::new()
            .body(&serde_json::json!({"name": "my-vpc"}))
            .unwrap();
        let body = options.request_body().unwrap();
        assert_eq!(body.content_type, JSON);
        assert_eq!(body.json, r#"{"name":"my-vpc"}"#);
    }
}

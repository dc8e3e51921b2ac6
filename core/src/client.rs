//! Stateless request builder and response parser for the VPC classic API.
//!
//! # Design
//! `VpcClassicClient` holds only its configuration and carries no mutable
//! state between calls. `build` turns an `Operation` plus `RequestOptions`
//! into an `HttpRequest`; the `parse*` methods consume the matching
//! `HttpResponse`. The caller (or `VpcClassicService`) executes the
//! round-trip in between.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{service_message, ApiError};
use crate::http::{HttpRequest, HttpResponse};
use crate::operation::{placeholder, Operation};
use crate::pagination::{Collection, PageFields};
use crate::request::{RequestOptions, JSON};

const USER_AGENT: &str = concat!("vpc-classic-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// A parsed result together with the response it came from.
#[derive(Debug, Clone)]
pub struct DetailedResponse<T> {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub result: T,
}

#[derive(Debug, Clone)]
pub struct VpcClassicClient {
    config: ServiceConfig,
    base_url: Url,
}

impl VpcClassicClient {
    pub fn new(config: ServiceConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.service_url)
            .map_err(|e| ApiError::Config(format!("invalid service URL `{}`: {e}", config.service_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "service URL `{}` cannot carry a path",
                config.service_url
            )));
        }
        Ok(Self { config, base_url })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn build(&self, op: Operation, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Config("service URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            for segment in op.path_template().trim_start_matches('/').split('/') {
                match placeholder(segment) {
                    Some(name) => segments.push(options.require_path_param(name)?),
                    None => segments.push(segment),
                };
            }
        }
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("version", &self.config.version)
                .append_pair("generation", &self.config.generation.to_string());
            for (name, value) in options.query_pairs() {
                query.append_pair(name, value);
            }
        }

        let body = match (op.takes_body(), options.request_body()) {
            (true, None) => return Err(ApiError::MissingBody(op.name())),
            (true, Some(body)) => Some(body),
            (false, Some(_)) => {
                debug!("{}: ignoring request body, operation takes none", op.name());
                None
            }
            (false, None) => None,
        };

        let mut headers = vec![
            ("Accept".to_string(), JSON.to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(value) = self.config.authenticator.authorization() {
            headers.push(("Authorization".to_string(), value));
        }
        headers.extend(self.config.default_headers.iter().cloned());
        headers.extend(options.headers().iter().cloned());
        if let Some(body) = body {
            headers.push(("Content-Type".to_string(), body.content_type.to_string()));
        }

        let request = HttpRequest {
            method: op.method(),
            url: url.into(),
            headers,
            body: body.map(|b| b.json.clone()),
        };
        debug!("{}: {} {}", op.name(), request.method, request.url);
        Ok(request)
    }

    pub fn parse<T: DeserializeOwned>(&self, op: Operation, response: HttpResponse) -> Result<T, ApiError> {
        check_status(op, &response)?;
        decode(op, &response.body)
    }

    pub fn parse_detailed<T: DeserializeOwned>(
        &self,
        op: Operation,
        response: HttpResponse,
    ) -> Result<DetailedResponse<T>, ApiError> {
        check_status(op, &response)?;
        let result = decode(op, &response.body)?;
        Ok(DetailedResponse {
            status: response.status,
            headers: response.headers,
            result,
        })
    }

    /// Parse a list operation's page, taking items from its collection key.
    pub fn parse_collection<T: DeserializeOwned>(
        &self,
        op: Operation,
        response: HttpResponse,
    ) -> Result<Collection<T>, ApiError> {
        let key = op.collection_key().ok_or_else(|| {
            ApiError::Deserialization(format!("{} does not return a collection", op.name()))
        })?;
        check_status(op, &response)?;
        let mut value: Value = decode(op, &response.body)?;
        let items = match value.get_mut(key) {
            Some(items) => serde_json::from_value(items.take())
                .map_err(|e| ApiError::Deserialization(format!("{}.{key}: {e}", op.name())))?,
            None => Vec::new(),
        };
        let page: PageFields = serde_json::from_value(value)
            .map_err(|e| ApiError::Deserialization(format!("{}: {e}", op.name())))?;
        Ok(Collection {
            items,
            first: page.first,
            next: page.next,
            limit: page.limit,
            total_count: page.total_count,
        })
    }

    /// Check the status of an operation with no response body.
    pub fn parse_empty(&self, op: Operation, response: HttpResponse) -> Result<(), ApiError> {
        check_status(op, &response)
    }
}

fn decode<T: DeserializeOwned>(op: Operation, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(format!("{}: {e}", op.name())))
}

/// Map anything but the operation's success status to an `ApiError`.
fn check_status(op: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    debug!("{}: HTTP {}", op.name(), response.status);
    if response.status == op.expected_status() {
        return Ok(());
    }
    let message = service_message(&response.body);
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    warn!(
        "{}: expected HTTP {}, got {}: {message}",
        op.name(),
        op.expected_status(),
        response.status
    );
    Err(ApiError::Http {
        status: response.status,
        message,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;
    use crate::http::HttpMethod;
    use crate::models::{NamePatch, Vpc, VpcPrototype};

    fn client() -> VpcClassicClient {
        let config = ServiceConfig::new(Authenticator::BearerToken("token".to_string()))
            .with_service_url("http://localhost:3000/v1");
        VpcClassicClient::new(config).unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const VPC_JSON: &str = r#"{"id":"r006-1","crn":"crn:v1:vpc:r006-1","href":"http://localhost:3000/v1/vpcs/r006-1","name":"my-vpc","created_at":"2020-06-02T12:00:00Z"}"#;

    #[test]
    fn build_list_vpcs_produces_correct_request() {
        let req = client().build(Operation::ListVpcs, &RequestOptions::new()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/v1/vpcs?version=2020-06-02&generation=1");
        assert!(req.body.is_none());
        assert_eq!(req.header("authorization"), Some("Bearer token"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_substitutes_and_encodes_path_params() {
        let options = RequestOptions::new()
            .path_param("vpn_gateway_id", "gw 1")
            .path_param("id", "conn/1")
            .path_param("prefix_address", "192.168.1.0")
            .path_param("prefix_length", "24");
        let req = client()
            .build(Operation::AddVpnGatewayConnectionPeerCidr, &options)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.url,
            "http://localhost:3000/v1/vpn_gateways/gw%201/connections/conn%2F1/peer_cidrs/192.168.1.0/24?version=2020-06-02&generation=1"
        );
    }

    #[test]
    fn build_rejects_dot_segments_in_path_params() {
        for id in [".", ".."] {
            let err = client()
                .build(Operation::GetVpc, &RequestOptions::with_id(id))
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidField("path parameter", _)), "{id}: {err:?}");
        }

        let options = RequestOptions::new().path_param("vpc_id", "v").path_param("id", "..");
        let err = client().build(Operation::DeleteVpcRoute, &options).unwrap_err();
        assert!(matches!(err, ApiError::InvalidField("path parameter", _)), "{err:?}");
    }

    #[test]
    fn build_appends_extra_query_after_version() {
        let options = RequestOptions::new().limit(5).query("resource_group.id", "rg-1");
        let req = client().build(Operation::ListVpcs, &options).unwrap();
        assert!(req
            .url
            .ends_with("?version=2020-06-02&generation=1&limit=5&resource_group.id=rg-1"));
    }

    #[test]
    fn build_without_required_param_fails() {
        let err = client().build(Operation::GetVpc, &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter(name) if name == "id"));
    }

    #[test]
    fn build_without_required_body_fails() {
        let err = client().build(Operation::CreateVpc, &RequestOptions::new()).unwrap_err();
        assert!(matches!(err, ApiError::MissingBody("CreateVpc")));
    }

    #[test]
    fn build_create_vpc_serializes_body() {
        let options = RequestOptions::new().body(&VpcPrototype::named("my-vpc")).unwrap();
        let req = client().build(Operation::CreateVpc, &options).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"name": "my-vpc"}));
    }

    #[test]
    fn build_update_sends_merge_patch() {
        let options = RequestOptions::with_id("r006-1")
            .patch(&NamePatch::name("renamed"))
            .unwrap();
        let req = client().build(Operation::UpdateVpc, &options).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.header("content-type"), Some("application/merge-patch+json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"renamed"}"#));
    }

    #[test]
    fn build_drops_body_for_operations_without_one() {
        let options = RequestOptions::with_id("r006-1")
            .body(&serde_json::json!({"x": 1}))
            .unwrap();
        let req = client().build(Operation::DeleteVpc, &options).unwrap();
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn per_call_headers_follow_defaults() {
        let config = ServiceConfig::new(Authenticator::NoAuth)
            .with_service_url("http://localhost:3000/v1")
            .with_header("X-Default", "1");
        let client = VpcClassicClient::new(config).unwrap();
        let req = client
            .build(Operation::ListKeys, &RequestOptions::new().header("X-Request", "2"))
            .unwrap();
        let names: Vec<&str> = req.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Accept", "User-Agent", "X-Default", "X-Request"]);
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ServiceConfig::new(Authenticator::NoAuth).with_service_url("http://localhost:3000/v1/");
        let req = VpcClassicClient::new(config)
            .unwrap()
            .build(Operation::ListRegions, &RequestOptions::new())
            .unwrap();
        assert!(req.url.starts_with("http://localhost:3000/v1/regions?"));
    }

    #[test]
    fn invalid_service_url_is_rejected() {
        let config = ServiceConfig::new(Authenticator::NoAuth).with_service_url("not a url");
        assert!(matches!(VpcClassicClient::new(config).unwrap_err(), ApiError::Config(_)));
        let config = ServiceConfig::new(Authenticator::NoAuth).with_service_url("mailto:ops@example.com");
        assert!(matches!(VpcClassicClient::new(config).unwrap_err(), ApiError::Config(_)));
    }

    #[test]
    fn parse_get_vpc_success() {
        let vpc: Vpc = client().parse(Operation::GetVpc, response(200, VPC_JSON)).unwrap();
        assert_eq!(vpc.id, "r006-1");
        assert_eq!(vpc.name, "my-vpc");
    }

    #[test]
    fn parse_create_vpc_wrong_status() {
        let err = client()
            .parse::<Vpc>(
                Operation::CreateVpc,
                response(400, r#"{"errors":[{"code":"bad_request","message":"name is invalid"}]}"#),
            )
            .unwrap_err();
        match err {
            ApiError::Http { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "name is invalid");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_not_found() {
        let err = client()
            .parse::<Vpc>(Operation::GetVpc, response(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn parse_bad_json() {
        let err = client()
            .parse::<Vpc>(Operation::GetVpc, response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(msg) if msg.starts_with("GetVpc")));
    }

    #[test]
    fn parse_detailed_keeps_headers() {
        let mut resp = response(201, VPC_JSON);
        resp.headers.push(("X-Request-Id".to_string(), "req-1".to_string()));
        let detailed = client().parse_detailed::<Vpc>(Operation::CreateVpc, resp).unwrap();
        assert_eq!(detailed.status, 201);
        assert_eq!(detailed.headers[0].1, "req-1");
        assert_eq!(detailed.result.name, "my-vpc");
    }

    #[test]
    fn parse_collection_reads_items_and_links() {
        let body = format!(
            r#"{{"vpcs":[{VPC_JSON}],"limit":1,"total_count":3,"first":{{"href":"http://localhost:3000/v1/vpcs?limit=1"}},"next":{{"href":"http://localhost:3000/v1/vpcs?limit=1&start=r006-2"}}}}"#
        );
        let page: Collection<Vpc> = client()
            .parse_collection(Operation::ListVpcs, response(200, &body))
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.limit, Some(1));
        assert_eq!(page.total_count, Some(3));
        assert_eq!(page.next_start().as_deref(), Some("r006-2"));
    }

    #[test]
    fn parse_collection_rejects_non_list_operation() {
        let err = client()
            .parse_collection::<Vpc>(Operation::GetVpc, response(200, VPC_JSON))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_delete_vpc_success_and_not_found() {
        assert!(client().parse_empty(Operation::DeleteVpc, response(204, "")).is_ok());
        let err = client()
            .parse_empty(Operation::DeleteVpc, response(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn check_cidr_accepts_no_content() {
        assert!(client()
            .parse_empty(Operation::CheckVpnGatewayConnectionLocalCidr, response(204, ""))
            .is_ok());
    }
}

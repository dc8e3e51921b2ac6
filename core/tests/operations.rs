//! Every operation of the table builds a well-formed request.

use serde_json::json;
use vpc_classic_core::{ApiError, Authenticator, HttpMethod, Operation, RequestOptions, ServiceConfig, VpcClassicClient};

fn client() -> VpcClassicClient {
    let config = ServiceConfig::new(Authenticator::NoAuth).with_service_url("https://us-south.iaas.cloud.ibm.com/v1");
    VpcClassicClient::new(config).unwrap()
}

/// Options filling each path placeholder with `<name>-value`.
fn complete_options(op: Operation) -> RequestOptions {
    let mut options = RequestOptions::new();
    for param in op.path_params() {
        options = options.path_param(param, format!("{param}-value"));
    }
    if op.takes_body() {
        options = options.body(&json!({"name": "n"})).unwrap();
    }
    options
}

#[test]
fn every_operation_builds() {
    let c = client();
    for &op in Operation::ALL {
        let req = c.build(op, &complete_options(op)).unwrap();
        let name = op.name();

        let expected_path: String = op
            .path_template()
            .split('/')
            .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => format!("{param}-value"),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/");
        let expected_url = format!(
            "https://us-south.iaas.cloud.ibm.com/v1{expected_path}?version=2020-06-02&generation=1"
        );
        assert_eq!(req.url, expected_url, "{name}");
        assert_eq!(req.method, op.method(), "{name}");
        assert_eq!(req.body.is_some(), op.takes_body(), "{name}");
        assert_eq!(req.header("Content-Type").is_some(), op.takes_body(), "{name}");
        assert_eq!(req.header("Accept"), Some("application/json"), "{name}");
        assert!(req.header("Authorization").is_none(), "{name}");
    }
}

#[test]
fn every_path_parameter_is_required() {
    let c = client();
    for &op in Operation::ALL {
        for missing in op.path_params() {
            let mut options = RequestOptions::new();
            for param in op.path_params().into_iter().filter(|p| *p != missing) {
                options = options.path_param(param, "v");
            }
            if op.takes_body() {
                options = options.body(&json!({})).unwrap();
            }
            let err = c.build(op, &options).unwrap_err();
            assert!(
                matches!(&err, ApiError::MissingParameter(name) if name == missing),
                "{}: expected missing {missing}, got {err:?}",
                op.name()
            );
        }
    }
}

#[test]
fn every_body_operation_requires_a_body() {
    let c = client();
    for &op in Operation::ALL.iter().filter(|op| op.takes_body()) {
        let mut options = RequestOptions::new();
        for param in op.path_params() {
            options = options.path_param(param, "v");
        }
        let err = c.build(op, &options).unwrap_err();
        assert!(matches!(err, ApiError::MissingBody(name) if name == op.name()), "{}", op.name());
    }
}

#[test]
fn list_operations_are_gets() {
    for &op in Operation::ALL.iter().filter(|op| op.is_list()) {
        assert_eq!(op.method(), HttpMethod::Get, "{}", op.name());
        assert_eq!(op.expected_status(), 200, "{}", op.name());
        assert!(!op.takes_body(), "{}", op.name());
    }
}

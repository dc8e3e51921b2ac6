//! Polling a resource until it reaches a lifecycle status.
//!
//! Instances, subnets, volume attachments, load balancers and VPN gateways
//! are created asynchronously and must reach a status such as `available` or
//! `running` before dependent calls succeed.

use std::thread;
use std::time::Duration;

use log::info;

use crate::error::ApiError;
use crate::http::Transport;
use crate::models::Resource;
use crate::operation::Operation;
use crate::request::RequestOptions;
use crate::service::VpcClassicService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waiter {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for Waiter {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(60),
        }
    }
}

impl Waiter {
    /// `attempts` below one is raised to one: every wait makes at least one call.
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    /// Repeat `op` until the returned resource's status equals `wanted`.
    ///
    /// Errors from the call end polling immediately. When attempts run out
    /// the last seen status is reported in `ApiError::Timeout`.
    pub fn wait<T: Transport>(
        &self,
        service: &VpcClassicService<T>,
        op: Operation,
        options: &RequestOptions,
        wanted: &str,
    ) -> Result<Resource, ApiError> {
        let attempts = self.attempts.max(1);
        let mut last = String::new();
        for attempt in 1..=attempts {
            let resource: Resource = service.call(op, options)?;
            let status = resource.status.clone().unwrap_or_default();
            if status == wanted {
                info!("{}: reached status `{wanted}` after {attempt} attempt(s)", op.name());
                return Ok(resource);
            }
            info!(
                "{}: status `{status}`, waiting for `{wanted}` (attempt {attempt}/{})",
                op.name(),
                attempts
            );
            last = status;
            if attempt < attempts {
                thread::sleep(self.interval);
            }
        }
        Err(ApiError::Timeout {
            wanted: wanted.to_string(),
            last,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::auth::Authenticator;
    use crate::client::VpcClassicClient;
    use crate::config::ServiceConfig;
    use crate::http::{HttpRequest, HttpResponse};

    struct Statuses(RefCell<Vec<&'static str>>);

    impl Transport for Statuses {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let status = self.0.borrow_mut().remove(0);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!(r#"{{"id":"i-1","status":"{status}"}}"#),
            })
        }
    }

    fn service(statuses: &[&'static str]) -> VpcClassicService<Statuses> {
        let config = ServiceConfig::new(Authenticator::NoAuth).with_service_url("http://mock/v1");
        VpcClassicService::new(
            VpcClassicClient::new(config).unwrap(),
            Statuses(RefCell::new(statuses.to_vec())),
        )
    }

    #[test]
    fn returns_once_status_matches() {
        let service = service(&["pending", "starting", "running"]);
        let resource = Waiter::new(5, Duration::ZERO)
            .wait(&service, Operation::GetInstance, &RequestOptions::with_id("i-1"), "running")
            .unwrap();
        assert_eq!(resource.status.as_deref(), Some("running"));
    }

    #[test]
    fn times_out_with_last_status() {
        let service = service(&["pending", "pending"]);
        let err = Waiter::new(2, Duration::ZERO)
            .wait(&service, Operation::GetInstance, &RequestOptions::with_id("i-1"), "running")
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout { wanted, last } if wanted == "running" && last == "pending"));
    }

    #[test]
    fn zero_attempts_still_polls_once() {
        let waiter = Waiter::new(0, Duration::ZERO);
        assert_eq!(waiter.attempts, 1);
        let resource = waiter
            .wait(&service(&["available"]), Operation::GetSubnet, &RequestOptions::with_id("s-1"), "available")
            .unwrap();
        assert_eq!(resource.status.as_deref(), Some("available"));

        let literal = Waiter {
            attempts: 0,
            interval: Duration::ZERO,
        };
        let err = literal
            .wait(&service(&["pending"]), Operation::GetSubnet, &RequestOptions::with_id("s-1"), "available")
            .unwrap_err();
        assert!(matches!(err, ApiError::Timeout { last, .. } if last == "pending"));
    }

    #[test]
    fn call_errors_stop_polling() {
        let service = service(&[]);
        let err = Waiter::new(3, Duration::ZERO)
            .wait(&service, Operation::GetSubnet, &RequestOptions::new(), "available")
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingParameter(_)));
    }
}

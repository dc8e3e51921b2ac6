//! In-memory emulation of the VPC classic API.
//!
//! # Design
//! Resources live in flat collections keyed by their collection path
//! (`vpcs`, `vpcs/r006-1/address_prefixes`, ...). A request path is mapped
//! onto a `Route` and handled generically, so every operation of the API is
//! served without per-endpoint code. The few sub-resources that are not
//! collections (subnet bindings, statistics, VPN CIDRs) get their own routes.

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::Serialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

/// Sub-resources addressed as `/{parent}/{id}/{name}` that hold one value.
const SINGLETONS: &[&str] = &[
    "default_security_group",
    "network_acl",
    "public_gateway",
    "initialization",
    "statistics",
];

const IMMUTABLE: &[&str] = &["id", "crn", "href", "created_at"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
}

/// What the store answers: a status and an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Reply {
    fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    fn error(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self::json(
            status,
            json!({
                "errors": [{"code": code, "message": message.into()}],
                "trace": Uuid::new_v4().to_string(),
            }),
        )
    }

    fn not_found(what: &str) -> Self {
        Self::error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
    }
}

/// One incoming call, already split into its parts.
pub struct Call<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub query: &'a HashMap<String, String>,
    pub body: &'a [u8],
    /// Absolute URL prefix for generated links, e.g. `http://127.0.0.1:3000/v1`.
    pub base_url: &'a str,
}

#[derive(Debug, PartialEq)]
enum Route {
    Collection { key: String },
    Item { key: String, id: String },
    Singleton { parent_key: String, parent_id: String, name: String },
    Cidr { key: String, cidr: String },
}

impl Route {
    fn parse(path: &str) -> Option<Route> {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.first().map(String::as_str) == Some("v1") {
            segments.remove(0);
        }
        // `instance/profiles` and `volume/profiles` are top-level collections.
        if segments.len() >= 2 && (segments[0] == "instance" || segments[0] == "volume") {
            let merged = format!("{}/{}", segments[0], segments[1]);
            segments.splice(0..2, [merged]);
        }
        if segments.is_empty() {
            return None;
        }

        let len = segments.len();
        if let Some(pos) = segments
            .iter()
            .position(|s| s == "local_cidrs" || s == "peer_cidrs")
        {
            if len == pos + 3 {
                return Some(Route::Cidr {
                    key: segments[..=pos].join("/"),
                    cidr: format!("{}/{}", segments[pos + 1], segments[pos + 2]),
                });
            }
            if len != pos + 1 {
                return None;
            }
        }

        let last = segments[len - 1].clone();
        if len % 2 == 1 {
            if len >= 3 && SINGLETONS.contains(&last.as_str()) {
                return Some(Route::Singleton {
                    parent_key: segments[..len - 2].join("/"),
                    parent_id: segments[len - 2].clone(),
                    name: last,
                });
            }
            Some(Route::Collection {
                key: segments.join("/"),
            })
        } else {
            Some(Route::Item {
                key: segments[..len - 1].join("/"),
                id: last,
            })
        }
    }
}

#[derive(Debug, Default)]
pub struct Store {
    collections: HashMap<String, Vec<Value>>,
    singletons: HashMap<String, Value>,
    cidrs: HashMap<String, Vec<String>>,
    requests: Vec<RecordedRequest>,
}

impl Store {
    /// A store holding the fixed catalog: regions, zones, profiles,
    /// operating systems and one public image.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        for region in ["us-south", "us-east"] {
            store.collections.entry("regions".to_string()).or_default().push(json!({
                "name": region,
                "endpoint": format!("https://{region}.iaas.cloud.ibm.com"),
                "status": "available",
            }));
            let zones = (1..=3)
                .map(|n| {
                    json!({
                        "name": format!("{region}-{n}"),
                        "region": {"name": region},
                        "status": "available",
                    })
                })
                .collect();
            store.collections.insert(format!("regions/{region}/zones"), zones);
        }
        store.collections.insert(
            "instance/profiles".to_string(),
            ["bc1-2x8", "bc1-4x16", "cc1-2x4"]
                .iter()
                .map(|name| json!({"name": name, "family": &name[..3]}))
                .collect(),
        );
        store.collections.insert(
            "volume/profiles".to_string(),
            ["general-purpose", "5iops-tier", "10iops-tier", "custom"]
                .iter()
                .map(|name| json!({"name": name}))
                .collect(),
        );
        store.collections.insert(
            "operating_systems".to_string(),
            [("ubuntu-18-04-amd64", "Ubuntu Linux"), ("centos-7-amd64", "CentOS")]
                .iter()
                .map(|(name, vendor)| json!({"name": name, "vendor": vendor, "architecture": "amd64"}))
                .collect(),
        );
        store.collections.insert(
            "images".to_string(),
            vec![json!({
                "id": "r006-ubuntu-18-04",
                "crn": "crn:v1:bluemix:public:is:us-south:a/mock::image:r006-ubuntu-18-04",
                "name": "ibm-ubuntu-18-04-64",
                "status": "available",
                "visibility": "public",
                "operating_system": {"name": "ubuntu-18-04-amd64"},
                "created_at": "2020-01-01T00:00:00Z",
            })],
        );
        store
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }

    pub fn handle(&mut self, call: &Call<'_>) -> Reply {
        self.requests.push(RecordedRequest {
            method: call.method.to_string(),
            path: call.path.to_string(),
            query: call.query.clone(),
        });

        if !call.query.contains_key("version") {
            return Reply::error(
                StatusCode::BAD_REQUEST,
                "missing_version",
                "the `version` query parameter is required",
            );
        }
        if call.query.get("generation").map(String::as_str) != Some("1") {
            return Reply::error(
                StatusCode::BAD_REQUEST,
                "invalid_generation",
                "the `generation` query parameter must be 1",
            );
        }

        let Some(route) = Route::parse(call.path) else {
            return Reply::not_found("route");
        };
        debug!("{} {} -> {route:?}", call.method, call.path);

        let body = if call.body.is_empty() {
            None
        } else {
            match serde_json::from_slice::<Value>(call.body) {
                Ok(value) => Some(value),
                Err(e) => {
                    return Reply::error(StatusCode::BAD_REQUEST, "bad_request", format!("invalid JSON: {e}"))
                }
            }
        };

        let method = call.method;
        let base = call.base_url;
        match route {
            Route::Collection { key } => {
                if let Some(reply) = self.check_parent(&key) {
                    return reply;
                }
                if *method == Method::GET {
                    self.list(&key, call.query, base)
                } else if *method == Method::POST {
                    self.create(&key, body, base)
                } else if *method == Method::PUT {
                    self.replace(&key, body, base)
                } else {
                    method_not_allowed()
                }
            }
            Route::Item { key, id } => {
                if let Some(reply) = self.check_parent(&key) {
                    return reply;
                }
                if *method == Method::GET {
                    self.get(&key, &id, base)
                } else if *method == Method::PATCH {
                    self.update(&key, &id, body, base)
                } else if *method == Method::DELETE {
                    self.delete(&key, &id)
                } else if *method == Method::PUT {
                    self.bind(&key, &id, base)
                } else {
                    method_not_allowed()
                }
            }
            Route::Singleton {
                parent_key,
                parent_id,
                name,
            } => {
                if self.find(&parent_key, &parent_id).is_none() {
                    return Reply::not_found(&singular(&parent_key));
                }
                self.singleton(method, &parent_key, &parent_id, &name, body, base)
            }
            Route::Cidr { key, cidr } => {
                if let Some(reply) = self.check_parent(&key) {
                    return reply;
                }
                self.cidr(method, &key, cidr)
            }
        }
    }

    /// Nested collections need their parent resource to exist.
    fn check_parent(&self, key: &str) -> Option<Reply> {
        let parts: Vec<&str> = key.split('/').collect();
        if parts.len() < 3 {
            return None;
        }
        let parent_key = parts[..parts.len() - 2].join("/");
        let parent_id = parts[parts.len() - 2];
        match self.find(&parent_key, parent_id) {
            Some(_) => None,
            None => Some(Reply::not_found(&singular(&parent_key))),
        }
    }

    fn find(&self, key: &str, id: &str) -> Option<&Value> {
        self.collections.get(key)?.iter().find(|item| ident(item) == Some(id))
    }

    fn find_mut(&mut self, key: &str, id: &str) -> Option<&mut Value> {
        self.collections
            .get_mut(key)?
            .iter_mut()
            .find(|item| ident(item) == Some(id))
    }

    fn list(&self, key: &str, query: &HashMap<String, String>, base: &str) -> Reply {
        let name = collection_name(key);
        if name.ends_with("_cidrs") {
            let cidrs = self.cidrs.get(key).cloned().unwrap_or_default();
            return Reply::json(StatusCode::OK, json!({ name: cidrs }));
        }
        if let Some(connections) = self.policy_connections(key, base) {
            return Reply::json(StatusCode::OK, json!({ "connections": connections }));
        }

        let limit = match query.get("limit").map(|l| l.parse::<usize>()) {
            None => DEFAULT_LIMIT,
            Some(Ok(limit)) if (1..=MAX_LIMIT).contains(&limit) => limit,
            Some(_) => {
                return Reply::error(
                    StatusCode::BAD_REQUEST,
                    "invalid_limit",
                    format!("limit must be between 1 and {MAX_LIMIT}"),
                )
            }
        };
        let empty = Vec::new();
        let items = self.collections.get(key).unwrap_or(&empty);
        let start = match query.get("start") {
            None => 0,
            Some(token) => match items.iter().position(|item| ident(item) == Some(token.as_str())) {
                Some(pos) => pos,
                None => return Reply::error(StatusCode::BAD_REQUEST, "invalid_start", "unknown start token"),
            },
        };
        let end = (start + limit).min(items.len());
        let page: Vec<Value> = items[start..end]
            .iter()
            .map(|item| present(item, key, base))
            .collect();

        let mut body = Map::new();
        body.insert(name.to_string(), Value::Array(page));
        body.insert("limit".to_string(), json!(limit));
        body.insert("total_count".to_string(), json!(items.len()));
        body.insert(
            "first".to_string(),
            json!({"href": format!("{base}/{key}?limit={limit}")}),
        );
        if let Some(next) = items.get(end).and_then(ident) {
            body.insert(
                "next".to_string(),
                json!({"href": format!("{base}/{key}?limit={limit}&start={next}")}),
            );
        }
        Reply::json(StatusCode::OK, Value::Object(body))
    }

    /// `ike_policies/{id}/connections` and `ipsec_policies/{id}/connections`
    /// are views over the VPN gateway connections that use the policy.
    fn policy_connections(&self, key: &str, base: &str) -> Option<Vec<Value>> {
        let parts: Vec<&str> = key.split('/').collect();
        let field = match parts.as_slice() {
            ["ike_policies", _, "connections"] => "ike_policy",
            ["ipsec_policies", _, "connections"] => "ipsec_policy",
            _ => return None,
        };
        let policy_id = parts[1];
        let connections = self
            .collections
            .iter()
            .filter(|(k, _)| k.starts_with("vpn_gateways/") && collection_name(k) == "connections")
            .flat_map(|(k, items)| items.iter().map(move |item| (k, item)))
            .filter(|(_, item)| item[field]["id"].as_str() == Some(policy_id))
            .map(|(k, item)| present(item, k, base))
            .collect();
        Some(connections)
    }

    fn create(&mut self, key: &str, body: Option<Value>, base: &str) -> Reply {
        let mut item = match body {
            Some(Value::Object(map)) => map,
            _ => return Reply::error(StatusCode::BAD_REQUEST, "bad_request", "a JSON object body is required"),
        };
        let kind = singular(key);
        let id = format!("r006-{}", Uuid::new_v4());
        item.insert("id".to_string(), json!(id));
        item.insert(
            "crn".to_string(),
            json!(format!("crn:v1:bluemix:public:is:us-south:a/mock::{kind}:{id}")),
        );
        item.insert("href".to_string(), json!(format!("{base}/{key}/{id}")));
        item.insert(
            "created_at".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        item.entry("name")
            .or_insert_with(|| json!(format!("{kind}-{}", &id[5..13])));
        let (field, status) = initial_status(key);
        item.entry(field).or_insert_with(|| json!(status));
        if key == "load_balancers" {
            item.entry("operating_status").or_insert_with(|| json!("online"));
        }

        if collection_name(key) == "actions" {
            self.apply_instance_action(key, &item);
        }

        let item = Value::Object(item);
        self.collections
            .entry(key.to_string())
            .or_default()
            .push(item.clone());
        Reply::json(StatusCode::CREATED, item)
    }

    /// Instance actions take effect immediately.
    fn apply_instance_action(&mut self, key: &str, action: &Map<String, Value>) {
        let parts: Vec<&str> = key.split('/').collect();
        if parts.len() != 3 || parts[0] != "instances" {
            return;
        }
        let new_status = match action.get("type").and_then(Value::as_str) {
            Some("stop") => "stopped",
            Some("start") | Some("reboot") => "running",
            _ => return,
        };
        if let Some(instance) = self.find_mut(parts[0], parts[1]) {
            instance["status"] = json!(new_status);
        }
    }

    /// Replace a whole collection, e.g. the members of a load balancer pool.
    fn replace(&mut self, key: &str, body: Option<Value>, base: &str) -> Reply {
        let name = collection_name(key);
        let items = match body.as_ref().and_then(|b| b.get(name)).and_then(Value::as_array) {
            Some(items) => items.clone(),
            None => {
                return Reply::error(
                    StatusCode::BAD_REQUEST,
                    "bad_request",
                    format!("body must contain a `{name}` array"),
                )
            }
        };
        self.collections.remove(key);
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let reply = self.create(key, Some(item), base);
            match reply.body {
                Some(item) if reply.status == StatusCode::CREATED => created.push(item),
                _ => return reply,
            }
        }
        Reply::json(StatusCode::ACCEPTED, json!({ name: created }))
    }

    fn get(&mut self, key: &str, id: &str, base: &str) -> Reply {
        let Some(item) = self.find_mut(key, id) else {
            return Reply::not_found(&singular(key));
        };
        let shown = present(item, key, base);
        // Instances and load balancers report their pending status once, then finish.
        let settles = match collection_name(key) {
            "instances" => Some(("status", "pending", "running")),
            "load_balancers" => Some(("provisioning_status", "create_pending", "active")),
            _ => None,
        };
        if let Some((field, pending, done)) = settles {
            if item.get(field).and_then(Value::as_str) == Some(pending) {
                item[field] = json!(done);
            }
        }
        Reply::json(StatusCode::OK, shown)
    }

    fn update(&mut self, key: &str, id: &str, body: Option<Value>, base: &str) -> Reply {
        let patch = match body {
            Some(Value::Object(map)) => map,
            _ => return Reply::error(StatusCode::BAD_REQUEST, "bad_request", "a JSON object body is required"),
        };
        let Some(item) = self.find_mut(key, id) else {
            return Reply::not_found(&singular(key));
        };
        for (field, value) in patch {
            if IMMUTABLE.contains(&field.as_str()) {
                continue;
            }
            item[field.as_str()] = value;
        }
        Reply::json(StatusCode::OK, present(item, key, base))
    }

    fn delete(&mut self, key: &str, id: &str) -> Reply {
        let Some(items) = self.collections.get_mut(key) else {
            return Reply::not_found(&singular(key));
        };
        let Some(pos) = items.iter().position(|item| ident(item) == Some(id)) else {
            return Reply::not_found(&singular(key));
        };
        items.remove(pos);
        Reply::empty(delete_status(key))
    }

    /// Attach an existing resource to a parent, e.g. a floating IP to a
    /// network interface. The resource is looked up in every collection of
    /// the same name, since network interfaces live under their instances.
    fn bind(&mut self, key: &str, id: &str, base: &str) -> Reply {
        let name = collection_name(key);
        let Some(item) = self
            .collections
            .iter()
            .filter(|(k, _)| k.as_str() != key && collection_name(k) == name)
            .flat_map(|(_, items)| items)
            .find(|item| ident(item) == Some(id))
            .cloned()
        else {
            return Reply::not_found(&singular(key));
        };
        if self.find(key, id).is_none() {
            self.collections
                .entry(key.to_string())
                .or_default()
                .push(item.clone());
        }
        Reply::json(StatusCode::CREATED, present(&item, key, base))
    }

    fn singleton(
        &mut self,
        method: &Method,
        parent_key: &str,
        parent_id: &str,
        name: &str,
        body: Option<Value>,
        base: &str,
    ) -> Reply {
        let slot = format!("{parent_key}/{parent_id}/{name}");
        if *method == Method::GET {
            if let Some(value) = self.singletons.get(&slot) {
                return Reply::json(StatusCode::OK, value.clone());
            }
            return match name {
                "default_security_group" => Reply::json(
                    StatusCode::OK,
                    json!({
                        "id": format!("r006-default-sg-{parent_id}"),
                        "name": "default",
                        "href": format!("{base}/security_groups/r006-default-sg-{parent_id}"),
                        "vpc": {"id": parent_id},
                        "rules": [],
                    }),
                ),
                "statistics" => Reply::json(
                    StatusCode::OK,
                    json!({
                        "active_connections": 0,
                        "connection_rate": 0.0,
                        "data_processed_this_month": 0,
                        "throughput": 0.0,
                    }),
                ),
                "initialization" => Reply::json(StatusCode::OK, json!({"keys": [], "user_accounts": []})),
                _ => Reply::not_found(name),
            };
        }

        if !matches!(name, "public_gateway" | "network_acl") {
            return method_not_allowed();
        }
        let target_key = format!("{name}s");
        if *method == Method::PUT {
            let Some(target_id) = body.as_ref().and_then(|b| b.get("id")).and_then(Value::as_str) else {
                return Reply::error(StatusCode::BAD_REQUEST, "bad_request", "an identity with `id` is required");
            };
            let Some(target) = self.find(&target_key, target_id).map(|t| present(t, &target_key, base)) else {
                return Reply::not_found(name);
            };
            let reference = json!({
                "id": target["id"],
                "href": target["href"],
                "name": target["name"],
            });
            if let Some(parent) = self.find_mut(parent_key, parent_id) {
                parent[name] = reference;
            }
            self.singletons.insert(slot, target.clone());
            Reply::json(StatusCode::CREATED, target)
        } else if *method == Method::DELETE {
            if self.singletons.remove(&slot).is_none() {
                return Reply::not_found(name);
            }
            if let Some(Value::Object(parent)) = self.find_mut(parent_key, parent_id) {
                parent.remove(name);
            }
            Reply::empty(StatusCode::NO_CONTENT)
        } else {
            method_not_allowed()
        }
    }

    fn cidr(&mut self, method: &Method, key: &str, cidr: String) -> Reply {
        let cidrs = self.cidrs.entry(key.to_string()).or_default();
        let found = cidrs.iter().position(|c| *c == cidr);
        if *method == Method::GET {
            match found {
                Some(_) => Reply::empty(StatusCode::NO_CONTENT),
                None => Reply::not_found("CIDR"),
            }
        } else if *method == Method::PUT {
            if found.is_none() {
                cidrs.push(cidr);
            }
            Reply::empty(StatusCode::CREATED)
        } else if *method == Method::DELETE {
            match found {
                Some(pos) => {
                    cidrs.remove(pos);
                    Reply::empty(StatusCode::NO_CONTENT)
                }
                None => Reply::not_found("CIDR"),
            }
        } else {
            method_not_allowed()
        }
    }
}

fn method_not_allowed() -> Reply {
    Reply::error(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "method not allowed")
}

/// Resources are addressed by id, catalog entries by name.
fn ident(item: &Value) -> Option<&str> {
    item.get("id")
        .or_else(|| item.get("name"))
        .and_then(Value::as_str)
}

/// The JSON key holding a collection's items: its last path segment.
fn collection_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// `address_prefixes` -> `address-prefix`, `policies` -> `policy`.
fn singular(key: &str) -> String {
    let name = collection_name(key);
    let stem = if let Some(stem) = name.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = name.strip_suffix("xes") {
        format!("{stem}x")
    } else {
        name.strip_suffix('s').unwrap_or(name).to_string()
    };
    stem.replace('_', "-")
}

/// The lifecycle field a new resource starts with, and its value. Load
/// balancers and their components carry `provisioning_status` instead of
/// `status`.
fn initial_status(key: &str) -> (&'static str, &'static str) {
    match (key.split('/').next().unwrap_or(key), collection_name(key)) {
        ("load_balancers", "load_balancers") => ("provisioning_status", "create_pending"),
        ("load_balancers", _) => ("provisioning_status", "active"),
        (_, "instances" | "actions") => ("status", "pending"),
        _ => ("status", "available"),
    }
}

/// Load balancer components, images and VPN gateways are deleted
/// asynchronously.
fn delete_status(key: &str) -> StatusCode {
    let top = key.split('/').next().unwrap_or(key);
    match top {
        "load_balancers" | "vpn_gateways" | "images" => StatusCode::ACCEPTED,
        _ => StatusCode::NO_CONTENT,
    }
}

/// Fill in the `href` of catalog entries, which are seeded without one.
fn present(item: &Value, key: &str, base: &str) -> Value {
    let mut item = item.clone();
    if item.get("href").is_none() {
        if let Some(id) = ident(&item).map(str::to_string) {
            item["href"] = json!(format!("{base}/{key}/{id}"));
        }
    }
    item
}

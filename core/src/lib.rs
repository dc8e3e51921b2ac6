//! Client core for the IBM Cloud VPC classic (generation 1) API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `VpcClassicService` pairs
//! the client with a caller-supplied `Transport` for one-call round-trips,
//! paging and status polling.
//!
//! # Design
//! - The REST surface is one table: each `Operation` knows its method, path
//!   template, success status and whether it takes a body.
//! - `VpcClassicClient` is stateless; it holds only its `ServiceConfig`.
//! - Every request carries the `version` and `generation` query parameters.
//! - Identity references are enums with one variant per accepted form
//!   (`ById`, `ByCrn`, `ByHref`, `ByName`).

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod operation;
pub mod pagination;
pub mod request;
pub mod service;
pub mod testing;
pub mod waiter;

pub use auth::Authenticator;
pub use client::{DetailedResponse, VpcClassicClient};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use operation::Operation;
pub use pagination::{Collection, PageLink};
pub use request::RequestOptions;
pub use service::{Pager, VpcClassicService};
pub use waiter::Waiter;

//! A client bound to a transport.
//!
//! `VpcClassicService` runs build, execute and parse in one call, and drives
//! multi-request flows (paging through a list) on top of that.

use serde::de::DeserializeOwned;

use crate::client::{DetailedResponse, VpcClassicClient};
use crate::error::ApiError;
use crate::http::Transport;
use crate::operation::Operation;
use crate::pagination::Collection;
use crate::request::RequestOptions;

#[derive(Debug, Clone)]
pub struct VpcClassicService<T> {
    client: VpcClassicClient,
    transport: T,
}

impl<T: Transport> VpcClassicService<T> {
    pub fn new(client: VpcClassicClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &VpcClassicClient {
        &self.client
    }

    pub fn call<R: DeserializeOwned>(&self, op: Operation, options: &RequestOptions) -> Result<R, ApiError> {
        let response = self.transport.execute(self.client.build(op, options)?)?;
        self.client.parse(op, response)
    }

    pub fn call_detailed<R: DeserializeOwned>(
        &self,
        op: Operation,
        options: &RequestOptions,
    ) -> Result<DetailedResponse<R>, ApiError> {
        let response = self.transport.execute(self.client.build(op, options)?)?;
        self.client.parse_detailed(op, response)
    }

    /// Call an operation that returns no body (deletes, bindings removed,
    /// CIDR checks).
    pub fn call_empty(&self, op: Operation, options: &RequestOptions) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build(op, options)?)?;
        self.client.parse_empty(op, response)
    }

    /// Fetch a single page of a list operation.
    pub fn list<R: DeserializeOwned>(
        &self,
        op: Operation,
        options: &RequestOptions,
    ) -> Result<Collection<R>, ApiError> {
        let response = self.transport.execute(self.client.build(op, options)?)?;
        self.client.parse_collection(op, response)
    }

    /// Iterate over every page of a list operation, starting from `options`.
    pub fn pages<R: DeserializeOwned>(&self, op: Operation, options: RequestOptions) -> Pager<'_, T, R> {
        Pager {
            service: self,
            op,
            options,
            done: false,
            _item: std::marker::PhantomData,
        }
    }

    /// Collect the items of every page.
    pub fn list_all<R: DeserializeOwned>(&self, op: Operation, options: RequestOptions) -> Result<Vec<R>, ApiError> {
        let mut items = Vec::new();
        for page in self.pages(op, options) {
            items.extend(page?.items);
        }
        Ok(items)
    }
}

/// Iterator over the pages of a list operation.
///
/// Yields an error at most once and then stops.
pub struct Pager<'a, T, R> {
    service: &'a VpcClassicService<T>,
    op: Operation,
    options: RequestOptions,
    done: bool,
    _item: std::marker::PhantomData<R>,
}

impl<T: Transport, R: DeserializeOwned> Iterator for Pager<'_, T, R> {
    type Item = Result<Collection<R>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page = match self.service.list::<R>(self.op, &self.options) {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        match page.next_start() {
            // A repeated token would loop forever.
            Some(start) if self.options.query_value("start") != Some(start.as_str()) => {
                self.options.set_query("start", start);
            }
            _ => self.done = true,
        }
        Some(Ok(page))
    }
}

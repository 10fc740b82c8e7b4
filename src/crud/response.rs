//! CRUD response shapes

use serde::Serialize;
use serde_json::Value;

use crate::executor::WriteAck;

/// Pagination envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub data: Vec<Value>,
    /// Records in this page
    pub count: u64,
    pub total: u64,
    pub page: u64,
    pub page_count: u64,
}

/// Result of getMany: a bare ordered list, or a page envelope when paginated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GetManyResponse {
    Bare(Vec<Value>),
    Paginated(PageInfo),
}

impl GetManyResponse {
    pub fn data(&self) -> &[Value] {
        match self {
            GetManyResponse::Bare(data) => data,
            GetManyResponse::Paginated(page) => &page.data,
        }
    }

    pub fn page_info(&self) -> Option<&PageInfo> {
        match self {
            GetManyResponse::Bare(_) => None,
            GetManyResponse::Paginated(page) => Some(page),
        }
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self, GetManyResponse::Paginated(_))
    }

    pub fn into_data(self) -> Vec<Value> {
        match self {
            GetManyResponse::Bare(data) => data,
            GetManyResponse::Paginated(page) => page.data,
        }
    }
}

/// Result of updateOne/replaceOne
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WriteResult {
    /// Raw acknowledgement (shallow return)
    Shallow(WriteAck),
    /// The record reloaded after the write
    Record(Value),
}

impl WriteResult {
    pub fn record(&self) -> Option<&Value> {
        match self {
            WriteResult::Record(record) => Some(record),
            WriteResult::Shallow(_) => None,
        }
    }

    pub fn ack(&self) -> Option<&WriteAck> {
        match self {
            WriteResult::Shallow(ack) => Some(ack),
            WriteResult::Record(_) => None,
        }
    }
}

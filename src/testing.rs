//! 测试用的内存 RowStore，记录收到的每个请求

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TableError;
use crate::models::{Row, RowIdentity};
use crate::services::api::RowStore;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Fetch,
    Create(Map<String, Value>),
    Delete(String),
}

#[derive(Default)]
struct Inner {
    rows: Vec<Row>,
    requests: Vec<Request>,
    fail_fetch: bool,
    fail_writes: bool,
    next_key: usize,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    inner: Arc<Mutex<Inner>>,
}

impl FakeStore {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().rows = rows;
        store
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn fail_fetch(&self) {
        self.inner.lock().unwrap().fail_fetch = true;
    }

    pub fn fail_writes(&self) {
        self.inner.lock().unwrap().fail_writes = true;
    }
}

#[async_trait]
impl RowStore for FakeStore {
    async fn fetch(&self) -> Result<Vec<Row>, TableError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(Request::Fetch);
        if inner.fail_fetch {
            return Err(TableError::fetch("fake://rows", "connection refused"));
        }
        Ok(inner.rows.clone())
    }

    async fn create(&self, payload: &Map<String, Value>) -> Result<(), TableError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(Request::Create(payload.clone()));
        if inner.fail_writes {
            return Err(TableError::write("POST", "fake://rows", "HTTP 500"));
        }
        inner.next_key += 1;
        let key = format!("new-{}", inner.next_key);
        inner.rows.push(Row::remote(key, payload.clone()));
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), TableError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(Request::Delete(id.to_string()));
        if inner.fail_writes {
            return Err(TableError::write("DELETE", format!("fake://rows/{id}"), "HTTP 404"));
        }
        inner
            .rows
            .retain(|row| row.identity != RowIdentity::Key(id.to_string()));
        Ok(())
    }
}

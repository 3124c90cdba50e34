use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::TableError;
use crate::models::Row;

/// 远程数据源：读取全部行、新增一行、按 id 删除一行
#[async_trait]
pub trait RowStore: Send + Sync {
    /// GET，返回按服务器顺序排列的行，每行保留服务器给的 key
    async fn fetch(&self) -> Result<Vec<Row>, TableError>;

    /// POST，body 为 JSON 对象
    async fn create(&self, payload: &Map<String, Value>) -> Result<(), TableError>;

    /// DELETE {endpoint}/{id}
    async fn delete(&self, id: &str) -> Result<(), TableError>;
}

#[derive(Deserialize)]
struct RowsEnvelope {
    data: Map<String, Value>,
}

/// 把 `{ "data": { "<id>": { ... } } }` 解析成有序的行列表
pub fn parse_rows(body: &str) -> Result<Vec<Row>, String> {
    let envelope: RowsEnvelope = serde_json::from_str(body).map_err(|e| e.to_string())?;
    envelope
        .data
        .into_iter()
        .map(|(key, value)| match value {
            Value::Object(fields) => Ok(Row::remote(key, fields)),
            other => Err(format!("row `{key}` is not an object: {other}")),
        })
        .collect()
}

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    endpoint: Url,
}

impl RestStore {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    fn row_url(&self, id: &str) -> Result<Url, TableError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| TableError::Config(format!("{} cannot take a row id", self.endpoint)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl RowStore for RestStore {
    async fn fetch(&self) -> Result<Vec<Row>, TableError> {
        debug!("GET {}", self.endpoint);
        let fail = |reason: String| TableError::fetch(&self.endpoint, reason);

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("HTTP {}", response.status())));
        }
        let body = response.text().await.map_err(|e| fail(e.to_string()))?;
        let rows = parse_rows(&body).map_err(fail)?;

        info!("Fetched {} rows from {}", rows.len(), self.endpoint);
        Ok(rows)
    }

    async fn create(&self, payload: &Map<String, Value>) -> Result<(), TableError> {
        let fail = |reason: String| TableError::write("POST", &self.endpoint, reason);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            warn!("New data was not saved on server: {}", response.status());
            return Err(fail(format!("HTTP {}", response.status())));
        }
        info!("New data saved on server");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), TableError> {
        let url = self.row_url(id)?;
        let fail = |reason: String| TableError::write("DELETE", &url, reason);

        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Row {id} was not deleted: {}", response.status());
            return Err(fail(format!("HTTP {}", response.status())));
        }
        info!("Row {id} deleted on server");
        Ok(())
    }
}

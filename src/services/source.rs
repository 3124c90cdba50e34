use tracing::{debug, warn};

use crate::error::TableError;
use crate::models::{ColumnSpec, DataSource, Row};
use crate::services::api::RowStore;

/// 一次渲染需要的数据：行 + 要显示的字段（按显示顺序）
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// 远程模式：字段取第一行自己的 key，标题就是字段名
    pub fn inferred(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|first| {
                first
                    .fields
                    .keys()
                    .map(|key| ColumnSpec::new(key.clone(), key.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self { columns, rows }
    }
}

/// 本地数据直接使用；否则从远程接口读取
pub async fn resolve<S: RowStore + ?Sized>(
    source: &DataSource,
    store: Option<&S>,
) -> Result<Dataset, TableError> {
    match source {
        DataSource::Local { columns, rows } => {
            debug!("Using {} local rows", rows.len());
            Ok(Dataset {
                columns: columns.clone(),
                rows: rows.clone(),
            })
        }
        DataSource::Remote(url) => {
            let store = store.ok_or_else(|| {
                TableError::Config(format!("no store available for {url}"))
            })?;
            let rows = store.fetch().await?;
            if rows.is_empty() {
                warn!("{url} returned no rows, no columns can be inferred");
            }
            Ok(Dataset::inferred(rows))
        }
    }
}

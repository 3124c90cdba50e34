/// 表格操作可能出现的错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// 读取远程数据失败（网络、状态码或 JSON 格式），本次渲染放弃
    #[error("failed to fetch rows from {url}: {reason}")]
    DataFetch { url: String, reason: String },

    /// 有输入框为空，表单保留，用户可以重新提交
    #[error("{} required field(s) left empty: {}", .empty_fields.len(), .empty_fields.join(", "))]
    Validation { empty_fields: Vec<String> },

    /// 新增/删除请求失败
    #[error("{method} {url} failed: {reason}")]
    WriteFailure {
        method: &'static str,
        url: String,
        reason: String,
    },

    #[error("invalid table configuration: {0}")]
    Config(String),

    #[error("field `{0}` is bound to more than one column")]
    DuplicateField(String),
}

impl TableError {
    pub fn fetch(url: impl ToString, reason: impl ToString) -> Self {
        Self::DataFetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(method: &'static str, url: impl ToString, reason: impl ToString) -> Self {
        Self::WriteFailure {
            method,
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::TableError;

// ---------- 配置相关模型 ------------

/// 一列的定义：表头标题 + 从行数据里取值用的字段名
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub title: String,
    #[serde(alias = "value")]
    pub field_key: String,
}

impl ColumnSpec {
    pub fn new(title: impl Into<String>, field_key: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            field_key: field_key.into(),
        }
    }
}

/// 表格支持的写操作
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    pub supports_delete: bool,
    pub supports_add: bool,
}

impl Capabilities {
    pub const READ_ONLY: Self = Self {
        supports_delete: false,
        supports_add: false,
    };

    /// 有任何写操作时，表格末尾会保留一个操作列
    pub fn has_action_column(&self) -> bool {
        self.supports_delete || self.supports_add
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
    /// 容器选择器，例如 "#usersTable3"
    pub container: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<Url>,
    /// 本地数据；存在时不访问服务器
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl TableConfig {
    /// 容器 id（去掉选择器前面的 '#'）
    pub fn container_id(&self) -> &str {
        self.container.strip_prefix('#').unwrap_or(&self.container)
    }

    /// 决定数据来源：有本地数据时优先使用本地数据，否则读取远程接口
    pub fn source(&self) -> Result<DataSource, TableError> {
        match (&self.rows, &self.columns, &self.api_url) {
            (Some(rows), Some(columns), _) => Ok(DataSource::Local {
                columns: columns.clone(),
                rows: rows
                    .iter()
                    .enumerate()
                    .map(|(position, fields)| Row::local(position, fields.clone()))
                    .collect(),
            }),
            (Some(_), None, _) => Err(TableError::Config(format!(
                "{}: local rows need a column spec",
                self.container
            ))),
            (None, _, Some(url)) => Ok(DataSource::Remote(url.clone())),
            (None, _, None) => Err(TableError::Config(format!(
                "{}: neither local rows nor an api_url were given",
                self.container
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub tables: Vec<TableConfig>,
}

const DEMO_API_URL: &str = "https://mock-api.shpp.me/adavydenko/users";

impl Default for AppConfig {
    fn default() -> Self {
        // 默认创建三个示例表格：本地只读、远程可删除、远程可增删
        let columns = vec![
            ColumnSpec::new("Имя", "name"),
            ColumnSpec::new("Фамилия", "surname"),
            ColumnSpec::new("Возраст", "age"),
        ];
        let users = [(30050, "Вася", "Петров", 12), (30051, "Петя", "Васечкин", 15)]
            .into_iter()
            .map(|(id, name, surname, age)| {
                let mut row = Map::new();
                row.insert("id".into(), id.into());
                row.insert("name".into(), name.into());
                row.insert("surname".into(), surname.into());
                row.insert("age".into(), age.into());
                row
            })
            .collect();
        let api_url = Url::parse(DEMO_API_URL).ok();

        Self {
            tables: vec![
                TableConfig {
                    container: "#usersTable".into(),
                    columns: Some(columns),
                    api_url: None,
                    rows: Some(users),
                    capabilities: Capabilities::READ_ONLY,
                },
                TableConfig {
                    container: "#usersTable2".into(),
                    columns: None,
                    api_url: api_url.clone(),
                    rows: None,
                    capabilities: Capabilities {
                        supports_delete: true,
                        supports_add: false,
                    },
                },
                TableConfig {
                    container: "#usersTable3".into(),
                    columns: None,
                    api_url,
                    rows: None,
                    capabilities: Capabilities {
                        supports_delete: true,
                        supports_add: true,
                    },
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Local { columns: Vec<ColumnSpec>, rows: Vec<Row> },
    Remote(Url),
}

// ---------- 表格数据模型 ------------

/// 行的身份：服务器返回的 key，或本地数据里的序号
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowIdentity {
    Key(String),
    Position(usize),
}

impl std::fmt::Display for RowIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowIdentity::Key(key) => write!(f, "{key}"),
            RowIdentity::Position(position) => write!(f, "#{position}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub identity: RowIdentity,
    pub fields: Map<String, Value>,
}

impl Row {
    pub fn local(position: usize, fields: Map<String, Value>) -> Self {
        Self {
            identity: RowIdentity::Position(position),
            fields,
        }
    }

    pub fn remote(key: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            identity: RowIdentity::Key(key.into()),
            fields,
        }
    }

    /// 按字段名取值；取不到时返回 Absent 而不是报错
    pub fn get(&self, key: &str) -> CellValue {
        match self.fields.get(key) {
            Some(value) => CellValue::Present(value.clone()),
            None => CellValue::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Present(Value),
    Absent,
}

impl CellValue {
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Present(Value::String(text)) => text.clone(),
            CellValue::Present(Value::Null) | CellValue::Absent => String::new(),
            CellValue::Present(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRole {
    Index,
    Field,
    Action,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub display_text: String,
    pub bound_key: String,
    pub role: HeaderRole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedCell {
    /// 1 开始的行号
    Index(usize),
    Value(CellValue),
    Delete(RowIdentity),
    /// 操作列存在但该行没有可用操作
    Empty,
}

impl RenderedCell {
    pub fn text(&self) -> String {
        match self {
            RenderedCell::Index(number) => number.to_string(),
            RenderedCell::Value(value) => value.display_text(),
            RenderedCell::Delete(_) | RenderedCell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub identity: RowIdentity,
    pub cells: Vec<RenderedCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
}

impl RenderedTable {
    pub fn field_headers(&self) -> impl Iterator<Item = &HeaderCell> {
        self.headers.iter().filter(|h| h.role == HeaderRole::Field)
    }
}

/// 正在编辑的新行（同一时间最多一个）
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEditRow {
    pub inputs: Vec<PendingInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingInput {
    pub bound_key: String,
    pub title: String,
    pub value: String,
    pub invalid: bool,
}

impl PendingInput {
    pub const PLACEHOLDER: &'static str = "Fill me out";

    pub fn placeholder(&self) -> &'static str {
        if self.invalid {
            Self::PLACEHOLDER
        } else {
            ""
        }
    }
}

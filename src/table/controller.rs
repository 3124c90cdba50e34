use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::TableError;
use crate::models::{
    Capabilities, DataSource, PendingEditRow, PendingInput, RenderedTable, Row, RowIdentity,
    TableConfig,
};
use crate::services::api::{RestStore, RowStore};
use crate::services::source::Dataset;
use crate::table::binder::bind_headers;
use crate::table::renderer::render_rows;

/// "只能同时编辑一行" 提示的显示时长
pub const WARNING_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Idle,
    Editing(PendingEditRow),
    Submitting(PendingEditRow),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddActivation {
    /// 插入了新的编辑行
    Opened,
    /// 已经在编辑，显示提示；调用方需要在 WARNING_DURATION 后调用 expire_warning
    Warning,
    /// 什么都没做（提示已在显示、不支持新增、或表格还没渲染）
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Nothing,
    /// 本地模式，已直接写入并重新渲染
    Applied,
    /// 需要 POST 到服务器
    Send(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Deletion {
    Nothing,
    Applied,
    Send(String),
}

/// 一个表格实例的全部状态。每个实例持有自己的配置和数据源，互不共享。
pub struct TableController<S> {
    container: String,
    capabilities: Capabilities,
    source: DataSource,
    store: Option<S>,
    table: Option<RenderedTable>,
    edit: EditState,
    warning_since: Option<Instant>,
    last_error: Option<TableError>,
}

impl TableController<RestStore> {
    /// 远程模式下为该实例创建自己的 RestStore
    pub fn with_rest_store(config: &TableConfig, source: DataSource) -> Self {
        let store = match &source {
            DataSource::Remote(url) => Some(RestStore::new(url.clone())),
            DataSource::Local { .. } => None,
        };
        Self::new(config, source, store)
    }
}

impl<S: RowStore + Clone> TableController<S> {
    pub fn new(config: &TableConfig, source: DataSource, store: Option<S>) -> Self {
        Self {
            container: config.container.clone(),
            capabilities: config.capabilities,
            source,
            store,
            table: None,
            edit: EditState::Idle,
            warning_since: None,
            last_error: None,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn store(&self) -> Option<S> {
        self.store.clone()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn table(&self) -> Option<&RenderedTable> {
        self.table.as_ref()
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn pending(&self) -> Option<&PendingEditRow> {
        match &self.edit {
            EditState::Editing(row) | EditState::Submitting(row) => Some(row),
            EditState::Idle => None,
        }
    }

    pub fn last_error(&self) -> Option<&TableError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // ---------- 渲染 ------------

    /// 丢弃当前表格，用新数据整表重建。编辑中的新行也一起丢弃。
    pub fn apply_load(&mut self, result: Result<Dataset, TableError>) -> Result<(), TableError> {
        self.edit = EditState::Idle;
        self.rebuild(result)
    }

    /// 只重建表格，不动编辑状态
    fn rebuild(&mut self, result: Result<Dataset, TableError>) -> Result<(), TableError> {
        self.table = None;

        let built = result.and_then(|dataset| {
            let headers = bind_headers(&dataset.columns, self.capabilities)?;
            let rows = render_rows(&dataset.rows, &headers, self.capabilities);
            Ok(RenderedTable { headers, rows })
        });

        match built {
            Ok(table) => {
                debug!(
                    "{}: rendered {} rows x {} columns",
                    self.container,
                    table.rows.len(),
                    table.headers.len()
                );
                self.table = Some(table);
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                warn!("{}: render failed: {err}", self.container);
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn rebuild_local(&mut self) {
        if let DataSource::Local { columns, rows } = &self.source {
            let dataset = Dataset {
                columns: columns.clone(),
                rows: rows.clone(),
            };
            // 本地数据的错误已经记录在 last_error 里
            let _ = self.rebuild(Ok(dataset));
        }
    }

    // ---------- 新增 ------------

    pub fn activate_add(&mut self) -> AddActivation {
        if !self.capabilities.supports_add {
            return AddActivation::Ignored;
        }
        if self.pending().is_some() {
            if self.warning_visible() {
                return AddActivation::Ignored;
            }
            debug!("{}: a new line is already being edited", self.container);
            self.warning_since = Some(Instant::now());
            return AddActivation::Warning;
        }

        let inputs: Vec<PendingInput> = match &self.table {
            Some(table) => table
                .field_headers()
                .map(|header| PendingInput {
                    bound_key: header.bound_key.clone(),
                    title: header.display_text.clone(),
                    value: String::new(),
                    invalid: false,
                })
                .collect(),
            None => return AddActivation::Ignored,
        };
        if inputs.is_empty() {
            warn!("{}: no field columns to add a line to", self.container);
            return AddActivation::Ignored;
        }

        self.edit = EditState::Editing(PendingEditRow { inputs });
        AddActivation::Opened
    }

    pub fn warning_visible(&self) -> bool {
        self.warning_since
            .is_some_and(|since| since.elapsed() < WARNING_DURATION)
    }

    pub fn expire_warning(&mut self) {
        if !self.warning_visible() {
            self.warning_since = None;
        }
    }

    pub fn cancel_edit(&mut self) {
        if let EditState::Editing(_) = self.edit {
            self.edit = EditState::Idle;
        }
    }

    pub fn set_input(&mut self, column: usize, value: String) {
        if let EditState::Editing(pending) = &mut self.edit {
            if let Some(input) = pending.inputs.get_mut(column) {
                input.value = value;
            }
        }
    }

    /// 校验输入。全部非空时进入 Submitting 并返回要发送的数据；
    /// 否则把空输入框标红，保持 Editing。
    pub fn prepare_submit(&mut self) -> Result<Submission, TableError> {
        let EditState::Editing(pending) = &mut self.edit else {
            return Ok(Submission::Nothing);
        };

        let mut empty_fields = Vec::new();
        for input in pending.inputs.iter_mut() {
            input.invalid = input.value.is_empty();
            if input.invalid {
                empty_fields.push(input.bound_key.clone());
            }
        }
        if !empty_fields.is_empty() {
            let err = TableError::Validation { empty_fields };
            warn!("{}: {err}", self.container);
            self.last_error = Some(err.clone());
            return Err(err);
        }

        let payload: Map<String, Value> = pending
            .inputs
            .iter()
            .map(|input| (input.bound_key.clone(), Value::String(input.value.clone())))
            .collect();
        self.last_error = None;

        if let DataSource::Local { rows, .. } = &mut self.source {
            rows.push(Row::local(rows.len(), payload));
            info!("{}: added local row", self.container);
            self.edit = EditState::Idle;
            self.rebuild_local();
            return Ok(Submission::Applied);
        }

        let pending = pending.clone();
        self.edit = EditState::Submitting(pending);
        Ok(Submission::Send(payload))
    }

    /// 创建成功：丢弃表格，需要调用方重新加载。失败：回到 Editing，保留输入。
    pub fn complete_submit(&mut self, created: Result<(), TableError>) -> Result<(), TableError> {
        match created {
            Ok(()) => {
                self.table = None;
                self.edit = EditState::Idle;
                Ok(())
            }
            Err(err) => {
                if let EditState::Submitting(pending) = &self.edit {
                    self.edit = EditState::Editing(pending.clone());
                }
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ---------- 删除 ------------

    pub fn prepare_delete(&mut self, identity: &RowIdentity) -> Deletion {
        if !self.capabilities.supports_delete {
            return Deletion::Nothing;
        }
        match identity {
            RowIdentity::Position(position) => {
                let DataSource::Local { rows, .. } = &mut self.source else {
                    return Deletion::Nothing;
                };
                if *position >= rows.len() {
                    return Deletion::Nothing;
                }
                rows.remove(*position);
                for (i, row) in rows.iter_mut().enumerate() {
                    row.identity = RowIdentity::Position(i);
                }
                info!("{}: removed local row {position}", self.container);
                self.rebuild_local();
                Deletion::Applied
            }
            RowIdentity::Key(key) => match self.source {
                DataSource::Remote(_) => Deletion::Send(key.clone()),
                DataSource::Local { .. } => Deletion::Nothing,
            },
        }
    }

    /// 删除成功：丢弃表格等待重新加载。失败：表格不变，只记录错误。
    pub fn complete_delete(&mut self, deleted: Result<(), TableError>) -> Result<(), TableError> {
        match deleted {
            Ok(()) => {
                self.table = None;
                self.edit = EditState::Idle;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }
}

/// 一步完成 读取/提交/删除 的便捷方法，界面代码改用 prepare_*/complete_* 分步调用
#[cfg(test)]
impl<S: RowStore + Clone> TableController<S> {
    /// 读取数据并整表重建
    pub async fn load(&mut self) -> Result<(), TableError> {
        let result = crate::services::source::resolve(&self.source, self.store.as_ref()).await;
        self.apply_load(result)
    }

    pub async fn submit(&mut self) -> Result<(), TableError> {
        let Submission::Send(payload) = self.prepare_submit()? else {
            return Ok(());
        };
        let created = send_create(self.store.as_ref(), &payload).await;
        self.complete_submit(created)?;
        self.load().await
    }

    pub async fn delete(&mut self, identity: &RowIdentity) -> Result<(), TableError> {
        let Deletion::Send(key) = self.prepare_delete(identity) else {
            return Ok(());
        };
        let deleted = send_delete(self.store.as_ref(), &key).await;
        self.complete_delete(deleted)?;
        self.load().await
    }
}

pub async fn send_create<S: RowStore>(
    store: Option<&S>,
    payload: &Map<String, Value>,
) -> Result<(), TableError> {
    match store {
        Some(store) => store.create(payload).await,
        None => Err(TableError::Config("no store to create rows in".into())),
    }
}

pub async fn send_delete<S: RowStore>(store: Option<&S>, key: &str) -> Result<(), TableError> {
    match store {
        Some(store) => store.delete(key).await,
        None => Err(TableError::Config("no store to delete from".into())),
    }
}

use dioxus::prelude::*;

use crate::models::{
    DataSource, HeaderRole, PendingEditRow, RenderedCell, RenderedTable, RowIdentity, TableConfig,
};
use crate::services::api::RestStore;
use crate::services::source::resolve;
use crate::table::controller::{
    send_create, send_delete, AddActivation, Deletion, EditState, Submission, TableController,
    WARNING_DURATION,
};

type Controller = Signal<TableController<RestStore>>;

/// 校验配置，配置有误时直接显示错误
#[component]
pub fn TableSection(config: TableConfig) -> Element {
    match config.source() {
        Ok(source) => rsx! {
            DataTable { config, source }
        },
        Err(e) => rsx! {
            div { class: "table-error", "{e}" }
        },
    }
}

#[component]
pub fn DataTable(config: TableConfig, source: DataSource) -> Element {
    let mut controller = use_signal(|| TableController::with_rest_store(&config, source.clone()));

    // 首次渲染
    use_future(move || async move { reload(controller).await });

    let mut on_add = move || {
        let activation = controller.write().activate_add();
        if activation == AddActivation::Warning {
            // 2 秒后隐藏提示
            spawn(async move {
                tokio::time::sleep(WARNING_DURATION).await;
                controller.write().expire_warning();
            });
        }
    };

    let ctl = controller.read();
    let rendered = ctl.table().cloned();
    let pending = ctl.pending().cloned();
    let submitting = matches!(ctl.edit_state(), EditState::Submitting(_));
    let warning = ctl.warning_visible();
    let error = ctl.last_error().map(|e| e.to_string());
    let supports_add = ctl.capabilities().supports_add;
    drop(ctl);

    let container_id = config.container_id().to_string();

    rsx! {
        div { id: "{container_id}", class: "table-wrapper",
            if supports_add {
                div { class: "table-toolbar",
                    button { class: "add-line-btn", onclick: move |_| on_add(), "Add new line" }
                    span {
                        class: if warning { "warning-text" } else { "warning-text warning-text--hide" },
                        "Only one new line can be edited at a time"
                    }
                }
            }
            {error.map(move |message| rsx! {
                div {
                    class: "table-error",
                    onclick: move |_| controller.write().clear_error(),
                    "{message}"
                }
            })}
            {match rendered {
                Some(rendered) => table_view(rendered, pending, submitting, controller),
                None => rsx! {
                    div { class: "table-loading", "Loading…" }
                },
            }}
        }
    }
}

fn table_view(
    rendered: RenderedTable,
    pending: Option<PendingEditRow>,
    submitting: bool,
    controller: Controller,
) -> Element {
    rsx! {
        table { class: "my-table",
            thead { class: "my-table__header",
                tr { class: "my-table__header-row",
                    for header in rendered.headers.iter() {
                        td {
                            key: "{header.bound_key}",
                            class: if header.role == HeaderRole::Action { "my-table__header-cell deleteBtnCell" } else { "my-table__header-cell" },
                            "data-my-table": "{header.bound_key}",
                            "{header.display_text}"
                        }
                    }
                }
            }
            tbody { class: "my-table__body",
                {pending.map(|row| pending_line(row, submitting, controller))}
                for row in rendered.rows.iter() {
                    tr { key: "{row.identity}", class: "my-table__body-row",
                        for cell in row.cells.iter() {
                            {body_cell(cell, controller)}
                        }
                    }
                }
            }
        }
    }
}

fn body_cell(cell: &RenderedCell, controller: Controller) -> Element {
    match cell {
        RenderedCell::Delete(identity) => {
            let identity = identity.clone();
            rsx! {
                td { class: "my-table__body-cell deleteBtnCell",
                    button {
                        class: "deleteBtn",
                        "data-id": "{identity}",
                        onclick: move |_| delete_row(controller, identity.clone()),
                        "Delete"
                    }
                }
            }
        }
        RenderedCell::Empty => rsx! {
            td { class: "my-table__body-cell deleteBtnCell" }
        },
        other => {
            let text = other.text();
            rsx! {
                td { class: "my-table__body-cell", "{text}" }
            }
        }
    }
}

/// 新行：序号列显示 0，每个字段一个输入框，最后一列是 取消/提交 按钮
fn pending_line(row: PendingEditRow, submitting: bool, mut controller: Controller) -> Element {
    rsx! {
        tr { class: "my-table__body-row my-table__new-line",
            td { class: "my-table__body-cell", "0" }
            for (column, input) in row.inputs.into_iter().enumerate() {
                td { key: "{input.bound_key}", class: "my-table__body-cell",
                    input {
                        class: if input.invalid { "inputField wrong_data" } else { "inputField" },
                        "data-inputset": "newEmptyLine",
                        title: "{input.title}",
                        placeholder: input.placeholder(),
                        value: "{input.value}",
                        disabled: submitting,
                        oninput: move |evt| controller.write().set_input(column, evt.value()),
                        onkeydown: move |evt| {
                            if evt.key() == Key::Enter {
                                evt.prevent_default();
                                submit_line(controller);
                            }
                        },
                    }
                }
            }
            td { class: "my-table__body-cell deleteBtnCell",
                div { class: "buttons-wrapper",
                    button {
                        class: "delEmptyLine",
                        disabled: submitting,
                        onclick: move |_| controller.write().cancel_edit(),
                        "Del"
                    }
                    button {
                        class: "sendEmptyLine",
                        disabled: submitting,
                        onclick: move |_| submit_line(controller),
                        "Send"
                    }
                }
            }
        }
    }
}

/// 重新读取数据并整表重建
async fn reload(mut controller: Controller) {
    let (source, store) = {
        let ctl = controller.read();
        (ctl.source().clone(), ctl.store())
    };
    let result = resolve(&source, store.as_ref()).await;
    // 错误已经记录在 controller 里，界面会显示
    let _ = controller.write().apply_load(result);
}

fn submit_line(mut controller: Controller) {
    let step = controller.write().prepare_submit();
    let Ok(Submission::Send(payload)) = step else {
        return;
    };
    spawn(async move {
        let store = controller.read().store();
        let created = send_create(store.as_ref(), &payload).await;
        let done = controller.write().complete_submit(created).is_ok();
        if done {
            reload(controller).await;
        }
    });
}

fn delete_row(mut controller: Controller, identity: RowIdentity) {
    let step = controller.write().prepare_delete(&identity);
    let Deletion::Send(key) = step else {
        return;
    };
    spawn(async move {
        let store = controller.read().store();
        let deleted = send_delete(store.as_ref(), &key).await;
        let done = controller.write().complete_delete(deleted).is_ok();
        if done {
            reload(controller).await;
        }
    });
}

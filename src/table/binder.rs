use std::collections::HashSet;

use crate::error::TableError;
use crate::models::{Capabilities, ColumnSpec, HeaderCell, HeaderRole};

pub const INDEX_TITLE: &str = "№";
pub const INDEX_KEY: &str = "number";
pub const ACTION_KEY: &str = "deleteBtn";

/// 生成表头：序号列 + 字段列（保持传入顺序）+ 可选的操作列。
///
/// 字段列的 `bound_key` 就是之后取行数据用的字段名，序号列和操作列的
/// key 只是标记，渲染时按 `role` 区分，不会拿去查行数据。
pub fn bind_headers(
    columns: &[ColumnSpec],
    capabilities: Capabilities,
) -> Result<Vec<HeaderCell>, TableError> {
    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(columns.len() + 2);

    headers.push(HeaderCell {
        display_text: INDEX_TITLE.to_string(),
        bound_key: INDEX_KEY.to_string(),
        role: HeaderRole::Index,
    });

    for column in columns {
        if !seen.insert(column.field_key.as_str()) {
            return Err(TableError::DuplicateField(column.field_key.clone()));
        }
        headers.push(HeaderCell {
            display_text: column.title.clone(),
            bound_key: column.field_key.clone(),
            role: HeaderRole::Field,
        });
    }

    if capabilities.has_action_column() {
        headers.push(HeaderCell {
            display_text: String::new(),
            bound_key: ACTION_KEY.to_string(),
            role: HeaderRole::Action,
        });
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn users() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Имя", "name"),
            ColumnSpec::new("Фамилия", "surname"),
            ColumnSpec::new("Возраст", "age"),
        ]
    }

    #[test]
    fn read_only_table_has_index_plus_fields() {
        let headers = bind_headers(&users(), Capabilities::READ_ONLY).unwrap();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[0].role, HeaderRole::Index);
        assert_eq!(headers[0].display_text, "№");
        assert_eq!(headers[0].bound_key, "number");
        assert!(headers[1..].iter().all(|h| h.role == HeaderRole::Field));
    }

    #[test]
    fn mutable_table_reserves_trailing_action_column() {
        let capabilities = Capabilities {
            supports_delete: true,
            supports_add: false,
        };
        let headers = bind_headers(&users(), capabilities).unwrap();
        assert_eq!(headers.len(), 5);
        let last = headers.last().unwrap();
        assert_eq!(last.role, HeaderRole::Action);
        assert_eq!(last.bound_key, "deleteBtn");
        assert_eq!(last.display_text, "");
    }

    #[test]
    fn field_order_and_titles_follow_column_spec() {
        let mut columns = users();
        columns.reverse();
        let headers = bind_headers(&columns, Capabilities::READ_ONLY).unwrap();
        let bound: Vec<_> = headers[1..].iter().map(|h| h.bound_key.as_str()).collect();
        let titles: Vec<_> = headers[1..].iter().map(|h| h.display_text.as_str()).collect();
        assert_eq!(bound, vec!["age", "surname", "name"]);
        assert_eq!(titles, vec!["Возраст", "Фамилия", "Имя"]);
    }

    #[test]
    fn duplicate_field_keys_are_rejected() {
        let columns = vec![ColumnSpec::new("A", "name"), ColumnSpec::new("B", "name")];
        assert_eq!(
            bind_headers(&columns, Capabilities::READ_ONLY),
            Err(TableError::DuplicateField("name".into()))
        );
    }
}

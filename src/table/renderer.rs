use crate::models::{Capabilities, HeaderCell, HeaderRole, RenderedCell, RenderedRow, Row};

/// 按表头顺序渲染一行。`index` 从 0 开始，显示时加 1。
pub fn render_row(
    row: &Row,
    headers: &[HeaderCell],
    index: usize,
    capabilities: Capabilities,
) -> RenderedRow {
    let cells = headers
        .iter()
        .map(|header| match header.role {
            HeaderRole::Index => RenderedCell::Index(index + 1),
            HeaderRole::Field => RenderedCell::Value(row.get(&header.bound_key)),
            HeaderRole::Action if capabilities.supports_delete => {
                RenderedCell::Delete(row.identity.clone())
            }
            HeaderRole::Action => RenderedCell::Empty,
        })
        .collect();

    RenderedRow {
        identity: row.identity.clone(),
        cells,
    }
}

pub fn render_rows(
    rows: &[Row],
    headers: &[HeaderCell],
    capabilities: Capabilities,
) -> Vec<RenderedRow> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| render_row(row, headers, index, capabilities))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, ColumnSpec, RowIdentity};
    use crate::table::binder::bind_headers;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn users() -> Vec<Row> {
        [
            json!({"id": 30050, "name": "Вася", "surname": "Петров", "age": 12}),
            json!({"id": 30051, "name": "Петя", "surname": "Васечкин", "age": 15}),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, v)| Row::local(i, v.as_object().cloned().unwrap()))
        .collect()
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("Имя", "name"),
            ColumnSpec::new("Фамилия", "surname"),
            ColumnSpec::new("Возраст", "age"),
        ]
    }

    fn texts(row: &RenderedRow) -> Vec<String> {
        row.cells.iter().map(RenderedCell::text).collect()
    }

    #[test]
    fn every_row_has_one_cell_per_header() {
        for capabilities in [
            Capabilities::READ_ONLY,
            Capabilities {
                supports_delete: true,
                supports_add: true,
            },
        ] {
            let headers = bind_headers(&columns(), capabilities).unwrap();
            for row in render_rows(&users(), &headers, capabilities) {
                assert_eq!(row.cells.len(), headers.len());
            }
        }
    }

    #[test]
    fn row_numbers_ignore_id_field() {
        let headers = bind_headers(&columns(), Capabilities::READ_ONLY).unwrap();
        let rendered = render_rows(&users(), &headers, Capabilities::READ_ONLY);
        assert_eq!(texts(&rendered[0]), vec!["1", "Вася", "Петров", "12"]);
        assert_eq!(texts(&rendered[1]), vec!["2", "Петя", "Васечкин", "15"]);
    }

    #[test]
    fn renaming_titles_does_not_change_values() {
        let renamed: Vec<_> = columns()
            .into_iter()
            .map(|c| ColumnSpec::new(c.title.to_uppercase() + "!", c.field_key))
            .collect();
        let a = bind_headers(&columns(), Capabilities::READ_ONLY).unwrap();
        let b = bind_headers(&renamed, Capabilities::READ_ONLY).unwrap();
        assert_eq!(
            render_rows(&users(), &a, Capabilities::READ_ONLY),
            render_rows(&users(), &b, Capabilities::READ_ONLY)
        );
    }

    #[test]
    fn missing_field_renders_absent() {
        let headers = bind_headers(
            &[ColumnSpec::new("Email", "email")],
            Capabilities::READ_ONLY,
        )
        .unwrap();
        let rendered = render_row(&users()[0], &headers, 0, Capabilities::READ_ONLY);
        assert_eq!(rendered.cells[1], RenderedCell::Value(CellValue::Absent));
        assert_eq!(rendered.cells[1].text(), "");
    }

    #[test]
    fn delete_control_is_bound_to_row_identity() {
        let capabilities = Capabilities {
            supports_delete: true,
            supports_add: false,
        };
        let headers = bind_headers(&columns(), capabilities).unwrap();
        let mut fields = serde_json::Map::new();
        fields.insert("name".into(), Value::from("Вася"));
        let row = Row::remote("30050", fields);

        let rendered = render_row(&row, &headers, 4, capabilities);
        assert_eq!(rendered.cells[0], RenderedCell::Index(5));
        assert_eq!(
            rendered.cells.last(),
            Some(&RenderedCell::Delete(RowIdentity::Key("30050".into())))
        );
    }

    #[test]
    fn add_only_table_leaves_action_cell_empty() {
        let capabilities = Capabilities {
            supports_delete: false,
            supports_add: true,
        };
        let headers = bind_headers(&columns(), capabilities).unwrap();
        let rendered = render_row(&users()[0], &headers, 0, capabilities);
        assert_eq!(rendered.cells.last(), Some(&RenderedCell::Empty));
    }
}

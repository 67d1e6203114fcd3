//! Plotly figure selection for query results.

use askql_rs_protocol::{EngineError, Table};
use indexmap::IndexMap;
use serde_json::{Value, json};

/// Pie charts are only drawn for columns with fewer distinct values.
const PIE_MAX_CATEGORIES: usize = 10;

/// Build a Plotly figure for `table`, titled with `question`.
pub fn figure_json(question: &str, table: &Table) -> Result<String, EngineError> {
    Ok(figure(question, table)?.to_string())
}

/// Build the figure as a JSON value.
pub fn figure(question: &str, table: &Table) -> Result<Value, EngineError> {
    if table.is_empty() || table.columns.is_empty() {
        return Err(EngineError::Chart("no data to plot".to_string()));
    }
    let numeric = table.numeric_columns();
    let mut layout = json!({ "title": { "text": question } });

    let trace = if table.columns.len() == 1 && table.len() == 1 && numeric.len() == 1 {
        json!({
            "type": "indicator",
            "mode": "number",
            "value": table.column_values(0).into_iter().next().unwrap_or(Value::Null),
            "title": { "text": table.columns[0] },
        })
    } else if numeric.len() >= 2 {
        let (x, y) = (numeric[0], numeric[1]);
        set_axis_titles(&mut layout, &table.columns[x], &table.columns[y]);
        json!({
            "type": "scatter",
            "mode": "markers",
            "x": table.column_values(x),
            "y": table.column_values(y),
        })
    } else if let (Some(&y), Some(x)) = (
        numeric.first(),
        (0..table.columns.len()).find(|idx| !numeric.contains(idx)),
    ) {
        set_axis_titles(&mut layout, &table.columns[x], &table.columns[y]);
        json!({
            "type": "bar",
            "x": table.column_values(x),
            "y": table.column_values(y),
        })
    } else if let Some(counts) = numeric.is_empty().then(|| pie_counts(table)).flatten() {
        json!({
            "type": "pie",
            "labels": counts.keys().collect::<Vec<_>>(),
            "values": counts.values().collect::<Vec<_>>(),
        })
    } else {
        set_axis_titles(&mut layout, "index", &table.columns[0]);
        json!({
            "type": "scatter",
            "mode": "lines",
            "x": (0..table.len()).collect::<Vec<_>>(),
            "y": table.column_values(0),
        })
    };

    Ok(json!({ "data": [trace], "layout": layout }))
}

/// Value counts of the first column in first-seen order, or `None` when it
/// has too many distinct values.
fn pie_counts(table: &Table) -> Option<IndexMap<String, usize>> {
    let mut counts = IndexMap::new();
    for value in table.column_values(0) {
        let label = match value {
            Value::String(text) => text,
            Value::Null => "null".to_string(),
            other => other.to_string(),
        };
        *counts.entry(label).or_insert(0) += 1;
        if counts.len() >= PIE_MAX_CATEGORIES {
            return None;
        }
    }
    Some(counts)
}

fn set_axis_titles(layout: &mut Value, x: &str, y: &str) {
    layout["xaxis"] = json!({ "title": { "text": x } });
    layout["yaxis"] = json!({ "title": { "text": y } });
}

#[cfg(test)]
mod tests {
    use super::{figure, figure_json};
    use askql_rs_protocol::{EngineError, Table};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn trace_type(fig: &Value) -> (&str, Option<&str>) {
        let trace = &fig["data"][0];
        (
            trace["type"].as_str().unwrap_or_default(),
            trace["mode"].as_str(),
        )
    }

    #[test]
    fn empty_table_cannot_be_plotted() {
        let err = figure("q", &table(&["a"], Vec::new())).expect_err("should fail");
        assert!(matches!(err, EngineError::Chart(message) if message == "no data to plot"));
    }

    #[test]
    fn single_number_is_an_indicator() {
        let fig = figure("How many?", &table(&["total"], vec![vec![json!(42)]])).expect("fig");
        assert_eq!(trace_type(&fig), ("indicator", Some("number")));
        assert_eq!(fig["data"][0]["value"], json!(42));
        assert_eq!(fig["layout"]["title"]["text"], json!("How many?"));
    }

    #[test]
    fn two_numeric_columns_scatter() {
        let fig = figure(
            "q",
            &table(
                &["label", "x", "y"],
                vec![
                    vec![json!("a"), json!(1), json!(2.5)],
                    vec![json!("b"), json!(2), json!(3.5)],
                ],
            ),
        )
        .expect("fig");
        assert_eq!(trace_type(&fig), ("scatter", Some("markers")));
        assert_eq!(fig["data"][0]["x"], json!([1, 2]));
        assert_eq!(fig["data"][0]["y"], json!([2.5, 3.5]));
        assert_eq!(fig["layout"]["xaxis"]["title"]["text"], json!("x"));
    }

    #[test]
    fn category_and_measure_is_a_bar() {
        let fig = figure(
            "q",
            &table(
                &["artist", "sales"],
                vec![
                    vec![json!("U2"), json!(105.93)],
                    vec![json!("Metallica"), Value::Null],
                ],
            ),
        )
        .expect("fig");
        assert_eq!(trace_type(&fig), ("bar", None));
        assert_eq!(fig["data"][0]["x"], json!(["U2", "Metallica"]));
        assert_eq!(fig["data"][0]["y"], json!([105.93, null]));
    }

    #[test]
    fn few_categories_make_a_pie() {
        let fig = figure(
            "q",
            &table(
                &["genre"],
                vec![vec![json!("Rock")], vec![json!("Jazz")], vec![json!("Rock")]],
            ),
        )
        .expect("fig");
        assert_eq!(trace_type(&fig), ("pie", None));
        assert_eq!(fig["data"][0]["labels"], json!(["Rock", "Jazz"]));
        assert_eq!(fig["data"][0]["values"], json!([2, 1]));
    }

    #[test]
    fn many_categories_fall_back_to_a_line() {
        let rows = (0..12).map(|n| vec![json!(format!("name-{n}"))]).collect();
        let fig = figure("q", &table(&["name"], rows)).expect("fig");
        assert_eq!(trace_type(&fig), ("scatter", Some("lines")));
        assert_eq!(fig["data"][0]["x"].as_array().map(Vec::len), Some(12));
    }

    #[test]
    fn single_numeric_column_is_a_line() {
        let rows = vec![vec![json!(3)], vec![json!(1)], vec![json!(4)]];
        let fig = figure("q", &table(&["n"], rows)).expect("fig");
        assert_eq!(trace_type(&fig), ("scatter", Some("lines")));
        assert_eq!(fig["data"][0]["x"], json!([0, 1, 2]));
        assert_eq!(fig["data"][0]["y"], json!([3, 1, 4]));
    }

    #[test]
    fn figure_json_is_parseable() {
        let text = figure_json("q", &table(&["n"], vec![vec![json!(1)]])).expect("fig");
        let parsed: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(parsed["data"][0]["type"], json!("indicator"));
    }
}

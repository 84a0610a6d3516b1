use crate::{
    graph::Graph,
    ops::LineParser,
    pipelines::from_source,
    transforms::{Count, FilterPunctuation, LowerCase, Split},
};

/// Counts occurrences of each word across `text_column`, sorted by
/// `(count, text)` ascending.
#[must_use]
pub fn word_count_graph(
    input_stream_name: &str,
    text_column: &str,
    count_column: &str,
    parser: Option<LineParser>,
) -> Graph {
    from_source(input_stream_name, parser)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
        .sort(vec![text_column.to_string()])
        .reduce(Count::new(count_column), vec![text_column.to_string()])
        .sort(vec![count_column.to_string(), text_column.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bindings::{Binding, Bindings},
        error::Error,
        row::Row,
        stream::RowStream,
        value::Value,
    };

    fn doc(doc_id: i64, text: &str) -> Result<Row, Error> {
        let mut row = Row::new();
        row.set("doc_id", Value::Int(doc_id));
        row.set("text", Value::Str(text.to_string()));
        Ok(row)
    }

    #[test]
    fn counts_and_orders_words_ascending() {
        let docs = vec![
            doc(1, "hello, my little WORLD"),
            doc(2, "Hello, my little little hell"),
        ];

        let mut bindings = Bindings::new();
        bindings.insert(
            "docs".to_string(),
            Binding::from_iter_fn(move || -> RowStream { Box::new(docs.clone().into_iter()) }),
        );

        let graph = word_count_graph("docs", "text", "count", None);
        let rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();

        let observed: Vec<(i64, String)> = rows
            .iter()
            .map(|r| (r.get("count").unwrap().as_int().unwrap(), r.get("text").unwrap().as_str().unwrap().to_string()))
            .collect();

        assert_eq!(
            observed,
            vec![
                (1, "hell".to_string()),
                (1, "world".to_string()),
                (2, "hello".to_string()),
                (2, "my".to_string()),
                (3, "little".to_string()),
            ]
        );
    }
}

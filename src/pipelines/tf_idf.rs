use crate::{
    graph::Graph,
    ops::LineParser,
    pipelines::from_source,
    transforms::{
        AddDummyColumn, Count, DeleteDummyColumn, FilterPunctuation, FirstReducer, InnerJoiner, LogarithmOfRatio,
        LowerCase, Product, Split, TermFrequency, TopN,
    },
};

/// For every `(doc_id, word)` pair, computes `tf * idf`; keeps, per word,
/// the 3 documents where it scores highest.
#[must_use]
pub fn tf_idf_graph(
    input_stream_name: &str,
    doc_column: &str,
    text_column: &str,
    result_column: &str,
    parser: Option<LineParser>,
) -> Graph {
    let doc_count = from_source(input_stream_name, parser)
        .sort(vec![doc_column.to_string()])
        .reduce(Count::new("doc_count"), vec![doc_column.to_string()])
        .sort(vec!["doc_count".to_string()])
        .reduce(Count::new("doc_count"), vec!["doc_count".to_string()])
        .map(AddDummyColumn::new("dummy_column"));

    let split_for_idf = from_source(input_stream_name, parser)
        .map(LowerCase::new(text_column))
        .map(FilterPunctuation::new(text_column))
        .map(Split::new(text_column));

    let idf = split_for_idf
        .sort(vec![doc_column.to_string(), text_column.to_string()])
        .reduce(FirstReducer, vec![doc_column.to_string(), text_column.to_string()])
        .sort(vec![text_column.to_string()])
        .reduce(Count::new("count"), vec![text_column.to_string()])
        .map(AddDummyColumn::new("dummy_column"))
        .join(InnerJoiner::default(), doc_count, vec!["dummy_column".to_string()])
        .map(DeleteDummyColumn::new("dummy_column"))
        .map(LogarithmOfRatio::new("doc_count", "count", "idf"));

    let split_for_tf = from_source(input_stream_name, parser)
        .map(LowerCase::new(text_column))
        .map(FilterPunctuation::new(text_column))
        .map(Split::new(text_column));

    let tf = split_for_tf
        .sort(vec![doc_column.to_string()])
        .reduce(TermFrequency::new(text_column, "tf"), vec![doc_column.to_string()])
        .sort(vec![text_column.to_string()]);

    tf.join(InnerJoiner::default(), idf, vec![text_column.to_string()])
        .map(Product::new(vec!["tf".to_string(), "idf".to_string()], result_column))
        .map(DeleteDummyColumn::new("tf"))
        .map(DeleteDummyColumn::new("idf"))
        .sort(vec![text_column.to_string()])
        .reduce(TopN::new(result_column, 3), vec![text_column.to_string()])
}

use crate::{
    graph::Graph,
    ops::LineParser,
    pipelines::from_source,
    transforms::{
        AddDummyColumn, Count, DeleteDummyColumn, FilterPunctuation, InnerJoiner, LogarithmOfRatio, LowerCase,
        MoreTwice, Split, TermFrequency, TopN,
    },
};

/// For every document, the 10 words scoring highest by pointwise mutual
/// information against the corpus — restricted to words that occur more
/// than once within that document.
#[must_use]
pub fn pmi_graph(
    input_stream_name: &str,
    doc_column: &str,
    text_column: &str,
    result_column: &str,
    parser: Option<LineParser>,
) -> Graph {
    let repeated_words = || {
        from_source(input_stream_name, parser)
            .map(LowerCase::new(text_column))
            .map(FilterPunctuation::new(text_column))
            .map(Split::new(text_column))
            .sort(vec![doc_column.to_string(), text_column.to_string()])
            .reduce(Count::new("count"), vec![doc_column.to_string(), text_column.to_string()])
            .map(MoreTwice::new("count"))
            .sort(vec![doc_column.to_string(), text_column.to_string()])
    };

    let split_words = || {
        from_source(input_stream_name, parser)
            .map(LowerCase::new(text_column))
            .map(FilterPunctuation::new(text_column))
            .map(Split::new(text_column))
            .sort(vec![doc_column.to_string(), text_column.to_string()])
    };

    let within_doc_frequency = split_words()
        .join(InnerJoiner::default(), repeated_words(), vec![doc_column.to_string(), text_column.to_string()])
        .sort(vec![doc_column.to_string()])
        .reduce(TermFrequency::new(text_column, "first"), vec![doc_column.to_string()])
        .sort(vec![text_column.to_string()]);

    let corpus_frequency = split_words()
        .join(InnerJoiner::default(), repeated_words(), vec![doc_column.to_string(), text_column.to_string()])
        .sort(vec![text_column.to_string()])
        .map(AddDummyColumn::new("dummy"))
        .reduce(TermFrequency::new(text_column, "second"), vec!["dummy".to_string()])
        .map(DeleteDummyColumn::new(doc_column))
        .map(DeleteDummyColumn::new("dummy"))
        .sort(vec![text_column.to_string()]);

    within_doc_frequency
        .join(InnerJoiner::default(), corpus_frequency, vec![text_column.to_string()])
        .map(LogarithmOfRatio::new("first", "second", result_column))
        .sort(vec![doc_column.to_string()])
        .reduce(TopN::new(result_column, 10), vec![doc_column.to_string()])
}

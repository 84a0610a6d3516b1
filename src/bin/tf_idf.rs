use clap::Parser;
use rowgraph::{
    bindings::{Binding, Bindings},
    ops::{default_parser, format_row},
    pipelines::tf_idf_graph,
};
use std::{fs::File, io::Write, process::ExitCode};

/// Computes, for every word, the documents where `tf * idf` scores highest.
#[derive(Parser)]
struct Cli {
    #[arg(long)]
    input_filepath: String,

    #[arg(long, default_value = "result_filepath")]
    output_filepath: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let graph = tf_idf_graph("input", "doc_id", "text", "tf_idf", Some(default_parser));

    let mut bindings = Bindings::new();
    bindings.insert("input".to_string(), Binding::path(cli.input_filepath));

    if let Err(err) = run(&graph, &bindings, &cli.output_filepath) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(graph: &rowgraph::graph::Graph, bindings: &Bindings, output_filepath: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = File::create(output_filepath)?;
    for row in graph.execute(bindings)? {
        writeln!(out, "{}", format_row(&row?))?;
    }
    Ok(())
}

use clap::Parser;
use rowgraph::{
    bindings::{Binding, Bindings},
    ops::{default_parser, format_row},
    pipelines::road_speed_graph,
};
use std::{fs::File, io::Write, process::ExitCode};

/// Computes average travel speed in km/h per weekday/hour from matched
/// travel-time and edge-length row files.
#[derive(Parser)]
struct Cli {
    #[arg(long)]
    filepath_travel_time: String,

    #[arg(long)]
    filepath_edge_length: String,

    #[arg(long, default_value = "result_filepath")]
    output_filepath: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let graph = road_speed_graph(
        "travel_time",
        "edge_length",
        "enter_time",
        "leave_time",
        "edge_id",
        "start",
        "end",
        "weekday",
        "hour",
        "speed",
        Some(default_parser),
    );

    let mut bindings = Bindings::new();
    bindings.insert("travel_time".to_string(), Binding::path(cli.filepath_travel_time));
    bindings.insert("edge_length".to_string(), Binding::path(cli.filepath_edge_length));

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

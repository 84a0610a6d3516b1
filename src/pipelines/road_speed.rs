use crate::{
    graph::Graph,
    ops::LineParser,
    pipelines::{TRIP_TIME_FORMAT, from_source},
    transforms::{AverageSpeed, CompHaversine, CompTimeDelta, ConvertToDatetime, DeleteDummyColumn, GetWeekdayAndHour, InnerJoiner, Sum},
};

const EARTH_RADIUS_KM: f64 = 6373.0;

/// Average travel speed in km/h per weekday/hour, joining per-edge length
/// against per-trip elapsed time.
#[must_use]
pub fn road_speed_graph(
    input_stream_name_time: &str,
    input_stream_name_length: &str,
    enter_time_column: &str,
    leave_time_column: &str,
    edge_id_column: &str,
    start_coord_column: &str,
    end_coord_column: &str,
    weekday_result_column: &str,
    hour_result_column: &str,
    speed_result_column: &str,
    parser: Option<LineParser>,
) -> Graph {
    let edge_lengths = || {
        from_source(input_stream_name_length, parser)
            .map(CompHaversine::new(start_coord_column, end_coord_column, "length", EARTH_RADIUS_KM))
            .sort(vec![edge_id_column.to_string()])
    };

    let trip_durations = || {
        from_source(input_stream_name_time, parser)
            .map(ConvertToDatetime::new(
                vec![enter_time_column.to_string(), leave_time_column.to_string()],
                TRIP_TIME_FORMAT,
            ))
            .map(CompTimeDelta::new(enter_time_column, leave_time_column, "time_delta"))
            .sort(vec![edge_id_column.to_string()])
    };

    let total_time_by_trip = trip_durations()
        .join(InnerJoiner::default(), edge_lengths(), vec![edge_id_column.to_string()])
        .map(DeleteDummyColumn::new(leave_time_column))
        .sort(vec![enter_time_column.to_string()])
        .reduce(Sum::new("time_delta"), vec![enter_time_column.to_string()])
        .sort(vec![enter_time_column.to_string()]);

    let total_length_by_trip = trip_durations()
        .join(InnerJoiner::default(), edge_lengths(), vec![edge_id_column.to_string()])
        .map(DeleteDummyColumn::new(leave_time_column))
        .sort(vec![enter_time_column.to_string()])
        .reduce(Sum::new("length"), vec![enter_time_column.to_string()])
        .sort(vec![enter_time_column.to_string()]);

    total_length_by_trip
        .join(InnerJoiner::default(), total_time_by_trip, vec![enter_time_column.to_string()])
        .map(AverageSpeed::new("length", "time_delta", speed_result_column))
        .map(GetWeekdayAndHour::new(enter_time_column, weekday_result_column, hour_result_column))
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

    fn edge(edge_id: i64, start: (f64, f64), end: (f64, f64)) -> Result<Row, Error> {
        let mut row = Row::new();
        row.set("edge_id", Value::Int(edge_id));
        row.set("start", Value::Geo(start.0, start.1));
        row.set("end", Value::Geo(end.0, end.1));
        Ok(row)
    }

    fn trip(edge_id: i64, enter: &str, leave: &str) -> Result<Row, Error> {
        let mut row = Row::new();
        row.set("edge_id", Value::Int(edge_id));
        row.set("enter_time", Value::Str(enter.to_string()));
        row.set("leave_time", Value::Str(leave.to_string()));
        Ok(row)
    }

    #[test]
    fn computes_a_positive_speed_for_a_single_trip() {
        let edges = vec![edge(1, (37.84870, 55.73432), (37.84935, 55.73464))];
        let trips = vec![trip(1, "20171020T112238.723000", "20171020T112249.421000")];

        let mut bindings = Bindings::new();
        bindings.insert(
            "length".to_string(),
            Binding::from_iter_fn(move || -> RowStream { Box::new(edges.clone().into_iter()) }),
        );
        bindings.insert(
            "time".to_string(),
            Binding::from_iter_fn(move || -> RowStream { Box::new(trips.clone().into_iter()) }),
        );

        let graph = road_speed_graph(
            "time", "length", "enter_time", "leave_time", "edge_id", "start", "end", "weekday", "hour", "speed", None,
        );
        let rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 1);
        assert!(rows[0].get("speed").unwrap().as_float().unwrap() > 0.0);
        assert_eq!(rows[0].get("weekday"), Some(&Value::Str("Fri".to_string())));
    }
}

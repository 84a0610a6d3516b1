//! End-to-end checks for the four example pipelines, against the exact
//! fixtures used to validate the source this crate's pipelines were
//! translated from.

use rowgraph::{
    bindings::{Binding, Bindings},
    error::Error,
    pipelines::{pmi_graph, road_speed_graph, tf_idf_graph, word_count_graph},
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

fn iter_binding(rows: Vec<Result<Row, Error>>) -> Binding {
    Binding::from_iter_fn(move || -> RowStream { Box::new(rows.clone().into_iter()) })
}

fn assert_close(actual: f64, expected: f64, label: &str) {
    let tolerance = expected.abs() * 0.001 + 1e-6;
    assert!(
        (actual - expected).abs() <= tolerance,
        "{label}: expected {expected}, got {actual}"
    );
}

#[test]
fn word_count_orders_by_count_then_text() {
    let docs = vec![doc(1, "hello, my little WORLD"), doc(2, "Hello, my little little hell")];

    let mut bindings = Bindings::new();
    bindings.insert("docs".to_string(), iter_binding(docs));

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

#[test]
fn tf_idf_matches_the_documented_six_document_fixture() {
    let docs = vec![
        doc(1, "hello, little world"),
        doc(2, "little"),
        doc(3, "little little little"),
        doc(4, "little? hello little world"),
        doc(5, "HELLO HELLO! WORLD..."),
        doc(6, "world? world... world!!! WORLD!!! HELLO!!!"),
    ];

    let mut bindings = Bindings::new();
    bindings.insert("docs".to_string(), iter_binding(docs));

    let graph = tf_idf_graph("docs", "doc_id", "text", "tf_idf", None);
    let mut rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();
    rows.sort_by(|a, b| {
        let key = |r: &Row| (r.get("doc_id").unwrap().as_int().unwrap(), r.get("text").unwrap().as_str().unwrap().to_string());
        key(a).cmp(&key(b))
    });

    let expected: &[(i64, &str, f64)] = &[
        (1, "hello", 0.1351),
        (1, "world", 0.1351),
        (2, "little", 0.4054),
        (3, "little", 0.4054),
        (4, "hello", 0.1013),
        (4, "little", 0.2027),
        (5, "hello", 0.2703),
        (5, "world", 0.1351),
        (6, "world", 0.3243),
    ];

    assert_eq!(rows.len(), expected.len());
    for (row, &(doc_id, text, tf_idf)) in rows.iter().zip(expected) {
        assert_eq!(row.get("doc_id").unwrap().as_int().unwrap(), doc_id);
        assert_eq!(row.get("text").unwrap().as_str().unwrap(), text);
        assert_close(row.get("tf_idf").unwrap().as_float().unwrap(), tf_idf, text);
    }
}

#[test]
fn pmi_matches_the_documented_six_document_fixture() {
    let docs = vec![
        doc(1, "hello, little world"),
        doc(2, "little"),
        doc(3, "little little little"),
        doc(4, "little? hello little world"),
        doc(5, "HELLO HELLO! WORLD..."),
        doc(6, "world? world... world!!! WORLD!!! HELLO!!! HELLO!!!!!!!"),
    ];

    let mut bindings = Bindings::new();
    bindings.insert("docs".to_string(), iter_binding(docs));

    let graph = pmi_graph("docs", "doc_id", "text", "pmi", None);
    let mut rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();
    rows.sort_by_key(|r| r.get("doc_id").unwrap().as_int().unwrap());

    let expected: &[(i64, &str, f64)] = &[
        (3, "little", 0.9555),
        (4, "little", 0.9555),
        (5, "hello", 1.1786),
        (6, "world", 0.7731),
        (6, "hello", 0.0800),
    ];

    assert_eq!(rows.len(), expected.len());
    for (row, &(doc_id, text, pmi)) in rows.iter().zip(expected) {
        assert_eq!(row.get("doc_id").unwrap().as_int().unwrap(), doc_id);
        assert_eq!(row.get("text").unwrap().as_str().unwrap(), text);
        assert_close(row.get("pmi").unwrap().as_float().unwrap(), pmi, text);
    }
}

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
fn road_speed_matches_the_documented_fixture() {
    let edges = vec![
        edge(8414926848168493057, (37.848_702_287_301_42, 55.738_539_746_962_49), (37.849_041_838_198_9, 55.738_324_457_779_53)),
        edge(5342768494149337085, (37.524_768_467_992_544, 55.887_853_754_684_33), (37.524_151_727_557_18, 55.888_071_558_438_24)),
        edge(5123042926973124604, (37.569_631_766_527_89, 55.846_845_586_784_184), (37.570_184_385_403_99, 55.846_925_969_235_6)),
        edge(5726148664276615162, (37.414_634_786_546_23, 55.654_487_907_886_505), (37.414_428_927_004_34, 55.654_839_486_815_035)),
        edge(451916977441439743, (37.584_684_155_881_405, 55.782_858_096_063_14), (37.584_150_228_649_38, 55.781_773_687_340_32)),
        edge(7639557040160407543, (37.736_429_711_803_794, 55.626_963_288_523_26), (37.736_344_216_391_444, 55.626_937_723_718_584)),
        edge(1293255682152955894, (37.831_967_566_162_35, 55.766_629_474_237_56), (37.831_910_150_125_62, 55.766_647_034_324_706)),
    ];

    let trips = vec![
        trip(8414926848168493057, "20171020T112237.427000", "20171020T112238.723000"),
        trip(8414926848168493057, "20171011T145551.957000", "20171011T145553.040000"),
        trip(8414926848168493057, "20171020T090547.463000", "20171020T090548.939000"),
        trip(8414926848168493057, "20171024T144059.102000", "20171024T144101.879000"),
        trip(5342768494149337085, "20171022T131820.842000", "20171022T131828.330000"),
        trip(5342768494149337085, "20171014T134825.215000", "20171014T134826.836000"),
        trip(5342768494149337085, "20171010T060608.344000", "20171010T060609.897000"),
        trip(5342768494149337085, "20171027T082557.571000", "20171027T082600.201000"),
    ];

    let mut bindings = Bindings::new();
    bindings.insert("length".to_string(), iter_binding(edges));
    bindings.insert("time".to_string(), iter_binding(trips));

    let graph = road_speed_graph(
        "time", "length", "enter_time", "leave_time", "edge_id", "start", "end", "weekday", "hour", "speed", None,
    );
    let mut rows: Vec<Row> = graph.execute(&bindings).unwrap().collect::<Result<_, _>>().unwrap();
    rows.sort_by(|a, b| {
        let key = |r: &Row| {
            (
                r.get("weekday").unwrap().as_str().unwrap().to_string(),
                r.get("hour").unwrap().as_int().unwrap(),
            )
        };
        key(a).cmp(&key(b))
    });

    let expected: &[(&str, i64, f64)] = &[
        ("Fri", 8, 62.2322),
        ("Fri", 9, 78.1070),
        ("Fri", 11, 88.9552),
        ("Sat", 13, 100.9690),
        ("Sun", 13, 21.8577),
        ("Tue", 6, 105.3901),
        ("Tue", 14, 41.5145),
        ("Wed", 14, 106.4505),
    ];

    assert_eq!(rows.len(), expected.len());
    for (row, &(weekday, hour, speed)) in rows.iter().zip(expected) {
        assert_eq!(row.get("weekday").unwrap().as_str().unwrap(), weekday);
        assert_eq!(row.get("hour").unwrap().as_int().unwrap(), hour);
        assert_close(row.get("speed").unwrap().as_float().unwrap(), speed, weekday);
    }
}

use serde_json::json;
use snaplens::chart::{map_chart, ChartConfig, ChartKind, ColorScheme, SeriesData};
use snaplens::{Row, Value};

fn rows(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).expect("rows fixture")
}

fn config(value: serde_json::Value) -> ChartConfig {
    serde_json::from_value(value).expect("chart config fixture")
}

#[test]
fn test_bar_categories_and_values_in_row_order() {
    let data = rows(json!([{"a": "x", "b": 5}, {"a": "y", "b": 3}]));
    let cfg = config(json!({"xAxisField": "a", "yAxisField": "b"}));

    for kind in [ChartKind::Bar, ChartKind::Line] {
        let opts = map_chart(kind, Some(&data), &cfg);
        let x = opts.x_axis.as_ref().expect("x axis");
        assert_eq!(x.categories, vec![Value::from("x"), Value::from("y")]);
        assert_eq!(opts.series.len(), 1);
        match &opts.series[0].data {
            SeriesData::Values(values) => assert_eq!(values, &vec![5.0, 3.0]),
            other => panic!("unexpected series data: {:?}", other),
        }
    }
}

#[test]
fn test_bar_renders_declarative_option() {
    let data = rows(json!([{"a": "x", "b": 5}, {"a": "y", "b": 3}]));
    let cfg = config(json!({"xAxisField": "a", "yAxisField": "b", "title": "Sales"}));
    let option = map_chart(ChartKind::Bar, Some(&data), &cfg).to_echarts();

    assert_eq!(option["title"]["text"], json!("Sales"));
    assert_eq!(option["xAxis"]["data"], json!(["x", "y"]));
    assert_eq!(option["series"][0]["type"], json!("bar"));
    assert_eq!(option["series"][0]["data"], json!([5.0, 3.0]));
    assert_eq!(option["color"][0], json!(ColorScheme::Default.colors()[0]));
}

#[test]
fn test_pie_names_fall_back_to_unknown() {
    let data = rows(json!([
        {"kind": "tea", "n": 2},
        {"kind": "", "n": "4"},
        {"n": 1}
    ]));
    let cfg = config(json!({"nameField": "kind", "valueField": "n"}));
    let opts = map_chart(ChartKind::Pie, Some(&data), &cfg);
    assert_eq!(opts.legend, vec!["tea", "未知", "未知"]);
    let option = opts.to_echarts();
    assert_eq!(option["series"][0]["data"][1]["value"], json!(4.0));
}

#[test]
fn test_heatmap_uses_sorted_categories() {
    let data = rows(json!([
        {"x": "b", "y": "q", "v": 3},
        {"x": "a", "y": "p", "v": 7},
        {"x": "b", "y": "p", "v": 1}
    ]));
    let cfg = config(json!({"xAxisField": "x", "yAxisField": "y", "valueField": "v"}));
    let opts = map_chart(ChartKind::Heatmap, Some(&data), &cfg);

    let x = opts.x_axis.as_ref().unwrap();
    assert_eq!(x.categories, vec![Value::from("a"), Value::from("b")]);
    match &opts.series[0].data {
        SeriesData::Tuples(cells) => {
            assert_eq!(cells[0], vec![1.0, 1.0, 3.0]);
            assert_eq!(cells[1], vec![0.0, 0.0, 7.0]);
        }
        other => panic!("unexpected series data: {:?}", other),
    }
    assert_eq!(opts.visual_map.as_ref().unwrap().max, 7.0);
}

#[test]
fn test_three_d_kinds_use_3d_axes() {
    let data = rows(json!([{"x": 1, "y": 2, "z": 3}]));
    let cfg = config(json!({"xAxisField": "x", "yAxisField": "y", "zAxisField": "z"}));
    for kind in [ChartKind::Bar3d, ChartKind::Scatter3d, ChartKind::Surface3d] {
        let option = map_chart(kind, Some(&data), &cfg).to_echarts();
        assert!(option.get("grid3D").is_some(), "{}", kind.as_str());
        assert!(option.get("xAxis3D").is_some(), "{}", kind.as_str());
        assert!(option.get("xAxis").is_none(), "{}", kind.as_str());
    }
}

#[test]
fn test_unknown_scheme_falls_back_to_default() {
    let data = rows(json!([{"a": "x", "b": 1}]));
    let cfg = config(json!({"xAxisField": "a", "yAxisField": "b", "colorScheme": "neon"}));
    let opts = map_chart(ChartKind::Line, Some(&data), &cfg);
    let expected: Vec<String> = ColorScheme::Default
        .colors()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(opts.colors, expected);
}

#[test]
fn test_every_kind_with_no_rows_has_no_series() {
    let cfg = ChartConfig::default();
    for kind in ChartKind::iterator() {
        let empty: &[Row] = &[];
        assert!(map_chart(kind, None, &cfg).series.is_empty());
        assert!(map_chart(kind, Some(empty), &cfg).series.is_empty());
    }
}

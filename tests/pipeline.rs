use std::collections::HashMap;

use escher_map_render::{
    plot_map, render_primitives, Arrow, Direction, LineStyle, MapCache, MapError, Marker,
    PlotConfig, Point, Polyline, ReactionDirection, RenderBackend, StyleOverrides, TextBlock,
};
use serde_json::json;

fn two_metabolite_map() -> String {
    json!([
        {"map_name": "two", "map_id": "x", "schema": "https://escher.github.io/escher/jsonschema/1-0-0#"},
        {
            "canvas": {"x": 0.0, "y": 0.0, "width": 100.0, "height": 50.0},
            "nodes": {
                "m1": {"node_type": "metabolite", "x": 0.0, "y": 0.0, "bigg_id": "A",
                       "node_is_primary": true, "label_x": 0.0, "label_y": -5.0},
                "m2": {"node_type": "metabolite", "x": 10.0, "y": 0.0, "bigg_id": "B",
                       "node_is_primary": true, "label_x": 10.0, "label_y": -5.0}
            },
            "reactions": {
                "r1": {
                    "bigg_id": "RXN",
                    "name": "A to B",
                    "reversibility": false,
                    "label_x": 5.0,
                    "label_y": 2.0,
                    "segments": {"s1": {"from_node_id": "m1", "to_node_id": "m2", "b1": null, "b2": null}}
                }
            },
            "text_labels": {}
        }
    ])
    .to_string()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn straight_reaction_between_two_metabolites() {
    let config = PlotConfig::default();
    let primitives = plot_map(&two_metabolite_map(), &config).unwrap();

    assert_eq!(primitives.markers.len(), 2);
    assert_eq!(primitives.polylines.len(), 1);
    let line = &primitives.polylines[0];
    assert_eq!(line.style, LineStyle::Solid);
    assert_eq!(line.points.len(), config.curve_samples);
    assert_eq!(line.points[0], Point::new(0.0, 0.0));
    assert_eq!(line.points[line.points.len() - 1], Point::new(10.0, 0.0));
    for (i, point) in line.points.iter().enumerate() {
        assert_close(point.x, 10.0 * i as f64 / (config.curve_samples - 1) as f64);
        assert_close(point.y, 0.0);
    }
    assert!(primitives.arrows.is_empty());
    assert!(primitives.texts.is_empty());
}

#[test]
fn unmatched_override_marks_reaction_as_missing_data() {
    let config = PlotConfig {
        reaction_edge_widths: HashMap::from([("otherRxn".to_string(), 5.0)]),
        ..PlotConfig::default()
    };
    let primitives = plot_map(&two_metabolite_map(), &config).unwrap();
    assert_eq!(primitives.polylines[0].style, LineStyle::Dotted);
    assert_eq!(primitives.polylines[0].width, config.reaction_edge_width);
}

#[test]
fn forward_direction_adds_one_arrow_into_product() {
    let config = PlotConfig {
        reaction_directions: HashMap::from([(
            "RXN".to_string(),
            ReactionDirection::new([("A", -1.0), ("B", 1.0)], Direction::Forward),
        )]),
        ..PlotConfig::default()
    };
    let primitives = plot_map(&two_metabolite_map(), &config).unwrap();
    assert_eq!(primitives.arrows.len(), 1);
    let arrow = primitives.arrows[0];
    assert!(arrow.position.x > 5.0 && arrow.position.x < 10.0);
    assert!(arrow.direction.x > 0.0);
}

#[test]
fn rendering_twice_is_identical() {
    let config = PlotConfig::from_json(
        r##"{
            "metabolite_show_text": true,
            "reaction_show_text": true,
            "reaction_edge_colors": {"RXN": "#cc3300"},
            "reaction_directions": {"RXN": [{"A": -1, "B": 1}, "bidirectional"]}
        }"##,
    )
    .unwrap();
    let map = two_metabolite_map();
    let first = plot_map(&map, &config).unwrap();
    let second = plot_map(&map, &config).unwrap();
    assert_eq!(first, second);

    let cache = MapCache::from_json(&map).unwrap();
    assert_eq!(cache.render(&config).unwrap(), first);
}

#[test]
fn recompute_with_new_overrides_changes_only_styling() {
    let cache = MapCache::from_json(&two_metabolite_map()).unwrap();
    let config = PlotConfig::default();
    let before = cache.render(&config).unwrap();
    let overrides = StyleOverrides {
        metabolite_node_sizes: HashMap::from([("A".to_string(), 9.0)]),
        reaction_edge_widths: HashMap::from([("RXN".to_string(), 4.0)]),
        ..StyleOverrides::default()
    };
    let after = escher_map_render::recompute_with_overrides(&cache, &config, overrides).unwrap();
    assert_eq!(after.markers[0].size, 9.0);
    assert_eq!(after.markers[1].size, before.markers[1].size);
    assert_eq!(after.polylines[0].width, 4.0);
    assert_eq!(after.polylines[0].points, before.polylines[0].points);
}

#[test]
fn resolution_reads_canvas() {
    let cache = MapCache::from_json(&two_metabolite_map()).unwrap();
    let resolution = cache.resolution();
    assert_eq!(resolution.width, Some(100.0));
    assert_eq!(resolution.height, Some(50.0));
}

#[test]
fn dangling_segment_aborts_the_render() {
    let map = json!([{}, {
        "nodes": {"1": {"node_type": "metabolite", "x": 0.0, "y": 0.0, "bigg_id": "A"}},
        "reactions": {"r": {"bigg_id": "R", "segments": {"s": {"from_node_id": "1", "to_node_id": "99"}}}}
    }])
    .to_string();
    let err = plot_map(&map, &PlotConfig::default()).unwrap_err();
    assert!(matches!(err, MapError::DanglingEndpoint { .. }));
}

#[test]
fn endpoint_without_coordinates_is_dangling() {
    // A node missing `y` is left out of the position table, so referencing it is fatal.
    let map = json!([{}, {
        "nodes": {
            "1": {"node_type": "metabolite", "x": 0.0, "y": 0.0},
            "2": {"node_type": "multimarker", "x": 4.0}
        },
        "reactions": {"r": {"segments": {"s": {"from_node_id": "1", "to_node_id": "2"}}}}
    }])
    .to_string();
    assert!(matches!(
        plot_map(&map, &PlotConfig::default()),
        Err(MapError::DanglingEndpoint { .. })
    ));
}

#[test]
fn missing_nodes_collection_is_fatal() {
    let map = json!([{}, {"reactions": {}}]).to_string();
    assert!(matches!(
        plot_map(&map, &PlotConfig::default()),
        Err(MapError::MissingCollection("nodes"))
    ));
}

#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl RenderBackend for Recorder {
    fn draw_points(&mut self, _markers: &[Marker]) -> anyhow::Result<()> {
        self.calls.push("points");
        Ok(())
    }

    fn draw_polyline(&mut self, _polyline: &Polyline) -> anyhow::Result<()> {
        self.calls.push("polyline");
        Ok(())
    }

    fn draw_arrow(&mut self, _arrow: &Arrow) -> anyhow::Result<()> {
        self.calls.push("arrow");
        Ok(())
    }

    fn draw_text(&mut self, _block: &TextBlock) -> anyhow::Result<()> {
        self.calls.push("text");
        Ok(())
    }
}

#[test]
fn backend_receives_lines_before_markers_and_text() {
    let config = PlotConfig {
        reaction_show_text: true,
        reaction_directions: HashMap::from([(
            "RXN".to_string(),
            ReactionDirection::new([("A", -1.0), ("B", 1.0)], Direction::Forward),
        )]),
        ..PlotConfig::default()
    };
    let primitives = plot_map(&two_metabolite_map(), &config).unwrap();
    let mut recorder = Recorder::default();
    render_primitives(&primitives, &mut recorder).unwrap();
    assert_eq!(recorder.calls, ["polyline", "arrow", "points", "text"]);
}

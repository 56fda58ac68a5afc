use std::collections::BTreeMap;

use borealis_core::config::Config;
use borealis_core::map::{
    Attachment, COASTLINE_LAYER, ControlCorner, Crs, HeadlessRenderer, LatLng, LayerDescriptor,
    LegendGroups, LegendItem, MapError, MapManager, POLAR_MASK_LAYER, SourceKind,
};
use serde_json::json;

fn manager() -> MapManager<HeadlessRenderer> {
    let _ = env_logger::builder().is_test(true).try_init();
    MapManager::new(HeadlessRenderer::new(), &Config::default())
}

fn temperature() -> LayerDescriptor {
    LayerDescriptor {
        id: "temperature_midcentury".to_string(),
        title: "Mid-century temperature".to_string(),
        source: SourceKind::Geoserver,
        wms_layer_name: "iem_tas_midcentury".to_string(),
        style: None,
        extra_params: BTreeMap::new(),
        bbox: Some([-170.0, 50.0, -140.0, 72.0]),
        coastline: false,
        legend: "temperature".to_string(),
        default: true,
    }
}

fn sea_ice() -> LayerDescriptor {
    LayerDescriptor {
        id: "sea_ice_jan".to_string(),
        title: "January sea ice".to_string(),
        source: SourceKind::Rasdaman,
        wms_layer_name: "hsia_arctic_production".to_string(),
        style: Some("seaice_conc".to_string()),
        extra_params: [
            ("dim_model".to_string(), json!(5)),
            ("time".to_string(), json!("2047-01-15T00:00:00.000Z")),
        ]
        .into_iter()
        .collect(),
        bbox: None,
        coastline: true,
        legend: "sea_ice".to_string(),
        default: false,
    }
}

fn legends() -> LegendGroups {
    let mut groups = LegendGroups::new();
    groups.insert(
        "temperature".to_string(),
        vec![
            LegendItem::new("#2166ac", "Below freezing"),
            LegendItem::new("#b2182b", "Above freezing"),
        ],
    );
    groups.insert(
        "sea_ice".to_string(),
        vec![LegendItem::new("#ffffff", "Ice present")],
    );
    groups
}

#[test]
fn a_regional_map_opens_with_its_base_raster() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();

    let map = manager.renderer().map("weather").unwrap();
    assert_eq!(map.viewport().crs_code, "EPSG:3338");

    let requests: Vec<_> = map.tile_requests().collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].param("layers"),
        Some("atlas_mapproxy:alaska_osm_retina")
    );
}

#[test]
fn a_polar_toggle_stacks_mask_layer_and_labels_in_order() {
    let mut manager = manager();
    manager.create("ice", Crs::Polar).unwrap();
    manager.set_legend_items("ice", legends());
    manager.toggle_layer("ice", &sea_ice()).unwrap();

    let map = manager.renderer().map("ice").unwrap();
    let attachments = map.attachments();
    assert_eq!(attachments.len(), 4);

    let mask = attachments[0].1.tile_request().unwrap();
    assert_eq!(mask.param("layers"), Some(POLAR_MASK_LAYER));

    let thematic = attachments[1].1.tile_request().unwrap();
    assert_eq!(thematic.param("layers"), Some("hsia_arctic_production"));
    assert_eq!(thematic.param("styles"), Some("seaice_conc"));
    assert!(thematic.base().as_str().contains("rasdaman"));

    assert!(
        matches!(&attachments[2].1, Attachment::PlaceLabels(places) if places.len() == 12),
        "place labels expected above the thematic layer"
    );

    let coastline = attachments[3].1.tile_request().unwrap();
    assert_eq!(coastline.param("layers"), Some(COASTLINE_LAYER));
}

#[test]
fn switching_layers_replaces_the_previous_thematic_stack() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.set_legend_items("weather", legends());

    manager.toggle_layer("weather", &temperature()).unwrap();
    manager.toggle_layer("weather", &sea_ice()).unwrap();
    manager.toggle_layer("weather", &temperature()).unwrap();

    // Base raster plus exactly one thematic layer; the sea ice coastline
    // overlay is gone with its layer.
    let map = manager.renderer().map("weather").unwrap();
    let requests: Vec<_> = map.tile_requests().collect();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].param("layers"),
        Some("atlas_mapproxy:alaska_osm_retina")
    );
    assert_eq!(requests[1].param("layers"), Some("iem_tas_midcentury"));

    assert_eq!(
        manager.active_layer("weather").unwrap().id,
        "temperature_midcentury"
    );
}

#[test]
fn a_layer_bbox_zooms_the_map_to_its_extent() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.set_legend_items("weather", legends());
    manager.toggle_layer("weather", &temperature()).unwrap();

    let map = manager.renderer().map("weather").unwrap();
    let bounds = map.fitted_bounds().unwrap();
    assert_eq!(bounds.south_west, LatLng::new(50.0, -170.0));
    assert_eq!(bounds.north_east, LatLng::new(72.0, -140.0));
}

#[test]
fn the_legend_control_follows_the_active_layer() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.set_legend_items("weather", legends());

    manager.toggle_layer("weather", &temperature()).unwrap();
    let map = manager.renderer().map("weather").unwrap();
    let (corner, items) = map.legend().unwrap();
    assert_eq!(corner, ControlCorner::TopLeft);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].label, "Below freezing");

    manager.toggle_layer("weather", &sea_ice()).unwrap();
    let map = manager.renderer().map("weather").unwrap();
    let (_, items) = map.legend().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "Ice present");
}

#[test]
fn datacube_extras_ride_along_on_the_tile_request() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.set_legend_items("weather", legends());
    manager.toggle_layer("weather", &sea_ice()).unwrap();

    let map = manager.renderer().map("weather").unwrap();
    let request = map.tile_requests().nth(1).unwrap();
    assert_eq!(request.param("dim_model"), Some("5"));
    assert_eq!(request.param("time"), Some("2047-01-15T00:00:00.000Z"));
    assert_eq!(request.param("transparent"), Some("true"));
    assert_eq!(request.param("format"), Some("image/png"));
}

#[test]
fn a_failed_toggle_leaves_the_previous_layer_in_place() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.set_legend_items("weather", legends());
    manager.toggle_layer("weather", &temperature()).unwrap();

    let mut unknown = sea_ice();
    unknown.legend = "aurora".to_string();
    let err = manager.toggle_layer("weather", &unknown).unwrap_err();
    assert!(matches!(err, MapError::LegendGroupMissing { .. }));

    assert_eq!(
        manager.active_layer("weather").unwrap().id,
        "temperature_midcentury"
    );
    let map = manager.renderer().map("weather").unwrap();
    let requests: Vec<_> = map.tile_requests().collect();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].param("layers"), Some("iem_tas_midcentury"));
}

#[test]
fn destroy_releases_the_live_map() {
    let mut manager = manager();
    manager.create("weather", Crs::Regional).unwrap();
    manager.destroy("weather");

    assert!(manager.renderer().map("weather").is_none());
    assert!(manager.renderer().is_empty());
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end: import every layer kind from raw text, style it, save the
//! pool as a project and restore it into a fresh pool.

use geolayer_core::{ImportSource, LayerKind, LayerParameters, RasterParameters, SurfaceImportOptions};
use geolayer_geometry::ColormapKind;
use geolayer_processing::{Error, SlotPool, ViewerConfig, SEPARATOR};

const DRILLHOLE: &str = "100 200 50 70 135 5\n4\n0\n5\n10\n15\n2\n1\n2\n3\n4\n9\n8\n7\n6\n";

const LINES: &str = "line,x,y,z,mag\n\
    L1,0,0,0,10\nL1,50,10,0,20\nL1,100,0,0,30\n\
    L2,0,100,0,40\nL2,50,110,0,50\nL2,100,100,0,60\n";

const POINTS: &str = "east,north,elev,grade\n0,0,0,0.5\n10,10,0,-99\n20,0,5,2.5\n";

fn unit_cube_mesh(values: [u8; 8]) -> String {
    let mut text = String::from("8\n");
    for z in 0..2 {
        for y in 0..2 {
            for x in 0..2 {
                text.push_str(&format!("{} {} {}\n", x, y, z));
            }
        }
    }
    text.push_str("1\n0 1 2 3 4 5 6 7\n");
    for v in values {
        text.push_str(&format!("{}\n", v));
    }
    text
}

fn config() -> ViewerConfig {
    ViewerConfig {
        slot_count: 8,
        tube_radial_segments: 6,
        sphere_width_segments: 8,
        sphere_height_segments: 4,
        ..ViewerConfig::from_env()
    }
}

async fn populated_pool() -> SlotPool {
    let pool = SlotPool::new(config());

    let dh = pool
        .import_sources(LayerKind::Drillhole, &[ImportSource::new("DH-01.dh", DRILLHOLE)])
        .await
        .unwrap();
    pool.update(dh, |layer| layer.as_drillhole_mut()?.set_observation(1))
        .unwrap();

    // Column mapping happens between import and layer construction
    let (params, _) = geolayer_core::import_parameters(
        LayerKind::Lines,
        &[ImportSource::new("seismic.csv", LINES)],
        config().surface_options(),
    )
    .await
    .unwrap();
    let LayerParameters::Lines(lines) = params else {
        panic!("expected lines");
    };
    let lines = lines.with_columns("x", "y", "z", "line").with_value_column("mag");
    pool.import(LayerParameters::Lines(lines), "seismic.csv").await.unwrap();

    let (params, _) = geolayer_core::import_parameters(
        LayerKind::Points,
        &[ImportSource::new("assays.csv", POINTS)],
        config().surface_options(),
    )
    .await
    .unwrap();
    let LayerParameters::Points(points) = params else {
        panic!("expected points");
    };
    let points = points
        .with_columns("east", "north", "elev")
        .with_value_column("grade")
        .with_no_data(-99.0);
    pool.import(LayerParameters::Points(points), "assays.csv").await.unwrap();

    let ensemble = [
        ImportSource::new("r0.mesh", unit_cube_mesh([1; 8])),
        ImportSource::new("r1.mesh", unit_cube_mesh([2, 2, 2, 2, 1, 1, 1, 1])),
    ];
    let index = pool.import_sources(LayerKind::Ensemble, &ensemble).await.unwrap();
    pool.update(index, |layer| layer.set_colormap(ColormapKind::Terrain))
        .unwrap();

    // 3x2 grid, bands interleaved (elevation, grade), one no-data pixel
    let raster = RasterParameters::from_samples(
        vec![
            10.0, 0.1, 11.0, 0.2, 12.0, 0.3, //
            13.0, 0.4, -32767.0, 0.5, 15.0, 0.6,
        ],
        3,
        2,
        2,
        [1000.0, 2000.0],
        [25.0, -25.0],
        SurfaceImportOptions::default(),
    )
    .unwrap();
    let index = pool.import(LayerParameters::Surface(raster), "dem.tif").await.unwrap();
    pool.update(index, |layer| layer.as_surface_mut()?.set_color_band(2))
        .unwrap();

    let blocks = [ImportSource::new("blocks.mesh", unit_cube_mesh([3, 3, 3, 3, 4, 4, 4, 4]))];
    pool.import_sources(LayerKind::MultiVolume, &blocks).await.unwrap();

    pool
}

#[tokio::test]
async fn test_every_kind_lands_in_order() {
    let pool = populated_pool().await;
    let slots = pool.snapshot().unwrap();

    let kinds: Vec<Option<LayerKind>> = slots.iter().map(|s| s.layer().map(|l| l.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            Some(LayerKind::Drillhole),
            Some(LayerKind::Lines),
            Some(LayerKind::Points),
            Some(LayerKind::Ensemble),
            Some(LayerKind::Surface),
            Some(LayerKind::MultiVolume),
            None,
            None,
        ]
    );
    assert_eq!(slots[0].label, "DH-01.dh");
    assert_eq!(slots[4].label, "dem.tif");
    assert_eq!(slots[5].label, "blocks.mesh");

    // Pixel (1, 1) is no-data; only the first cell's a-b-d triangle avoids it
    let surface = slots[4].layer().unwrap();
    assert_eq!(surface.scene().unwrap().vertex_count(), 5);
    assert_eq!(surface.scene().unwrap().triangle_count(), 1);

    // One sub-mesh per category
    let blocks = slots[5].layer().unwrap();
    assert_eq!(blocks.scene().unwrap().len(), 2);

    // The no-data row is dropped
    let points = slots[2].layer().unwrap();
    let per_sphere = points.style().sphere.vertex_count();
    assert_eq!(points.scene().unwrap().vertex_count(), 2 * per_sphere);

    // Two ribbons of three sections
    let lines = slots[1].layer().unwrap();
    assert_eq!(lines.scene().unwrap().vertex_count(), 12);
    assert!(lines.render_items()[0].material.vertex_colors);
}

#[tokio::test]
async fn test_project_restores_into_fresh_pool() {
    let pool = populated_pool().await;
    pool.update(1, |layer| layer.set_opacity(0.5)).unwrap();
    let text = pool.save_project().unwrap();
    assert_eq!(text.matches(SEPARATOR).count(), 7);

    let restored = SlotPool::new(config());
    assert_eq!(restored.load_project(&text).await.unwrap(), 6);

    let before = pool.snapshot().unwrap();
    let after = restored.snapshot().unwrap();
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.visible, b.visible);
        assert_eq!(a.checked, b.checked);
        assert_eq!(a.label, b.label);
        assert_eq!(a.layer().map(|l| l.parameters()), b.layer().map(|l| l.parameters()));
    }

    // Styling is not part of the record; layers come back with defaults
    assert_eq!(after[1].layer().unwrap().style().opacity, 1.0);

    // The selected colour band is an import parameter and survives
    let LayerParameters::Surface(raster) = after[4].layer().unwrap().parameters() else {
        panic!("expected surface");
    };
    assert_eq!(raster.color_band, 2);
    assert_eq!(raster.n_bands, 2);
    assert_eq!(after[5].layer().unwrap().kind(), LayerKind::MultiVolume);
    assert_eq!(after[5].layer().unwrap().scene().unwrap().len(), 2);
}

#[tokio::test]
async fn test_full_pool_rejects_import() {
    let pool = SlotPool::new(ViewerConfig {
        slot_count: 1,
        ..config()
    });
    let source = [ImportSource::new("DH-01.dh", DRILLHOLE)];
    pool.import_sources(LayerKind::Drillhole, &source).await.unwrap();
    assert!(matches!(
        pool.import_sources(LayerKind::Drillhole, &source).await,
        Err(Error::PoolFull(1))
    ));
}

#[tokio::test]
async fn test_truncated_drillhole_never_reaches_pool() {
    let pool = SlotPool::new(config());
    let truncated = &DRILLHOLE[..DRILLHOLE.len() - 4];
    let result = pool
        .import_sources(LayerKind::Drillhole, &[ImportSource::new("bad.dh", truncated)])
        .await;
    assert!(matches!(result, Err(Error::Core(_))));
    assert!(pool.snapshot().unwrap().iter().all(|s| s.is_empty()));
}

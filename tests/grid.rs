use objfind::{
    compose_grid, draw_bounding_box, mask_comparison_grid, GridConfig, GridLayout, PixelFormat,
    Raster,
};

fn solid(width: usize, height: usize, bgr: [u8; 3]) -> Raster {
    Raster::filled(width, height, PixelFormat::Bgr, bgr).unwrap()
}

#[test]
fn grid_cells_follow_largest_image() {
    let images = vec![
        Some(solid(10, 6, [1, 1, 1])),
        None,
        Some(solid(4, 8, [2, 2, 2])),
    ];
    let cfg = GridConfig {
        spacing: 2,
        ..GridConfig::default()
    };
    let grid = compose_grid(&images, cfg).unwrap();

    // ceil(sqrt(3)) = 2 columns, 2 rows of 10x8 cells.
    assert_eq!((grid.width(), grid.height()), (22, 18));
    assert_eq!(grid.pixel(0, 0).unwrap(), &[1, 1, 1]);
    assert_eq!(grid.pixel(12, 0).unwrap(), &[255, 255, 255]);
    assert_eq!(grid.pixel(0, 10).unwrap(), &[2, 2, 2]);
    assert_eq!(grid.pixel(5, 10).unwrap(), &[255, 255, 255]);
}

#[test]
fn images_beyond_capacity_are_ignored() {
    let images: Vec<_> = (0..5).map(|i| Some(solid(3, 3, [i, i, i]))).collect();
    let cfg = GridConfig {
        rows: Some(1),
        cols: Some(2),
        spacing: 0,
        ..GridConfig::default()
    };
    let grid = compose_grid(&images, cfg).unwrap();
    assert_eq!((grid.width(), grid.height()), (6, 3));
    assert_eq!(grid.pixel(3, 0).unwrap(), &[1, 1, 1]);
}

#[test]
fn comparison_grid_pairs_templates_with_masks() {
    let templates = vec![Some(solid(5, 5, [9, 9, 9])); 7];
    let masks = vec![Some(solid(5, 5, [0, 0, 0])); 7];
    let grid = mask_comparison_grid(&templates, &masks, 5).unwrap();
    assert_eq!(GridLayout::resolve(10, None, Some(2)), GridLayout { rows: 5, cols: 2 });
    assert_eq!(grid.width(), 2 * 5 + 8);
    assert_eq!(grid.height(), 5 * 5 + 4 * 8);
    assert_eq!(grid.pixel(6, 0).unwrap(), &[255, 255, 255]);
    assert_eq!(grid.pixel(13, 0).unwrap(), &[0, 0, 0]);
}

#[test]
fn bounding_box_leaves_input_untouched() {
    let raster = solid(30, 20, [10, 20, 30]);
    let boxed = draw_bounding_box(&raster, (2, 3), (12, 15)).unwrap();
    assert_eq!(raster.pixel(2, 3).unwrap(), &[10, 20, 30]);
    assert_eq!(boxed.pixel(2, 3).unwrap(), &[0, 0, 255]);
    assert_eq!(boxed.pixel(7, 9).unwrap(), &[10, 20, 30]);
}

use objfind::lowlevel::best_placement;
use objfind::{
    match_multiscale, Metric, MultiScaleConfig, ObjFindError, OwnedImage, PixelFormat, Raster,
    Template,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_gray(rng: &mut StdRng, width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|_| rng.random_range(0..200u8)).collect()
}

fn crop_bgr(gray: &[u8], width: usize, x0: usize, y0: usize, tw: usize, th: usize) -> Raster {
    let mut data = Vec::with_capacity(tw * th * 3);
    for y in y0..y0 + th {
        for x in x0..x0 + tw {
            let v = gray[y * width + x];
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Raster::new(data, tw, th, PixelFormat::Bgr).unwrap()
}

#[test]
fn finds_crop_at_native_scale() {
    let mut rng = StdRng::seed_from_u64(42);
    let (width, height) = (120, 100);
    let gray = random_gray(&mut rng, width, height);
    let image = Raster::from_shape(gray.clone(), &[height, width]).unwrap();
    let template = crop_bgr(&gray, width, 40, 35, 30, 30);

    let cfg = MultiScaleConfig {
        scale_range: (0.5, 1.0),
        scale_steps: 6,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(template), None], &cfg).unwrap();

    assert_eq!(out.locations, vec![(40, 35)]);
    let det = out.detections[0];
    assert_eq!(det.template_idx, 0);
    assert_eq!((det.width, det.height), (30, 30));
    assert!((det.scale - 1.0).abs() < 1e-12);
    assert!(det.score > 0.99);

    assert_eq!(out.annotated.format(), PixelFormat::Bgr);
    assert_eq!(out.annotated.pixel(40, 35).unwrap(), &[0, 0, 255]);
}

#[test]
fn ssd_metric_reports_raw_distance() {
    let mut rng = StdRng::seed_from_u64(5);
    let (width, height) = (64, 48);
    let gray = random_gray(&mut rng, width, height);
    let image = Raster::from_shape(gray.clone(), &[height, width]).unwrap();
    let template = crop_bgr(&gray, width, 10, 12, 16, 12);

    let cfg = MultiScaleConfig {
        scale_range: (1.0, 1.0),
        scale_steps: 1,
        metric: Metric::Ssd,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(template)], &cfg).unwrap();
    assert_eq!(out.locations, vec![(10, 12)]);
    assert_eq!(out.detections[0].score, 0.0);
}

#[test]
fn locations_stay_inside_the_image() {
    let mut rng = StdRng::seed_from_u64(9);
    let (width, height) = (90, 70);
    let gray = random_gray(&mut rng, width, height);
    let image = Raster::from_shape(gray.clone(), &[height, width]).unwrap();
    let templates: Vec<_> = [(0, 0, 20, 16), (60, 40, 30, 30), (30, 20, 25, 18)]
        .iter()
        .map(|&(x, y, w, h)| Some(crop_bgr(&gray, width, x, y, w, h)))
        .collect();

    let out = match_multiscale(&image, &templates, &MultiScaleConfig::default()).unwrap();
    assert_eq!(out.locations.len(), 3);
    for det in &out.detections {
        assert!(det.x + det.width <= width);
        assert!(det.y + det.height <= height);
    }
}

#[test]
fn white_template_has_empty_mask_and_no_detection() {
    let image = Raster::filled(100, 100, PixelFormat::Bgr, [0, 0, 0]).unwrap();
    let template = Raster::filled(20, 20, PixelFormat::Bgr, [255, 255, 255]).unwrap();
    let out = match_multiscale(&image, &[Some(template)], &MultiScaleConfig::default()).unwrap();
    assert!(out.locations.is_empty());
    assert_eq!(out.annotated, image);
}

#[test]
fn oversized_template_yields_no_detection() {
    let image = Raster::filled(40, 30, PixelFormat::Gray, [10, 0, 0]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let big = Raster::from_shape(random_gray(&mut rng, 80, 80), &[80, 80]).unwrap();
    let cfg = MultiScaleConfig {
        scale_range: (0.9, 1.0),
        scale_steps: 3,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(big)], &cfg).unwrap();
    assert!(out.detections.is_empty());
}

#[test]
fn invalid_scale_range_is_rejected() {
    let image = Raster::filled(10, 10, PixelFormat::Gray, [0, 0, 0]).unwrap();
    let cfg = MultiScaleConfig {
        scale_range: (0.0, 1.0),
        ..MultiScaleConfig::default()
    };
    let err = match_multiscale(&image, &[], &cfg).unwrap_err();
    assert!(matches!(err, ObjFindError::InvalidInput(_)));
}

#[test]
fn later_scale_succeeds_after_oversized_ones() {
    let mut rng = StdRng::seed_from_u64(17);
    let (width, height) = (50, 40);
    let gray = random_gray(&mut rng, width, height);
    let image = Raster::from_shape(gray.clone(), &[height, width]).unwrap();
    let template = crop_bgr(&gray, width, 12, 10, 24, 24);

    // 3.0 and 2.0 exceed the image height; only 1.0 can be scored.
    let cfg = MultiScaleConfig {
        scale_range: (3.0, 1.0),
        scale_steps: 3,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(template)], &cfg).unwrap();
    assert_eq!(out.locations, vec![(12, 10)]);
    let det = out.detections[0];
    assert_eq!((det.width, det.height), (24, 24));
    assert!((det.scale - 1.0).abs() < 1e-12);
}

#[test]
fn equal_scores_keep_the_earliest_scale() {
    // A horizontal ramp correlates perfectly with any ramp window, so every
    // placement at every scale scores exactly 1.0.
    let (width, height) = (100, 30);
    let ramp: Vec<u8> = (0..width * height).map(|i| (2 * (i % width)) as u8).collect();
    let image = Raster::from_shape(ramp.clone(), &[height, width]).unwrap();
    let mut tpl = Vec::with_capacity(40 * 20);
    for y in 5..25 {
        tpl.extend_from_slice(&ramp[y * width + 10..y * width + 50]);
    }
    let template = Raster::from_shape(tpl, &[20, 40]).unwrap();

    let cfg = MultiScaleConfig {
        scale_range: (0.5, 1.0),
        scale_steps: 2,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(template)], &cfg).unwrap();
    let det = out.detections[0];
    assert_eq!((det.x, det.y), (0, 0));
    assert_eq!((det.width, det.height), (20, 10));
    assert_eq!(det.scale, 0.5);
    assert_eq!(det.score, 1.0);
}

#[test]
fn gray_template_ignores_its_zero_pixels() {
    let mut rng = StdRng::seed_from_u64(23);
    let (width, height) = (80, 60);
    let gray: Vec<u8> = (0..width * height)
        .map(|_| rng.random_range(1..200u8))
        .collect();
    let image = Raster::from_shape(gray.clone(), &[height, width]).unwrap();

    let (x0, y0, side) = (25, 20, 20);
    let mut tpl = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let hole = (7..13).contains(&x) && (7..13).contains(&y);
            tpl.push(if hole { 0 } else { gray[(y0 + y) * width + x0 + x] });
        }
    }
    let template = Raster::from_shape(tpl.clone(), &[side, side]).unwrap();

    let cfg = MultiScaleConfig {
        scale_range: (1.0, 1.0),
        scale_steps: 1,
        ..MultiScaleConfig::default()
    };
    let out = match_multiscale(&image, &[Some(template)], &cfg).unwrap();
    assert_eq!(out.locations, vec![(x0, y0)]);
    assert!(out.detections[0].score > 0.999);

    // With every pixel active the zeroed hole breaks the correlation.
    let unmasked = Template::with_mask(
        OwnedImage::new(tpl, side, side).unwrap(),
        OwnedImage::new(vec![1; side * side], side, side).unwrap(),
    )
    .unwrap();
    let gray_image = image.to_gray();
    let peak = best_placement(gray_image.view(), &unmasked, Metric::Zncc, 1e-8).unwrap();
    assert!(peak.score < 0.99);
}

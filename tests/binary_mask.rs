use objfind::{binary_mask, binary_masks, MaskConfig, OwnedImage, PixelFormat, Raster};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_bgr(seed: u64, width: usize, height: usize) -> Raster {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * 3).map(|_| rng.random()).collect();
    Raster::new(data, width, height, PixelFormat::Bgr).unwrap()
}

#[test]
fn mask_is_binary_and_keeps_dimensions() {
    let template = random_bgr(11, 23, 17);
    let mask = binary_mask(&template, MaskConfig::default());
    assert_eq!((mask.width(), mask.height()), (23, 17));
    assert!(mask.data().iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn inverted_threshold_is_strictly_below() {
    let gray = Raster::from_gray(OwnedImage::new(vec![199, 200, 201, 0], 4, 1).unwrap());
    let cfg = MaskConfig::default();
    assert_eq!(binary_mask(&gray, cfg).data(), &[255, 0, 0, 255]);

    let plain = MaskConfig {
        inverted: false,
        max_value: 1,
        ..cfg
    };
    assert_eq!(binary_mask(&gray, plain).data(), &[0, 1, 1, 0]);
}

#[test]
fn near_white_square_maps_to_zero() {
    let template = Raster::filled(20, 20, PixelFormat::Bgr, [230, 240, 250]).unwrap();
    let mask = binary_mask(&template, MaskConfig::default());
    assert!(mask.data().iter().all(|&v| v == 0));
}

#[test]
fn default_mask_is_deterministic() {
    let template = random_bgr(29, 31, 27);
    let first = binary_mask(&template, MaskConfig::default());
    let second = binary_mask(&template, MaskConfig::default());
    assert_eq!(first, second);
    assert!(first.data().contains(&255));
}

#[test]
fn masking_a_mask_is_stable() {
    let template = random_bgr(3, 16, 16);
    let cfg = MaskConfig {
        inverted: false,
        ..MaskConfig::default()
    };
    let once = binary_mask(&template, cfg);
    let twice = binary_mask(&Raster::from_gray(once.clone()), cfg);
    assert_eq!(once, twice);
}

#[test]
fn batch_keeps_placeholders() {
    let templates = vec![Some(random_bgr(1, 8, 8)), None, Some(random_bgr(2, 5, 9))];
    let masks = binary_masks(&templates, MaskConfig::default());
    assert_eq!(masks.len(), 3);
    assert!(masks[1].is_none());
    assert_eq!(masks[2].as_ref().map(|m| (m.width(), m.height())), Some((5, 9)));
}

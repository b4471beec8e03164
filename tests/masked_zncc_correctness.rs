use objfind::lowlevel::{Kernel, MaskedTemplatePlan, ScanParams, ZnccMaskedScalar};
use objfind::ImageView;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn brute_force_best(image: ImageView<'_, u8>, tpl: &MaskedTemplatePlan) -> (usize, usize, f64) {
    let tpl_w = tpl.width();
    let tpl_h = tpl.height();
    let sum_w = tpl.sum_w();
    let var_t = tpl.var_t();
    let t_prime = tpl.t_prime();
    let mask = tpl.mask();

    let mut best = (0usize, 0usize, f64::NEG_INFINITY);
    for y in 0..=image.height() - tpl_h {
        for x in 0..=image.width() - tpl_w {
            let mut dot = 0.0f64;
            let mut sum_i = 0.0f64;
            let mut sum_i2 = 0.0f64;
            for ty in 0..tpl_h {
                let row = image.row(y + ty).expect("row in bounds");
                for tx in 0..tpl_w {
                    let idx = ty * tpl_w + tx;
                    let w = if mask[idx] == 0 { 0.0 } else { 1.0 };
                    let value = row[x + tx] as f64;
                    dot += t_prime[idx] as f64 * value;
                    sum_i += w * value;
                    sum_i2 += w * value * value;
                }
            }
            let var_i = sum_i2 - (sum_i * sum_i) / sum_w;
            let score = if var_i <= 1e-8 {
                0.0
            } else {
                dot / (var_t * var_i).sqrt()
            };
            if score > best.2 {
                best = (x, y, score);
            }
        }
    }
    best
}

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|_| rng.random()).collect()
}

#[test]
fn masked_zncc_finds_exact_crop() {
    let mut rng = StdRng::seed_from_u64(123);
    let (width, height) = (48, 40);
    let image = random_image(&mut rng, width, height);
    let view = ImageView::from_slice(&image, width, height).unwrap();

    let (x0, y0, tw, th) = (17, 9, 12, 10);
    let tpl = view.roi(x0, y0, tw, th).unwrap();
    let mask: Vec<u8> = (0..tw * th)
        .map(|i| if (i % tw + i / tw) % 3 == 0 { 0 } else { 1 })
        .collect();
    let mask_view = ImageView::from_slice(&mask, tw, th).unwrap();
    let plan = MaskedTemplatePlan::new(tpl, mask_view).unwrap();

    let peaks = ZnccMaskedScalar::scan_full(view, &plan, ScanParams::default()).unwrap();
    assert_eq!((peaks[0].x, peaks[0].y), (x0, y0));
    assert!((peaks[0].score - 1.0).abs() < 1e-4);
}

#[test]
fn masked_zncc_agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    let (width, height) = (36, 30);
    let image = random_image(&mut rng, width, height);
    let view = ImageView::from_slice(&image, width, height).unwrap();

    let (tw, th) = (9, 7);
    let tpl = random_image(&mut rng, tw, th);
    let mask: Vec<u8> = (0..tw * th).map(|_| rng.random_range(0..2u8)).collect();
    let plan = MaskedTemplatePlan::new(
        ImageView::from_slice(&tpl, tw, th).unwrap(),
        ImageView::from_slice(&mask, tw, th).unwrap(),
    )
    .unwrap();

    let (bx, by, bscore) = brute_force_best(view, &plan);
    let peaks = ZnccMaskedScalar::scan_full(view, &plan, ScanParams::default()).unwrap();
    assert_eq!((peaks[0].x, peaks[0].y), (bx, by));
    assert!((peaks[0].score as f64 - bscore).abs() < 1e-4);

    let at = ZnccMaskedScalar::score_at(view, &plan, bx, by, 1e-8).unwrap();
    assert!((at as f64 - bscore).abs() < 1e-4);
}

#[test]
fn flat_windows_score_zero() {
    let image = vec![90u8; 20 * 20];
    let view = ImageView::from_slice(&image, 20, 20).unwrap();
    let tpl: Vec<u8> = (0..25).map(|i| (i * 9) as u8).collect();
    let mask = vec![1u8; 25];
    let plan = MaskedTemplatePlan::new(
        ImageView::from_slice(&tpl, 5, 5).unwrap(),
        ImageView::from_slice(&mask, 5, 5).unwrap(),
    )
    .unwrap();
    let score = ZnccMaskedScalar::score_at(view, &plan, 3, 3, 1e-8).unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn template_larger_than_image_fails() {
    let image = vec![1u8; 8 * 8];
    let view = ImageView::from_slice(&image, 8, 8).unwrap();
    let tpl: Vec<u8> = (0..100).map(|i| i as u8).collect();
    let mask = vec![1u8; 100];
    let plan = MaskedTemplatePlan::new(
        ImageView::from_slice(&tpl, 10, 10).unwrap(),
        ImageView::from_slice(&mask, 10, 10).unwrap(),
    )
    .unwrap();
    assert!(ZnccMaskedScalar::scan_full(view, &plan, ScanParams::default()).is_err());
}

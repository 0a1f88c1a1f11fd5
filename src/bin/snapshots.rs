use std::fs;
use std::path::Path;

use anyhow::Context;
use fastdraw::input::{PointerEvent, WheelEvent, ZoomPolicy};
use fastdraw::scene::Scene;
use fastdraw::utils::{Position, Size};
use fastdraw::{CachedDrawControl, RenderOutcome, SkiaBackend, SkiaFrame};
use image::{ImageReader, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tiny_skia::Pixmap;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const SEED: u64 = 0x5eed;
const TOLERANCE: u8 = 3;

fn to_rgba_image(pixmap: &Pixmap) -> anyhow::Result<RgbaImage> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .context("pixmap size does not match its pixel data")
}

fn compare_with_tolerance(a_path: &Path, b_path: &Path, tolerance: u8) -> anyhow::Result<bool> {
    let a = ImageReader::open(a_path)?.decode()?.to_rgba8();
    let b = ImageReader::open(b_path)?.decode()?.to_rgba8();

    if a.dimensions() != b.dimensions() {
        return Ok(false);
    }
    Ok(a.pixels().zip(b.pixels()).all(|(pa, pb)| {
        let da = pa.0;
        let db = pb.0;
        (0..4).all(|i| da[i].abs_diff(db[i]) <= tolerance)
    }))
}

fn write_snapshot(name: &str, pixmap: &Pixmap) -> anyhow::Result<bool> {
    fs::create_dir_all("snapshots/actual")?;
    fs::create_dir_all("snapshots/golden")?;
    let out_actual = Path::new("snapshots/actual").join(name);
    let out_golden = Path::new("snapshots/golden").join(name);

    to_rgba_image(pixmap)?
        .save(&out_actual)
        .with_context(|| format!("writing {}", out_actual.display()))?;

    if !out_golden.exists() {
        fs::copy(&out_actual, &out_golden)?;
        println!("golden created at {}", out_golden.display());
        return Ok(true);
    }

    let ok = compare_with_tolerance(&out_actual, &out_golden, TOLERANCE)?;
    println!("{} snapshot {}", name, if ok { "OK" } else { "MISMATCH" });
    Ok(ok)
}

fn render_into(
    control: &mut CachedDrawControl<SkiaBackend>,
    frame: &mut SkiaFrame,
) -> anyhow::Result<()> {
    frame.begin(control.scene().background());
    match control.render(frame) {
        RenderOutcome::Composited { .. } => Ok(()),
        RenderOutcome::Skipped(reason) => anyhow::bail!("frame skipped: {:?}", reason),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut control =
        CachedDrawControl::new(SkiaBackend::new(), Scene::default(), ZoomPolicy::default());
    let mut frame = SkiaFrame::new(WIDTH, HEIGHT).context("could not allocate frame pixmap")?;
    let mut rng = StdRng::seed_from_u64(SEED);
    control.resize_with_rng(Size::new(WIDTH as f32, HEIGHT as f32), &mut rng);

    let mut all_ok = true;

    render_into(&mut control, &mut frame)?;
    all_ok &= write_snapshot("scene_identity.png", frame.pixmap())?;

    let center = Position::new(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    for _ in 0..5 {
        control.wheel(WheelEvent::vertical(center, 1.0));
    }
    render_into(&mut control, &mut frame)?;
    all_ok &= write_snapshot("scene_zoomed.png", frame.pixmap())?;

    control.pointer(PointerEvent::pressed(center));
    control.pointer(PointerEvent::moved(center + Position::new(-120.0, 40.0)));
    control.pointer(PointerEvent::released(center + Position::new(-120.0, 40.0)));
    render_into(&mut control, &mut frame)?;
    all_ok &= write_snapshot("scene_panned.png", frame.pixmap())?;

    let stats = control.cache().stats();
    println!(
        "recordings: {}, composites: {}",
        stats.recordings, stats.composites
    );
    anyhow::ensure!(all_ok, "snapshot mismatch");
    Ok(())
}

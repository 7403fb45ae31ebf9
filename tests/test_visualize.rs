use ndarray::{Array2, Array4, Axis};
use std::fs;
use tempfile::tempdir;

use dfmri::{
    plot_epoch_timecourse, write_gif, write_montage, write_volume_gif, Colormap, EpochAnnotation,
    GifConfig, MontageConfig, PlotConfig, View,
};

const GIF_MAGIC: &[u8] = b"GIF8";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

fn phantom() -> Array4<f64> {
    Array4::from_shape_fn((16, 12, 6, 8), |(x, y, z, t)| {
        let inside = (4..12).contains(&x) && (3..9).contains(&y) && (1..5).contains(&z);
        if inside {
            800.0 + 40.0 * ((t as f64) * 0.8).sin() + (x + y) as f64
        } else {
            0.0
        }
    })
}

#[test]
fn gifs_start_with_the_gif_magic() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("bold.gif");

    write_volume_gif(&phantom(), &GifConfig::default(), &target).unwrap();

    let bytes = fs::read(&target).unwrap();
    assert!(bytes.len() > GIF_MAGIC.len());
    assert_eq!(GIF_MAGIC, &bytes[..GIF_MAGIC.len()]);
}

#[test]
fn the_decorated_pipeline_still_encodes() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("fancy.gif");
    let cfg = GifConfig {
        view: View::Coronal,
        scale: 2,
        smooth: true,
        rewind: true,
        colormap: Colormap::Hot,
        crosshair: Some((4, 3)),
        flip_horizontal: true,
        quarter_turns: 1,
        frame_delay_ms: 60,
        ..GifConfig::default()
    };

    write_volume_gif(&phantom(), &cfg, &target).unwrap();

    let bytes = fs::read(&target).unwrap();
    assert_eq!(GIF_MAGIC, &bytes[..GIF_MAGIC.len()]);
}

#[test]
fn two_volumes_render_side_by_side() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("pair.gif");
    let vol = phantom();
    let frames = dfmri::slice_frames(&vol, View::Axial, None).unwrap();

    write_gif(&[frames.clone(), frames], &GifConfig::default(), &target).unwrap();

    let bytes = fs::read(&target).unwrap();
    assert_eq!(GIF_MAGIC, &bytes[..GIF_MAGIC.len()]);
}

#[test]
fn montages_are_png_files() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("overview.png");
    let vol = phantom().index_axis(Axis(3), 0).to_owned();

    write_montage(&vol, &MontageConfig::default(), &target).unwrap();

    let bytes = fs::read(&target).unwrap();
    assert_eq!(PNG_MAGIC, &bytes[..PNG_MAGIC.len()]);
}

#[test]
fn epoch_figures_render_both_annotations() {
    let dir = tempdir().unwrap();
    // 4 epochs of 15 samples with a mild dip after stimulus onset
    let epochs = Array2::from_shape_fn((4, 15), |(e, i)| {
        1.0 - 0.02 * ((i as f64) * 0.4).sin() + e as f64 * 1e-3
    });

    let std_target = dir.path().join("epochs_std.png");
    plot_epoch_timecourse(&epochs, EpochAnnotation::Std, &PlotConfig::default(), &std_target)
        .unwrap();
    let bytes = fs::read(&std_target).unwrap();
    assert_eq!(PNG_MAGIC, &bytes[..PNG_MAGIC.len()]);

    let ci_target = dir.path().join("epochs_ci.png");
    plot_epoch_timecourse(&epochs, EpochAnnotation::Ci95, &PlotConfig::default(), &ci_target)
        .unwrap();
    let bytes = fs::read(&ci_target).unwrap();
    assert_eq!(PNG_MAGIC, &bytes[..PNG_MAGIC.len()]);
}

use std::sync::Mutex;

use tempfile::NamedTempFile;

use frame_overlay::config::OverlayConfig;
use frame_overlay::{CaptionAnchor, PixelFormat};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "OVERLAY_CONFIG",
        "OVERLAY_SOURCE",
        "OVERLAY_FPS",
        "OVERLAY_FRAMES",
        "OVERLAY_MODEL",
        "OVERLAY_CAPTION_ANCHOR",
    ] {
        std::env::remove_var(key);
    }
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_config(
        r#"{
            "source": {
                "uri": "stub://porch",
                "target_fps": 12,
                "width": 800,
                "height": 600,
                "frames": 40,
                "pixel_format": "bgra32",
                "row_padding": 16
            },
            "model": { "name": "color-classifier" },
            "overlay": { "caption_anchor": "box-top" },
            "pipeline": { "drop_late_frames": false }
        }"#,
    );

    std::env::set_var("OVERLAY_CONFIG", file.path());
    std::env::set_var("OVERLAY_FPS", "30");
    std::env::set_var("OVERLAY_MODEL", "bright-region-detector");

    let cfg = OverlayConfig::load().expect("load config");

    assert_eq!(cfg.source.uri, "stub://porch");
    assert_eq!(cfg.source.target_fps, 30);
    assert_eq!(cfg.source.width, 800);
    assert_eq!(cfg.source.height, 600);
    assert_eq!(cfg.source.frame_limit, Some(40));
    assert_eq!(cfg.source.pixel_format, PixelFormat::Bgra32);
    assert_eq!(cfg.source.row_padding, 16);
    assert_eq!(cfg.model, "bright-region-detector");
    assert_eq!(cfg.caption_anchor, CaptionAnchor::BoxTop);
    assert!(!cfg.drop_late_frames);

    clear_env();
}

#[test]
fn defaults_without_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = OverlayConfig::load().expect("load defaults");
    assert_eq!(cfg.source.uri, "stub://camera");
    assert_eq!(cfg.source.target_fps, 15);
    assert_eq!((cfg.source.width, cfg.source.height), (640, 480));
    assert_eq!(cfg.source.frame_limit, None);
    assert_eq!(cfg.caption_anchor, CaptionAnchor::Additive);
    assert!(cfg.drop_late_frames);

    clear_env();
}

#[test]
fn rejects_zero_fps_and_dimensions() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("OVERLAY_FPS", "0");
    assert!(OverlayConfig::load().is_err());
    std::env::remove_var("OVERLAY_FPS");

    let file = write_config(r#"{ "source": { "width": 0 } }"#);
    std::env::set_var("OVERLAY_CONFIG", file.path());
    let err = OverlayConfig::load().unwrap_err();
    assert!(err.to_string().contains("dimensions"));

    clear_env();
}

#[test]
fn rejects_unknown_model_and_bad_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("OVERLAY_MODEL", "yolo-v9");
    let err = OverlayConfig::load().unwrap_err();
    assert!(err.to_string().contains("unknown model"));
    std::env::remove_var("OVERLAY_MODEL");

    std::env::set_var("OVERLAY_CAPTION_ANCHOR", "sideways");
    assert!(OverlayConfig::load().is_err());
    std::env::remove_var("OVERLAY_CAPTION_ANCHOR");

    let file = write_config(r#"{ "source": { "pixel_format": "yuyv" } }"#);
    std::env::set_var("OVERLAY_CONFIG", file.path());
    assert!(OverlayConfig::load().is_err());

    std::env::set_var("OVERLAY_CONFIG", "/nonexistent/overlay.json");
    assert!(OverlayConfig::load().is_err());

    clear_env();
}

use super::*;

fn temp_root() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reelbeat-store-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(root: &Path, name: &str, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    std::fs::write(root.join(name), out.into_inner()).unwrap();
}

#[test]
fn placeholder_is_small_and_opaque() {
    let p = PreparedImage::placeholder();
    assert_eq!((p.width, p.height), (8, 8));
    assert!(p.rgba8.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn prepare_loads_real_files() {
    let root = temp_root();
    write_png(&root, "a.png", [250, 10, 10, 255]);

    let store = OverlayStore::prepare_sources(&["a.png".to_string()], &root);
    let img = store.get("a.png").unwrap();
    assert_eq!((img.width, img.height), (4, 4));
    assert_eq!(&img.rgba8[0..4], &[250, 10, 10, 255]);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_files_fail_soft_to_a_placeholder() {
    let root = temp_root();
    let store = OverlayStore::prepare_sources(&["nope.png".to_string()], &root);

    assert_eq!(store.len(), 1);
    let img = store.get("nope.png").unwrap();
    assert_eq!((img.width, img.height), (8, 8));

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn duplicate_sources_decode_once() {
    let root = temp_root();
    write_png(&root, "a.png", [1, 1, 1, 255]);

    let sources = vec!["a.png".to_string(), "a.png".to_string()];
    let store = OverlayStore::prepare_sources(&sources, &root);
    assert_eq!(store.len(), 1);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn prepare_reads_only_images_referenced_by_enabled_beats() {
    use crate::beat::model::{Beat, StyleSettings, Timeline};
    use crate::foundation::core::TimeRange;

    let root = temp_root();
    write_png(&root, "used.png", [5, 5, 5, 255]);
    write_png(&root, "unused.png", [6, 6, 6, 255]);

    let mut on = Beat::new(TimeRange::new(0.0, 1.0).unwrap(), "on");
    on.select_image("used.png");
    let mut off = Beat::new(TimeRange::new(1.0, 2.0).unwrap(), "off");
    off.select_image("unused.png");
    off.enabled = false;

    let project = Project {
        timeline: Timeline::new(vec![on, off], 2.0).unwrap(),
        style: StyleSettings::default(),
        source_video: None,
    };
    let store = OverlayStore::prepare(&project, &root);

    assert_eq!(store.len(), 1);
    assert!(store.get("used.png").is_some());
    assert!(store.get("unused.png").is_none());

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn insert_replaces_existing_entries() {
    let mut store = OverlayStore::default();
    assert!(store.is_empty());
    store.insert("gen.png", PreparedImage::placeholder());
    store.insert(
        "gen.png",
        PreparedImage {
            width: 1,
            height: 1,
            rgba8: std::sync::Arc::new(vec![9, 9, 9, 255]),
        },
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("gen.png").unwrap().width, 1);
}

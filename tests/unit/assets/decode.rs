use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn decode_preserves_dimensions_and_pixels() {
    let bytes = png_bytes(3, 2, [10, 200, 30, 255]);
    let img = decode_image(&bytes).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(img.rgba8.len(), 3 * 2 * 4);
    assert_eq!(&img.rgba8[0..4], &[10, 200, 30, 255]);
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn normalize_passes_png_through_unchanged() {
    let bytes = png_bytes(2, 2, [1, 2, 3, 255]);
    let out = normalize_to_png(&bytes).unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn normalize_reencodes_other_formats_as_png() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 8, 7, 255]));
    let mut bmp = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut bmp, image::ImageFormat::Bmp)
        .unwrap();

    let out = normalize_to_png(&bmp.into_inner()).unwrap();
    assert_eq!(
        image::guess_format(&out).unwrap(),
        image::ImageFormat::Png
    );
    let decoded = decode_image(&out).unwrap();
    assert_eq!(&decoded.rgba8[0..3], &[9, 8, 7]);
}

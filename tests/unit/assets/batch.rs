use std::io::Cursor;

use super::*;
use crate::assets::resolve::{MemoryResolver, encode_data_url};
use crate::model::scene::ImageRef;

fn png_url(w: u32, h: u32) -> String {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    encode_data_url("image/png", &buf)
}

fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(0, "a", "", Some(ImageRef::new(png_url(4, 3)))),
        Scene::new(1, "b", "", Some(ImageRef::new("missing"))),
        Scene::new(2, "c", "", Some(ImageRef::new(png_url(2, 8)))),
        Scene::new(3, "d", "", None),
    ]
}

#[test]
fn load_keeps_scene_order_and_degrades_failures() {
    let scenes = scenes();
    let refs: Vec<&Scene> = scenes.iter().collect();
    for parallel in [false, true] {
        let threading = ExportThreading {
            parallel,
            threads: Some(3),
        };
        let images = load_scene_images(&refs, &MemoryResolver::new(), &threading).unwrap();
        assert_eq!(images.len(), 4);
        assert_eq!(images[0].pixels().unwrap().dimensions(), (4, 3));
        assert_eq!(images[1], LoadedImage::Unavailable);
        assert_eq!(images[2].pixels().unwrap().dimensions(), (2, 8));
        assert_eq!(images[3], LoadedImage::Unavailable);
    }
}

#[test]
fn fan_out_collects_by_position() {
    let items: Vec<u32> = (0..64).collect();
    let threading = ExportThreading {
        parallel: true,
        threads: Some(4),
    };
    let out = fan_out(&items, &threading, |i, v| (i as u32) * 1000 + v).unwrap();
    assert_eq!(out, (0..64).map(|v| v * 1000 + v).collect::<Vec<_>>());
}

#[test]
fn zero_threads_is_rejected() {
    let threading = ExportThreading {
        parallel: true,
        threads: Some(0),
    };
    let items = [1, 2, 3];
    assert!(matches!(
        fan_out(&items, &threading, |_, v| *v),
        Err(ExportError::Validation(_))
    ));
}

use std::path::Path;

use lc3_rs::loader::{load_image, load_image_file};
use lc3_rs::{Bus, LoadError, LoadedImage, Memory};
use pretty_assertions::assert_eq;

fn image(origin: u16, words: &[u16]) -> Vec<u8> {
    std::iter::once(origin)
        .chain(words.iter().copied())
        .flat_map(u16::to_be_bytes)
        .collect()
}

#[test]
fn origin_exact_placement() {
    let mut mem = Memory::new();
    mem.write(0x2FFF, 0x1111);
    mem.write(0x3002, 0x2222);
    let info = load_image(&mut mem, &image(0x3000, &[0xABCD, 0x1234])).unwrap();
    assert_eq!(info, LoadedImage { origin: 0x3000, words: 2 });
    assert_eq!(mem.read(0x3000), 0xABCD);
    assert_eq!(mem.read(0x3001), 0x1234);
    assert_eq!(mem.read(0x2FFF), 0x1111);
    assert_eq!(mem.read(0x3002), 0x2222);
}

#[test]
fn bytes_are_big_endian() {
    let mut mem = Memory::new();
    load_image(&mut mem, &[0x30, 0x00, 0xF0, 0x25]).unwrap();
    assert_eq!(mem.read(0x3000), 0xF025);
}

#[test]
fn trailing_odd_byte_is_dropped() {
    let mut mem = Memory::new();
    let info = load_image(&mut mem, &[0x40, 0x00, 0x12, 0x34, 0x56]).unwrap();
    assert_eq!(info.words, 1);
    assert_eq!(mem.read(0x4000), 0x1234);
    assert_eq!(mem.read(0x4001), 0);
}

#[test]
fn missing_origin_fails() {
    let mut mem = Memory::new();
    assert!(matches!(
        load_image(&mut mem, &[]),
        Err(LoadError::MissingOrigin { len: 0 })
    ));
    assert!(matches!(
        load_image(&mut mem, &[0x30]),
        Err(LoadError::MissingOrigin { len: 1 })
    ));
}

#[test]
fn origin_only_image_loads_nothing() {
    let mut mem = Memory::new();
    let info = load_image(&mut mem, &image(0x3000, &[])).unwrap();
    assert_eq!(info.words, 0);
    assert_eq!(mem.read(0x3000), 0);
}

#[test]
fn later_images_overwrite_earlier_ones() {
    let mut mem = Memory::new();
    load_image(&mut mem, &image(0x3000, &[1, 2, 3])).unwrap();
    load_image(&mut mem, &image(0x3001, &[9])).unwrap();
    assert_eq!(mem.read(0x3000), 1);
    assert_eq!(mem.read(0x3001), 9);
    assert_eq!(mem.read(0x3002), 3);
}

#[test]
fn load_wraps_at_top_of_memory() {
    let mut mem = Memory::new();
    load_image(&mut mem, &image(0xFFFF, &[7, 8])).unwrap();
    assert_eq!(mem.read(0xFFFF), 7);
    assert_eq!(mem.read(0x0000), 8);
}

#[test]
fn missing_file_reports_path() {
    let mut mem = Memory::new();
    let path = Path::new("definitely/not/here.obj");
    match load_image_file(&mut mem, path) {
        Err(LoadError::Open { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected open error, got {other:?}"),
    }
}

#[test]
fn load_from_file() {
    let path = std::env::temp_dir().join(format!("lc3-rs-loader-{}.obj", std::process::id()));
    std::fs::write(&path, image(0x3000, &[0xF025])).unwrap();
    let mut mem = Memory::new();
    let info = load_image_file(&mut mem, &path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(info.origin, 0x3000);
    assert_eq!(mem.read(0x3000), 0xF025);
}

//! Arbitrary input must produce a result or an error, never a panic.

mod common;

use common::*;
use imgprobe::{FormatRegistry, Header, ProbeError, get_dimensions};
use proptest::prelude::*;

const MAGICS: &[&[u8]] = &[
    b"RIFF\0\0\0\0WEBPVP8L",
    b"RIFF\0\0\0\0WEBPVP8 ",
    b"RIFF\0\0\0\0WEBPVP8X",
    b"FLIF",
    b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR",
    b"GIF89a",
    b"\xFF\xD8",
    b"BM",
    b"II\x2A\x00",
    b"MM\x00\x2A",
    b"\x00\x00\x01\x00",
];

fn magic_prefixed() -> impl Strategy<Value = Vec<u8>> {
    (
        prop::sample::select(MAGICS),
        prop::collection::vec(any::<u8>(), 0..256),
    )
        .prop_map(|(magic, tail)| {
            let mut data = magic.to_vec();
            data.extend(tail);
            data
        })
}

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = get_dimensions(&data);
    }

    #[test]
    fn magic_prefixed_bytes_never_panic(data in magic_prefixed()) {
        match get_dimensions(&data) {
            Ok(dims) => prop_assert!(dims.width() > 0 && dims.height() > 0),
            Err(ProbeError::Io(_)) => prop_assert!(false, "in-memory reads must not fail"),
            Err(_) => {}
        }
    }

    #[test]
    fn at_most_one_detector_matches(data in magic_prefixed()) {
        let header = Header::read(&data).unwrap();
        let matching = FormatRegistry::STANDARD
            .formats()
            .iter()
            .filter(|format| format.detect(&header))
            .count();
        prop_assert!(matching <= 1);
    }

    #[test]
    fn png_round_trips(width in 1u32.., height in 1u32..) {
        let dims = get_dimensions(&png(width, height)).unwrap();
        prop_assert_eq!((dims.width(), dims.height()), (width, height));
    }

    #[test]
    fn flif_round_trips(width in 1u32..=u32::MAX, height in 1u32..=u32::MAX) {
        let dims = get_dimensions(&flif(width, height)).unwrap();
        prop_assert_eq!((dims.width(), dims.height()), (width, height));
    }
}

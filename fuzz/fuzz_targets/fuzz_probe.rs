#![no_main]

use imgprobe::{ImageHandle, ProbeError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut handle) = ImageHandle::new(data) else {
        return;
    };
    match handle.dimensions() {
        Ok(dims) => {
            assert!(dims.width() > 0 && dims.height() > 0);
            assert_eq!(handle.dimensions().ok(), Some(dims));
        }
        Err(ProbeError::Io(e)) => panic!("in-memory source failed: {e}"),
        Err(_) => {}
    }
});

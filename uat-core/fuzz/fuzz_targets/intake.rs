#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;

use uat_core::rs::Decoders;
use uat_core::Intake;

fuzz_target!(|data: Vec<u8>| {
    let decoders = Decoders::new();
    let mut intake = Intake::new();
    let mut reader = Cursor::new(data);
    let _ = intake.run(&mut reader, &decoders, |_frame| {});
});

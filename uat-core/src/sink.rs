// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `sink` module formats accepted frames as hexadecimal text records (§4.10).

use std::io::{self, Write};

use crate::demod::{Direction, Frame};

/// Writes `frame` as a single `<dir><hex>[;rs=<n>];\n` record to `writer` and flushes
/// immediately, so a consumer reading the output stream sees each frame as soon as it's
/// decoded rather than once a buffer fills.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> io::Result<()> {
    let dir = match frame.direction {
        Direction::Downlink => '-',
        Direction::Uplink => '+',
    };

    write!(writer, "{dir}")?;
    for byte in &frame.payload {
        write!(writer, "{byte:02x}")?;
    }
    if frame.corrected_errors > 0 {
        write!(writer, ";rs={}", frame.corrected_errors)?;
    }
    writeln!(writer, ";")?;
    writer.flush()
}

// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `intake` module reads raw I/Q sample bytes from a byte source, converts them to phase
//! values in place, and drives the [`demod`](crate::demod) scanner with carryover semantics
//! across read calls.

use std::io::Read;

use crate::demod::{self, Frame};
use crate::errors::Result;
use crate::phase::iq_to_phase;
use crate::rs::Decoders;

/// Maximum number of raw sample bytes buffered at once (§6).
pub const INTAKE_BUFFER_CAPACITY: usize = 131_072;

/// Owns the raw-byte and phase-sample buffers for one decode run, and the carryover state
/// (the "used" watermark and the absolute stream offset) between successive reads.
pub struct Intake {
    buf: Vec<u8>,
    phase: Vec<u16>,
    used: usize,
    offset: u64,
}

impl Intake {
    pub fn new() -> Intake {
        Intake {
            buf: vec![0u8; INTAKE_BUFFER_CAPACITY],
            phase: vec![0u16; INTAKE_BUFFER_CAPACITY / 2],
            used: 0,
            offset: 0,
        }
    }

    /// Reads from `reader` until end-of-stream, converting sample bytes to phase and invoking
    /// [`demod::scan`] after every read. `on_frame` is called once per accepted frame, in
    /// stream order. Returns once `reader` reports a zero-byte read (clean end-of-stream); a
    /// fatal I/O error propagates as [`crate::errors::UatError`].
    pub fn run<R: Read>(&mut self, reader: &mut R, decoders: &Decoders, mut on_frame: impl FnMut(Frame)) -> Result<()> {
        loop {
            if self.used >= self.buf.len() {
                // The scanner never consumes enough to prevent forward progress in practice
                // (the margin it requires is far smaller than the buffer), but guard anyway
                // rather than attempt a zero-length read.
                break;
            }

            let n = reader.read(&mut self.buf[self.used..])?;
            if n == 0 {
                break;
            }

            let prev_used = self.used;
            let new_used = prev_used + n;

            // Convert newly appended I/Q pairs to phase. The range starts at the largest even
            // index not exceeding the previous watermark, so a byte left unpaired by the last
            // chunk is folded in with the first byte of this one (§4.3, §9 buffer carryover).
            let start = prev_used & !1;
            let end = new_used & !1;
            for i in (start..end).step_by(2) {
                self.phase[i / 2] = iq_to_phase(self.buf[i], self.buf[i + 1]);
            }
            self.used = new_used;

            let phase_len = self.used / 2;
            log::trace!("intake: read {n} bytes, used={phase_len} phase samples, offset={}", self.offset);

            let consumed = demod::scan(&self.phase[..phase_len], self.offset, decoders, &mut on_frame);
            log::trace!("processor: considered {phase_len} samples, consumed {consumed}");

            let consumed_bytes = consumed * 2;
            let remaining_bytes = self.used - consumed_bytes;
            self.buf.copy_within(consumed_bytes..self.used, 0);
            self.phase.copy_within(consumed..phase_len, 0);
            self.used = remaining_bytes;
            self.offset += consumed as u64;
        }

        Ok(())
    }
}

impl Default for Intake {
    fn default() -> Intake {
        Intake::new()
    }
}

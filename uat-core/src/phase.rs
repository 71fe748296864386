// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `phase` module converts raw I/Q sample bytes into quantised phase angles, and provides
//! the wrap-aware phase-difference operator that every downstream bit decision is made from.

use std::f64::consts::PI;

use once_cell::sync::Lazy;

/// Number of distinct (I, Q) byte pairs; the table is indexed by `(q << 8) | i`.
const TABLE_LEN: usize = 65536;

/// Lazily-built atan2 table mapping a 16-bit `(q << 8) | i` sample pair to a quantised phase
/// angle in `[0, 65536)`, representing `[0, 2*pi)`. Building the table costs one pass over all
/// 65,536 possible inputs; every decoded sample afterwards is a single array index rather than a
/// floating-point `atan2` call.
static IQPHASE: Lazy<Box<[u16; TABLE_LEN]>> = Lazy::new(build_table);

fn build_table() -> Box<[u16; TABLE_LEN]> {
    let mut table = vec![0u16; TABLE_LEN].into_boxed_slice();

    for i in 0..256u32 {
        for q in 0..256u32 {
            let d_i = i as f64 - 127.5;
            let d_q = q as f64 - 127.5;

            // atan2 returns (-pi, pi]; normalise to [0, 2*pi) before scaling.
            let ang = d_q.atan2(d_i) + PI;
            let scaled = (32768.0 * ang / PI).round();

            let phase = if scaled < 0.0 {
                0
            } else if scaled > 65535.0 {
                65535
            } else {
                scaled as u16
            };

            let index = ((q << 8) | i) as usize;
            table[index] = phase;
        }
    }

    table.try_into().expect("table has exactly TABLE_LEN entries")
}

/// Converts a raw `(i, q)` sample byte pair into its quantised phase angle.
pub fn iq_to_phase(i: u8, q: u8) -> u16 {
    let index = ((q as usize) << 8) | (i as usize);
    IQPHASE[index]
}

/// Forces construction of the phase table ahead of the first sample, so that startup cost is
/// paid once and predictably rather than on the first call into the hot path.
pub fn init() {
    Lazy::force(&IQPHASE);
}

/// Returns the signed, wrap-aware shortest-arc difference from `from` to `to`, i.e. the value
/// `d` such that `to == from + d (mod 65536)` and `d` lies in `[-32768, 32767]`.
///
/// The inputs are treated as unsigned 16-bit angles; the subtraction is carried out in a wider
/// signed type so the result never depends on implementation-defined (or, in Rust, panicking)
/// integer overflow.
pub fn phi_difference(from: u16, to: u16) -> i16 {
    let difference = to as i32 - from as i32; // lies in -65535..=65535
    if difference >= 32768 {
        (difference - 65536) as i16
    } else if difference < -32768 {
        (difference + 65536) as i16
    } else {
        difference as i16
    }
}

// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A self-contained GF(256) Reed-Solomon codec.
//!
//! UAT treats the Reed-Solomon codec as an external primitive with a fixed, well-known
//! parameterisation (the reference decoder binds `libfec`'s `init_rs_char`/`decode_rs_char`).
//! Rather than pull in a third-party crate for a single well-understood algorithm, this module
//! internalises that black box: classical GF(256) log/antilog tables, syndrome computation,
//! Berlekamp-Massey error-locator derivation, Chien search, and Forney's algorithm. Nothing
//! outside this module, [`crate::demod`], and the frame acceptance logic it backs needs to know
//! that the codec is implemented in-process rather than linked from elsewhere.

/// Symbol size in bits; UAT's RS codes are all over GF(2^8).
const SYMBOL_BITS: u32 = 8;

/// `2^SYMBOL_BITS - 1`, the number of non-zero elements of the field and the natural codeword
/// length before shortening ("padding") is applied.
const FIELD_MAX: i32 = 255;

/// Sentinel used in the log table to represent "log of zero", i.e. negative infinity.
const LOG_ZERO: u16 = FIELD_MAX as u16;

/// A single GF(256) Reed-Solomon codec instance, configured for one of UAT's three shortened
/// code parameterisations.
///
/// Constructed once per parameterisation and shared read-only afterwards; see [`Decoders`].
pub struct RsCodec {
    /// `alpha_to[i]` is `alpha^i`; `alpha_to[LOG_ZERO]` is defined as zero.
    alpha_to: Vec<u16>,
    /// `index_of[x]` is the discrete log of `x` base `alpha`; `index_of[0] == LOG_ZERO`.
    index_of: Vec<u16>,
    /// Generator polynomial coefficients, stored in index (log) form, highest degree first is
    /// NOT assumed; see [`RsCodec::new`] for the exact construction order.
    genpoly: Vec<u16>,
    nroots: usize,
    fcr: u32,
    prim: u32,
    iprim: u32,
    pad: usize,
}

impl RsCodec {
    /// Builds a new codec for GF(256) with the given field-generator polynomial, first
    /// consecutive root `fcr`, primitive element power `prim`, error-correcting capacity
    /// `nroots`, and shortening `pad` (the codeword is `255 - pad` bytes: `255 - pad - nroots`
    /// data bytes followed by `nroots` parity bytes).
    pub fn new(gfpoly: u32, fcr: u32, prim: u32, nroots: usize, pad: usize) -> RsCodec {
        let mut alpha_to = vec![0u16; FIELD_MAX as usize + 1];
        let mut index_of = vec![0u16; FIELD_MAX as usize + 1];

        index_of[0] = LOG_ZERO;
        alpha_to[LOG_ZERO as usize] = 0;

        let mut sr: u32 = 1;
        for i in 0..FIELD_MAX as u32 {
            index_of[sr as usize] = i as u16;
            alpha_to[i as usize] = sr as u16;
            sr <<= 1;
            if sr & (1 << SYMBOL_BITS) != 0 {
                sr ^= gfpoly;
            }
            sr &= FIELD_MAX as u32;
        }
        assert_eq!(sr, 1, "gfpoly {gfpoly:#x} is not a primitive polynomial over GF(256)");

        let mut iprim = 1u32;
        while iprim % prim != 0 {
            iprim += FIELD_MAX as u32;
        }
        let iprim = iprim / prim;

        let modnn = |mut x: i32| -> u16 {
            while x >= FIELD_MAX {
                x -= FIELD_MAX;
                x = (x >> SYMBOL_BITS) + (x & FIELD_MAX);
            }
            x as u16
        };

        // Form the generator polynomial from its roots: g(x) = prod_{i=0}^{nroots-1} (x - alpha^(fcr+i)*prim).
        let mut genpoly = vec![0u16; nroots + 1];
        genpoly[0] = 1;
        let mut root = fcr * prim;
        for i in 0..nroots {
            genpoly[i + 1] = 1;
            let mut j = i;
            while j > 0 {
                genpoly[j] = if genpoly[j] != 0 {
                    genpoly[j - 1]
                        ^ alpha_to[modnn(index_of[genpoly[j] as usize] as i32 + root as i32) as usize]
                } else {
                    genpoly[j - 1]
                };
                j -= 1;
            }
            genpoly[0] = alpha_to[modnn(index_of[genpoly[0] as usize] as i32 + root as i32) as usize];
            root += prim;
        }
        // Convert to index form for faster encoding.
        for g in genpoly.iter_mut() {
            *g = index_of[*g as usize];
        }

        RsCodec { alpha_to, index_of, genpoly, nroots, fcr, prim, iprim, pad }
    }

    fn modnn(&self, mut x: i32) -> u16 {
        while x >= FIELD_MAX {
            x -= FIELD_MAX;
            x = (x >> SYMBOL_BITS) + (x & FIELD_MAX);
        }
        x as u16
    }

    fn log(&self, x: u16) -> u16 {
        self.index_of[x as usize]
    }

    fn antilog(&self, x: u16) -> u16 {
        self.alpha_to[x as usize]
    }

    /// Length, in bytes, of a full codeword (data + parity) for this instance.
    pub fn codeword_len(&self) -> usize {
        (FIELD_MAX as usize) - self.pad
    }

    /// Length, in bytes, of the data portion of a codeword (codeword length minus parity).
    pub fn data_len(&self) -> usize {
        self.codeword_len() - self.nroots
    }

    /// Encodes `data` (exactly [`RsCodec::data_len`] bytes) and returns the `nroots` parity
    /// bytes that follow it in the codeword. The live decode pipeline never calls this (UAT
    /// frames arrive pre-encoded over the air); it exists because a Reed-Solomon codec is
    /// naturally a pair, and because it lets tests build round-trip fixtures through the same
    /// public API a real encoder would use.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        assert_eq!(data.len(), self.data_len());

        let mut parity = vec![0u16; self.nroots];
        for &byte in data {
            let feedback = self.log(byte as u16 ^ parity[0]);
            if feedback != LOG_ZERO {
                for j in 1..self.nroots {
                    parity[j] ^=
                        self.antilog(self.modnn(feedback as i32 + self.genpoly[self.nroots - j] as i32));
                }
            }
            parity.copy_within(1.., 0);
            let last = self.nroots - 1;
            parity[last] = if feedback != LOG_ZERO {
                self.antilog(self.modnn(feedback as i32 + self.genpoly[0] as i32))
            } else {
                0
            };
        }

        parity.into_iter().map(|v| v as u8).collect()
    }

    /// Decodes `data` (exactly [`RsCodec::codeword_len`] bytes) in place.
    ///
    /// Returns `Some(n)` with the number of corrected symbols and `data` holding the corrected
    /// codeword, or `None` if the codeword is uncorrectable. On `None`, `data` is left
    /// byte-for-byte unmodified: syndromes, the error locator, and error locations are all
    /// computed and validated before a single byte of the caller's buffer is written, so a
    /// failed decode never partially corrupts the input. Downlink frame acceptance (§4.7 of the
    /// design) depends on this to retry a failed long-frame decode as a short frame over the
    /// same bytes.
    pub fn decode(&self, data: &mut [u8]) -> Option<u32> {
        assert_eq!(data.len(), self.codeword_len());
        let nroots = self.nroots;

        // Evaluate data(x) at the nroots roots of g(x) to form the syndromes.
        let mut syn = vec![0i32; nroots];
        for s in syn.iter_mut() {
            *s = data[0] as i32;
        }
        for &byte in &data[1..] {
            for (i, s) in syn.iter_mut().enumerate() {
                *s = if *s == 0 {
                    byte as i32
                } else {
                    let idx = self.modnn(self.log(*s as u16) as i32 + (self.fcr as i32 + i as i32) * self.prim as i32);
                    byte as i32 ^ self.antilog(idx) as i32
                };
            }
        }

        let mut syn_error = 0;
        let mut s = vec![0u16; nroots];
        for (i, v) in syn.iter().enumerate() {
            syn_error |= v;
            s[i] = self.log(*v as u16);
        }
        if syn_error == 0 {
            // The codeword is already valid.
            return Some(0);
        }

        let mut lambda = vec![0u16; nroots + 1];
        lambda[0] = 1;
        let mut b = vec![0u16; nroots + 1];
        for i in 0..=nroots {
            b[i] = self.log(lambda[i]);
        }

        // Berlekamp-Massey: derive the error-locator polynomial lambda(x).
        let mut r: i32 = 0;
        let mut el: i32 = 0;
        let mut t = vec![0u16; nroots + 1];
        loop {
            r += 1;
            if r as usize > nroots {
                break;
            }

            let mut discr_r: u16 = 0;
            for i in 0..r as usize {
                if lambda[i] != 0 && s[r as usize - i - 1] != LOG_ZERO {
                    let idx = self.modnn(self.log(lambda[i]) as i32 + s[r as usize - i - 1] as i32);
                    discr_r ^= self.antilog(idx);
                }
            }
            let discr_r = self.log(discr_r);

            if discr_r == LOG_ZERO {
                b.copy_within(0..nroots, 1);
                b[0] = LOG_ZERO;
            } else {
                t[0] = lambda[0];
                for i in 0..nroots {
                    t[i + 1] = if b[i] != LOG_ZERO {
                        lambda[i + 1] ^ self.antilog(self.modnn(discr_r as i32 + b[i] as i32))
                    } else {
                        lambda[i + 1]
                    };
                }
                if 2 * el <= r - 1 {
                    el = r - el;
                    for i in 0..=nroots {
                        b[i] = if lambda[i] == 0 {
                            LOG_ZERO
                        } else {
                            self.modnn(self.log(lambda[i]) as i32 - discr_r as i32 + FIELD_MAX)
                        };
                    }
                } else {
                    b.copy_within(0..nroots, 1);
                    b[0] = LOG_ZERO;
                }
                lambda.copy_from_slice(&t);
            }
        }

        let mut deg_lambda: isize = 0;
        for i in 0..=nroots {
            lambda[i] = self.log(lambda[i]);
            if lambda[i] != LOG_ZERO {
                deg_lambda = i as isize;
            }
        }

        // Chien search: find the roots of lambda(x), giving the error locations.
        let mut reg = vec![0u16; nroots + 1];
        reg[1..=nroots].copy_from_slice(&lambda[1..=nroots]);

        let mut root = vec![0i32; nroots];
        let mut loc = vec![0i32; nroots];
        let mut count: isize = 0;
        let mut k = self.iprim as i32 - 1;
        let mut i = 1i32;
        while i <= FIELD_MAX {
            let mut q: u16 = 1;
            let mut j = deg_lambda;
            while j > 0 {
                let jj = j as usize;
                if reg[jj] != LOG_ZERO {
                    reg[jj] = self.modnn(reg[jj] as i32 + j as i32);
                    q ^= self.antilog(reg[jj]);
                }
                j -= 1;
            }
            if q == 0 {
                root[count as usize] = i;
                loc[count as usize] = k;
                if count == deg_lambda {
                    break;
                }
                count += 1;
            }
            i += 1;
            k = self.modnn(k + self.iprim as i32);
        }

        if deg_lambda != count {
            // The number of roots found doesn't match the locator's degree: uncorrectable.
            return None;
        }

        // Forney: compute the error-evaluator polynomial omega(x) = [s(x)*lambda(x)] mod x^nroots.
        let deg_omega: isize = deg_lambda - 1;
        let mut omega = vec![0u16; nroots + 1];
        let mut ii: isize = 0;
        while ii <= deg_omega {
            let mut tmp: u16 = 0;
            let mut j = ii;
            while j >= 0 {
                let a = (ii - j) as usize;
                if s[a] != LOG_ZERO && lambda[j as usize] != LOG_ZERO {
                    let idx = self.modnn(s[a] as i32 + lambda[j as usize] as i32);
                    tmp ^= self.antilog(idx);
                }
                j -= 1;
            }
            omega[ii as usize] = self.log(tmp);
            ii += 1;
        }

        // Compute each error magnitude and stage the corrections before touching `data`.
        let mut corrections: Vec<(usize, u8)> = Vec::with_capacity(count as usize);
        for j in (0..count as usize).rev() {
            let mut num1: u16 = 0;
            let mut i = deg_omega;
            while i >= 0 {
                if omega[i as usize] != LOG_ZERO {
                    let idx = self.modnn(omega[i as usize] as i32 + i as i32 * root[j]);
                    num1 ^= self.antilog(idx);
                }
                i -= 1;
            }
            let num2 = self.antilog(self.modnn(root[j] * (self.fcr as i32 - 1) + FIELD_MAX));

            let mut den: u16 = 0;
            let mut i = deg_lambda.min(nroots as isize - 1) & !1;
            while i >= 0 {
                if lambda[i as usize + 1] != LOG_ZERO {
                    let idx = self.modnn(lambda[i as usize + 1] as i32 + i as i32 * root[j]);
                    den ^= self.antilog(idx);
                }
                i -= 2;
            }
            if den == 0 {
                // Couldn't evaluate lambda's formal derivative: uncorrectable.
                return None;
            }

            if num1 != 0 {
                let loc_idx = loc[j] - self.pad as i32;
                if loc_idx < 0 || loc_idx as usize >= data.len() {
                    // A root landed outside the shortened codeword; reject rather than panic.
                    return None;
                }
                let idx =
                    self.modnn(self.log(num1) as i32 + self.log(num2) as i32 + FIELD_MAX - self.log(den) as i32);
                corrections.push((loc_idx as usize, self.antilog(idx) as u8));
            }
        }

        for (idx, magnitude) in corrections {
            data[idx] ^= magnitude;
        }

        Some(count as u32)
    }
}

/// The three Reed-Solomon parameterisations UAT uses, constructed once and shared read-only for
/// the life of the process.
pub struct Decoders {
    pub adsb_short: RsCodec,
    pub adsb_long: RsCodec,
    pub uplink: RsCodec,
}

/// Primitive polynomial `x^8 + x^7 + x^2 + x + 1` shared by all three UAT RS parameterisations.
const UAT_GF_POLY: u32 = 0x187;
/// First consecutive root, shared by all three UAT RS parameterisations.
const UAT_FCR: u32 = 120;
/// Primitive element power, shared by all three UAT RS parameterisations.
const UAT_PRIM: u32 = 1;

impl Decoders {
    /// Builds the three codec instances with UAT's fixed parameters (§4.9): ADS-B short
    /// (nroots=12, pad=225), ADS-B long (nroots=14, pad=207), and uplink block (nroots=20,
    /// pad=163).
    pub fn new() -> Decoders {
        Decoders {
            adsb_short: RsCodec::new(UAT_GF_POLY, UAT_FCR, UAT_PRIM, 12, 225),
            adsb_long: RsCodec::new(UAT_GF_POLY, UAT_FCR, UAT_PRIM, 14, 207),
            uplink: RsCodec::new(UAT_GF_POLY, UAT_FCR, UAT_PRIM, 20, 163),
        }
    }
}

impl Default for Decoders {
    fn default() -> Decoders {
        Decoders::new()
    }
}

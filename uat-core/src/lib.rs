// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `uat-core` implements the sample-processing pipeline for the UAT 978 MHz datalink: I/Q
//! intake, sync-word correlation, bit-slicing, and Reed-Solomon-backed frame acceptance for
//! both the downlink (ADS-B/Basic UAT) and uplink formats. It has no notion of files, sockets,
//! or a command line; those live in the `uat-decode` binary crate.

pub mod demod;
pub mod errors;
pub mod intake;
pub mod phase;
pub mod rs;
pub mod sink;

pub use demod::Frame;
pub use intake::Intake;

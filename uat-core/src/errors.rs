// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error::Error as StdError;
use std::fmt;
use std::result;

/// `UatError` enumerates the one class of failure that can terminate the decoder: a fatal I/O
/// error reading the sample stream. Every other condition the pipeline encounters (no sync, a
/// bad Reed-Solomon codeword, an odd trailing byte) is expected and frequent, and is represented
/// as an ordinary return value rather than propagated through this type.
#[derive(Debug)]
pub enum UatError {
    /// An I/O error occurred while reading samples from the input stream.
    IoError(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for UatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UatError::IoError(err) => write!(f, "io error: {}", err),
        }
    }
}

impl StdError for UatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            UatError::IoError(err) => Some(err.as_ref()),
        }
    }
}

impl From<std::io::Error> for UatError {
    fn from(err: std::io::Error) -> UatError {
        UatError::IoError(Box::new(err))
    }
}

pub type Result<T> = result::Result<T, UatError>;

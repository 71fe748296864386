// Symphonia
// Copyright (c) 2019-2022 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `uat-decode` reads raw 8-bit I/Q samples from standard input and writes recovered,
//! Reed-Solomon-corrected UAT frames as hexadecimal text records to standard output.

use std::cell::Cell;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use uat_core::phase;
use uat_core::rs::Decoders;
use uat_core::sink;
use uat_core::Intake;

/// Software demodulator for the UAT 978 MHz air-to-ground datalink.
///
/// Takes no required arguments: samples are always read from standard input, and records are
/// always written to standard output. Every flag below only affects diagnostics.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Builds the logger from the `-v` count, but still lets `RUST_LOG` override or refine it, so a
/// developer chasing one noisy module doesn't lose that ability to the CLI default.
fn init_logger(verbosity: u8) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level_for(verbosity));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn run(reader: &mut impl Read, writer: &mut impl Write) -> uat_core::errors::Result<()> {
    phase::init();
    let decoders = Decoders::new();
    let mut intake = Intake::new();

    let write_error: Cell<Option<io::Error>> = Cell::new(None);
    intake.run(reader, &decoders, |frame| {
        if let Err(err) = sink::write_frame(writer, &frame) {
            let mut slot = write_error.take();
            if slot.is_none() {
                slot = Some(err);
            }
            write_error.set(slot);
        }
    })?;

    if let Some(err) = write_error.into_inner() {
        return Err(err.into());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    match run(&mut reader, &mut writer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

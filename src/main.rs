/*
 * Copyright (c) 2026 Ilya Shishov
 * Licensed under the MIT License.
 * See the LICENSE file in the project root for full license information.
 */

use std::process::ExitCode;

mod args;
mod error;
mod exit;
mod frame;
mod journal;
mod modes;
mod signal;
mod sleeper;
mod sock;
mod sockets;
#[cfg(test)]
mod test_helpers;

use crate::args::ProbeArgs;

fn main() -> ExitCode {
    let mut command = ProbeArgs::get_scenario();
    let code = match command.execute() {
        Ok(outcome) => exit::outcome_code(&outcome),
        Err(e) => {
            eprintln!("{e}");
            exit::exit_code(&e)
        }
    };
    ExitCode::from(code as u8)
}

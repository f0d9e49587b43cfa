// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — wires the verifier crates together for the CLI.

pub mod data_dir;
pub mod recognizer;
pub mod session;
pub mod store;

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum CompileError {
    #[error("Unrecognized token: {0:?}")]
    UnrecognizedToken(String),
    #[error("Invalid variable reference {0:?}: expected `$` followed by an index below 256")]
    InvalidVariableIndex(String),
}

/// Failure to read an instruction back out of a byte sequence.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum DecodeError {
    #[error("Unknown opcode {byte:#04x} at offset {offset}")]
    UnknownOpcode { byte: u8, offset: usize },
    #[error("Instruction at offset {offset} runs past the end of the byte sequence")]
    Truncated { offset: usize },
}

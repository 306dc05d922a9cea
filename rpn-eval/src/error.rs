/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use rpn_compiler::{CompileError, DecodeError};
use thiserror::Error;

pub type Result<T, E = EvaluationError> = std::result::Result<T, E>;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum RuntimeError {
    #[error("Stack overflow: more than {} values pushed", crate::stack::STACK_CAPACITY)]
    StackOverflow,
    #[error("Stack underflow: operator has fewer operands than it needs")]
    StackUnderflow,
    #[error("Built-in variable ${0} is outside the variable table")]
    VariableIndexOutOfRange(u8),
    #[error("Unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("Instruction at offset {0} is truncated")]
    TruncatedInstruction(usize),
    #[error("Program must leave exactly one value on the stack")]
    MalformedProgram,
}

impl From<DecodeError> for RuntimeError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownOpcode { byte, .. } => RuntimeError::UnknownOpcode(byte),
            DecodeError::Truncated { offset } => RuntimeError::TruncatedInstruction(offset),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),
    #[error("Evaluation failed: {0}")]
    Runtime(#[from] RuntimeError),
    #[error("Invalid context provided, expected an array of at most {} numbers", crate::variables::TABLE_SIZE)]
    InvalidContext,
    #[error("Failed to serialize context: {0}")]
    Serialization(#[from] serde_json::Error),
}

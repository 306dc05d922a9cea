/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Compiles postfix (reverse-Polish) signal expressions into a flat
//! stack-machine byte sequence.
//!
//! Tokens are separated by spaces or commas. Each token is a float literal,
//! a built-in variable reference such as `$3`, or one of the single
//! character operators `+ - * / < > % s c t p`.
//!
//! ```rust
//! use rpn_compiler::compile;
//! let program = compile("1, 2, +").unwrap();
//! assert_eq!(program.as_bytes(), &[b'#', 0, 0, 0x80, 0x3f, b'#', 0, 0, 0, 0x40, b'+'][..]);
//! ```

pub mod bytecode;
pub mod codec;
pub mod error;
pub mod instruction;
pub mod lexer;

pub use crate::bytecode::{ByteSequence, Instructions};
pub use crate::codec::ByteOrder;
pub use crate::error::{CompileError, DecodeError};
pub use crate::instruction::{Instruction, OpCode};

use log::{debug, trace};

#[derive(Debug, Default, Clone, Copy)]
pub struct Compiler {
    byte_order: ByteOrder,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    pub fn compile(&self, input: &str) -> Result<ByteSequence, CompileError> {
        let mut program = ByteSequence::with_capacity(input.len(), self.byte_order);
        let mut count = 0;
        for token in lexer::tokenize(input) {
            let instruction = token.classify()?;
            trace!("{:>4}: {:?} -> {:?}", token.offset, token.text, instruction);
            program.push(instruction);
            count += 1;
        }
        debug!(
            "compiled {} tokens into {} bytes ({:?} endian)",
            count,
            program.len(),
            self.byte_order
        );
        Ok(program)
    }
}

/// Compiles `input` with little-endian literals.
pub fn compile(input: &str) -> Result<ByteSequence, CompileError> {
    Compiler::new().compile(input)
}

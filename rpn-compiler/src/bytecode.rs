/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::convert::TryFrom;
use std::fmt;

use crate::codec::{decode_float, encode_float, ByteOrder};
use crate::error::DecodeError;
use crate::instruction::{Instruction, OpCode, LITERAL_TAG, VARIABLE_TAG};

/// A compiled program: a flat run of encoded instructions with no header.
///
/// The byte order only affects how literal operands are laid out, it is not
/// written into the bytes themselves.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ByteSequence {
    bytes: Vec<u8>,
    byte_order: ByteOrder,
}

impl ByteSequence {
    /// Wraps bytes produced elsewhere, e.g. loaded from host storage.
    pub fn from_bytes(bytes: Vec<u8>, byte_order: ByteOrder) -> Self {
        Self { bytes, byte_order }
    }

    pub(crate) fn with_capacity(capacity: usize, byte_order: ByteOrder) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            byte_order,
        }
    }

    pub(crate) fn push(&mut self, instruction: Instruction) {
        match instruction {
            Instruction::Literal(value) => {
                self.bytes.push(LITERAL_TAG);
                self.bytes
                    .extend_from_slice(&encode_float(value, self.byte_order));
            }
            Instruction::VarRef(index) => {
                self.bytes.push(VARIABLE_TAG);
                self.bytes.push(index);
            }
            Instruction::Operator(op) => self.bytes.push(op.tag()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            bytes: &self.bytes,
            byte_order: self.byte_order,
            offset: 0,
            failed: false,
        }
    }
}

impl AsRef<[u8]> for ByteSequence {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Disassembles back into postfix source, e.g. `1.0, $0, +`.
impl fmt::Display for ByteSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, decoded) in self.instructions().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match decoded {
                Ok((_, instruction)) => write!(f, "{}", instruction)?,
                Err(err) => write!(f, "<{}>", err)?,
            }
        }
        Ok(())
    }
}

/// Decoding iterator over a byte sequence, yielding each instruction with
/// the offset of its tag byte. Stops after the first error.
pub struct Instructions<'a> {
    bytes: &'a [u8],
    byte_order: ByteOrder,
    offset: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    fn operand(&self, start: usize, len: usize) -> Option<&'a [u8]> {
        self.bytes.get(start..start.checked_add(len)?)
    }

    fn decode(&mut self) -> Result<(usize, Instruction), DecodeError> {
        let offset = self.offset;
        let tag = self.bytes[offset];
        let instruction = match tag {
            LITERAL_TAG => {
                let raw: [u8; 4] = self
                    .operand(offset + 1, 4)
                    .and_then(|raw| <[u8; 4]>::try_from(raw).ok())
                    .ok_or(DecodeError::Truncated { offset })?;
                Instruction::Literal(decode_float(raw, self.byte_order))
            }
            VARIABLE_TAG => {
                let raw = self
                    .operand(offset + 1, 1)
                    .ok_or(DecodeError::Truncated { offset })?;
                Instruction::VarRef(raw[0])
            }
            byte => {
                let op = OpCode::from_tag(byte)
                    .ok_or(DecodeError::UnknownOpcode { byte, offset })?;
                Instruction::Operator(op)
            }
        };
        self.offset += instruction.encoded_len();
        Ok((offset, instruction))
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let decoded = self.decode();
        self.failed = decoded.is_err();
        Some(decoded)
    }
}

impl<'a> std::iter::FusedIterator for Instructions<'a> {}

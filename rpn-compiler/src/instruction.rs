/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag byte introducing a 4-byte float literal.
pub const LITERAL_TAG: u8 = b'#';
/// Tag byte introducing a 1-byte built-in variable index.
pub const VARIABLE_TAG: u8 = b'$';

#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Instruction {
    Literal(f32),
    VarRef(u8),
    Operator(OpCode),
}

impl Instruction {
    /// Number of bytes this instruction occupies in a byte sequence.
    pub fn encoded_len(&self) -> usize {
        match self {
            Instruction::Literal(_) => 5,
            Instruction::VarRef(_) => 2,
            Instruction::Operator(_) => 1,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Infinity has no literal spelling; `1e39` overflows back to it.
            Instruction::Literal(value) if value.is_infinite() => {
                f.write_str(if value.is_sign_negative() { "-1e39" } else { "1e39" })
            }
            // NaN only arrives through raw bytes and does not recompile.
            Instruction::Literal(value) if value.is_nan() => f.write_str("<NaN>"),
            Instruction::Literal(value) => write!(f, "{:?}", value),
            Instruction::VarRef(index) => write!(f, "${}", index),
            Instruction::Operator(op) => write!(f, "{}", op.symbol()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OpCode {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    LessThan,
    GreaterThan,
    Sin,
    Cos,
    Tan,
    Pow,
}

impl OpCode {
    pub const ALL: [OpCode; 11] = [
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::LessThan,
        OpCode::GreaterThan,
        OpCode::Mod,
        OpCode::Sin,
        OpCode::Cos,
        OpCode::Tan,
        OpCode::Pow,
    ];

    /// The operator's source symbol, which doubles as its tag byte.
    pub fn symbol(self) -> char {
        match self {
            OpCode::Add => '+',
            OpCode::Sub => '-',
            OpCode::Mul => '*',
            OpCode::Div => '/',
            OpCode::Mod => '%',
            OpCode::LessThan => '<',
            OpCode::GreaterThan => '>',
            OpCode::Sin => 's',
            OpCode::Cos => 'c',
            OpCode::Tan => 't',
            OpCode::Pow => 'p',
        }
    }

    pub fn tag(self) -> u8 {
        self.symbol() as u8
    }

    pub fn from_tag(tag: u8) -> Option<OpCode> {
        OpCode::ALL.iter().copied().find(|op| op.tag() == tag)
    }

    /// Number of stack operands consumed.
    pub fn arity(self) -> usize {
        match self {
            OpCode::Sin | OpCode::Cos | OpCode::Tan => 1,
            _ => 2,
        }
    }
}

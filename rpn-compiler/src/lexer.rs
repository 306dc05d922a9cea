/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Splits an expression into tokens and classifies each one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CompileError;
use crate::instruction::{Instruction, OpCode, VARIABLE_TAG};

pub const DELIMITERS: [char; 2] = [' ', ','];

lazy_static! {
    static ref LITERAL_REGEX: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap();
    static ref INDEX_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Token<'a> {
    pub text: &'a str,
    /// Byte offset of the token in the source expression.
    pub offset: usize,
}

/// Iterates over the non-empty, delimiter-separated tokens of `input`.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token<'_>> {
    input
        .split(&DELIMITERS[..])
        .scan(0, |offset, text| {
            let token = Token {
                text,
                offset: *offset,
            };
            *offset += text.len() + 1;
            Some(token)
        })
        .filter(|token| !token.text.is_empty())
}

impl<'a> Token<'a> {
    pub fn classify(&self) -> Result<Instruction, CompileError> {
        let text = self.text;

        if LITERAL_REGEX.is_match(text) {
            return text
                .parse::<f32>()
                .map(Instruction::Literal)
                .map_err(|_| CompileError::UnrecognizedToken(text.to_string()));
        }

        if let Some(index) = text.strip_prefix(VARIABLE_TAG as char) {
            if !INDEX_REGEX.is_match(index) {
                return Err(CompileError::InvalidVariableIndex(text.to_string()));
            }
            return index
                .parse::<u8>()
                .map(Instruction::VarRef)
                .map_err(|_| CompileError::InvalidVariableIndex(text.to_string()));
        }

        let mut chars = text.chars();
        if let (Some(symbol), None) = (chars.next(), chars.next()) {
            if let Some(op) = OpCode::ALL.iter().find(|op| op.symbol() == symbol) {
                return Ok(Instruction::Operator(*op));
            }
        }

        Err(CompileError::UnrecognizedToken(text.to_string()))
    }
}

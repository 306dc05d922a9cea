/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::error::RuntimeError;

pub const STACK_CAPACITY: usize = 128;

/// Bounded LIFO used for a single evaluation.
#[derive(Debug)]
pub struct EvaluationStack {
    values: Vec<f32>,
}

impl Default for EvaluationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self {
            values: Vec::with_capacity(STACK_CAPACITY),
        }
    }

    #[inline]
    pub fn push(&mut self, value: f32) -> Result<(), RuntimeError> {
        if self.values.len() < STACK_CAPACITY {
            self.values.push(value);
            Ok(())
        } else {
            Err(RuntimeError::StackOverflow)
        }
    }

    #[inline]
    pub fn pop(&mut self) -> Result<f32, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::error::EvaluationError;

pub const TABLE_SIZE: usize = 256;

/// Host-owned built-in variables (time, torque, sensor readings, ...),
/// addressed by `$index` in expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableTable {
    slots: [f32; TABLE_SIZE],
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableTable {
    pub fn new() -> Self {
        Self {
            slots: [0.0; TABLE_SIZE],
        }
    }

    pub fn get(&self, index: u8) -> f32 {
        self.slots[index as usize]
    }

    pub fn set(&mut self, index: u8, value: f32) {
        self.slots[index as usize] = value;
    }

    /// Builds a table from a JSON array of numbers; missing slots are zero.
    pub fn from_value(value: &Value) -> Result<Self, EvaluationError> {
        let items = value.as_array().ok_or(EvaluationError::InvalidContext)?;
        if items.len() > TABLE_SIZE {
            return Err(EvaluationError::InvalidContext);
        }
        let mut table = Self::new();
        for (slot, item) in table.slots.iter_mut().zip(items) {
            *slot = item.as_f64().ok_or(EvaluationError::InvalidContext)? as f32;
        }
        Ok(table)
    }
}

impl Deref for VariableTable {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.slots
    }
}

impl DerefMut for VariableTable {
    fn deref_mut(&mut self) -> &mut [f32] {
        &mut self.slots
    }
}

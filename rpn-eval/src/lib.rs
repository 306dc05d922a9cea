/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! A stack-machine evaluator for compiled postfix signal expressions.
//! This crate runs the byte sequences produced by the `rpn-compiler` crate,
//! which is a part of the same workspace.
//!
//! # How to use
//! Compile an expression once and evaluate it as often as needed against a
//! host-owned table of built-in variables:
//!
//! ```rust
//! use rpn_compiler::compile;
//! use rpn_eval::{evaluate, VariableTable};
//! let program = compile("$0, 2, *, 1, +").unwrap();
//! let mut variables = VariableTable::new();
//! variables.set(0, 20.0);
//! assert_eq!(evaluate(&program, &variables).unwrap(), 41.0);
//! ```
//!
//! For one-off expressions the `eval` function compiles and evaluates in a
//! single call:
//!
//! ```rust
//! use rpn_eval::eval;
//! assert_eq!(eval("10, 5, /, 2, 3, *, +").unwrap(), 8.0);
//! ```
//!
//! You can also run an expression against a context using the
//! `eval_in_context` function. The context can be any type that implements
//! `serde::Serialize` and serializes to an array of numbers:
//!
//! ```rust
//! use rpn_eval::eval_in_context;
//! assert_eq!(eval_in_context("$1, $0, -", vec![1.5, 4.0]).unwrap(), 2.5);
//! ```
//!

use log::{debug, trace};
use rpn_compiler::{compile, ByteSequence, Instruction, OpCode};

pub mod error;
pub mod stack;
pub mod variables;

pub use error::{EvaluationError, Result, RuntimeError};
pub use stack::{EvaluationStack, STACK_CAPACITY};
pub use variables::{VariableTable, TABLE_SIZE};

/// Compiles and evaluates `input` with every built-in variable set to zero.
pub fn eval(input: &str) -> Result<f32> {
    let program = compile(input)?;
    Ok(evaluate(&program, &VariableTable::new())?)
}

pub fn eval_in_context<T: serde::Serialize>(input: &str, context: T) -> Result<f32> {
    let program = compile(input)?;
    let context = serde_json::to_value(context)?;
    let variables = VariableTable::from_value(&context)?;
    Ok(evaluate(&program, &variables)?)
}

/// Runs `program` to completion against `variables`.
///
/// Any slice can serve as the variable table; referencing an index past its
/// end fails with `VariableIndexOutOfRange`.
pub fn evaluate(program: &ByteSequence, variables: &[f32]) -> Result<f32, RuntimeError> {
    let result = run(program, variables);
    match &result {
        Ok(value) => debug!("evaluated {} bytes to {}", program.len(), value),
        Err(err) => debug!("evaluation of {} bytes failed: {}", program.len(), err),
    }
    result
}

fn run(program: &ByteSequence, variables: &[f32]) -> Result<f32, RuntimeError> {
    let mut stack = EvaluationStack::new();

    for decoded in program.instructions() {
        let (offset, instruction) = decoded?;
        trace!("{:>4}: {} (depth {})", offset, instruction, stack.len());
        match instruction {
            Instruction::Literal(value) => stack.push(value)?,
            Instruction::VarRef(index) => {
                let value = variables
                    .get(index as usize)
                    .copied()
                    .ok_or(RuntimeError::VariableIndexOutOfRange(index))?;
                stack.push(value)?;
            }
            Instruction::Operator(op) => apply(op, &mut stack)?,
        }
    }

    let result = stack.pop().map_err(|_| RuntimeError::MalformedProgram)?;
    if !stack.is_empty() {
        return Err(RuntimeError::MalformedProgram);
    }
    Ok(result)
}

fn apply(op: OpCode, stack: &mut EvaluationStack) -> Result<(), RuntimeError> {
    match op {
        OpCode::Add => binary(stack, |a, b| a + b),
        OpCode::Sub => binary(stack, |a, b| a - b),
        OpCode::Mul => binary(stack, |a, b| a * b),
        OpCode::Div => binary(stack, |a, b| a / b),
        // Truncated remainder, sign follows the dividend.
        OpCode::Mod => binary(stack, |a, b| a % b),
        OpCode::LessThan => binary(stack, |a, b| (a < b) as i32 as f32),
        OpCode::GreaterThan => binary(stack, |a, b| (a > b) as i32 as f32),
        OpCode::Pow => binary(stack, f32::powf),
        OpCode::Sin => unary(stack, f32::sin),
        OpCode::Cos => unary(stack, f32::cos),
        OpCode::Tan => unary(stack, f32::tan),
    }
}

#[inline]
fn binary<F>(stack: &mut EvaluationStack, op: F) -> Result<(), RuntimeError>
where
    F: Fn(f32, f32) -> f32,
{
    let op2 = stack.pop()?;
    let op1 = stack.pop()?;
    stack.push(op(op1, op2))
}

#[inline]
fn unary<F>(stack: &mut EvaluationStack, op: F) -> Result<(), RuntimeError>
where
    F: Fn(f32) -> f32,
{
    let value = stack.pop()?;
    stack.push(op(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpn_compiler::ByteOrder;
    use serde_json::json as value;

    const TOLERANCE: f32 = 1e-4;

    fn run_bytes(bytes: &[u8]) -> Result<f32, RuntimeError> {
        let program = ByteSequence::from_bytes(bytes.to_vec(), ByteOrder::Little);
        evaluate(&program, &VariableTable::new())
    }

    fn runtime_error(input: &str) -> RuntimeError {
        match eval(input) {
            Err(EvaluationError::Runtime(err)) => err,
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_literal() {
        assert_eq!(eval("1").unwrap(), 1.0);
    }

    #[test]
    fn test_binary_expression_addition() {
        assert_eq!(eval("1, 2, +").unwrap(), 3.0);
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(eval("10, 4, -").unwrap(), 6.0);
        assert_eq!(eval("10, 4, /").unwrap(), 2.5);
        assert_eq!(eval("2, 10, p").unwrap(), 1024.0);
    }

    #[test]
    fn test_nested_arithmetic() {
        assert_eq!(eval("1, 2, 3, 4, *, +, -").unwrap(), -13.0);
        assert_eq!(eval("10, 5, /, 2, 3, *, +").unwrap(), 8.0);
    }

    #[test]
    fn test_comparisons_are_numeric() {
        assert_eq!(eval("1, 2, <").unwrap(), 1.0);
        assert_eq!(eval("1, 2, >").unwrap(), 0.0);
        assert_eq!(eval("2, 2, <").unwrap(), 0.0);
        assert_eq!(eval("3, 2, >").unwrap(), 1.0);
    }

    #[test]
    fn test_remainder_follows_dividend() {
        assert_eq!(eval("7, 3, %").unwrap(), 1.0);
        assert_eq!(eval("-7, 3, %").unwrap(), -1.0);
        assert_eq!(eval("7, -3, %").unwrap(), 1.0);
        assert_eq!(eval("5.5, 2, %").unwrap(), 1.5);
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        assert_eq!(eval("1, 0, /").unwrap(), f32::INFINITY);
        assert_eq!(eval("-1, 0, /").unwrap(), f32::NEG_INFINITY);
        assert!(eval("0, 0, /").unwrap().is_nan());
        assert!(eval("1, 0, %").unwrap().is_nan());
    }

    #[test]
    fn test_pow_domain() {
        assert!(eval("-8, 0.5, p").unwrap().is_nan());
        assert_eq!(eval("-2, 3, p").unwrap(), -8.0);
        assert_eq!(eval("0, 0, p").unwrap(), 1.0);
    }

    #[test]
    fn test_trigonometry() {
        assert!((eval("0, s").unwrap()).abs() < TOLERANCE);
        assert!((eval("0, c").unwrap() - 1.0).abs() < TOLERANCE);
        assert!((eval("0.7853982, t").unwrap() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_variables() {
        let mut variables = VariableTable::new();
        variables.set(0, 4.1);
        variables.set(7, 2.0);
        let program = compile("$0, $7, *").unwrap();
        assert!((evaluate(&program, &variables).unwrap() - 8.2).abs() < TOLERANCE);
    }

    #[test]
    fn test_program_is_reusable() {
        let program = compile("$0, 1, +").unwrap();
        let mut variables = VariableTable::new();
        for i in 0..4 {
            variables.set(0, i as f32);
            assert_eq!(evaluate(&program, &variables).unwrap(), i as f32 + 1.0);
        }
    }

    #[test]
    fn test_short_variable_slice() {
        let program = compile("$0, $2, +").unwrap();
        assert_eq!(evaluate(&program, &[1.0, 0.0, 2.0]).unwrap(), 3.0);
        assert_eq!(
            evaluate(&program, &[1.0, 0.0]),
            Err(RuntimeError::VariableIndexOutOfRange(2))
        );
        assert_eq!(
            evaluate(&program, &[]),
            Err(RuntimeError::VariableIndexOutOfRange(0))
        );
    }

    #[test]
    fn test_stack_underflow() {
        assert_eq!(runtime_error("1, 2, +, +"), RuntimeError::StackUnderflow);
        assert_eq!(runtime_error("s"), RuntimeError::StackUnderflow);
        assert_eq!(runtime_error("1, p"), RuntimeError::StackUnderflow);
    }

    #[test]
    fn test_stack_overflow() {
        let input = vec!["1"; STACK_CAPACITY + 1].join(", ");
        assert_eq!(runtime_error(&input), RuntimeError::StackOverflow);
    }

    #[test]
    fn test_full_stack_without_reduction_is_malformed() {
        let input = vec!["1"; STACK_CAPACITY].join(", ");
        assert_eq!(runtime_error(&input), RuntimeError::MalformedProgram);

        let mut input = vec!["1"; STACK_CAPACITY].join(", ");
        input.push_str(&", +".repeat(STACK_CAPACITY - 1));
        assert_eq!(eval(&input).unwrap(), STACK_CAPACITY as f32);
    }

    #[test]
    fn test_malformed_programs() {
        assert_eq!(runtime_error(""), RuntimeError::MalformedProgram);
        assert_eq!(runtime_error("1, 2"), RuntimeError::MalformedProgram);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(run_bytes(b"@"), Err(RuntimeError::UnknownOpcode(b'@')));
        assert_eq!(
            run_bytes(&[b'$', 0, 0x00]),
            Err(RuntimeError::UnknownOpcode(0x00))
        );
    }

    #[test]
    fn test_truncated_instruction() {
        assert_eq!(
            run_bytes(&[b'#', 0, 0]),
            Err(RuntimeError::TruncatedInstruction(0))
        );
        assert_eq!(
            run_bytes(&[b'$', 0, b'$']),
            Err(RuntimeError::TruncatedInstruction(2))
        );
    }

    #[test]
    fn test_big_endian_program() {
        let program = ByteSequence::from_bytes(
            vec![b'#', 0x3f, 0x80, 0x00, 0x00, b'#', 0xc0, 0x20, 0x00, 0x00, b'-'],
            ByteOrder::Big,
        );
        assert_eq!(evaluate(&program, &[]).unwrap(), 3.5);
    }

    #[test]
    fn test_compile_error_surfaces() {
        match eval("1, 2, @, +") {
            Err(EvaluationError::Compile(err)) => assert_eq!(
                err,
                rpn_compiler::CompileError::UnrecognizedToken("@".to_string())
            ),
            other => panic!("expected a compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_context() {
        let context = value!([4.1]);
        let expected = (4.1f32 * 2.0).sin().powf(7.0);
        let result = eval_in_context("$0, 2, *, s, 7, p", context).unwrap();
        assert!((result - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_invalid_context() {
        assert!(matches!(
            eval_in_context("$0", value!({"a": 1.0})),
            Err(EvaluationError::InvalidContext)
        ));
        assert!(matches!(
            eval_in_context("$0", "sensor"),
            Err(EvaluationError::InvalidContext)
        ));
    }

    #[test]
    fn test_context_shorter_than_table() {
        assert_eq!(eval_in_context("$0, $200, +", vec![2.0]).unwrap(), 2.0);
    }
}

// crates/slot-logic/tests/parser.rs
// ============================================================================
// Module: Formula Parser Tests
// Description: Grammar, arity, and diagnostics coverage for `parse_formula`.
// Purpose: Ensure formula parsing accepts the documented grammar and rejects
//          malformed input with the documented error kinds.
// Dependencies: slot_logic::{error, expr, parser}
// ============================================================================
//! ## Overview
//! Integration tests for the formula grammar: operator keywords, bracketed
//! and bare slot references, arity enforcement, and positional diagnostics.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::BTreeMap;

use slot_logic::LogicExpr;
use slot_logic::OpKind;
use slot_logic::ParseError;
use slot_logic::parse_formula;
use support::TestResult;
use support::ensure;

/// Parses a two-slot conjunction with bracketed references.
#[test]
fn test_parse_and_of_bracketed_slots() -> TestResult {
    let expr = parse_formula("AND([0],[2])")?;
    let expected = LogicExpr::and(vec![LogicExpr::slot(0), LogicExpr::slot(2)]);
    ensure(expr == expected, "Expected and([0],[2]) structure")?;
    Ok(())
}

/// Bare and bracketed slot references are interchangeable.
#[test]
fn test_bare_and_bracketed_slots_are_equivalent() -> TestResult {
    let bracketed = parse_formula("and([0],[2])")?;
    let bare = parse_formula("and(0,2)")?;
    ensure(bracketed == bare, "Expected bracketed and bare forms to parse identically")?;
    Ok(())
}

/// A bare integer with no operator is a legal minimal formula.
#[test]
fn test_single_slot_formula() -> TestResult {
    ensure(parse_formula("7")? == LogicExpr::slot(7), "Expected bare slot leaf")?;
    ensure(parse_formula("[7]")? == LogicExpr::slot(7), "Expected bracketed slot leaf")?;
    Ok(())
}

/// Operator keywords are case-insensitive.
#[test]
fn test_operator_case_insensitivity() -> TestResult {
    let lower = parse_formula("not(or(1,2))")?;
    let mixed = parse_formula("NoT(Or(1,2))")?;
    ensure(lower == mixed, "Expected case-insensitive keywords to parse identically")?;
    Ok(())
}

/// Parses a five-operand xor mixing every operand form.
#[test]
fn test_parse_wide_xor_formula() -> TestResult {
    let expr = parse_formula("xor(1,or(15,18),5,[7], AND(NOT(0), OR([3], 12)))")?;
    let LogicExpr::Xor(operands) = &expr else {
        return ensure(false, "Expected top-level xor");
    };
    ensure(operands.len() == 5, "Expected 5 top-level xor operands")?;

    let reparsed = parse_formula(&expr.formula())?;
    let LogicExpr::Xor(reparsed_operands) = &reparsed else {
        return ensure(false, "Expected reparsed top-level xor");
    };
    ensure(reparsed_operands.len() == 5, "Expected operand count to survive rendering")?;
    ensure(reparsed == expr, "Expected canonical rendering to round-trip structurally")?;
    Ok(())
}

/// `not` with two operands is an arity error, not a silent truncation.
#[test]
fn test_not_rejects_two_operands() -> TestResult {
    let err = parse_formula("not(12,3)").unwrap_err();
    ensure(
        matches!(
            err,
            ParseError::ArityMismatch {
                operator: OpKind::Not,
                found: 2,
                ..
            }
        ),
        "Expected ArityMismatch for not(12,3)",
    )?;
    Ok(())
}

/// `not` with zero operands is an arity error.
#[test]
fn test_not_rejects_zero_operands() -> TestResult {
    let err = parse_formula("not()").unwrap_err();
    ensure(
        matches!(
            err,
            ParseError::ArityMismatch {
                operator: OpKind::Not,
                found: 0,
                ..
            }
        ),
        "Expected ArityMismatch for not()",
    )?;
    Ok(())
}

/// `not` with exactly one operand parses.
#[test]
fn test_not_accepts_single_operand() -> TestResult {
    let expr = parse_formula("not(4)")?;
    ensure(expr == LogicExpr::negate(LogicExpr::slot(4)), "Expected not([4])")?;
    Ok(())
}

/// Variadic operators reject empty operand lists.
#[test]
fn test_variadic_operators_reject_empty_lists() -> TestResult {
    for formula in ["and()", "or()", "xor()"] {
        let err = parse_formula(formula).unwrap_err();
        ensure(
            matches!(
                err,
                ParseError::ArityMismatch {
                    found: 0,
                    ..
                }
            ),
            format!("Expected ArityMismatch for `{formula}`"),
        )?;
    }
    Ok(())
}

/// Single-operand variadic operators are legal pass-throughs.
#[test]
fn test_variadic_operators_accept_single_operand() -> TestResult {
    let states = BTreeMap::from([(3, true)]);
    for formula in ["and(3)", "or(3)", "xor(3)"] {
        let expr = parse_formula(formula)?;
        ensure(
            expr.eval(&states)?,
            format!("Expected `{formula}` to pass its single operand through"),
        )?;
    }
    Ok(())
}

/// Unrecognized identifiers are unknown operators.
#[test]
fn test_unknown_operator() -> TestResult {
    let err = parse_formula("nand(1,2)").unwrap_err();
    ensure(
        matches!(err, ParseError::UnknownOperator { ref name, .. } if name == "nand"),
        "Expected UnknownOperator for nand",
    )?;
    Ok(())
}

/// Negative slot tokens are invalid slot literals.
#[test]
fn test_negative_slot_literal() -> TestResult {
    let err = parse_formula("and(-3,1)").unwrap_err();
    ensure(
        matches!(err, ParseError::InvalidSlotLiteral { ref raw, .. } if raw == "-3"),
        "Expected InvalidSlotLiteral for -3",
    )?;
    Ok(())
}

/// Non-numeric bracket contents are invalid slot literals.
#[test]
fn test_non_numeric_bracket_contents() -> TestResult {
    let err = parse_formula("and([x],1)").unwrap_err();
    ensure(
        matches!(err, ParseError::InvalidSlotLiteral { .. }),
        "Expected InvalidSlotLiteral for [x]",
    )?;
    Ok(())
}

/// A missing closing bracket is an invalid slot literal.
#[test]
fn test_unbalanced_bracket() -> TestResult {
    let err = parse_formula("and([3,1)").unwrap_err();
    ensure(
        matches!(err, ParseError::InvalidSlotLiteral { .. }),
        "Expected InvalidSlotLiteral for unbalanced bracket",
    )?;
    Ok(())
}

/// Slot literals beyond the index range are invalid.
#[test]
fn test_overflowing_slot_literal() -> TestResult {
    let err = parse_formula("or(4294967296)").unwrap_err();
    ensure(
        matches!(err, ParseError::InvalidSlotLiteral { .. }),
        "Expected InvalidSlotLiteral for out-of-range literal",
    )?;
    Ok(())
}

/// Empty and whitespace-only inputs are rejected.
#[test]
fn test_empty_formula() -> TestResult {
    ensure(
        parse_formula("") == Err(ParseError::EmptyFormula),
        "Expected EmptyFormula for empty input",
    )?;
    ensure(
        parse_formula("   \t ") == Err(ParseError::EmptyFormula),
        "Expected EmptyFormula for whitespace input",
    )?;
    Ok(())
}

/// Content after a complete formula is trailing input.
#[test]
fn test_trailing_input() -> TestResult {
    let err = parse_formula("and(1,2) 3").unwrap_err();
    ensure(
        matches!(err, ParseError::TrailingInput { .. }),
        "Expected TrailingInput after complete formula",
    )?;
    Ok(())
}

/// An operator keyword without parentheses is a syntax error.
#[test]
fn test_operator_without_parentheses() -> TestResult {
    let err = parse_formula("and").unwrap_err();
    ensure(
        matches!(err, ParseError::UnexpectedToken { .. }),
        "Expected UnexpectedToken for bare operator keyword",
    )?;
    Ok(())
}

/// Deeply nested formulas beyond the limit are rejected.
#[test]
fn test_nesting_limit() -> TestResult {
    let mut formula = String::new();
    for _ in 0 .. 40 {
        formula.push_str("not(");
    }
    formula.push('0');
    for _ in 0 .. 40 {
        formula.push(')');
    }
    let err = parse_formula(&formula).unwrap_err();
    ensure(
        matches!(err, ParseError::NestingTooDeep { .. }),
        "Expected NestingTooDeep for 40 levels",
    )?;
    Ok(())
}

/// Error positions point at the offending byte.
#[test]
fn test_error_positions() -> TestResult {
    let err = parse_formula("or(1,nand(2))").unwrap_err();
    ensure(
        matches!(
            err,
            ParseError::UnknownOperator {
                position: 5,
                ..
            }
        ),
        "Expected position of the unknown operator",
    )?;
    Ok(())
}

/// Canonical rendering re-parses to the same structure.
#[test]
fn test_formula_round_trip() -> TestResult {
    let cases = [
        "and([0],[2])",
        "not(or(1,xor(2,3,4)))",
        "xor(0,and(1,not(2)),[3])",
        "[12]",
    ];
    for case in cases {
        let expr = parse_formula(case)?;
        let rendered = expr.formula();
        let reparsed = parse_formula(&rendered)?;
        ensure(
            reparsed == expr,
            format!("Expected `{case}` to round-trip through `{rendered}`"),
        )?;
    }
    Ok(())
}

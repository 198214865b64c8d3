//! The single error type produced while tokenizing, reducing, or resolving a dice expression.

use alloc::string::String;
use core::ops::Range;

use rust_decimal::Decimal;

/// Error for any dice expression that can't be evaluated.
///
/// Every variant is a syntax error in the broad sense: the expression as a whole is rejected and nothing is retried.
/// The [`Display`](core::fmt::Display) output is meant to be shown to users verbatim.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// A character that isn't a number, whitespace, or known operator symbol was encountered.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::{dice::roller::Max as MaxRoller, parse::evaluate, Error};
	///
	/// let err = evaluate("2 # 3", &mut MaxRoller).unwrap_err();
	/// assert!(matches!(err, Error::UnknownOperator { symbol: '#', .. }));
	/// assert_eq!(err.span(), Some(2..3));
	/// ```
	#[error("unknown operator: {symbol}")]
	UnknownOperator {
		/// Offending character
		symbol: char,

		/// Byte range of the character in the input
		span: Range<usize>,
	},

	/// A number literal couldn't be parsed.
	#[error("invalid number: \"{literal}\"")]
	InvalidNumber {
		/// Text of the literal as it was scanned
		literal: String,

		/// Byte range of the literal in the input
		span: Range<usize>,
	},

	/// A closing parenthesis had no matching opening parenthesis, or the other way around.
	#[error("mismatched parenthesis")]
	MismatchedParenthesis,

	/// The expression didn't reduce to exactly one term.
	#[error("mismatched operations")]
	MismatchedOperations,

	/// An operator found fewer terms on the stack than it needs.
	#[error("missing operand for \"{op}\"")]
	MissingOperand {
		/// Symbol of the operator
		op: char,
	},

	/// A dice modifier operator was applied to something other than dice.
	#[error("{name} can only be used on dice expressions")]
	NotDice {
		/// Human-readable name of the modifier
		name: &'static str,
	},

	/// Decimal arithmetic failed (division by zero or overflow).
	#[error("{0}")]
	Arithmetic(&'static str),

	/// A value had to be used as an integer but doesn't fit in one.
	#[error("{0} is too large to be used as an integer")]
	IntOverflow(Decimal),

	/// A dice field is outside of its allowed bounds.
	#[error("{field} must be between {min} and {max} (got {val})")]
	OutOfRange {
		/// Name of the field
		field: &'static str,

		/// Value that was given
		val: i32,

		/// Lowest allowed value
		min: i32,

		/// Highest allowed value
		max: i32,
	},

	/// A dice field that must not be negative was given a negative value.
	#[error("{field} must not be negative (got {val})")]
	Negative {
		/// Name of the field
		field: &'static str,

		/// Value that was given
		val: i32,
	},
}

impl Error {
	/// Gets the byte range of the input that caused the error, if it is known.
	#[must_use]
	pub fn span(&self) -> Option<Range<usize>> {
		match self {
			Self::UnknownOperator { span, .. } | Self::InvalidNumber { span, .. } => Some(span.clone()),
			_ => None,
		}
	}
}

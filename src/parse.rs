//! Tokenizing of dice expression text, feeding terms and operators into an [`Evaluator`] as they are scanned.

use alloc::string::ToString;
use core::str::FromStr;

use rust_decimal::Decimal;

use crate::{
	dice::{Roller, Style},
	eval::Evaluator,
	expr::{Evaled, Term},
	op::Op,
	Error,
};

/// Scans an expression and pushes every number and operator in it into the evaluator.
///
/// A digit always starts a number. A `+` or `-` starts one too when the evaluator is expecting a term, so `9 + -3`
/// reads as nine plus negative three.
///
/// # Errors
/// If a number can't be parsed, a character isn't a known operator, or pushing an operator fails, an error variant
/// is returned.
pub fn tokenize<R: Roller>(input: &str, evaluator: &mut Evaluator<'_, R>) -> Result<(), Error> {
	let mut chars = input.char_indices().peekable();

	while let Some(&(start, ch)) = chars.peek() {
		if ch.is_whitespace() {
			chars.next();
			continue;
		}

		if ch.is_ascii_digit() || (matches!(ch, '+' | '-') && evaluator.is_expecting_term()) {
			chars.next();
			let mut end = start + ch.len_utf8();

			// Digits, then at most one decimal point followed by more digits
			let mut seen_point = false;
			while let Some(&(idx, next)) = chars.peek() {
				let accept = next.is_ascii_digit() || (next == '.' && !seen_point);
				if !accept {
					break;
				}
				seen_point |= next == '.';
				end = idx + next.len_utf8();
				chars.next();
			}

			let literal = &input[start..end];
			let invalid = || Error::InvalidNumber {
				literal: literal.to_string(),
				span: start..end,
			};
			if !literal.chars().any(|c| c.is_ascii_digit()) {
				return Err(invalid());
			}
			let val = Decimal::from_str(literal).map_err(|_err| invalid())?;
			evaluator.push_term(Term::Const(Evaled::new(val, literal)));
			continue;
		}

		let op = Op::from_symbol(ch).ok_or(Error::UnknownOperator {
			symbol: ch,
			span: start..start + ch.len_utf8(),
		})?;
		chars.next();
		evaluator.push_op(op)?;
	}

	Ok(())
}

/// Evaluates a full dice expression, rolling with the given roller and writing plain die faces.
///
/// # Errors
/// If the expression is malformed or any part of it fails to evaluate, an error variant is returned.
///
/// # Examples
/// ```
/// use dicebot_roll::{
/// 	dice::roller::{Iter as IterRoller, Max as MaxRoller},
/// 	parse::evaluate,
/// };
///
/// let evaled = evaluate("4d6x1 + 2", &mut IterRoller::new([3, 6, 1, 4]))?;
/// assert_eq!(evaled.val_as_int()?, 15);
/// assert_eq!(evaled.text(), "🎲(3 + 6 + ~~1~~ + 4) + 2");
///
/// let evaled = evaluate("9 + -3", &mut MaxRoller)?;
/// assert_eq!(evaled.display_val(), "6");
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
pub fn evaluate(input: &str, rng: &mut impl Roller) -> Result<Evaled, Error> {
	evaluate_styled(input, rng, Style::Plain)
}

/// Evaluates a full dice expression, rolling with the given roller and writing die faces in the given style.
///
/// # Errors
/// If the expression is malformed or any part of it fails to evaluate, an error variant is returned.
///
/// # Examples
/// ```
/// use dicebot_roll::{dice::{roller::Iter as IterRoller, Style}, parse::evaluate_styled};
///
/// let evaled = evaluate_styled("3d20", &mut IterRoller::new([20, 7, 1]), Style::Decorated)?;
/// assert_eq!(evaled.text(), "🎲(**20** + 7 + __1__)");
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
pub fn evaluate_styled(input: &str, rng: &mut impl Roller, style: Style) -> Result<Evaled, Error> {
	tracing::debug!(input, ?style, "evaluating dice expression");

	let mut evaluator = Evaluator::new(rng).with_style(style);
	tokenize(input, &mut evaluator)?;
	let evaled = evaluator.finish()?;

	tracing::debug!(input, val = %evaled.val(), "evaluated dice expression");
	Ok(evaled)
}

/// Evaluates a full dice expression with a default [`FastRand`](crate::dice::roller::FastRand) roller.
/// Requires the `fastrand` and `std` features (both enabled by default).
///
/// # Errors
/// If the expression is malformed or any part of it fails to evaluate, an error variant is returned.
///
/// # Examples
/// ```
/// let evaled = dicebot_roll::eval("(2*d20)/(2d20)+7d4+3")?;
/// assert!(evaled.val_as_int()? >= 3);
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[cfg(all(feature = "fastrand", feature = "std"))]
pub fn eval(input: &str) -> Result<Evaled, Error> {
	evaluate(input, &mut crate::dice::roller::FastRand::default())
}

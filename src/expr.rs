//! Values that live on the evaluator's stack ([`Term`]) and the results they resolve to ([`Evaled`]).

use alloc::{format, string::String};
use core::fmt;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::{
	dice::{Dice, Roller, Style},
	Error,
};

/// Number of decimal places shown by [`Evaled::display_val()`]
pub const DISPLAY_DECIMAL_PLACES: u32 = 4;

/// Result of evaluating any part of a dice expression: an exact value along with a human-readable trace of how it
/// was reached (every die rolled and every operation applied).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Evaled {
	/// Exact value
	val: Decimal,

	/// Derivation trace
	text: String,
}

impl Evaled {
	/// Creates a new result from a value and its description.
	#[must_use]
	pub fn new(val: Decimal, text: impl Into<String>) -> Self {
		Self {
			val,
			text: text.into(),
		}
	}

	/// Gets the exact value.
	#[must_use]
	#[inline]
	pub const fn val(&self) -> Decimal {
		self.val
	}

	/// Gets the derivation trace, e.g. `2 + 🎲(4 + ~~1~~)`.
	#[must_use]
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Gets the value as an integer, truncating any fractional part.
	///
	/// # Errors
	/// If the integer part doesn't fit in an [`i32`], an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::expr::Evaled;
	/// use rust_decimal::Decimal;
	///
	/// let evaled = Evaled::new(Decimal::new(-75, 1), "-7.5");
	/// assert_eq!(evaled.val_as_int()?, -7);
	///
	/// let huge = Evaled::new(Decimal::from(i64::MAX), "huge");
	/// assert!(huge.val_as_int().is_err());
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	pub fn val_as_int(&self) -> Result<i32, Error> {
		self.val.trunc().to_i32().ok_or(Error::IntOverflow(self.val))
	}

	/// Formats the value the way it should be shown to users: rounded to at most 4 decimal places, without trailing
	/// zeros. Midpoints round away from zero here (`0.00005` shows as `0.0001`), unlike the ties-to-even rounding
	/// that multiplication and division apply to significant digits.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::expr::Evaled;
	/// use rust_decimal::Decimal;
	///
	/// assert_eq!(Evaled::new(Decimal::new(250, 2), "").display_val(), "2.5");
	/// assert_eq!(Evaled::new(Decimal::new(2, 3), "").display_val(), "0.002");
	/// assert_eq!(Evaled::new(Decimal::new(123_456_789, 6), "").display_val(), "123.4568");
	/// assert_eq!(Evaled::new(Decimal::from(40), "").display_val(), "40");
	/// ```
	#[must_use]
	pub fn display_val(&self) -> String {
		format!(
			"{}",
			self.val
				.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
				.normalize()
		)
	}

	/// Creates the negation of this result, prefixing the text with `-`.
	#[must_use]
	pub fn negated(self) -> Self {
		Self {
			val: -self.val,
			text: format!("-{}", self.text),
		}
	}
}

impl From<i32> for Evaled {
	fn from(val: i32) -> Self {
		Self::new(Decimal::from(val), format!("{val}"))
	}
}

impl fmt::Display for Evaled {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the derivation trace, equivalent to [`Self::text()`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

/// Anything the evaluator can hold on its term stack and later resolve to an [`Evaled`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Term {
	/// Literal number or the already-computed result of an operation
	Const(Evaled),

	/// Dice that haven't been rolled yet and may still be changed by modifier operators
	Dice(Dice),
}

impl Term {
	/// Resolves the term. Constants resolve to themselves, while dice are rolled with the given roller and totaled.
	///
	/// # Errors
	/// If the term is dice that fail validation, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::{dice::{roller::Max as MaxRoller, Dice, Style}, expr::Term};
	///
	/// let term = Term::Dice(Dice::new(3, 6));
	/// let evaled = term.eval(&mut MaxRoller, Style::Plain)?;
	/// assert_eq!(evaled.val_as_int()?, 18);
	/// assert_eq!(evaled.text(), "🎲(6 + 6 + 6)");
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller, style: Style) -> Result<Evaled, Error> {
		match self {
			Self::Const(evaled) => Ok(evaled.clone()),
			Self::Dice(dice) => dice.eval(rng, style),
		}
	}

	/// Resolves the term and converts its value to an integer. See [`Self::eval()`] and [`Evaled::val_as_int()`].
	///
	/// # Errors
	/// If resolving fails or the value doesn't fit in an [`i32`], an error variant is returned.
	pub fn eval_int(&self, rng: &mut impl Roller, style: Style) -> Result<i32, Error> {
		self.eval(rng, style)?.val_as_int()
	}

	/// Checks whether the term is unrolled dice.
	#[must_use]
	#[inline]
	pub const fn is_dice(&self) -> bool {
		matches!(self, Self::Dice(..))
	}
}

impl From<Evaled> for Term {
	#[inline]
	fn from(evaled: Evaled) -> Self {
		Self::Const(evaled)
	}
}

impl From<Dice> for Term {
	#[inline]
	fn from(dice: Dice) -> Self {
		Self::Dice(dice)
	}
}

impl From<i32> for Term {
	#[inline]
	fn from(val: i32) -> Self {
		Self::Const(Evaled::from(val))
	}
}

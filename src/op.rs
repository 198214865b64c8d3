//! The fixed table of operators usable in dice expressions, along with how each one evaluates against the term stack.
//!
//! Values are [`Decimal`]s, so magnitudes are limited to about 7.9e28. Results past that are rejected with
//! [`Error::Arithmetic`] rather than losing precision.

use alloc::{format, vec::Vec};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
	dice::{Dice, Roller, Style},
	expr::{Evaled, Term},
	Error,
};

/// Number of significant digits kept by multiplication and division
pub const SIGNIFICANT_DIGITS: u32 = 4;

/// Every operator that can appear in a dice expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Op {
	/// Addition (`+`)
	Add,

	/// Subtraction (`-`)
	Sub,

	/// Multiplication (`*`)
	Mul,

	/// Division (`/`)
	Div,

	/// Rounds the preceding value up to a whole number (`^`, postfix)
	Ceil,

	/// Raises the left value to at least the right value (`<`)
	CapLow,

	/// Lowers the left value to at most the right value (`>`)
	CapHigh,

	/// Creates dice from a count and a number of sides (`d`)
	Dice,

	/// Drops the lowest dice (`x`)
	Drop,

	/// Keeps the highest dice (`k`)
	Keep,

	/// Keeps the lowest dice (`l`)
	KeepLow,

	/// Rerolls dice at or below a threshold once (`r`)
	Reroll,

	/// Rerolls dice at or below a threshold until none are left (`R`)
	RerollRecurse,

	/// Explodes dice at or above a threshold once (`e`)
	Explode,

	/// Explodes dice at or above a threshold, letting explosions explode too (`E`)
	ExplodeRecurse,

	/// Counts dice at or above a threshold as successes (`s`)
	Success,

	/// Counts dice at or below a threshold as failures (`f`)
	Failure,

	/// Opens a group (`(`)
	LeftParen,

	/// Closes a group (`)`)
	RightParen,
}

impl Op {
	/// Every operator in the table
	pub const ALL: [Self; 19] = [
		Self::Add,
		Self::Sub,
		Self::Mul,
		Self::Div,
		Self::Ceil,
		Self::CapLow,
		Self::CapHigh,
		Self::Dice,
		Self::Drop,
		Self::Keep,
		Self::KeepLow,
		Self::Reroll,
		Self::RerollRecurse,
		Self::Explode,
		Self::ExplodeRecurse,
		Self::Success,
		Self::Failure,
		Self::LeftParen,
		Self::RightParen,
	];

	/// Looks up the operator for a symbol.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::op::Op;
	///
	/// assert_eq!(Op::from_symbol('d'), Some(Op::Dice));
	/// assert_eq!(Op::from_symbol('E'), Some(Op::ExplodeRecurse));
	/// assert_eq!(Op::from_symbol('q'), None);
	/// ```
	#[must_use]
	pub fn from_symbol(symbol: char) -> Option<Self> {
		Self::ALL.into_iter().find(|op| op.symbol() == symbol)
	}

	/// Gets the symbol that represents the operator.
	#[must_use]
	pub const fn symbol(self) -> char {
		match self {
			Self::Add => '+',
			Self::Sub => '-',
			Self::Mul => '*',
			Self::Div => '/',
			Self::Ceil => '^',
			Self::CapLow => '<',
			Self::CapHigh => '>',
			Self::Dice => 'd',
			Self::Drop => 'x',
			Self::Keep => 'k',
			Self::KeepLow => 'l',
			Self::Reroll => 'r',
			Self::RerollRecurse => 'R',
			Self::Explode => 'e',
			Self::ExplodeRecurse => 'E',
			Self::Success => 's',
			Self::Failure => 'f',
			Self::LeftParen => '(',
			Self::RightParen => ')',
		}
	}

	/// Gets the precedence rank of the operator. Lower ranks bind tighter, and pending operators with a rank at or
	/// below an incoming operator's are evaluated before it is pushed. Parentheses have a rank of 0.
	#[must_use]
	pub const fn precedence(self) -> u8 {
		match self {
			Self::Add | Self::Sub => 10,
			Self::Mul | Self::Div => 8,
			Self::Ceil | Self::CapLow | Self::CapHigh => 6,
			Self::Dice
			| Self::Drop
			| Self::Keep
			| Self::KeepLow
			| Self::Reroll
			| Self::RerollRecurse
			| Self::Explode
			| Self::ExplodeRecurse
			| Self::Success
			| Self::Failure => 4,
			Self::LeftParen | Self::RightParen => 0,
		}
	}

	/// Whether a term is expected to come right after the operator.
	/// Only postfix operators and closing parentheses are followed by another operator.
	#[must_use]
	pub const fn expects_term_after(self) -> bool {
		!matches!(self, Self::Ceil | Self::RightParen)
	}

	/// Term to use as the left operand when the operator appears without one, if the operator has one.
	/// This is what makes `d6` equivalent to `1d6`.
	#[must_use]
	pub fn implicit_left_term(self) -> Option<Term> {
		match self {
			Self::Dice => Some(Term::from(1)),
			_ => None,
		}
	}

	/// Human-readable name of the operator, used in error messages.
	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::Add => "addition",
			Self::Sub => "subtraction",
			Self::Mul => "multiplication",
			Self::Div => "division",
			Self::Ceil => "ceiling",
			Self::CapLow => "low cap",
			Self::CapHigh => "high cap",
			Self::Dice => "dice",
			Self::Drop => "drop",
			Self::Keep => "keep",
			Self::KeepLow => "keep lowest",
			Self::Reroll => "reroll",
			Self::RerollRecurse => "infinite reroll",
			Self::Explode => "explode",
			Self::ExplodeRecurse => "infinite explode",
			Self::Success => "success",
			Self::Failure => "failure",
			Self::LeftParen => "left parenthesis",
			Self::RightParen => "right parenthesis",
		}
	}

	/// Evaluates the operator against the term stack: pops its operands (the right-hand one first, since it was
	/// pushed last) and pushes its result.
	///
	/// # Errors
	/// If there aren't enough terms, an operand is invalid for the operator, or arithmetic fails, an error variant is
	/// returned.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::{dice::{roller::Max as MaxRoller, Style}, expr::Term, op::Op};
	///
	/// let mut terms = vec![Term::from(2), Term::from(5)];
	/// Op::Add.eval(&mut terms, &mut MaxRoller, Style::Plain)?;
	///
	/// let Some(Term::Const(sum)) = terms.pop() else { panic!("expected a constant") };
	/// assert_eq!(sum.val_as_int()?, 7);
	/// assert_eq!(sum.text(), "2 + 5");
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	pub fn eval(self, terms: &mut Vec<Term>, rng: &mut impl Roller, style: Style) -> Result<(), Error> {
		tracing::trace!(op = %self.symbol(), terms = terms.len(), "evaluating operator");

		let result = match self.class() {
			Class::Binary(arith) => {
				let right = self.pop(terms)?.eval(rng, style)?;
				let left = self.pop(terms)?.eval(rng, style)?;
				let val = arith.apply(left.val(), right.val())?;
				Term::Const(Evaled::new(val, format!("{} {} {}", left.text(), self.symbol(), right.text())))
			}

			Class::Ceil => {
				let operand = self.pop(terms)?.eval(rng, style)?;
				Term::Const(Evaled::new(operand.val().ceil(), format!("^{}", operand.text())))
			}

			Class::Dice => {
				let sides = self.pop(terms)?.eval_int(rng, style)?;
				let count = self.pop(terms)?.eval_int(rng, style)?;
				Term::Dice(Dice::new(count, sides))
			}

			Class::Modifier(modifier) => {
				let arg = self.pop(terms)?.eval_int(rng, style)?;
				let Term::Dice(mut dice) = self.pop(terms)? else {
					return Err(Error::NotDice { name: self.name() });
				};
				modifier.apply(&mut dice, arg);
				Term::Dice(dice)
			}

			Class::Paren => return Err(Error::MismatchedParenthesis),
		};

		terms.push(result);
		Ok(())
	}

	/// Pops a single operand from the term stack.
	fn pop(self, terms: &mut Vec<Term>) -> Result<Term, Error> {
		terms.pop().ok_or(Error::MissingOperand { op: self.symbol() })
	}

	/// Sorts the operator into the kind of evaluation it performs.
	const fn class(self) -> Class {
		match self {
			Self::Add => Class::Binary(Arith::Add),
			Self::Sub => Class::Binary(Arith::Sub),
			Self::Mul => Class::Binary(Arith::Mul),
			Self::Div => Class::Binary(Arith::Div),
			Self::CapLow => Class::Binary(Arith::CapLow),
			Self::CapHigh => Class::Binary(Arith::CapHigh),
			Self::Ceil => Class::Ceil,
			Self::Dice => Class::Dice,
			Self::Drop => Class::Modifier(DiceModifier::Drop),
			Self::Keep => Class::Modifier(DiceModifier::Keep { lowest: false }),
			Self::KeepLow => Class::Modifier(DiceModifier::Keep { lowest: true }),
			Self::Reroll => Class::Modifier(DiceModifier::Reroll { recurse: false }),
			Self::RerollRecurse => Class::Modifier(DiceModifier::Reroll { recurse: true }),
			Self::Explode => Class::Modifier(DiceModifier::Explode { recurse: false }),
			Self::ExplodeRecurse => Class::Modifier(DiceModifier::Explode { recurse: true }),
			Self::Success => Class::Modifier(DiceModifier::Success),
			Self::Failure => Class::Modifier(DiceModifier::Failure),
			Self::LeftParen | Self::RightParen => Class::Paren,
		}
	}
}

/// How an [`Op`] evaluates against the term stack
#[derive(Debug, Clone, Copy)]
enum Class {
	/// Two resolved operands combined into a constant
	Binary(Arith),

	/// Postfix ceiling of one resolved operand
	Ceil,

	/// Count and sides turned into unrolled dice
	Dice,

	/// Dice on the stack changed in place
	Modifier(DiceModifier),

	/// Grouping only, never evaluated
	Paren,
}

/// Arithmetic performed by binary operators
#[derive(Debug, Clone, Copy)]
enum Arith {
	/// `+`
	Add,

	/// `-`
	Sub,

	/// `*`
	Mul,

	/// `/`
	Div,

	/// `<`
	CapLow,

	/// `>`
	CapHigh,
}

impl Arith {
	/// Combines two operand values.
	fn apply(self, a: Decimal, b: Decimal) -> Result<Decimal, Error> {
		Ok(match self {
			Self::Add => a.checked_add(b).ok_or(Error::Arithmetic("addition overflowed"))?,
			Self::Sub => a.checked_sub(b).ok_or(Error::Arithmetic("subtraction overflowed"))?,
			Self::Mul => round_significant(a.checked_mul(b).ok_or(Error::Arithmetic("multiplication overflowed"))?),
			Self::Div => {
				if b.is_zero() {
					return Err(Error::Arithmetic("division by zero"));
				}
				round_significant(a.checked_div(b).ok_or(Error::Arithmetic("division overflowed"))?)
			}
			Self::CapLow => a.max(b),
			Self::CapHigh => a.min(b),
		})
	}
}

/// Changes made to dice by modifier operators
#[derive(Debug, Clone, Copy)]
enum DiceModifier {
	/// Drop the lowest dice
	Drop,

	/// Keep the highest (or lowest) dice
	Keep {
		/// Keep from the low end
		lowest: bool,
	},

	/// Reroll low dice
	Reroll {
		/// Keep rerolling replacements
		recurse: bool,
	},

	/// Explode high dice
	Explode {
		/// Let explosions explode
		recurse: bool,
	},

	/// Set the success threshold
	Success,

	/// Set the failure threshold
	Failure,
}

impl DiceModifier {
	/// Applies the modifier to dice with its argument.
	fn apply(self, dice: &mut Dice, arg: i32) {
		match self {
			Self::Drop => dice.drop = arg,
			Self::Keep { lowest } => {
				dice.keep = Some(arg);
				dice.keep_lowest = lowest;
			}
			Self::Reroll { recurse } => {
				dice.reroll_at = Some(arg);
				dice.reroll_recurse = recurse;
			}
			Self::Explode { recurse } => {
				dice.explode_at = Some(arg);
				dice.explode_recurse = recurse;
			}
			Self::Success => dice.totaling = dice.totaling.with_success(arg),
			Self::Failure => dice.totaling = dice.totaling.with_failure(arg),
		}
	}
}

/// Rounds a product or quotient to [`SIGNIFICANT_DIGITS`], with ties going to the even neighbor.
fn round_significant(val: Decimal) -> Decimal {
	val.round_sf_with_strategy(SIGNIFICANT_DIGITS, RoundingStrategy::MidpointNearestEven)
		.unwrap_or(val)
}

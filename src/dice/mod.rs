//! All functionality for configuring dice, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice resolution pipeline: roll → reroll → explode → drop → keep → total.
//! For using dice as part of a larger expression, see [`Term::Dice`].
//!
//! [`Term::Dice`]: crate::expr::Term::Dice

pub mod modifier;
pub mod roller;
pub mod totaling;

use alloc::{format, string::String, vec::Vec};
use core::{cmp, fmt};

pub use self::{modifier::Phase, roller::Roller, totaling::Totaling};
use crate::{expr::Evaled, Error};

/// Maximum number of dice (in either direction) that can be rolled by a single set of dice
pub const MAX_COUNT: i32 = 32;

/// Maximum number of sides a die can have
pub const MAX_SIDES: i32 = 1000;

/// Configuration for rolling a set of dice. Modifier operators change this in place while it sits on the
/// evaluator's stack, and it is only rolled once it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_structs)]
pub struct Dice {
	/// Number of dice to roll. A negative count rolls the absolute number of dice and negates the result.
	pub count: i32,

	/// Number of sides for each die. Dice with 0 sides always roll 0.
	pub sides: i32,

	/// Number of the lowest dice to discard
	pub drop: i32,

	/// Maximum number of dice to keep after dropping (`None` for no limit)
	pub keep: Option<i32>,

	/// Whether the lowest dice are the ones kept instead of the highest
	pub keep_lowest: bool,

	/// Dice with a value at or below this are rerolled
	pub reroll_at: Option<i32>,

	/// Whether rerolled dice that still qualify are rerolled again
	pub reroll_recurse: bool,

	/// Dice with a value at or above this cause an additional die to be rolled
	pub explode_at: Option<i32>,

	/// Whether additional dice from explosions can explode themselves
	pub explode_recurse: bool,

	/// Strategy for turning the final rolls into a single result
	pub totaling: Totaling,
}

impl Dice {
	/// Creates a new set of dice with a given count and number of sides, without any modifiers.
	#[must_use]
	pub const fn new(count: i32, sides: i32) -> Self {
		Self {
			count,
			sides,
			drop: 0,
			keep: None,
			keep_lowest: false,
			reroll_at: None,
			reroll_recurse: false,
			explode_at: None,
			explode_recurse: false,
			totaling: Totaling::Sum,
		}
	}

	/// Creates a new set of dice matching this one but without any modifiers.
	#[must_use]
	#[inline]
	pub const fn plain(&self) -> Self {
		Self::new(self.count, self.sides)
	}

	/// Creates a new dice builder.
	#[must_use]
	#[inline]
	pub fn builder() -> Builder {
		Builder::default()
	}

	/// Checks all of the fields against their bounds.
	///
	/// # Errors
	/// If any field is out of bounds, an error variant naming it is returned.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::{Dice, Error};
	///
	/// assert!(Dice::new(-32, 1000).validate().is_ok());
	/// assert!(matches!(Dice::new(33, 6).validate(), Err(Error::OutOfRange { field: "number of dice", .. })));
	/// assert!(matches!(Dice::new(2, 1001).validate(), Err(Error::OutOfRange { field: "number of sides", .. })));
	/// assert!(matches!(
	/// 	Dice::builder().count(2).sides(6).drop(-1).build().validate(),
	/// 	Err(Error::Negative { field: "number to drop", .. })
	/// ));
	/// ```
	pub fn validate(&self) -> Result<(), Error> {
		if !(-MAX_COUNT..=MAX_COUNT).contains(&self.count) {
			return Err(Error::OutOfRange {
				field: "number of dice",
				val: self.count,
				min: -MAX_COUNT,
				max: MAX_COUNT,
			});
		}

		if !(0..=MAX_SIDES).contains(&self.sides) {
			return Err(Error::OutOfRange {
				field: "number of sides",
				val: self.sides,
				min: 0,
				max: MAX_SIDES,
			});
		}

		if self.drop < 0 {
			return Err(Error::Negative {
				field: "number to drop",
				val: self.drop,
			});
		}

		match self.keep {
			Some(keep) if keep < 0 => Err(Error::Negative {
				field: "number to keep",
				val: keep,
			}),
			_ => Ok(()),
		}
	}

	/// Validates the dice, then rolls them and applies every phase of the pipeline except totaling.
	/// This is a shortcut for [`Roller::roll()`].
	///
	/// # Errors
	/// If the dice fail validation, an error variant is returned.
	#[inline]
	pub fn roll<'d>(&'d self, rng: &mut impl Roller) -> Result<Rolled<'d>, Error> {
		rng.roll(self)
	}

	/// Rolls the dice and totals the result, negating it if the dice count is negative.
	///
	/// # Errors
	/// If the dice fail validation, an error variant is returned.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{roller::Iter as IterRoller, Dice, Style};
	///
	/// // 4d6, dropping the lowest die
	/// let dice = Dice::builder().count(4).sides(6).drop(1).build();
	/// let evaled = dice.eval(&mut IterRoller::new([3, 6, 1, 4]), Style::Plain)?;
	/// assert_eq!(evaled.val_as_int()?, 13);
	/// assert_eq!(evaled.text(), "🎲(3 + 6 + ~~1~~ + 4)");
	///
	/// // -2d4
	/// let evaled = Dice::new(-2, 4).eval(&mut IterRoller::new([2, 3]), Style::Plain)?;
	/// assert_eq!(evaled.val_as_int()?, -5);
	/// assert_eq!(evaled.text(), "-🎲(2 + 3)");
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	pub fn eval(&self, rng: &mut impl Roller, style: Style) -> Result<Evaled, Error> {
		let rolled = self.roll(rng)?;
		let evaled = self.totaling.total(&rolled.rolls, style);
		tracing::debug!(dice = %self, rolls = rolled.rolls.len(), val = %evaled.val(), "resolved dice");

		Ok(if self.count < 0 { evaled.negated() } else { evaled })
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20).
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is the dice written back in expression syntax, so it can be evaluated again.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::Dice;
	///
	/// let dice = Dice::builder().count(4).sides(6).reroll(1, false).keep_high(3).build();
	/// assert_eq!(dice.to_string(), "4d6k3r1");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)?;
		if self.drop > 0 {
			write!(f, "x{}", self.drop)?;
		}
		if let Some(keep) = self.keep {
			write!(f, "{}{keep}", if self.keep_lowest { 'l' } else { 'k' })?;
		}
		if let Some(at) = self.reroll_at {
			write!(f, "{}{at}", if self.reroll_recurse { 'R' } else { 'r' })?;
		}
		if let Some(at) = self.explode_at {
			write!(f, "{}{at}", if self.explode_recurse { 'E' } else { 'e' })?;
		}
		if let Totaling::SuccessFailure { success_at, failure_at } = self.totaling {
			if success_at != i32::MAX {
				write!(f, "s{success_at}")?;
			}
			if failure_at != i32::MIN {
				write!(f, "f{failure_at}")?;
			}
		}
		Ok(())
	}
}

/// How individual die faces are written in result text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Style {
	/// Plain numbers
	#[default]
	Plain,

	/// Critical successes in bold (`**20**`) and critical failures underlined (`__1__`)
	Decorated,
}

/// Whether a die landed on one of its extreme faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Unlikely to change, no logical fallback")]
pub enum Status {
	/// Anything between the extremes
	Neutral,

	/// Rolled a 1
	CritFail,

	/// Rolled the highest face
	CritSuccess,
}

/// Single die produced from rolling [`Dice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct DieRoll {
	/// Value that was rolled
	pub val: u16,

	/// Whether the die has been excluded from the total (by dropping, keeping, or rerolling)
	pub discounted: bool,

	/// Whether the roll was critical
	pub status: Status,
}

impl DieRoll {
	/// Creates a new die roll with the given value, rolled on a die with the given number of sides.
	/// The status is determined from where the value sits between 1 and the number of sides.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{DieRoll, Status};
	///
	/// assert_eq!(DieRoll::new(20, 20).status, Status::CritSuccess);
	/// assert_eq!(DieRoll::new(1, 20).status, Status::CritFail);
	/// assert_eq!(DieRoll::new(12, 20).status, Status::Neutral);
	/// assert_eq!(DieRoll::new(0, 0).status, Status::Neutral);
	/// ```
	#[must_use]
	pub const fn new(val: u16, sides: u16) -> Self {
		let status = if sides > 0 && val == sides {
			Status::CritSuccess
		} else if val == 1 {
			Status::CritFail
		} else {
			Status::Neutral
		};

		Self {
			val,
			discounted: false,
			status,
		}
	}

	/// Indicates whether this die roll still counts towards the total.
	/// This is the direct inverse of [`DieRoll::discounted`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		!self.discounted
	}

	/// Renders the die's face in the given style, struck through if it has been discounted.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{DieRoll, Style};
	///
	/// let mut roll = DieRoll::new(20, 20);
	/// assert_eq!(roll.render(Style::Plain), "20");
	/// assert_eq!(roll.render(Style::Decorated), "**20**");
	///
	/// roll.discounted = true;
	/// assert_eq!(roll.render(Style::Decorated), "~~**20**~~");
	/// ```
	#[must_use]
	pub fn render(&self, style: Style) -> String {
		let face = match (style, self.status) {
			(Style::Decorated, Status::CritSuccess) => format!("**{}**", self.val),
			(Style::Decorated, Status::CritFail) => format!("__{}__", self.val),
			_ => format!("{}", self.val),
		};

		if self.discounted {
			format!("~~{face}~~")
		} else {
			face
		}
	}
}

impl PartialOrd for DieRoll {
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for DieRoll {
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		self.val.cmp(&other.val)
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to [`Self::render(Style::Plain)`].
	///
	/// [`Self::render(Style::Plain)`]: Self::render()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render(Style::Plain))
	}
}

/// Outcome set from rolling [`Dice`]: every die rolled so far, including the discounted ones, along with a running
/// count of the dice that still count towards the total.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct Rolled<'a> {
	/// Each individual die roll that was made, in the order they were rolled
	pub rolls: Vec<DieRoll>,

	/// Dice that were rolled to produce this
	pub dice: &'a Dice,

	/// Number of rolls that haven't been discounted
	kept: usize,
}

impl<'a> Rolled<'a> {
	/// Creates a new rolled set of dice from a given set of dice and an iterator of roll values.
	#[must_use]
	pub fn from_dice_and_rolls(dice: &'a Dice, rolls: impl IntoIterator<Item = u16>) -> Self {
		let sides = u16::try_from(dice.sides).unwrap_or(0);
		let mut rolled = Self::new(dice);
		for val in rolls {
			rolled.push(DieRoll::new(val, sides));
		}
		rolled
	}

	/// Creates an empty set of rolls for the given dice.
	#[must_use]
	pub(crate) const fn new(dice: &'a Dice) -> Self {
		Self {
			rolls: Vec::new(),
			dice,
			kept: 0,
		}
	}

	/// Adds a roll to the end of the set.
	pub fn push(&mut self, roll: DieRoll) {
		if roll.is_kept() {
			self.kept = self.kept.saturating_add(1);
		}
		self.rolls.push(roll);
	}

	/// Discounts the roll at the given index, if it isn't already.
	///
	/// # Panics
	/// Panics if the index is out of bounds.
	pub fn discount(&mut self, idx: usize) {
		let roll = &mut self.rolls[idx];
		if roll.is_kept() {
			roll.discounted = true;
			self.kept = self.kept.saturating_sub(1);
		}
	}

	/// Number of rolls that still count towards the total.
	#[must_use]
	#[inline]
	pub const fn kept(&self) -> usize {
		self.kept
	}

	/// Indices of the kept rolls, ordered by ascending value (ties keep their roll order).
	#[must_use]
	pub(crate) fn kept_ascending(&self) -> Vec<usize> {
		let mut indices = self
			.rolls
			.iter()
			.enumerate()
			.filter(|(_, roll)| roll.is_kept())
			.map(|(idx, _)| idx)
			.collect::<Vec<_>>();
		indices.sort_by_key(|&idx| self.rolls[idx].val);
		indices
	}

	/// Calculates the sum of all kept roll values.
	#[must_use]
	pub fn sum(&self) -> i64 {
		self.rolls
			.iter()
			.filter(|roll| roll.is_kept())
			.map(|roll| i64::from(roll.val))
			.sum()
	}
}

/// Builds [`Dice`] with a fluent interface.
///
/// # Examples
///
/// ## Basic dice
/// ```
/// use dicebot_roll::Dice;
///
/// let dice = Dice::builder().count(2).sides(6).build();
/// assert_eq!(dice, Dice::new(2, 6));
/// ```
///
/// ## Multiple modifiers
/// ```
/// use dicebot_roll::dice::{Dice, Totaling};
///
/// let dice = Dice::builder()
/// 	.count(6)
/// 	.sides(10)
/// 	.reroll(1, false)
/// 	.keep_high(4)
/// 	.success(8)
/// 	.build();
/// assert_eq!(dice.keep, Some(4));
/// assert_eq!(dice.reroll_at, Some(1));
/// assert_eq!(dice.totaling, Totaling::SuccessFailure { success_at: 8, failure_at: i32::MIN });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder(Dice);

impl Builder {
	/// Sets the number of dice to roll.
	#[must_use]
	pub const fn count(mut self, count: i32) -> Self {
		self.0.count = count;
		self
	}

	/// Sets the number of sides per die.
	#[must_use]
	pub const fn sides(mut self, sides: i32) -> Self {
		self.0.sides = sides;
		self
	}

	/// Sets the number of lowest dice to drop.
	#[must_use]
	pub const fn drop(mut self, count: i32) -> Self {
		self.0.drop = count;
		self
	}

	/// Keeps only the highest `count` dice.
	#[must_use]
	pub const fn keep_high(mut self, count: i32) -> Self {
		self.0.keep = Some(count);
		self.0.keep_lowest = false;
		self
	}

	/// Keeps only the lowest `count` dice.
	#[must_use]
	pub const fn keep_low(mut self, count: i32) -> Self {
		self.0.keep = Some(count);
		self.0.keep_lowest = true;
		self
	}

	/// Rerolls dice at or below a threshold, optionally until none are left at or below it.
	#[must_use]
	pub const fn reroll(mut self, at: i32, recurse: bool) -> Self {
		self.0.reroll_at = Some(at);
		self.0.reroll_recurse = recurse;
		self
	}

	/// Explodes dice at or above a threshold, optionally letting the additional dice explode as well.
	#[must_use]
	pub const fn explode(mut self, at: i32, recurse: bool) -> Self {
		self.0.explode_at = Some(at);
		self.0.explode_recurse = recurse;
		self
	}

	/// Counts dice at or above a threshold as successes.
	#[must_use]
	pub const fn success(mut self, at: i32) -> Self {
		self.0.totaling = self.0.totaling.with_success(at);
		self
	}

	/// Counts dice at or below a threshold as failures.
	#[must_use]
	pub const fn failure(mut self, at: i32) -> Self {
		self.0.totaling = self.0.totaling.with_failure(at);
		self
	}

	/// Finalizes the dice.
	#[must_use]
	pub fn build(self) -> Dice {
		self.0
	}
}

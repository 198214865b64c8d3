//! Strategies for turning a set of die rolls into a single result.

use alloc::{format, string::String, vec::Vec};

use rust_decimal::Decimal;

use super::{DieRoll, Style};
use crate::expr::Evaled;

/// Policy used to total the rolls of a set of dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Totaling {
	/// Adds up the values of all dice that haven't been discounted.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{DieRoll, Style, Totaling};
	///
	/// let mut dropped = DieRoll::new(2, 10);
	/// dropped.discounted = true;
	/// let rolls = [DieRoll::new(8, 10), dropped, DieRoll::new(10, 10)];
	///
	/// let evaled = Totaling::Sum.total(&rolls, Style::Plain);
	/// assert_eq!(evaled.val_as_int()?, 18);
	/// assert_eq!(evaled.text(), "🎲(8 + ~~2~~ + 10)");
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	#[default]
	Sum,

	/// Counts +1 for every die at or above `success_at` and -1 for every die at or below `failure_at`.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{DieRoll, Style, Totaling};
	///
	/// let rolls = [DieRoll::new(6, 6), DieRoll::new(3, 6), DieRoll::new(1, 6), DieRoll::new(5, 6)];
	/// let totaling = Totaling::Sum.with_success(5).with_failure(1);
	///
	/// let evaled = totaling.total(&rolls, Style::Plain);
	/// assert_eq!(evaled.val_as_int()?, 1);
	/// assert_eq!(evaled.text(), "🎲(+1 (6) + 0 (3) + -1 (1) + +1 (5))");
	/// # Ok::<(), dicebot_roll::Error>(())
	/// ```
	SuccessFailure {
		/// Dice at or above this count as a success
		success_at: i32,

		/// Dice at or below this count as a failure
		failure_at: i32,
	},
}

impl Totaling {
	/// Success/failure counting where nothing succeeds or fails until thresholds are set
	pub const SUCCESS_FAILURE: Self = Self::SuccessFailure {
		success_at: i32::MAX,
		failure_at: i32::MIN,
	};

	/// Switches to success/failure counting with the given success threshold, keeping any failure threshold that
	/// was already set.
	#[must_use]
	pub const fn with_success(self, at: i32) -> Self {
		match self {
			Self::SuccessFailure { failure_at, .. } => Self::SuccessFailure {
				success_at: at,
				failure_at,
			},
			Self::Sum => Self::SUCCESS_FAILURE.with_success(at),
		}
	}

	/// Switches to success/failure counting with the given failure threshold, keeping any success threshold that
	/// was already set.
	#[must_use]
	pub const fn with_failure(self, at: i32) -> Self {
		match self {
			Self::SuccessFailure { success_at, .. } => Self::SuccessFailure {
				success_at,
				failure_at: at,
			},
			Self::Sum => Self::SUCCESS_FAILURE.with_failure(at),
		}
	}

	/// Totals a full set of rolls (discounted ones included, for display).
	#[must_use]
	pub fn total(&self, rolls: &[DieRoll], style: Style) -> Evaled {
		match *self {
			Self::Sum => total_sum(rolls, style),
			Self::SuccessFailure { success_at, failure_at } => {
				total_success_failure(rolls, style, success_at, failure_at)
			}
		}
	}
}

/// Totals rolls with [`Totaling::Sum`].
fn total_sum(rolls: &[DieRoll], style: Style) -> Evaled {
	let val = rolls
		.iter()
		.filter(|roll| roll.is_kept())
		.map(|roll| Decimal::from(roll.val))
		.sum();
	let parts = rolls.iter().map(|roll| roll.render(style)).collect::<Vec<_>>();

	Evaled::new(val, dice_bracket(&parts))
}

/// Totals rolls with [`Totaling::SuccessFailure`].
fn total_success_failure(rolls: &[DieRoll], style: Style, success_at: i32, failure_at: i32) -> Evaled {
	let mut val = Decimal::ZERO;
	let mut parts = Vec::with_capacity(rolls.len());

	for roll in rolls {
		if roll.discounted {
			parts.push(roll.render(style));
			continue;
		}

		let face = i32::from(roll.val);
		let (delta, label) = if face >= success_at {
			(Decimal::ONE, "+1")
		} else if face <= failure_at {
			(Decimal::NEGATIVE_ONE, "-1")
		} else {
			(Decimal::ZERO, "0")
		};
		val += delta;
		parts.push(format!("{label} ({})", roll.render(style)));
	}

	Evaled::new(val, dice_bracket(&parts))
}

/// Joins rendered rolls into the dice bracket used by every totaling strategy.
fn dice_bracket(parts: &[String]) -> String {
	format!("🎲({})", parts.join(" + "))
}

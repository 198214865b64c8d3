//! Phases of the dice resolution pipeline that run between the initial roll and totaling.

use alloc::vec::Vec;

use super::{roller::Roller, Rolled};

/// Maximum number of rounds a recursive reroll or explosion runs before it is cut off
pub const MAX_ROUNDS: usize = 100;

/// Routines applied, in order, to a [`Rolled`] set of dice based on the configuration of its [`Dice`](super::Dice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "The pipeline is fixed")]
pub enum Phase {
	/// Discounts dice at or below the reroll threshold and rolls a replacement for each of them.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{modifier::Phase, roller::Iter as IterRoller, Dice, Rolled};
	///
	/// // 4d6r2, with 1 and 2 replaced by 5 and 1 (which isn't rerolled again)
	/// let dice = Dice::builder().count(4).sides(6).reroll(2, false).build();
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [3, 1, 6, 2]);
	/// Phase::Reroll.apply(&mut rolled, &mut IterRoller::new([5, 1]));
	///
	/// let discounted = rolled.rolls.iter().map(|roll| roll.discounted).collect::<Vec<_>>();
	/// assert_eq!(discounted, [false, true, false, true, false, false]);
	/// assert_eq!(rolled.sum(), 15);
	/// ```
	Reroll,

	/// Rolls an additional die for every die at or above the explosion threshold.
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{modifier::Phase, roller::Iter as IterRoller, Dice, Rolled};
	///
	/// // 3d6E6: the first explosion is a 6 as well, so it explodes again
	/// let dice = Dice::builder().count(3).sides(6).explode(6, true).build();
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [6, 2, 4]);
	/// Phase::Explode.apply(&mut rolled, &mut IterRoller::new([6, 3]));
	///
	/// assert_eq!(rolled.rolls.len(), 5);
	/// assert_eq!(rolled.sum(), 21);
	/// ```
	Explode,

	/// Discounts the lowest dice.
	Drop,

	/// Discounts dice past the keep limit, from the low end (keep highest) or the high end (keep lowest).
	///
	/// # Examples
	/// ```
	/// use dicebot_roll::dice::{modifier::Phase, roller::Max as MaxRoller, Dice, Rolled};
	///
	/// let dice = Dice::builder().count(4).sides(6).keep_low(2).build();
	/// let mut rolled = Rolled::from_dice_and_rolls(&dice, [3, 6, 1, 2]);
	/// Phase::Keep.apply(&mut rolled, &mut MaxRoller);
	/// assert_eq!(rolled.kept(), 2);
	/// assert_eq!(rolled.sum(), 3);
	/// ```
	Keep,
}

impl Phase {
	/// Every phase, in the order the pipeline runs them
	pub const ALL: [Self; 4] = [Self::Reroll, Self::Explode, Self::Drop, Self::Keep];

	/// Applies the phase to a set of rolls, using a given roller if additional die rolls are needed.
	/// Phases the dice aren't configured for leave the rolls untouched.
	pub fn apply(self, rolled: &mut Rolled, rng: &mut impl Roller) {
		let before = rolled.rolls.len();
		let kept = rolled.kept();

		match self {
			Self::Reroll => apply_reroll(rolled, rng),
			Self::Explode => apply_explode(rolled, rng),
			Self::Drop => apply_drop(rolled),
			Self::Keep => apply_keep(rolled),
		}

		if rolled.rolls.len() != before || rolled.kept() != kept {
			tracing::trace!(phase = ?self, rolls = rolled.rolls.len(), kept = rolled.kept(), "applied phase");
		}
	}
}

/// Applies the [`Phase::Reroll`] variant to a set of rolled dice.
fn apply_reroll(rolled: &mut Rolled, rng: &mut impl Roller) {
	let Some(at) = rolled.dice.reroll_at else {
		return;
	};
	let sides = die_sides(rolled);

	for _ in 0..MAX_ROUNDS {
		// Determine which rolls qualify for reroll
		let to_reroll = rolled
			.rolls
			.iter()
			.enumerate()
			.filter(|(_, roll)| roll.is_kept() && i32::from(roll.val) <= at)
			.map(|(idx, _)| idx)
			.collect::<Vec<_>>();

		if to_reroll.is_empty() {
			break;
		}

		// Drop the originals and roll their replacements
		for &idx in &to_reroll {
			rolled.discount(idx);
		}
		for _ in &to_reroll {
			rolled.push(rng.roll_die(sides));
		}

		if !rolled.dice.reroll_recurse {
			break;
		}
	}
}

/// Applies the [`Phase::Explode`] variant to a set of rolled dice.
fn apply_explode(rolled: &mut Rolled, rng: &mut impl Roller) {
	let Some(at) = rolled.dice.explode_at else {
		return;
	};
	let sides = die_sides(rolled);

	// Rolls before this index have already had their chance to explode
	let mut checked = 0;
	for _ in 0..MAX_ROUNDS {
		let end = rolled.rolls.len();
		let to_explode = rolled.rolls[checked..end]
			.iter()
			.filter(|roll| roll.is_kept() && i32::from(roll.val) >= at)
			.count();
		checked = end;

		if to_explode == 0 {
			break;
		}

		for _ in 0..to_explode {
			rolled.push(rng.roll_die(sides));
		}

		if !rolled.dice.explode_recurse {
			break;
		}
	}
}

/// Applies the [`Phase::Drop`] variant to a set of rolled dice.
fn apply_drop(rolled: &mut Rolled) {
	let count = usize::try_from(rolled.dice.drop).unwrap_or(0);
	if count == 0 {
		return;
	}

	for idx in rolled.kept_ascending().into_iter().take(count) {
		rolled.discount(idx);
	}
}

/// Applies the [`Phase::Keep`] variant to a set of rolled dice.
fn apply_keep(rolled: &mut Rolled) {
	let Some(keep) = rolled.dice.keep else {
		return;
	};
	let keep = usize::try_from(keep).unwrap_or(0);
	let excess = rolled.kept().saturating_sub(keep);
	if excess == 0 {
		return;
	}

	let mut order = rolled.kept_ascending();
	if rolled.dice.keep_lowest {
		order.reverse();
	}
	for idx in order.into_iter().take(excess) {
		rolled.discount(idx);
	}
}

/// Gets the number of sides of the dice being rolled, as the roller expects them.
fn die_sides(rolled: &Rolled) -> u16 {
	u16::try_from(rolled.dice.sides).unwrap_or(0)
}

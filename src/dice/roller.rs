//! Abstractions for rolling [`DieRoll`]s using various means.

use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{Dice, DieRoll, Phase, Rolled};
use crate::Error;

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single die. Dice with 0 sides must always roll 0.
	#[must_use]
	fn roll_die(&mut self, sides: u16) -> DieRoll;

	/// Validates a set of dice, rolls them, and applies every phase of the pipeline (reroll, explode, drop, keep)
	/// to the resulting rolls. The rolls are left untotaled.
	///
	/// # Errors
	/// If the dice fail validation, an error variant is returned.
	fn roll<'d>(&mut self, dice: &'d Dice) -> Result<Rolled<'d>, Error>
	where
		Self: Sized,
	{
		dice.validate()?;
		let sides = u16::try_from(dice.sides).map_err(|_err| Error::OutOfRange {
			field: "number of sides",
			val: dice.sides,
			min: 0,
			max: super::MAX_SIDES,
		})?;

		// Roll the dice!
		let mut rolled = Rolled::new(dice);
		for _ in 0..dice.count.unsigned_abs() {
			rolled.push(self.roll_die(sides));
		}

		for phase in Phase::ALL {
			phase.apply(&mut rolled, self);
		}

		Ok(rolled)
	}
}

impl<R: Roller> Roller for &mut R {
	#[inline]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		(**self).roll_die(sides)
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use dicebot_roll::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let mut roller = FastRandRoller::default();
///
/// let dice = Dice::new(4, 6);
/// let _ = roller.roll(&dice)?;
/// let _ = roller.roll(&dice)?;
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use dicebot_roll::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let dice = Dice::new(4, 6);
/// let first = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// let second = FastRandRoller::with_seed(0x750c38d574400).roll(&dice)?;
/// assert_eq!(first, second);
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "std", derive(Default))]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		if sides > 0 {
			DieRoll::new(self.0.u16(1..=sides), sides)
		} else {
			DieRoll::new(0, 0)
		}
	}
}

/// Generates rolls that always have a specific value.
///
/// # Examples
/// ```
/// use dicebot_roll::dice::{roller::{Roller, Val as ValRoller}, Dice};
///
/// let mut roller = ValRoller(3);
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 3));
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u16);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		DieRoll::new(self.0, sides)
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use dicebot_roll::dice::{roller::{Max as MaxRoller, Roller}, Dice};
///
/// let mut roller = MaxRoller;
///
/// let dice = Dice::new(4, 6);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 6));
///
/// let dice = Dice::new(2, 20);
/// let rolled = roller.roll(&dice)?;
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 20));
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of sides).
	#[inline]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		DieRoll::new(sides, sides)
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use dicebot_roll::dice::{roller::{Iter as IterRoller, Roller}, Dice};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3, 4, 10]);
/// let dice = Dice::new(5, 10);
/// let vals = roller.roll(&dice)?.rolls.iter().map(|roll| roll.val).collect::<Vec<_>>();
/// assert_eq!(vals, vec![1, 2, 3, 4, 10]);
/// assert!(!roller.can_roll());
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u16>>(Peekable<I>);

impl<I: Iterator<Item = u16>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u16>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		DieRoll::new(self.0.next().expect("iterator is finished"), sides)
	}
}

/// Counts how many dice a roller has been asked to roll, passing the rolls through from another roller.
///
/// # Examples
/// ```
/// use dicebot_roll::dice::{roller::{Counting, Max as MaxRoller, Roller}, Dice};
///
/// let mut roller = Counting::new(MaxRoller);
/// let _ = roller.roll(&Dice::new(3, 8))?;
/// assert_eq!(roller.count(), 3);
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct Counting<R: Roller> {
	/// Roller producing the actual rolls
	inner: R,

	/// Number of dice rolled so far
	count: usize,
}

impl<R: Roller> Counting<R> {
	/// Creates a new counting roller around another roller.
	#[must_use]
	#[inline]
	pub const fn new(inner: R) -> Self {
		Self { inner, count: 0 }
	}

	/// Gets the number of dice rolled so far.
	#[must_use]
	#[inline]
	pub const fn count(&self) -> usize {
		self.count
	}
}

impl<R: Roller> Roller for Counting<R> {
	#[inline]
	fn roll_die(&mut self, sides: u16) -> DieRoll {
		self.count = self.count.saturating_add(1);
		self.inner.roll_die(sides)
	}
}

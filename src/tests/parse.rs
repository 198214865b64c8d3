use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::{
	dice::{
		roller::{Counting, FastRand, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
		Style,
	},
	parse::{evaluate, evaluate_styled},
	Error,
};

#[test]
fn basic_arithmetic() {
	assert_eq!(int("3 + 9"), 12);
	assert_eq!(int("9 + -3"), 6);
	assert_eq!(int("3 - -2"), 5);
	assert_eq!(int("-4 * 2"), -8);
	assert_eq!(evaluate("+7", &mut MaxRoller).unwrap().text(), "+7");
}

#[test]
fn precedence_and_associativity() {
	assert_eq!(int("2+3*4"), 14);
	assert_eq!(int("2*3+4"), 10);
	assert_eq!(int("10-2-3"), 5);
	assert_eq!(int("12/2/3"), 2);
	assert_eq!(int("(1+2)*3"), 9);
	assert_eq!(int("((2))"), 2);
}

#[test]
fn decimals() {
	let evaled = evaluate("1.5 * 3", &mut MaxRoller).unwrap();
	assert_eq!(evaled.val(), Decimal::new(45, 1));
	assert_eq!(evaled.display_val(), "4.5");
	assert_eq!(evaled.text(), "1.5 * 3");

	assert_eq!(evaluate("10 / 3", &mut MaxRoller).unwrap().display_val(), "3.333");
}

#[test]
fn ceiling_after_group() {
	let evaled = evaluate("(7/2)^", &mut MaxRoller).unwrap();
	assert_eq!(evaled.val(), Decimal::from(4));
	assert_eq!(evaled.text(), "^7 / 2");

	assert_eq!(int("(7/2)^ + 1"), 5);
}

#[test]
fn caps_apply_to_rolled_dice() {
	let evaled = evaluate("1d20<5", &mut ValRoller(3)).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 5);
	assert_eq!(evaled.text(), "🎲(3) < 5");

	assert_eq!(int("2d6>10"), 10);
	assert_eq!(int("2d6<10"), 12);
}

#[test]
fn dice_without_count() {
	let evaled = evaluate("d6", &mut MaxRoller).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 6);
	assert_eq!(evaled.text(), "🎲(6)");

	assert_eq!(int("2 + d4"), 6);
	assert_eq!(int("(d4)d6"), 24);
}

#[test]
fn negative_dice_count() {
	let evaled = evaluate("-2d6", &mut MaxRoller).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), -12);
	assert_eq!(evaled.text(), "-🎲(6 + 6)");
}

#[test]
fn modifiers() {
	let mut rng = IterRoller::new([3, 6, 1, 4]);
	let evaled = evaluate("4d6x1 + 2", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 15);
	assert_eq!(evaled.text(), "🎲(3 + 6 + ~~1~~ + 4) + 2");

	let mut rng = IterRoller::new([17, 4]);
	let evaled = evaluate("2d20l1", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 4);
	assert_eq!(evaled.text(), "🎲(~~17~~ + 4)");

	let mut rng = IterRoller::new([1, 5, 1, 1, 3]);
	let evaled = evaluate("2d6R1", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 8);
	assert_eq!(evaled.text(), "🎲(~~1~~ + 5 + ~~1~~ + ~~1~~ + 3)");

	let mut rng = IterRoller::new([6, 2, 6, 6, 1]);
	let evaled = evaluate("2d6E6", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 21);
	assert_eq!(evaled.text(), "🎲(6 + 2 + 6 + 6 + 1)");
}

#[test]
fn rolled_count_with_successes() {
	let mut rng = IterRoller::new([1, 2, 5, 6, 2]);
	let evaled = evaluate("(2d4)d6s5", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 2);
	assert_eq!(evaled.text(), "🎲(+1 (5) + +1 (6) + 0 (2))");
	assert!(!rng.can_roll());
}

#[test]
fn successes_and_failures() {
	let mut rng = IterRoller::new([9, 1, 5, 10, 8, 2]);
	let evaled = evaluate("6d10s8f2", &mut rng).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 1);
	assert_eq!(
		evaled.text(),
		"🎲(+1 (9) + -1 (1) + 0 (5) + +1 (10) + +1 (8) + -1 (2))"
	);
}

#[test]
fn decorated_style() {
	let mut rng = IterRoller::new([20, 7, 1]);
	let evaled = evaluate_styled("3d20 + 1", &mut rng, Style::Decorated).unwrap();
	assert_eq!(evaled.text(), "🎲(**20** + 7 + __1__) + 1");

	let mut rng = IterRoller::new([20, 1]);
	let evaled = evaluate_styled("2d20k1", &mut rng, Style::Decorated).unwrap();
	assert_eq!(evaled.text(), "🎲(**20** + ~~__1__~~)");
}

#[test]
fn complex_expression_is_bounded() {
	for seed in 0..200 {
		let mut rng = FastRand::with_seed(seed);
		let evaled = evaluate("(2*d20)/(2d20)+7d4+3", &mut rng).unwrap();
		assert!(evaled.val() >= Decimal::from(3), "seed {seed} gave {evaled:?}");
	}
}

#[test]
fn malformed_expressions_roll_nothing() {
	for input in ["3 3 +", "+ + +", "one", "d * 2", "2d6 +", "2d6 )", "(2d6", "", "  "] {
		let mut rng = Counting::new(MaxRoller);
		assert!(evaluate(input, &mut rng).is_err(), "{input:?} should fail");
		assert_eq!(rng.count(), 0, "{input:?} rolled dice");
	}
}

#[test]
fn malformed_expression_errors() {
	assert_eq!(err("3 3 +"), Error::MismatchedOperations);
	assert_eq!(err("3 3"), Error::MismatchedOperations);
	assert_eq!(err(""), Error::MismatchedOperations);
	assert_eq!(err("(1+2"), Error::MismatchedParenthesis);
	assert_eq!(err("1+2)"), Error::MismatchedParenthesis);
	assert_eq!(err("d * 2"), Error::MissingOperand { op: 'd' });
	assert_eq!(
		err("+ + +"),
		Error::InvalidNumber {
			literal: "+".into(),
			span: 0..1,
		}
	);
}

#[test]
fn error_spans() {
	let error = err("one");
	assert_eq!(
		error,
		Error::UnknownOperator {
			symbol: 'o',
			span: 0..1,
		}
	);
	assert_eq!(error.to_string(), "unknown operator: o");

	let error = err("1.2.3");
	assert_eq!(error.span(), Some(3..4));

	// Spans are byte offsets
	let error = err("🎲 + 1");
	assert_eq!(error.span(), Some(0..4));

	assert_eq!(err("(1+2").span(), None);
}

#[test]
fn evaluation_errors() {
	assert_eq!(err("1/0"), Error::Arithmetic("division by zero"));
	assert_eq!(err("3k1").to_string(), "keep can only be used on dice expressions");
	assert!(matches!(err("99999999999d6"), Error::IntOverflow(..)));
	assert_eq!(
		err("40d6"),
		Error::OutOfRange {
			field: "number of dice",
			val: 40,
			min: -32,
			max: 32,
		}
	);
	assert_eq!(
		err("2d1001").to_string(),
		"number of sides must be between 0 and 1000 (got 1001)"
	);
	assert!(matches!(err("4d6k-1"), Error::Negative { field: "number to keep", val: -1 }));
}

#[test]
fn values_past_the_decimal_range_are_rejected() {
	assert_eq!(
		err("100000 * 100000 * 100000 * 100000 * 100000 * 100000"),
		Error::Arithmetic("multiplication overflowed")
	);

	let literal = "12345678901234567890123456789012";
	assert_eq!(
		err(literal),
		Error::InvalidNumber {
			literal: literal.into(),
			span: 0..32,
		}
	);

	assert_eq!(int("100000 * 100000 * 100000 * 100000 * 100000 / 100000 / 100000 / 100000 / 100000"), 100_000);
}

#[test]
fn whitespace_is_ignored() {
	let mut spaced = IterRoller::new([2, 5]);
	let mut dense = IterRoller::new([2, 5]);
	assert_eq!(
		evaluate(" 2 d 6 + 1 ", &mut spaced).unwrap(),
		evaluate("2d6+1", &mut dense).unwrap()
	);
}

proptest! {
	#[test]
	fn text_shape_does_not_depend_on_rolls(seed in any::<u64>()) {
		let evaled = evaluate("4d6x1 + 2", &mut FastRand::with_seed(seed)).unwrap();
		let shape = evaled.text().chars().filter(|c| !c.is_ascii_digit() && *c != '~').collect::<String>();
		prop_assert_eq!(shape, "🎲( +  +  + ) + ");
		prop_assert_eq!(evaled.text().matches("~~").count(), 2);
		prop_assert!((5..=20).contains(&evaled.val_as_int().unwrap()));
	}

	#[test]
	fn sum_of_plain_dice_is_in_range(count in 1..=32_i32, sides in 1..=100_i32, seed in any::<u64>()) {
		let input = format!("{count}d{sides}");
		let val = evaluate(&input, &mut FastRand::with_seed(seed)).unwrap().val_as_int().unwrap();
		prop_assert!((count..=count * sides).contains(&val));
	}
}

fn int(input: &str) -> i32 {
	evaluate(input, &mut MaxRoller).unwrap().val_as_int().unwrap()
}

fn err(input: &str) -> Error {
	evaluate(input, &mut MaxRoller).unwrap_err()
}

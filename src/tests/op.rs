use core::str::FromStr;

use rust_decimal::Decimal;

use crate::{
	dice::{
		roller::{Counting, Max as MaxRoller},
		Dice, Style, Totaling,
	},
	expr::{Evaled, Term},
	op::Op,
	Error,
};

#[test]
fn symbols_round_trip() {
	for op in Op::ALL {
		assert_eq!(Op::from_symbol(op.symbol()), Some(op));
	}
	assert_eq!(Op::from_symbol('D'), None);
	assert_eq!(Op::from_symbol('.'), None);
}

#[test]
fn precedence_table() {
	assert_eq!(Op::Add.precedence(), 10);
	assert_eq!(Op::Sub.precedence(), 10);
	assert_eq!(Op::Mul.precedence(), 8);
	assert_eq!(Op::Div.precedence(), 8);
	assert_eq!(Op::Ceil.precedence(), 6);
	assert_eq!(Op::CapLow.precedence(), 6);
	assert_eq!(Op::CapHigh.precedence(), 6);
	for op in [Op::Dice, Op::Drop, Op::Keep, Op::KeepLow, Op::Reroll, Op::RerollRecurse] {
		assert_eq!(op.precedence(), 4);
	}
	for op in [Op::Explode, Op::ExplodeRecurse, Op::Success, Op::Failure] {
		assert_eq!(op.precedence(), 4);
	}
	assert_eq!(Op::LeftParen.precedence(), 0);
	assert_eq!(Op::RightParen.precedence(), 0);
}

#[test]
fn only_postfix_ops_and_right_paren_are_followed_by_ops() {
	for op in Op::ALL {
		assert_eq!(op.expects_term_after(), !matches!(op, Op::Ceil | Op::RightParen));
	}
	assert_eq!(Op::Dice.implicit_left_term(), Some(Term::from(1)));
	assert_eq!(Op::Keep.implicit_left_term(), None);
}

#[test]
fn add_formats_left_operand_first() {
	let evaled = eval_binary(Op::Add, 2, 5).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 7);
	assert_eq!(evaled.text(), "2 + 5");
}

#[test]
fn subtraction_is_not_reversed() {
	let evaled = eval_binary(Op::Sub, 9, 3).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 6);
	assert_eq!(evaled.text(), "9 - 3");
}

#[test]
fn multiplication_keeps_four_significant_digits() {
	assert_eq!(eval_binary(Op::Mul, 7, 3).unwrap().val(), Decimal::from(21));
	assert_eq!(eval_binary(Op::Mul, 1234, 5).unwrap().val(), Decimal::from(6170));

	// Ties go to the even neighbor
	let tie = eval_decimals(Op::Mul, "1.2345", "1").unwrap();
	assert_eq!(tie.val(), dec("1.234"));
	let tie = eval_decimals(Op::Mul, "1.2355", "1").unwrap();
	assert_eq!(tie.val(), dec("1.236"));
}

#[test]
fn division_keeps_four_significant_digits() {
	assert_eq!(eval_binary(Op::Div, 2, 3).unwrap().val(), dec("0.6667"));
	assert_eq!(eval_binary(Op::Div, 1, 8).unwrap().val(), dec("0.125"));
	assert_eq!(eval_binary(Op::Div, 10, 4).unwrap().val(), dec("2.5"));
}

#[test]
fn division_by_zero() {
	let err = eval_binary(Op::Div, 3, 0).unwrap_err();
	assert_eq!(err, Error::Arithmetic("division by zero"));
	assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn products_past_the_decimal_range_overflow() {
	let err = eval_decimals(Op::Mul, "100000000000000000000000000", "1000").unwrap_err();
	assert_eq!(err, Error::Arithmetic("multiplication overflowed"));

	let err = eval_decimals(Op::Add, "79228162514264337593543950335", "1").unwrap_err();
	assert_eq!(err, Error::Arithmetic("addition overflowed"));

	// Just under the limit is still fine
	let evaled = eval_decimals(Op::Mul, "10000000000000000000000000", "1000").unwrap();
	assert_eq!(evaled.val(), dec("10000000000000000000000000000"));
}

#[test]
fn caps() {
	let evaled = eval_binary(Op::CapLow, 2, 5).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 5);
	assert_eq!(evaled.text(), "2 < 5");
	assert_eq!(eval_binary(Op::CapLow, 7, 5).unwrap().val_as_int().unwrap(), 7);

	let evaled = eval_binary(Op::CapHigh, 7, 5).unwrap();
	assert_eq!(evaled.val_as_int().unwrap(), 5);
	assert_eq!(evaled.text(), "7 > 5");
	assert_eq!(eval_binary(Op::CapHigh, 2, 5).unwrap().val_as_int().unwrap(), 2);
}

#[test]
fn ceil() {
	let mut terms = vec![Term::Const(Evaled::new(dec("3.2"), "3.2"))];
	Op::Ceil.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	let evaled = single_const(terms);
	assert_eq!(evaled.val(), Decimal::from(4));
	assert_eq!(evaled.text(), "^3.2");

	let mut terms = vec![Term::Const(Evaled::new(dec("-3.5"), "-3.5"))];
	Op::Ceil.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	assert_eq!(single_const(terms).val(), Decimal::from(-3));
}

#[test]
fn dice_op_builds_unrolled_dice() {
	let mut rng = Counting::new(MaxRoller);
	let mut terms = vec![Term::from(3), Term::from(8)];
	Op::Dice.eval(&mut terms, &mut rng, Style::Plain).unwrap();
	assert_eq!(terms, [Term::Dice(Dice::new(3, 8))]);
	assert_eq!(rng.count(), 0);
}

#[test]
fn dice_op_rolls_dice_operands() {
	// (2d4)d6: the count is rolled right away
	let mut rng = Counting::new(MaxRoller);
	let mut terms = vec![Term::Dice(Dice::new(2, 4)), Term::from(6)];
	Op::Dice.eval(&mut terms, &mut rng, Style::Plain).unwrap();
	assert_eq!(terms, [Term::Dice(Dice::new(8, 6))]);
	assert_eq!(rng.count(), 2);
}

#[test]
fn modifiers_change_dice_in_place() {
	let mut terms = vec![Term::Dice(Dice::new(6, 10))];
	for (op, arg) in [(Op::Drop, 1), (Op::KeepLow, 3), (Op::RerollRecurse, 2), (Op::Explode, 10)] {
		terms.push(Term::from(arg));
		op.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	}

	let expected = Dice::builder()
		.count(6)
		.sides(10)
		.drop(1)
		.keep_low(3)
		.reroll(2, true)
		.explode(10, false)
		.build();
	assert_eq!(terms, [Term::Dice(expected)]);
}

#[test]
fn later_modifiers_override_earlier_ones() {
	let mut terms = vec![Term::Dice(Dice::new(4, 6))];
	for (op, arg) in [(Op::KeepLow, 1), (Op::Keep, 2), (Op::Explode, 6), (Op::ExplodeRecurse, 5)] {
		terms.push(Term::from(arg));
		op.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	}

	let Some(Term::Dice(dice)) = terms.pop() else {
		panic!("expected dice on the stack");
	};
	assert_eq!(dice.keep, Some(2));
	assert!(!dice.keep_lowest);
	assert_eq!(dice.explode_at, Some(5));
	assert!(dice.explode_recurse);
}

#[test]
fn success_and_failure_keep_each_other() {
	let mut terms = vec![Term::Dice(Dice::new(6, 10))];
	for (op, arg) in [(Op::Failure, 1), (Op::Success, 8), (Op::Success, 9)] {
		terms.push(Term::from(arg));
		op.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	}

	let Some(Term::Dice(dice)) = terms.pop() else {
		panic!("expected dice on the stack");
	};
	assert_eq!(
		dice.totaling,
		Totaling::SuccessFailure {
			success_at: 9,
			failure_at: 1
		}
	);
}

#[test]
fn modifiers_require_dice() {
	for op in [Op::Keep, Op::Success, Op::ExplodeRecurse] {
		let mut terms = vec![Term::from(4), Term::from(2)];
		let err = op.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap_err();
		assert_eq!(err, Error::NotDice { name: op.name() });
	}

	let err = eval_binary(Op::Keep, 4, 2).unwrap_err();
	assert_eq!(err.to_string(), "keep can only be used on dice expressions");
}

#[test]
fn missing_operands() {
	let mut terms = vec![Term::from(4)];
	let err = Op::Mul.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap_err();
	assert_eq!(err, Error::MissingOperand { op: '*' });

	let mut terms = Vec::new();
	let err = Op::Ceil.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap_err();
	assert_eq!(err, Error::MissingOperand { op: '^' });
}

#[test]
fn every_operator_evaluates_to_a_result() {
	for op in Op::ALL {
		let mut terms = vec![Term::Dice(Dice::new(2, 6)), Term::from(3)];
		let result = op.eval(&mut terms, &mut MaxRoller, Style::Plain);
		match op {
			Op::LeftParen | Op::RightParen => assert_eq!(result, Err(Error::MismatchedParenthesis)),
			Op::Ceil => {
				result.unwrap();
				assert_eq!(terms.len(), 2);
			}
			_ => {
				result.unwrap();
				assert_eq!(terms.len(), 1, "{op:?}");
			}
		}
	}
}

#[test]
fn parentheses_do_not_evaluate() {
	for op in [Op::LeftParen, Op::RightParen] {
		let mut terms = vec![Term::from(1), Term::from(2)];
		let err = op.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap_err();
		assert_eq!(err, Error::MismatchedParenthesis);
		assert_eq!(terms.len(), 2);
	}
}

#[test]
fn binary_ops_resolve_dice_operands() {
	let mut terms = vec![Term::Dice(Dice::new(2, 6)), Term::from(3)];
	Op::Add.eval(&mut terms, &mut MaxRoller, Style::Plain).unwrap();
	let evaled = single_const(terms);
	assert_eq!(evaled.val_as_int().unwrap(), 15);
	assert_eq!(evaled.text(), "🎲(6 + 6) + 3");
}

fn eval_binary(op: Op, left: i32, right: i32) -> Result<Evaled, Error> {
	let mut terms = vec![Term::from(left), Term::from(right)];
	op.eval(&mut terms, &mut MaxRoller, Style::Plain)?;
	Ok(single_const(terms))
}

fn eval_decimals(op: Op, left: &str, right: &str) -> Result<Evaled, Error> {
	let mut terms = vec![
		Term::Const(Evaled::new(dec(left), left)),
		Term::Const(Evaled::new(dec(right), right)),
	];
	op.eval(&mut terms, &mut MaxRoller, Style::Plain)?;
	Ok(single_const(terms))
}

fn single_const(mut terms: Vec<Term>) -> Evaled {
	assert_eq!(terms.len(), 1);
	match terms.pop() {
		Some(Term::Const(evaled)) => evaled,
		other => panic!("expected a single constant, got {other:?}"),
	}
}

fn dec(text: &str) -> Decimal {
	Decimal::from_str(text).unwrap()
}

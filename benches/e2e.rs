#![feature(test)]

extern crate test;

use test::Bencher;

use dicebot_roll::{dice::roller::FastRand, evaluate};

const LONG_EXPR: &str = "(2d4)d6s5 + 4d6x1 * (3d10k2 - 6 / 2)^ + 2d20l1 < 5 + 8d6R1E6 - -3 + (7/2)^ * d20 > 15";

#[bench]
fn e2e_basic(b: &mut Bencher) {
	let mut rng = FastRand::default();
	b.iter(|| evaluate("4d8 + 4", &mut rng).unwrap());
}

#[bench]
fn e2e_complex(b: &mut Bencher) {
	let mut rng = FastRand::default();
	b.iter(|| evaluate("4d8e8 + 2d10 * (-3d6 - 6 / 2)^", &mut rng).unwrap());
}

#[bench]
fn e2e_long(b: &mut Bencher) {
	let mut rng = FastRand::default();
	b.iter(|| evaluate(LONG_EXPR, &mut rng).unwrap());
}

//! Operator-precedence evaluation of dice expressions, using a stack of terms and a stack of pending operators.

use alloc::vec::Vec;

use crate::{
	dice::{Roller, Style},
	expr::{Evaled, Term},
	op::Op,
	Error,
};

/// Evaluates a dice expression as its terms and operators are pushed in, reducing pending operators whenever
/// precedence allows. Rolls made while reducing (e.g. the count of `(2d4)d6`) and the final resolution both use the
/// evaluator's roller.
///
/// # Examples
/// ```
/// use dicebot_roll::{dice::roller::Max as MaxRoller, eval::Evaluator, expr::Term, op::Op};
///
/// // 2 + 3 * 4
/// let mut rng = MaxRoller;
/// let mut evaluator = Evaluator::new(&mut rng);
/// evaluator.push_term(Term::from(2));
/// evaluator.push_op(Op::Add)?;
/// evaluator.push_term(Term::from(3));
/// evaluator.push_op(Op::Mul)?;
/// evaluator.push_term(Term::from(4));
///
/// let evaled = evaluator.finish()?;
/// assert_eq!(evaled.val_as_int()?, 14);
/// assert_eq!(evaled.text(), "2 + 3 * 4");
/// # Ok::<(), dicebot_roll::Error>(())
/// ```
#[derive(Debug)]
pub struct Evaluator<'r, R: Roller> {
	/// Operands, with the most recently pushed on top
	terms: Vec<Term>,

	/// Operators waiting for their operands
	ops: Vec<Op>,

	/// Whether the next token should be a term rather than an operator
	expecting_term: bool,

	/// Source of die rolls
	rng: &'r mut R,

	/// How die faces are written in result text
	style: Style,
}

impl<'r, R: Roller> Evaluator<'r, R> {
	/// Creates a new evaluator that rolls with the given roller and writes plain die faces.
	#[must_use]
	pub fn new(rng: &'r mut R) -> Self {
		Self {
			terms: Vec::new(),
			ops: Vec::new(),
			expecting_term: true,
			rng,
			style: Style::Plain,
		}
	}

	/// Sets the style die faces are written in.
	#[must_use]
	pub fn with_style(mut self, style: Style) -> Self {
		self.style = style;
		self
	}

	/// Whether the next token should be a term. This is true at the start of an expression and after most
	/// operators, which is what lets a `+` or `-` there be read as the sign of a number.
	#[must_use]
	#[inline]
	pub const fn is_expecting_term(&self) -> bool {
		self.expecting_term
	}

	/// Pushes a term onto the term stack.
	pub fn push_term(&mut self, term: Term) {
		self.terms.push(term);
		self.expecting_term = false;
	}

	/// Pushes an operator, first evaluating any pending operators that bind at least as tightly.
	///
	/// # Errors
	/// If evaluating a pending operator fails or a closing parenthesis has no match, an error variant is returned.
	pub fn push_op(&mut self, op: Op) -> Result<(), Error> {
		if self.expecting_term {
			if let Some(term) = op.implicit_left_term() {
				self.terms.push(term);
			}
		}

		match op {
			Op::LeftParen => {
				self.ops.push(op);
				self.expecting_term = true;
			}

			Op::RightParen => {
				loop {
					match self.ops.pop() {
						Some(Op::LeftParen) => break,
						Some(pending) => self.reduce(pending)?,
						None => return Err(Error::MismatchedParenthesis),
					}
				}
				self.expecting_term = op.expects_term_after();
			}

			_ => {
				while let Some(&top) = self.ops.last() {
					if top == Op::LeftParen || top.precedence() > op.precedence() {
						break;
					}
					self.ops.pop();
					self.reduce(top)?;
				}
				self.ops.push(op);
				self.expecting_term = op.expects_term_after();
			}
		}

		Ok(())
	}

	/// Evaluates all pending operators and resolves the single remaining term.
	///
	/// # Errors
	/// If the expression doesn't reduce to exactly one term, has unclosed parentheses, or ends with an operator that
	/// is still waiting for a term, or if evaluation fails, an error variant is returned.
	pub fn finish(mut self) -> Result<Evaled, Error> {
		if self.expecting_term {
			return Err(Error::MismatchedOperations);
		}

		while let Some(op) = self.ops.pop() {
			if op == Op::LeftParen {
				return Err(Error::MismatchedParenthesis);
			}
			self.reduce(op)?;
		}

		let term = match (self.terms.pop(), self.terms.is_empty()) {
			(Some(term), true) => term,
			_ => return Err(Error::MismatchedOperations),
		};

		term.eval(&mut *self.rng, self.style)
	}

	/// Evaluates a single operator against the term stack.
	fn reduce(&mut self, op: Op) -> Result<(), Error> {
		op.eval(&mut self.terms, &mut *self.rng, self.style)
	}
}

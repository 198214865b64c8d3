use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Label, Report, ReportKind, Source};
use dicebot_roll::{
	dice::{roller::FastRand, Style},
	parse::evaluate_styled,
};

fn main() -> ExitCode {
	let mut args = env::args().skip(1).peekable();
	let style = if args.peek().is_some_and(|arg| arg == "--decorated") {
		args.next();
		Style::Decorated
	} else {
		Style::Plain
	};

	// Obtain the expression by combining all args passed to the executable, so that it can be left unquoted even
	// with spaces. When there are none, the first line of stdin is used instead.
	let args = args.collect::<Vec<String>>();
	let input = if args.is_empty() {
		match read_line() {
			Ok(line) => line,
			Err(err) => {
				eprintln!("Unable to read expression: {err}");
				return ExitCode::FAILURE;
			}
		}
	} else {
		args.join(" ")
	};

	match evaluate_styled(&input, &mut FastRand::default(), style) {
		Ok(evaled) => {
			println!("{evaled}");
			println!("= {}", evaled.display_val());
			ExitCode::SUCCESS
		}
		Err(err) => {
			let span = err.span().unwrap_or(0..input.len());
			let report = Report::build(ReportKind::Error, span.clone())
				.with_message(err.to_string())
				.with_label(Label::new(span).with_message("here"))
				.finish();
			if let Err(io_err) = report.eprint(Source::from(&input)) {
				eprintln!("Error: {err} ({io_err})");
			}
			ExitCode::FAILURE
		}
	}
}

/// Reads a single line of stdin, prompting for it first if stdin is interactive.
fn read_line() -> io::Result<String> {
	let mut lines = io::stdin().lines();

	// If there isn't already input available in stdin, display a prompt for it
	if lines.size_hint().1.is_none() {
		print!("Enter dice expression: ");
		io::stdout().flush()?;
	}

	lines.next().unwrap_or_else(|| Ok(String::new()))
}

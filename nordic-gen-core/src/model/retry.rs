/// Outcome of a [`retry`] that never succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhausted<E> {
	/// Number of attempts made.
	pub attempts: usize,
	/// Failure of the last attempt.
	pub last: E,
}

/// Runs `attempt` until it succeeds, at most `max_attempts` times.
///
/// `attempt` receives the 1-based attempt number. At least one attempt is
/// always made, even when `max_attempts` is 0.
///
/// # Errors
/// Returns the number of attempts and the last failure when every attempt failed.
pub fn retry<T, E>(
	max_attempts: usize,
	mut attempt: impl FnMut(usize) -> Result<T, E>,
) -> Result<T, Exhausted<E>> {
	let max_attempts = max_attempts.max(1);
	let mut number = 1;
	loop {
		match attempt(number) {
			Ok(value) => return Ok(value),
			Err(last) if number >= max_attempts => return Err(Exhausted { attempts: number, last }),
			Err(_) => number += 1,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stops_at_first_success() {
		let mut calls = 0;
		let result: Result<usize, &str> = retry(10, |n| {
			calls += 1;
			if n == 3 { Ok(n) } else { Err("no") }
		})
		.map_err(|e| e.last);
		assert_eq!(result, Ok(3));
		assert_eq!(calls, 3);
	}

	#[test]
	fn reports_the_last_failure() {
		let result: Result<(), _> = retry(4, |n| Err(format!("attempt {n}")));
		assert_eq!(result, Err(Exhausted { attempts: 4, last: "attempt 4".to_owned() }));
	}

	#[test]
	fn always_tries_once() {
		let result: Result<(), _> = retry(0, |_| Err(()));
		assert_eq!(result, Err(Exhausted { attempts: 1, last: () }));
	}
}

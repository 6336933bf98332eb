use time::{Date, Duration};

/// Prime strides used for index pairing. The first one not dividing the pool
/// length is coprime with it, so a strided walk visits every index once per
/// cycle.
const STRIDES: [usize; 3] = [31, 37, 41];

pub(crate) fn coprime_stride(len: usize) -> usize {
	STRIDES.iter().copied().find(|stride| len % stride != 0).unwrap_or(1)
}

fn gcd(a: usize, b: usize) -> usize {
	let (mut a, mut b) = (a, b);

	while b != 0 {
		(a, b) = (b, a % b);
	}

	a
}

/// Deterministic slice of the `left x right` index product: at most `limit`
/// pairs, none repeated, spread by a fixed prime stride.
pub(crate) fn stride_pairs(left: usize, right: usize, limit: usize) -> Vec<(usize, usize)> {
	if left == 0 || right == 0 || limit == 0 {
		return Vec::new();
	}

	let stride = coprime_stride(right);
	// Pairs repeat with period lcm(left, right); staying below it keeps every
	// emitted pair distinct.
	let period = left / gcd(left, right) * right;
	let count = limit.min(period);

	(0..count).map(|i| (i % left, i * stride % right)).collect()
}

/// Symmetric window around the anchor, ascending, anchor included.
pub(crate) fn date_window(anchor: Date, window_days: u16) -> Vec<Date> {
	let window = i64::from(window_days);

	(-window..=window).map(|offset| anchor + Duration::days(offset)).collect()
}

/// An explicit, non-flexible date is used as-is; anything else expands to a
/// window around the anchor.
pub(crate) fn single_or_window(
	date: Option<Date>,
	anchor: Date,
	flexible: bool,
	window_days: u16,
) -> Vec<Date> {
	match date {
		Some(date) if !flexible => vec![date],
		Some(date) => date_window(date, window_days),
		None => date_window(anchor, window_days),
	}
}

/// Depart/return pairs with the return strictly after the depart. When the
/// windows leave no such pair, the earliest return candidate doubles as the
/// depart date; a single-date window degrades to the same-day pair. The
/// result is never empty for non-empty inputs.
pub(crate) fn return_date_pairs(departs: Vec<Date>, returns: Vec<Date>) -> Vec<(Date, Date)> {
	let mut pairs: Vec<(Date, Date)> = departs
		.iter()
		.flat_map(|&depart| {
			returns.iter().filter(move |&&ret| ret > depart).map(move |&ret| (depart, ret))
		})
		.collect();

	if pairs.is_empty()
		&& let Some(&earliest) = returns.first()
	{
		pairs =
			returns.iter().filter(|&&ret| ret > earliest).map(|&ret| (earliest, ret)).collect();

		if pairs.is_empty() {
			pairs.push((earliest, earliest));
		}
	}

	pairs
}

/// Check-in/check-out pairs for a stay search. The stay length is pinned
/// first, then the check-in expands like any other date, keeping check-out
/// strictly after check-in in every variant.
pub(crate) fn stay_date_pairs(
	check_in: Option<Date>,
	check_out: Option<Date>,
	flexible: bool,
	window_days: u16,
	default_trip_days: u16,
	today: Date,
) -> Vec<(Date, Date)> {
	let nights = match (check_in, check_out) {
		(Some(check_in), Some(check_out)) if check_out > check_in => {
			(check_out - check_in).whole_days()
		},
		_ => i64::from(default_trip_days),
	};
	let anchor = check_in
		.or_else(|| check_out.map(|check_out| check_out - Duration::days(nights)))
		.unwrap_or(today);
	let check_ins = single_or_window(check_in, anchor, flexible, window_days);

	check_ins.into_iter().map(|check_in| (check_in, check_in + Duration::days(nights))).collect()
}

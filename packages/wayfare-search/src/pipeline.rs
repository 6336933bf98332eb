use std::cmp::Ordering;

use wayfare_domain::SortDirection;

/// A candidate annotated with its derived sort factors.
pub(crate) struct Ranked<T> {
	pub(crate) primary: f64,
	pub(crate) secondary: f64,
	pub(crate) offer: T,
}

pub(crate) fn rank<T>(
	items: Vec<T>,
	mut primary: impl FnMut(&T) -> f64,
	mut secondary: impl FnMut(&T) -> f64,
) -> Vec<Ranked<T>> {
	items
		.into_iter()
		.map(|offer| Ranked { primary: primary(&offer), secondary: secondary(&offer), offer })
		.collect()
}

/// Stable two-key sort. Ties on the primary factor fall through to the
/// secondary one; ties on both keep emission order.
pub(crate) fn stable_sort<T>(
	ranked: &mut [Ranked<T>],
	primary_direction: SortDirection,
	secondary_direction: SortDirection,
) {
	ranked.sort_by(|a, b| {
		directed(a.primary.total_cmp(&b.primary), primary_direction)
			.then_with(|| directed(a.secondary.total_cmp(&b.secondary), secondary_direction))
	});
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
	match direction {
		SortDirection::Ascending => ordering,
		SortDirection::Descending => ordering.reverse(),
	}
}

/// True min/max price of the set, or `None` when it is empty.
pub(crate) fn price_bounds<T>(
	ranked: &[Ranked<T>],
	price: impl Fn(&T) -> i64,
) -> Option<(i64, i64)> {
	ranked.iter().map(|ranked| price(&ranked.offer)).fold(None, |bounds, price| match bounds {
		None => Some((price, price)),
		Some((min, max)) => Some((min.min(price), max.max(price))),
	})
}

/// Slices the page out of the filtered set. A skip at or past the end yields
/// an empty page; the total is always the full match count.
pub(crate) fn paginate<T>(items: Vec<T>, skip: usize, take: usize) -> (Vec<T>, usize) {
	let total = items.len();
	let page = items.into_iter().skip(skip).take(take).collect();

	(page, total)
}

/// Rating-set membership. A requested rating of four also admits five-star
/// entries; the asymmetry is inherited behaviour and pinned by tests.
pub(crate) fn rating_matches(requested: &[u8], rating: u8) -> bool {
	if requested.is_empty() {
		return true;
	}

	requested.contains(&rating) || (rating == 5 && requested.contains(&4))
}

use crate::Catalog;

/// Default weight of every admitted school after the most desirable one.
pub const DEFAULT_DIMINISHING_RETURNS: f64 = 0.1;

/// Reward of an admission result with diminishing returns for extra admits.
///
/// Names are resolved against `catalog`; names it does not contain are ignored.
/// The most desirable admit counts fully, every other admit is weighted by
/// `diminishing_returns`. No admits is worth `0.0`.
pub fn reward<S: AsRef<str>>(
    admitted: &[S],
    catalog: &Catalog,
    diminishing_returns: f64,
) -> f64 {
    let mut desirabilities: Vec<i64> = admitted
        .iter()
        .filter_map(|name| catalog.get(name.as_ref()))
        .map(|school| school.desirability)
        .collect();

    desirabilities.sort_unstable_by(|a, b| b.cmp(a));

    match desirabilities.split_first() {
        Some((top, rest)) => {
            *top as f64 + diminishing_returns * rest.iter().map(|d| *d as f64).sum::<f64>()
        }
        None => 0.0,
    }
}

use indexmap::IndexSet;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick up to `count` distinct channels from `pool`, uniformly at random.
///
/// Duplicates in the pool collapse to one entry. Asking for more channels than
/// the pool holds returns the whole pool, shuffled.
pub fn sample<S, R>(pool: &[S], count: usize, rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let distinct: IndexSet<&str> = pool.iter().map(AsRef::as_ref).collect();
    let mut channels: Vec<String> = distinct.into_iter().map(str::to_string).collect();

    channels.shuffle(rng);
    channels.truncate(count);
    channels
}

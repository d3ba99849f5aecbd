use rand::Rng;

/// Fisher-Yates shuffle in place: walk `i` from the last index down to 1 and
/// swap with a uniformly chosen index in `0..=i`.
///
/// Slices of length 0 or 1 are left untouched and consume no randomness.
pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Owned variant of [`shuffle`].
pub fn shuffled<T, R: Rng + ?Sized>(rng: &mut R, mut items: Vec<T>) -> Vec<T> {
    shuffle(rng, &mut items);
    items
}

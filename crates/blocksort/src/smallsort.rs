use crate::control::SequenceDivider;

// Stable odd-even transposition sort; one instance per leaf length so the
// passes unroll.
fn odd_even_sort<T, F, const LEN: usize>(v: &mut [T], is_less: &mut F, at: usize)
where
    F: FnMut(&T, &T) -> bool,
{
    for pass in 0..LEN {
        let mut j = pass % 2;
        while j + 1 < LEN {
            if is_less(&v[at + j + 1], &v[at + j]) {
                v.swap(at + j, at + j + 1);
            }
            j += 2;
        }
    }
}

pub(crate) fn sort_leaves<T, F>(
    v: &mut [T],
    is_less: &mut F,
    mut data: usize,
    seq_len: usize,
    mut seq_div: SequenceDivider,
) where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = seq_len - seq_div.next() as usize;
        debug_assert!((4..=8).contains(&len));
        match len {
            4 => odd_even_sort::<T, F, 4>(v, is_less, data),
            5 => odd_even_sort::<T, F, 5>(v, is_less, data),
            6 => odd_even_sort::<T, F, 6>(v, is_less, data),
            7 => odd_even_sort::<T, F, 7>(v, is_less, data),
            _ => odd_even_sort::<T, F, 8>(v, is_less, data),
        }
        data += len;
        if seq_div.is_end() {
            break;
        }
    }
}

pub(crate) fn sort_at_most_8<T, F>(v: &mut [T], is_less: &mut F, at: usize, len: usize)
where
    F: FnMut(&T, &T) -> bool,
{
    if len <= 1 {
        return;
    }
    if len <= 3 {
        if is_less(&v[at + 1], &v[at]) {
            v.swap(at, at + 1);
        }
        if len == 2 {
            return;
        }
        if is_less(&v[at + 2], &v[at + 1]) {
            v.swap(at + 1, at + 2);
        }
        if is_less(&v[at + 1], &v[at]) {
            v.swap(at, at + 1);
        }
        return;
    }
    sort_leaves(v, is_less, at, len, SequenceDivider::new(len, 0, true));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn for_each_permutation(n: usize, f: &mut impl FnMut(&[u32])) {
        fn go(items: &mut Vec<u32>, k: usize, f: &mut impl FnMut(&[u32])) {
            if k <= 1 {
                f(items);
                return;
            }
            for i in 0..k {
                items.swap(i, k - 1);
                go(items, k - 1, f);
                items.swap(i, k - 1);
            }
        }
        let mut items: Vec<u32> = (0..n as u32).collect();
        go(&mut items, n, f);
    }

    #[test]
    fn sorts_every_permutation_up_to_8() {
        for n in 0..=8usize {
            let expected: Vec<u32> = (0..n as u32).collect();
            for_each_permutation(n, &mut |perm| {
                let mut data = perm.to_vec();
                sort_at_most_8(&mut data, &mut |a, b| a < b, 0, n);
                assert_eq!(data, expected, "perm={perm:?}");
            });
        }
    }

    #[test]
    fn networks_are_stable() {
        // Every value sequence over a 3-letter alphabet, tagged by position.
        for n in 2..=6usize {
            let mut seq = vec![0u32; n];
            loop {
                let tagged: Vec<(u32, u32)> = seq
                    .iter()
                    .enumerate()
                    .map(|(i, &x)| (x, i as u32))
                    .collect();
                let mut expected = tagged.clone();
                expected.sort();

                let mut data = tagged.clone();
                sort_at_most_8(&mut data, &mut |a, b| a.0 < b.0, 0, n);
                assert_eq!(data, expected, "seq={seq:?}");

                // Next sequence in base 3.
                let mut i = 0;
                while i < n {
                    seq[i] += 1;
                    if seq[i] < 3 {
                        break;
                    }
                    seq[i] = 0;
                    i += 1;
                }
                if i == n {
                    break;
                }
            }
        }
    }

    #[test]
    fn sorts_leaves_across_a_divided_range() {
        // 27 elements in 4 leaves: lengths 6/7 mixed.
        let mut data: Vec<u32> = (0..27).rev().collect();
        let seq_len = ((27 - 1) >> 2) + 1;
        sort_leaves(
            &mut data,
            &mut |a, b| a < b,
            0,
            seq_len,
            SequenceDivider::new(27, 2, true),
        );

        let mut at = 0usize;
        let mut div = SequenceDivider::new(27, 2, true);
        while !div.is_end() {
            let len = seq_len - div.next() as usize;
            assert!(data[at..at + len].is_sorted());
            at += len;
        }
        assert_eq!(at, 27);
    }
}

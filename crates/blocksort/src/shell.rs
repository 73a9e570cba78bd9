// Shell sort for the released merge buffer, which holds distinct keys, so an
// unstable sort is fine. Ciura's gaps extended by g <- 2g + g/4 above 701,
// computed on demand so no gap table has to scale with the input.

const CIURA_GAPS: [usize; 8] = [1, 4, 10, 23, 57, 132, 301, 701];

pub(crate) fn nth_gap(n: usize) -> usize {
    if n < CIURA_GAPS.len() {
        return CIURA_GAPS[n];
    }
    let mut gap = CIURA_GAPS[CIURA_GAPS.len() - 1];
    for _ in CIURA_GAPS.len()..=n {
        gap = 2 * gap + gap / 4;
    }
    gap
}

// The largest n whose successor gap already covers the region.
pub(crate) fn first_gap_index(len: usize) -> usize {
    let mut n = 0;
    while nth_gap(n + 1) < len {
        n += 1;
    }
    n
}

pub(crate) fn shell_sort<T, F>(v: &mut [T], is_less: &mut F, at: usize, len: usize)
where
    F: FnMut(&T, &T) -> bool,
{
    if len < 2 {
        return;
    }

    let mut n = first_gap_index(len);
    loop {
        let gap = nth_gap(n);
        for i in (at + gap)..(at + len) {
            let mut j = i;
            while j >= at + gap && is_less(&v[j], &v[j - gap]) {
                v.swap(j, j - gap);
                j -= gap;
            }
        }
        if n == 0 {
            break;
        }
        n -= 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;

    use super::*;

    #[test]
    fn gap_sequence_values() {
        let expected = [1usize, 4, 10, 23, 57, 132, 301, 701, 1577, 3548, 7983];
        for (n, &gap) in expected.iter().enumerate() {
            assert_eq!(nth_gap(n), gap);
        }
    }

    #[test]
    fn first_gap_covers_the_region() {
        for len in 2..1600usize {
            let expected = match len {
                0..=4 => 0,
                5..=10 => 1,
                11..=23 => 2,
                24..=57 => 3,
                58..=132 => 4,
                133..=301 => 5,
                302..=701 => 6,
                702..=1577 => 7,
                _ => 8,
            };
            assert_eq!(first_gap_index(len), expected, "len={len}");
        }
        assert_eq!(first_gap_index(3548), 8);
        assert_eq!(first_gap_index(3549), 9);
        assert_eq!(first_gap_index(7983), 9);
        assert_eq!(first_gap_index(7984), 10);
    }

    #[test]
    fn sorts_shuffled_regions() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2034);
        for len in [2usize, 5, 57, 701, 2024] {
            let mut data: Vec<u32> = (0..(len as u32 + 6)).collect();
            data[3..3 + len].shuffle(&mut rng);
            shell_sort(&mut data, &mut |a, b| a < b, 3, len);
            let expected: Vec<u32> = (0..(len as u32 + 6)).collect();
            assert_eq!(data, expected);
        }
    }
}

use crate::blocks::{merge_blocking_buffered, merge_blocking_inplace};
use crate::common::{Fwd, Rev, lower_bound, over_approx_sqrt, rotate};
use crate::control::{BlockingParam, MergeSortControl, SequenceDivider, determine_blocking};
use crate::merge::merge_without_buf;
use crate::shell::shell_sort;
use crate::smallsort::{sort_at_most_8, sort_leaves};

const SMALL_SORT_LEN: usize = 8;
const MIN_NUM_KEYS: usize = 8;

// Stably gathers up to num_desired_keys distinct-valued elements at the front
// of v[first..last], keeping first occurrences. The growing key prefix
// rotates forward to meet each new key so insertion stays cheap.
pub(crate) fn collect_keys<T, F>(
    v: &mut [T],
    is_less: &mut F,
    first: usize,
    last: usize,
    num_desired_keys: usize,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(last - first >= 2 && num_desired_keys >= 2);

    let mut keys = first;
    let mut keys_last = first + 1;
    let mut cur = first + 1;
    let mut remaining = num_desired_keys - 1;

    loop {
        let mut inspos = lower_bound(v, is_less, keys, keys_last, cur);
        if inspos == keys_last || is_less(&v[cur], &v[inspos]) {
            if cur != keys_last {
                rotate(v, keys, keys_last, cur);
                keys += cur - keys_last;
                inspos += cur - keys_last;
            }
            let mut tmp = cur;
            while tmp > inspos {
                v.swap(tmp, tmp - 1);
                tmp -= 1;
            }
            keys_last = cur + 1;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
        cur += 1;
        if cur == last {
            break;
        }
    }

    if keys != first {
        rotate(v, first, keys, keys_last);
    }
    keys_last - keys
}

// forward == false walks the level right-to-left over the mirrored view,
// which leaves the buffer back on the low side without a separate rotation.
fn merge_one_level_buffered<T, F>(
    v: &mut [T],
    is_less: &mut F,
    forward: bool,
    imit: usize,
    buf: usize,
    data: usize,
    seq_len: usize,
    mut seq_div: SequenceDivider,
    p: BlockingParam,
) where
    F: FnMut(&T, &T) -> bool,
{
    let n = v.len();
    let mut buf = buf;
    let mut data = data;
    let mut p = p;
    let residual_len = p.first_block_len;

    loop {
        let lseq_decr = seq_div.next() as usize;
        let rseq_decr = seq_div.next() as usize;
        let merging_len = (seq_len - lseq_decr) + (seq_len - rseq_decr);
        p.first_block_len = residual_len - lseq_decr;
        p.last_block_len = residual_len - rseq_decr;

        if forward {
            let mut b = buf;
            merge_blocking_buffered::<Fwd, T, F>(v, is_less, imit, &mut b, data, p);
            buf = b;
            data += merging_len;
        } else {
            let mut b = n - buf;
            merge_blocking_buffered::<Rev, T, F>(
                v,
                is_less,
                n - (imit + p.num_blocks - 2),
                &mut b,
                n - data,
                p,
            );
            buf = n - b;
            data -= merging_len;
        }

        if seq_div.is_end() {
            break;
        }
    }
}

fn merge_one_level_inplace<T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    data: usize,
    seq_len: usize,
    mut seq_div: SequenceDivider,
    p: BlockingParam,
) where
    F: FnMut(&T, &T) -> bool,
{
    let mut data = data;
    let mut p = p;
    let residual_len = p.first_block_len;

    loop {
        let lseq_decr = seq_div.next() as usize;
        let rseq_decr = seq_div.next() as usize;
        let merging_len = (seq_len - lseq_decr) + (seq_len - rseq_decr);
        p.first_block_len = residual_len - lseq_decr;
        p.last_block_len = residual_len - rseq_decr;

        merge_blocking_inplace(v, is_less, imit, data, p);
        data += merging_len;

        if seq_div.is_end() {
            break;
        }
    }
}

pub(crate) fn block_merge_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let n = v.len();
    if n <= SMALL_SORT_LEN {
        sort_at_most_8(v, is_less, 0, n);
        return;
    }

    let mut imit = 0usize;
    let mut len = n;
    let mut num_keys = 0usize;
    if len > 2 * SMALL_SORT_LEN {
        let num_desired_keys = 2 * over_approx_sqrt(len) - 2;
        num_keys = collect_keys(v, is_less, 0, n, num_desired_keys);
        if num_keys < MIN_NUM_KEYS {
            // Too few distinct values. The collected prefix is sorted; leave
            // it in front and shrink the window that still needs sorting.
            imit += num_keys;
            len -= num_keys;
            num_keys = 0;
        }
    }

    // data_len > 8 holds: up to length 16 no keys are taken, and beyond that
    // at most 2*sqrt(n)-2 of n elements become keys.
    let data_len = len - num_keys;
    let mut ctrl = MergeSortControl::new(num_keys, data_len);
    let data = imit + num_keys;

    sort_leaves(
        v,
        is_less,
        data,
        ctrl.seq_len,
        SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs, true),
    );

    loop {
        let p = determine_blocking(&ctrl);

        if ctrl.buf_len == 0 {
            merge_one_level_inplace(
                v,
                is_less,
                imit,
                data,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs, true),
                p,
            );
        } else if ctrl.forward {
            merge_one_level_buffered(
                v,
                is_less,
                true,
                imit,
                imit + ctrl.imit_len,
                data,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs, true),
                p,
            );
        } else {
            merge_one_level_buffered(
                v,
                is_less,
                false,
                imit,
                n,
                n - ctrl.buf_len,
                ctrl.seq_len,
                SequenceDivider::new(ctrl.data_len, ctrl.log2_num_seqs, false),
                p,
            );
        }

        let old_buf_len = ctrl.next();
        if old_buf_len > 0 {
            // The buffer is done for; re-sort it and let it rejoin the keys.
            let buf = data - old_buf_len;
            if !ctrl.forward {
                // It currently trails the data at the high end; walk it back.
                let mut back_buf = n;
                let mut back_data = n - old_buf_len;
                while back_data != buf {
                    back_data -= 1;
                    back_buf -= 1;
                    v.swap(back_data, back_buf);
                }
                ctrl.forward = true;
            }
            shell_sort(v, is_less, buf, old_buf_len);
        }

        if ctrl.log2_num_seqs == 0 {
            break;
        }
    }

    if data != 0 {
        // Fold the sorted key prefix back into the data.
        merge_without_buf::<T, F, false>(v, is_less, 0, data, n);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    // First occurrences of up to `num_desired` distinct values move to the
    // front in sorted order; duplicates follow in input order; the tail past
    // the scan point stays put.
    fn collect_keys_reference(ary: &[i32], num_desired: usize) -> (Vec<i32>, usize) {
        let mut keys: Vec<i32> = Vec::new();
        let mut dups: Vec<i32> = Vec::new();
        let mut i = 0usize;
        while i < ary.len() {
            if keys.contains(&ary[i]) {
                dups.push(ary[i]);
            } else {
                keys.push(ary[i]);
                if keys.len() == num_desired {
                    i += 1;
                    break;
                }
            }
            i += 1;
        }
        let num_keys = keys.len();
        keys.sort();
        keys.extend_from_slice(&dups);
        keys.extend_from_slice(&ary[i..]);
        (keys, num_keys)
    }

    #[test]
    fn collect_keys_matches_reference() {
        let ary_len = 1000usize;
        let num_desired = 10usize;
        let mut rng = StdRng::seed_from_u64(0x5EED_2035);
        let mut is_less = |a: &i32, b: &i32| a < b;

        for max_value in [0i32, 1, 11] {
            let ary: Vec<i32> = (0..ary_len)
                .map(|_| rng.random_range(0..=max_value))
                .collect();
            let (expected, num_keys_expected) = collect_keys_reference(&ary, num_desired);

            let mut data = ary.clone();
            let num_keys = collect_keys(&mut data, &mut is_less, 0, ary_len, num_desired);

            assert_eq!(num_keys, num_keys_expected, "max_value={max_value}");
            assert_eq!(data, expected, "max_value={max_value}");
        }
    }

    #[test]
    fn collect_keys_finds_all_when_plentiful() {
        let mut data: Vec<i32> = (0..100).rev().collect();
        let mut is_less = |a: &i32, b: &i32| a < b;
        let num_keys = collect_keys(&mut data, &mut is_less, 0, 100, 12);
        assert_eq!(num_keys, 12);
        // 99 down to 88 were seen first; they land sorted at the front.
        let front: Vec<i32> = (88..100).collect();
        assert_eq!(&data[..12], &front[..]);
        let rest: Vec<i32> = (0..88).rev().collect();
        assert_eq!(&data[12..], &rest[..]);
    }

    #[test]
    fn sorts_across_the_key_paths() {
        // Lengths straddling the no-keys, few-keys and full-keys regimes.
        let mut rng = StdRng::seed_from_u64(0x5EED_2036);
        for len in [9usize, 16, 17, 40, 100, 1000] {
            for max_value in [1u32, 5, 40, 1 << 20] {
                let mut data: Vec<u32> =
                    (0..len).map(|_| rng.random_range(0..max_value)).collect();
                let mut expected = data.clone();
                expected.sort();
                block_merge_sort(&mut data, &mut |a, b| a < b);
                assert_eq!(data, expected, "len={len} max_value={max_value}");
            }
        }
    }
}

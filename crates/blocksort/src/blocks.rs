use crate::common::{Dir, Fwd, less_at, rotate, swap_at, swap_blocks};
use crate::control::BlockingParam;
use crate::merge::{merge_with_buf, merge_without_buf};

// Reorders the blocks (left-run half then right-run half) so their head
// elements are non-decreasing, permuting the imitation keys in parallel.
// Selection-style walk over [interleaved | left_permuted | right_remaining];
// returns the position the mid-key ended up at.
pub(crate) fn interleave_blocks<D: Dir, T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    blocks: usize,
    imit_len: usize,
    block_len: usize,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(imit_len % 2 == 0);
    if imit_len == 0 {
        return imit;
    }

    let half = imit_len / 2;
    let mut left_keys = imit;
    let mut right_keys = imit + half;
    let mut left_blocks = blocks;
    let mut right_blocks = blocks + half * block_len;

    let mut least_left_key = left_keys;
    let mut least_left_block = left_blocks;
    let mut least_right_key = right_keys;
    let orig_right_key = right_keys;
    let last_right_key = right_keys + half;

    loop {
        if right_keys == last_right_key
            || !less_at::<D, T, F>(v, is_less, right_blocks, least_left_block)
        {
            swap_at::<D, T>(v, left_keys, least_left_key);
            swap_blocks::<D, T>(v, left_blocks, least_left_block, block_len);

            left_keys += 1;
            left_blocks += block_len;
            if left_keys == right_keys {
                break;
            }

            // The consumed block may have been swapped from anywhere in the
            // permuted area; rescan for the new least left key.
            least_left_key = left_keys;
            least_left_block = left_blocks;
            let mut key = if left_keys < orig_right_key {
                orig_right_key
            } else {
                left_keys + 1
            };
            while key < right_keys {
                if less_at::<D, T, F>(v, is_less, key, least_left_key) {
                    least_left_key = key;
                }
                key += 1;
            }
            least_left_block += (least_left_key - left_keys) * block_len;
        } else {
            swap_at::<D, T>(v, left_keys, right_keys);
            swap_blocks::<D, T>(v, left_blocks, right_blocks, block_len);

            if left_keys == least_left_key {
                least_left_key = right_keys;
                least_left_block = right_blocks;
            }
            if right_keys == least_right_key {
                least_right_key = left_keys;
            }

            left_keys += 1;
            right_keys += 1;
            left_blocks += block_len;
            right_blocks += block_len;
        }
    }

    least_right_key
}

// Bin-sorts the interleaved imitation keys back into order using imit_len/2
// scratch cells at buf.
pub(crate) fn deinterleave_with_buf<D: Dir, T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    imit_len: usize,
    buf: usize,
    mid_key: usize,
) where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(imit_len % 2 == 0);
    if imit_len == 0 {
        return;
    }

    swap_at::<D, T>(v, mid_key, buf);
    let mut left_cur = mid_key;
    let mut right_cur = buf + 1;
    let mut cur = mid_key + 1;
    let mid_key = buf;

    while cur != imit + imit_len {
        if less_at::<D, T, F>(v, is_less, cur, mid_key) {
            swap_at::<D, T>(v, left_cur, cur);
            left_cur += 1;
        } else {
            swap_at::<D, T>(v, right_cur, cur);
            right_cur += 1;
        }
        cur += 1;
    }

    let mut b = buf;
    loop {
        swap_at::<D, T>(v, left_cur, b);
        left_cur += 1;
        b += 1;
        if b == right_cur {
            break;
        }
    }
}

// In-place variant: the keys form alternating-origin runs; each sweep rotates
// every other (right, left) pair of adjacent runs, halving the pair count.
pub(crate) fn deinterleave_inplace<T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    imit_len: usize,
    mid_key: usize,
) where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(imit_len % 2 == 0);
    if imit_len == 0 {
        return;
    }

    let mut mid_key = mid_key;
    let mut l_runlength = 0usize;

    loop {
        let mut r_runlength = 0usize;
        let mut num_rl_pairs = 0usize;

        let mut cur = imit;
        loop {
            if cur == imit + imit_len || !is_less(&v[cur], &v[mid_key]) {
                if l_runlength > 0 {
                    num_rl_pairs += 1;
                    if num_rl_pairs % 2 == 1 {
                        let l_run = cur - l_runlength;
                        let r_run = l_run - r_runlength;
                        rotate(v, r_run, l_run, cur);
                        if num_rl_pairs == 1 {
                            mid_key = cur - r_runlength;
                        }
                    }
                    l_runlength = 0;
                    r_runlength = 0;
                }
                if cur == imit + imit_len {
                    break;
                }
                r_runlength += 1;
            } else if r_runlength > 0 {
                l_runlength += 1;
            }
            cur += 1;
        }

        if num_rl_pairs <= 1 {
            break;
        }
    }
}

// Walks the interleaved blocks, reading one imitation key per block for its
// origin, and merges maximal opposite-origin run pairs into the buffer. The
// last block's origin is implicitly "right".
pub(crate) fn merge_adjacent_blocks_buffered<D: Dir, T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    buf: &mut usize,
    blocks: usize,
    p: BlockingParam,
    mid_key: usize,
) where
    F: FnMut(&T, &T) -> bool,
{
    let mut imit = imit;
    let mut num_remaining = p.num_blocks;

    let mut xs = blocks;
    let mut last_block_before_ys = xs;
    let mut xs_from_right = false;
    num_remaining -= 1;

    let mut ys = xs + p.first_block_len;

    loop {
        num_remaining -= 1;
        let ys_last = ys + if num_remaining > 0 {
            p.block_len
        } else {
            p.last_block_len
        };
        let ys_from_right = if num_remaining > 0 {
            let from_left = less_at::<D, T, F>(v, is_less, imit, mid_key);
            imit += 1;
            !from_left
        } else {
            true
        };

        if ys_from_right == xs_from_right {
            last_block_before_ys = ys;
            ys = ys_last;
            if num_remaining == 0 {
                break;
            }
            continue;
        }

        if xs != last_block_before_ys && num_remaining > 0 {
            // Same-origin blocks accumulated in xs are already in final
            // relative order; pass them through the buffer up to the start of
            // the most recent one. That block stays nonempty: block_len >= 2.
            while xs != last_block_before_ys + 1 {
                swap_at::<D, T>(v, *buf, xs);
                *buf += 1;
                xs += 1;
            }
        }

        let mr = if xs_from_right {
            merge_with_buf::<D, T, F, true>(v, is_less, buf, xs, ys, ys_last)
        } else {
            merge_with_buf::<D, T, F, false>(v, is_less, buf, xs, ys, ys_last)
        };

        xs = mr.rest;
        last_block_before_ys = xs;
        xs_from_right ^= mr.xs_consumed;

        ys = ys_last;
        if num_remaining == 0 {
            break;
        }
    }

    // Pass whatever trails behind through the buffer so it lands in place and
    // the buffer becomes contiguous after the merged data.
    while xs != ys {
        swap_at::<D, T>(v, *buf, xs);
        *buf += 1;
        xs += 1;
    }
}

// Bufferless variant of the block walk; only ever runs on the forward view.
pub(crate) fn merge_adjacent_blocks_inplace<T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    blocks: usize,
    p: BlockingParam,
    mid_key: usize,
) where
    F: FnMut(&T, &T) -> bool,
{
    let mut imit = imit;
    let mut num_remaining = p.num_blocks;

    let mut xs = blocks;
    let mut last_block_before_ys = xs;
    let mut xs_from_right = false;
    num_remaining -= 1;

    let mut ys = xs + p.first_block_len;

    loop {
        num_remaining -= 1;
        let ys_last = ys + if num_remaining > 0 {
            p.block_len
        } else {
            p.last_block_len
        };
        let ys_from_right = if num_remaining > 0 {
            let from_left = less_at::<Fwd, T, F>(v, is_less, imit, mid_key);
            imit += 1;
            !from_left
        } else {
            true
        };

        if ys_from_right == xs_from_right {
            last_block_before_ys = ys;
            ys = ys_last;
            if num_remaining == 0 {
                break;
            }
            continue;
        }

        if xs != last_block_before_ys {
            if num_remaining > 0 {
                // Skip past the accumulated same-origin blocks; their heads
                // sort them before everything still pending.
                xs = last_block_before_ys + 1;
            } else if ys - xs > p.last_block_len {
                // Keep xs no longer than ys going into the final merge; the
                // rotation merge's cost bound depends on it.
                rotate(v, xs, ys, ys_last);
                ys = xs + p.last_block_len;
                xs_from_right = true;
            }
        }

        let mr = if xs_from_right {
            merge_without_buf::<T, F, true>(v, is_less, xs, ys, ys_last)
        } else {
            merge_without_buf::<T, F, false>(v, is_less, xs, ys, ys_last)
        };

        xs = mr.rest;
        last_block_before_ys = xs;
        xs_from_right ^= mr.xs_consumed;

        ys = ys_last;
        if num_remaining == 0 {
            break;
        }
    }
}

// One full run-pair merge. The first and last blocks may be shorter and skip
// the interleave.
pub(crate) fn merge_blocking_buffered<D: Dir, T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    buf: &mut usize,
    blocks: usize,
    p: BlockingParam,
) where
    F: FnMut(&T, &T) -> bool,
{
    let imit_len = p.num_blocks - 2;
    let mid_key = interleave_blocks::<D, T, F>(
        v,
        is_less,
        imit,
        blocks + p.first_block_len,
        imit_len,
        p.block_len,
    );
    merge_adjacent_blocks_buffered::<D, T, F>(v, is_less, imit, buf, blocks, p, mid_key);
    deinterleave_with_buf::<D, T, F>(v, is_less, imit, imit_len, *buf, mid_key);
}

pub(crate) fn merge_blocking_inplace<T, F>(
    v: &mut [T],
    is_less: &mut F,
    imit: usize,
    blocks: usize,
    p: BlockingParam,
) where
    F: FnMut(&T, &T) -> bool,
{
    let imit_len = p.num_blocks - 2;
    let mid_key = interleave_blocks::<Fwd, T, F>(
        v,
        is_less,
        imit,
        blocks + p.first_block_len,
        imit_len,
        p.block_len,
    );
    merge_adjacent_blocks_inplace(v, is_less, imit, blocks, p, mid_key);
    deinterleave_inplace(v, is_less, imit, imit_len, mid_key);
}

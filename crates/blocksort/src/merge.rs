use crate::common::{Dir, less_at, lower_bound, rotate, swap_at, upper_bound};

pub(crate) struct MergeResult {
    pub xs_consumed: bool,
    pub rest: usize,
}

// Blocks can originate from either parent run; when xs came from the right
// run a tie must go to ys to keep the sort stable.
#[inline(always)]
fn xs_wins<D: Dir, T, F, const XS_FROM_RIGHT: bool>(
    v: &[T],
    is_less: &mut F,
    xs: usize,
    ys: usize,
) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    if XS_FROM_RIGHT {
        less_at::<D, T, F>(v, is_less, xs, ys)
    } else {
        !less_at::<D, T, F>(v, is_less, ys, xs)
    }
}

// Merges the adjacent runs [xs, ys) and [ys, ys_last) into the buffer
// preceding xs, by swaps. ys must not outgrow the buffer; overrun is not
// checked. On return `rest - *buf` equals the original buffer length.
pub(crate) fn merge_with_buf<D: Dir, T, F, const XS_FROM_RIGHT: bool>(
    v: &mut [T],
    is_less: &mut F,
    buf: &mut usize,
    mut xs: usize,
    mut ys: usize,
    ys_last: usize,
) -> MergeResult
where
    F: FnMut(&T, &T) -> bool,
{
    let mut xs_last = ys;

    // Cross merge: each branch settles two elements when the comparisons
    // allow it.
    while xs + 1 < xs_last && ys + 1 < ys_last {
        if xs_wins::<D, T, F, XS_FROM_RIGHT>(v, is_less, xs + 1, ys) {
            swap_at::<D, T>(v, *buf, xs);
            swap_at::<D, T>(v, *buf + 1, xs + 1);
            *buf += 2;
            xs += 2;
        } else if !xs_wins::<D, T, F, XS_FROM_RIGHT>(v, is_less, xs, ys + 1) {
            swap_at::<D, T>(v, *buf, ys);
            swap_at::<D, T>(v, *buf + 1, ys + 1);
            *buf += 2;
            ys += 2;
        } else {
            let x_first = xs_wins::<D, T, F, XS_FROM_RIGHT>(v, is_less, xs, ys);
            swap_at::<D, T>(v, *buf + (!x_first) as usize, xs);
            swap_at::<D, T>(v, *buf + x_first as usize, ys);
            *buf += 2;
            xs += 1;
            ys += 1;
        }
    }

    let mut xs_consumed = xs == xs_last;

    if xs + 1 == xs_last {
        xs_consumed = false;
        loop {
            if xs_wins::<D, T, F, XS_FROM_RIGHT>(v, is_less, xs, ys) {
                swap_at::<D, T>(v, *buf, xs);
                *buf += 1;
                xs += 1;
                xs_consumed = true;
                break;
            }
            swap_at::<D, T>(v, *buf, ys);
            *buf += 1;
            ys += 1;
            if ys == ys_last {
                break;
            }
        }
    } else if ys + 1 == ys_last {
        xs_consumed = true;
        loop {
            if !xs_wins::<D, T, F, XS_FROM_RIGHT>(v, is_less, xs, ys) {
                swap_at::<D, T>(v, *buf, ys);
                *buf += 1;
                ys += 1;
                xs_consumed = false;
                break;
            }
            swap_at::<D, T>(v, *buf, xs);
            *buf += 1;
            xs += 1;
            if xs == xs_last {
                break;
            }
        }
    }

    if xs_consumed {
        // [ merged | buffer | rest of ys )
        return MergeResult {
            xs_consumed: true,
            rest: ys,
        };
    }

    // ys ran out: the leftover of xs sits between buffer halves. Swap it to
    // the end so the buffer becomes contiguous again.
    while xs_last != xs {
        ys -= 1;
        xs_last -= 1;
        swap_at::<D, T>(v, ys, xs_last);
    }
    MergeResult {
        xs_consumed: false,
        rest: ys,
    }
}

// In-place merge by alternating binary searches and rotations. Forward view
// only; the caller keeps xs from being much longer than ys, which the cost
// bound depends on.
pub(crate) fn merge_without_buf<T, F, const XS_FROM_RIGHT: bool>(
    v: &mut [T],
    is_less: &mut F,
    mut xs: usize,
    mut ys: usize,
    ys_last: usize,
) -> MergeResult
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        // Seek xs so that its head beats ys' head.
        xs = if XS_FROM_RIGHT {
            lower_bound(v, is_less, xs, ys, ys)
        } else {
            upper_bound(v, is_less, xs, ys, ys)
        };
        if xs == ys {
            return MergeResult {
                xs_consumed: true,
                rest: ys,
            };
        }

        // Rotate the ys prefix that belongs before xs' head across.
        let mut ys_upper = ys + 1;
        if ys_upper != ys_last {
            ys_upper = if XS_FROM_RIGHT {
                upper_bound(v, is_less, ys_upper, ys_last, xs)
            } else {
                lower_bound(v, is_less, ys_upper, ys_last, xs)
            };
        }
        rotate(v, xs, ys, ys_upper);
        xs += ys_upper - ys;
        ys = ys_upper;
        if ys == ys_last {
            return MergeResult {
                xs_consumed: false,
                rest: xs,
            };
        }
    }
}

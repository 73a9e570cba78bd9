use crate::common::over_approx_sqrt;

// Enumerates the lengths of 2^log2_num_seqs near-equal parts of data_len,
// part i being [floor(i*L/2^p), floor((i+1)*L/2^p)); a fractional accumulator
// carries the remainder exactly. With forward == false the parts come in
// right-to-left order.
pub(crate) struct SequenceDivider {
    forward: bool,
    log2_num_seqs: usize,
    num_seqs: usize,
    remainder: usize,
    frac_counter: usize,
}

impl SequenceDivider {
    pub(crate) fn new(data_len: usize, log2_num_seqs: usize, forward: bool) -> Self {
        debug_assert!(data_len > 0);
        let num_seqs = 1usize << log2_num_seqs;
        let mut remainder = (data_len - 1) % num_seqs + 1;
        if !forward {
            remainder = num_seqs - remainder;
        }
        Self {
            forward,
            log2_num_seqs,
            num_seqs,
            remainder,
            frac_counter: 0,
        }
    }

    // True when the next part is one shorter than the ceiling part length.
    pub(crate) fn next(&mut self) -> bool {
        self.frac_counter += self.remainder;
        let carry_bit = 1usize << self.log2_num_seqs;
        let mut no_carry = self.frac_counter & carry_bit == 0;
        if !self.forward {
            no_carry = !no_carry;
        }
        self.frac_counter &= !carry_bit;
        self.num_seqs -= 1;
        no_carry
    }

    pub(crate) fn is_end(&self) -> bool {
        self.num_seqs == 0
    }
}

// Per-level state: how the collected keys split between the imitation buffer
// and the merge buffer, the current run length, and the walk direction.
// Invariants while buf_len > 0: imit_len is even, imit_len + buf_len equals
// num_keys, buf_len >= imit_len + 2, and seq_len <= bufferable_len
// (= (imit_len + 2) / 2 * buf_len). The buffer closes at most once per sort.
pub(crate) struct MergeSortControl {
    pub imit_len: usize,
    pub buf_len: usize,
    pub bufferable_len: usize,
    pub data_len: usize,
    pub log2_num_seqs: usize,
    pub seq_len: usize,
    pub forward: bool,
}

impl MergeSortControl {
    pub(crate) fn new(num_keys: usize, data_len: usize) -> Self {
        debug_assert!(num_keys == 0 || num_keys >= 8);
        debug_assert!(data_len > 8);

        let mut imit_len = 0;
        let mut buf_len = 0;
        let mut bufferable_len = 0;
        if num_keys > 0 {
            imit_len = (num_keys + 2) / 4 * 2 - 2;
            buf_len = num_keys - imit_len;
            bufferable_len = (imit_len + 2) / 2 * buf_len;
        }

        let mut log2_num_seqs = 1usize;
        while (data_len - 1) >> (log2_num_seqs + 3) != 0 {
            log2_num_seqs += 1;
        }
        let seq_len = ((data_len - 1) >> log2_num_seqs) + 1;

        Self {
            imit_len,
            buf_len,
            bufferable_len,
            data_len,
            log2_num_seqs,
            seq_len,
            forward: true,
        }
    }

    // Advances to the next level. Returns the released buffer length when the
    // buffer just closed; the caller re-sorts that region and the keys absorb
    // it.
    pub(crate) fn next(&mut self) -> usize {
        self.log2_num_seqs -= 1;
        self.seq_len = ((self.data_len - 1) >> self.log2_num_seqs) + 1;

        if self.buf_len == 0 {
            return 0;
        }
        self.forward = !self.forward;

        if self.log2_num_seqs == 0 || self.seq_len > self.bufferable_len {
            let old_buf_len = self.buf_len;
            self.imit_len += self.buf_len / 2 * 2;
            self.buf_len = 0;
            self.bufferable_len = 0;
            return old_buf_len;
        }
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BlockingParam {
    pub num_blocks: usize,
    pub block_len: usize,
    pub first_block_len: usize,
    pub last_block_len: usize,
}

// The residual (first/last block) length always comes out >= 2, so blocks
// stay nonempty even after the divider shaves one element off a run.
pub(crate) fn determine_blocking(ctrl: &MergeSortControl) -> BlockingParam {
    let seq_len = ctrl.seq_len;

    let max_num_blocks = ctrl.imit_len + 2;
    let num_blocks = if ctrl.buf_len > 0 {
        // Fits under max_num_blocks because seq_len <= bufferable_len.
        ((seq_len - 1) / ctrl.buf_len + 1) * 2
    } else {
        // Any O(sqrt(seq_len)) cap keeps the interleave linear per pair;
        // this one also keeps the residual length proof intact.
        let limit_num_blocks = seq_len / over_approx_sqrt(seq_len * 2) * 2;
        max_num_blocks.min(limit_num_blocks)
    };

    let block_len = (seq_len - 1) / (num_blocks / 2) + 1;
    let residual_len = seq_len - block_len * (num_blocks / 2 - 1);
    debug_assert!(residual_len >= 2);

    BlockingParam {
        num_blocks,
        block_len,
        first_block_len: residual_len,
        last_block_len: residual_len,
    }
}

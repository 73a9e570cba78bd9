use std::cmp::Ordering;

mod blocks;
mod common;
mod control;
mod merge;
mod merge_sort;
mod shell;
mod smallsort;

pub fn sort<T: Ord>(v: &mut [T]) {
    merge_sort::block_merge_sort(v, &mut |a, b| a.lt(b));
}

pub fn sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], mut compare: F) {
    merge_sort::block_merge_sort(v, &mut |a, b| compare(a, b) == Ordering::Less);
}

pub fn sort_by_key<T, K: Ord, F: FnMut(&T) -> K>(v: &mut [T], mut key: F) {
    merge_sort::block_merge_sort(v, &mut |a, b| key(a).lt(&key(b)));
}

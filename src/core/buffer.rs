// Core Layer: Growable backing arrays
//
// Triplet assembly and the product kernel append into Vecs whose capacity
// is managed explicitly: doubling on overflow, fallible reservation, and a
// shrink-to-fit step before results are handed back to callers.

use crate::core::error::Result;

/// Ensure `buf` can hold at least `needed` elements, doubling capacity on overflow
///
/// Growth is `max(2 * capacity, needed)`, so appending one entry at a time costs
/// amortized O(1). Allocation failure is reported as `OutOfMemory`.
pub fn ensure_capacity<T>(buf: &mut Vec<T>, needed: usize) -> Result<()> {
    let capacity = buf.capacity();
    if needed <= capacity {
        return Ok(());
    }

    let target = capacity.saturating_mul(2).max(needed).max(1);
    log::trace!("Growing buffer capacity {} -> {}", capacity, target);
    buf.try_reserve_exact(target - buf.len())?;
    Ok(())
}

/// Set the capacity of `buf` to exactly `capacity` (never below its length)
pub fn reallocate<T>(buf: &mut Vec<T>, capacity: usize) -> Result<()> {
    let capacity = capacity.max(buf.len());
    if capacity > buf.capacity() {
        buf.try_reserve_exact(capacity - buf.len())?;
    } else {
        buf.shrink_to(capacity);
    }
    Ok(())
}

/// Allocate a fresh Vec with room for `capacity` elements
pub fn with_capacity<T>(capacity: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)?;
    Ok(buf)
}

/// Allocate a fresh Vec of `len` copies of `value`
pub fn filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buf = with_capacity(len)?;
    buf.resize(len, value);
    Ok(buf)
}

/// Prefix sum of `counts` into `ptrs` (length counts.len() + 1)
///
/// On return `counts` holds a copy of the column start offsets so that it can
/// be used directly as the scatter cursor array. Returns the total.
pub fn cumsum(ptrs: &mut [usize], counts: &mut [usize]) -> usize {
    debug_assert_eq!(ptrs.len(), counts.len() + 1);
    let mut nz = 0;
    for (i, count) in counts.iter_mut().enumerate() {
        ptrs[i] = nz;
        nz += *count;
        *count = ptrs[i];
    }
    ptrs[counts.len()] = nz;
    nz
}

//! Clock arithmetic
//!
//! Buffer timestamps are nanoseconds; RTP time is in clock-rate units. All
//! scaling goes through a 128-bit intermediate so byte counts well beyond
//! 2^32 and full-range nanosecond values never overflow.

/// Presentation time in nanoseconds.
pub type ClockTime = u64;

pub const NSECS_PER_MSEC: u64 = 1_000_000;
pub const NSECS_PER_SEC: u64 = 1_000_000_000;

/// Computes `val * num / denom` without intermediate overflow.
///
/// Results that do not fit in 64 bits, and a zero denominator, saturate to
/// `u64::MAX`.
pub fn scale(val: u64, num: u64, denom: u64) -> u64 {
    if denom == 0 {
        return u64::MAX;
    }
    let wide = val as u128 * num as u128 / denom as u128;
    u64::try_from(wide).unwrap_or(u64::MAX)
}

/// Rounds `val` down to a multiple of `align` (`align` must be non-zero).
pub fn align_down(val: usize, align: usize) -> usize {
    val - (val % align)
}

/// Rounds `val` up to a multiple of `align`, saturating at the largest
/// multiple representable.
pub fn align_up(val: usize, align: usize) -> usize {
    match val % align {
        0 => val,
        rem => val
            .checked_add(align - rem)
            .unwrap_or_else(|| align_down(usize::MAX, align)),
    }
}

/// Converts a scaled byte count to `usize`, saturating on narrow targets.
pub(crate) fn clamp_len(val: u64) -> usize {
    usize::try_from(val).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_basic() {
        assert_eq!(scale(20, 60 * NSECS_PER_MSEC, 20 * NSECS_PER_MSEC), 60);
        assert_eq!(scale(7, 3, 2), 10);
    }

    #[test]
    fn test_scale_wide_intermediate() {
        // 2^40 bytes of 8-bit audio at 8 kHz, in nanoseconds
        let bytes = 1u64 << 40;
        let duration = scale(bytes, 8 * NSECS_PER_SEC, 8000 * 8);
        assert_eq!(duration, bytes * (NSECS_PER_SEC / 8000));
    }

    #[test]
    fn test_scale_saturates() {
        assert_eq!(scale(u64::MAX, 4, 1), u64::MAX);
        assert_eq!(scale(5, 5, 0), u64::MAX);
    }

    #[test]
    fn test_align() {
        assert_eq!(align_down(57, 20), 40);
        assert_eq!(align_down(60, 20), 60);
        assert_eq!(align_up(25, 20), 40);
        assert_eq!(align_up(40, 20), 40);
        assert_eq!(align_up(usize::MAX, 10), align_down(usize::MAX, 10));
    }
}

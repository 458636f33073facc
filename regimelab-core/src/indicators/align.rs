//! Alignment between a candle index and an indicator's shorter output.

/// Read the indicator value aligned with candle index `index`, with an
/// optional look-back `offset` (0 = current candle, 1 = previous, ...).
///
/// `series_len` is the length of the price series the indicator was computed
/// from; the difference between it and `values.len()` is the indicator's
/// warm-up. Returns `None` whenever the requested index falls before the
/// warm-up or outside the series.
pub fn aligned_value(
    values: &[f64],
    series_len: usize,
    index: usize,
    offset: usize,
) -> Option<f64> {
    if values.is_empty() || values.len() > series_len || index >= series_len {
        return None;
    }
    let warmup = series_len - values.len();
    let target = index.checked_sub(offset)?;
    let pos = target.checked_sub(warmup)?;
    values.get(pos).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::sma;

    #[test]
    fn aligns_with_warmup() {
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0];
        let out = sma(&prices, 3); // warmup 2, values at candle 2, 3, 4
        assert_eq!(aligned_value(&out, 5, 2, 0), Some(out[0]));
        assert_eq!(aligned_value(&out, 5, 4, 0), Some(out[2]));
    }

    #[test]
    fn lookback_offset_shifts_left() {
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0];
        let out = sma(&prices, 3);
        assert_eq!(aligned_value(&out, 5, 4, 1), Some(out[1]));
        assert_eq!(aligned_value(&out, 5, 4, 2), Some(out[0]));
    }

    #[test]
    fn before_warmup_is_none() {
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0];
        let out = sma(&prices, 3);
        assert_eq!(aligned_value(&out, 5, 1, 0), None);
        assert_eq!(aligned_value(&out, 5, 2, 1), None);
    }

    #[test]
    fn out_of_series_is_none() {
        let prices = [10.0, 11.0, 12.0, 13.0, 14.0];
        let out = sma(&prices, 3);
        assert_eq!(aligned_value(&out, 5, 5, 0), None);
    }

    #[test]
    fn empty_output_is_none() {
        assert_eq!(aligned_value(&[], 5, 4, 0), None);
    }

    #[test]
    fn offset_underflow_is_none() {
        let prices = [10.0, 11.0, 12.0];
        let out = sma(&prices, 1);
        assert_eq!(aligned_value(&out, 3, 0, 1), None);
    }
}

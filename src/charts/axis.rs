// Value axis limits, ticks and tick labels
use serde::{Deserialize, Serialize};

/// `[min, max]` of a value axis.
pub type AxisLimit = [f64; 2];

pub const DEFAULT_LIMIT_STEP: f64 = 5.0;

/// Upper bound on the gaps between ticks of one axis.
pub const MAX_TICK_INTERVALS: usize = 20;

/// Rounds `value` away from zero to the next multiple of `step`.
pub fn round_to_nearest_multiple(value: f64, step: f64) -> f64 {
    let rounded = (value.abs() / step).ceil() * step;
    if value < 0.0 { -rounded } else { rounded }
}

/// Widens `static_limits` so that every non-null value fits inside the axis.
///
/// The limits only ever grow. A bound that has to move is rounded away from
/// zero to a multiple of `step`; when that multiple equals the extreme value
/// (or falls inside it) the bound moves one more `step` outward. So `[0, 40]`
/// with a sample of `45` becomes `[0, 50]`, and with `44` becomes `[0, 45]`.
pub fn get_suitable_limit(static_limits: AxisLimit, values: &[Option<f64>], step: f64) -> AxisLimit {
    let mut present = values.iter().flatten().copied().filter(|v| v.is_finite());
    let Some(first) = present.next() else {
        return static_limits;
    };
    let (min, max) = present.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let [mut low, mut high] = static_limits;
    if min < low {
        low = round_to_nearest_multiple(min, step);
        if low >= min {
            low -= step;
        }
    }
    if max > high {
        high = round_to_nearest_multiple(max, step);
        if high <= max {
            high += step;
        }
    }
    [low, high]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Ticks at every multiple of `tick_step` within `limits`, both ends included.
///
/// Axes stretched far beyond their static limits switch to a coarser step,
/// `tick_step` times 1, 2 or 5 times a power of ten, so that there are never
/// more than [`MAX_TICK_INTERVALS`] gaps.
pub fn ticks(limits: AxisLimit, tick_step: f64, unit_symbol: Option<&str>) -> Vec<Tick> {
    let [low, high] = limits;
    if !(tick_step > 0.0 && tick_step.is_finite()) || high < low || !(high - low).is_finite() {
        return Vec::new();
    }

    let tick_step = coarsen_step(high - low, tick_step);
    let first = (low / tick_step).ceil() as i64;
    let last = (high / tick_step).floor() as i64;
    let fraction_digits = fraction_digits(tick_step);

    (first..=last)
        .take(MAX_TICK_INTERVALS + 1)
        .map(|i| {
            let value = i as f64 * tick_step;
            Tick {
                value,
                label: tick_label(value, fraction_digits, unit_symbol),
            }
        })
        .collect()
}

fn coarsen_step(span: f64, tick_step: f64) -> f64 {
    let ratio = span / tick_step / MAX_TICK_INTERVALS as f64;
    if ratio <= 1.0 {
        return tick_step;
    }

    let magnitude = 10f64.powf(ratio.log10().floor());
    let factor = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|f| *f >= ratio)
        .unwrap_or(10.0 * magnitude);
    tick_step * factor
}

/// Decimal places needed to tell ticks `step` apart.
pub fn fraction_digits(step: f64) -> usize {
    let mut digits = 0;
    let mut scaled = step.abs();
    while digits < 6 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        digits += 1;
    }
    digits
}

pub fn tick_label(value: f64, fraction_digits: usize, unit_symbol: Option<&str>) -> String {
    // avoid "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    match unit_symbol {
        Some(symbol) if !symbol.is_empty() => format!("{value:.fraction_digits$} {symbol}"),
        _ => format!("{value:.fraction_digits$}"),
    }
}

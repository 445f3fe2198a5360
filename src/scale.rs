//! Positional scales: categorical bands and linear numeric maps.
//!
//! Tick and nice behaviour follows d3's tick-increment algorithm so that the
//! axes this crate draws line up with the ones a d3 chart of the same data would.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// JavaScript `Math.round`: halves round towards +∞.
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// `(i1, i2, inc)`; a negative `inc` means the step is `1 / -inc`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let v = 10f64.powf(-power) / factor;
        i1 = js_round(start * v);
        i2 = js_round(stop * v);
        if i1 / v < start {
            i1 += 1.0;
        }
        if i2 / v > stop {
            i2 -= 1.0;
        }
        inc = -v;
    } else {
        let v = 10f64.powf(power) * factor;
        i1 = js_round(start / v);
        i2 = js_round(stop / v);
        if i1 * v < start {
            i1 += 1.0;
        }
        if i2 * v > stop {
            i2 -= 1.0;
        }
        inc = v;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick step for `[start, stop]`; see [`tick_spec`] for the sign convention.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Roughly `count` evenly spaced round values within `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }
    let n = (i2 - i1) as usize + 1;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Extend `[start, stop]` outward to round values. Never shrinks the domain.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !stop.is_finite() || start == stop || count == 0 {
        return (start, stop);
    }
    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if step == prestep {
            break;
        } else if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    if reverse { (hi, lo) } else { (lo, hi) }
}

/// Continuous numeric domain → pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Round the domain outward for about `count` ticks.
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = nice(self.domain.0, self.domain.1, count);
        self
    }

    /// Map a domain value to the range. A degenerate domain maps everything to the range midpoint.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 != d0 { (value - d0) / (d1 - d0) } else { 0.5 };
        r0 + (r1 - r0) * t
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Discrete categories → equal, contiguous pixel bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Padding applies to both inner gaps and outer edges; bands are centred in the range.
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;
        Self {
            domain,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn index(&self, category: &str) -> Option<usize> {
        self.domain.iter().position(|c| c == category)
    }

    /// Left edge of the category's band, or `None` for unknown categories.
    pub fn position(&self, category: &str) -> Option<f64> {
        self.index(category).map(|i| self.start + self.step * i as f64)
    }

    /// Left edge, with unknown categories mapped to 0.
    pub fn map(&self, category: &str) -> f64 {
        self.position(category).unwrap_or(0.0)
    }

    pub fn center(&self, category: &str) -> Option<f64> {
        self.position(category).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// How one end of a numeric domain derives from the data extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Pinned at zero.
    Zero,
    /// Extent end plus a constant.
    Offset(f64),
    /// Extent end times a headroom factor.
    Scaled(f64),
}

impl Bound {
    fn apply(&self, value: f64) -> f64 {
        match *self {
            Bound::Zero => 0.0,
            Bound::Offset(d) => value + d,
            Bound::Scaled(k) => value * k,
        }
    }
}

/// Rule for a numeric axis domain over a filtered subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainPolicy {
    pub lower: Bound,
    pub upper: Bound,
    /// Used when the subset is empty or yields an empty interval.
    pub fallback: (f64, f64),
    /// Nice the resolved domain for about this many ticks.
    pub nice: Option<usize>,
}

impl DomainPolicy {
    /// `[0, max * headroom]`.
    pub fn zero_based(headroom: f64, fallback_max: f64) -> Self {
        Self {
            lower: Bound::Zero,
            upper: Bound::Scaled(headroom),
            fallback: (0.0, fallback_max),
            nice: Some(10),
        }
    }

    /// `[min - pad, max + pad]`.
    pub fn padded(pad: f64, fallback: (f64, f64)) -> Self {
        Self {
            lower: Bound::Offset(-pad),
            upper: Bound::Offset(pad),
            fallback,
            nice: Some(10),
        }
    }

    pub fn with_nice(mut self, nice: Option<usize>) -> Self {
        self.nice = nice;
        self
    }

    pub fn resolve<I: IntoIterator<Item = f64>>(&self, values: I) -> (f64, f64) {
        let raw = match crate::stats::extent(values) {
            Some((lo, hi)) => {
                let (d0, d1) = (self.lower.apply(lo), self.upper.apply(hi));
                if d1 > d0 { (d0, d1) } else { self.fallback }
            }
            None => self.fallback,
        };
        match self.nice {
            Some(count) => nice(raw.0, raw.1, count),
            None => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_matches_d3() {
        assert_eq!(nice(0.0, 25.7, 10), (0.0, 26.0));
        assert_eq!(nice(0.0, 342.1, 10), (0.0, 350.0));
        assert_eq!(nice(7.9, 26.8, 10), (6.0, 28.0));
        assert_eq!(nice(0.1, 0.87, 10), (0.1, 0.9));
    }

    #[test]
    fn ticks_match_d3() {
        assert_eq!(ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(0.0, 1.0, 4), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(3.0, 3.0, 10), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_leaves_degenerate_domains_alone() {
        assert_eq!(nice(5.0, 5.0, 10), (5.0, 5.0));
        let (lo, hi) = nice(f64::NAN, 1.0, 10);
        assert!(lo.is_nan());
        assert_eq!(hi, 1.0);
    }

    #[test]
    fn band_layout_matches_d3() {
        let cats: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let band = BandScale::new(cats, (0.0, 100.0), 0.2);
        // step = 100 / (3 - 0.2 + 0.4)
        let step = 100.0 / 3.2;
        assert!((band.step() - step).abs() < 1e-9);
        assert!((band.bandwidth() - step * 0.8).abs() < 1e-9);
        assert!((band.map("a") - step * 0.2).abs() < 1e-9);
        assert_eq!(band.map("zzz"), 0.0);
    }

    #[test]
    fn empty_band_domain_is_harmless() {
        let band = BandScale::new(Vec::new(), (0.0, 100.0), 0.2);
        assert!(band.domain().is_empty());
        assert!(band.bandwidth().is_finite());
        assert_eq!(band.map("Jan"), 0.0);
    }

    #[test]
    fn degenerate_linear_maps_to_midpoint() {
        let s = LinearScale::new((2.0, 2.0), (100.0, 0.0));
        assert_eq!(s.map(2.0), 50.0);
    }
}

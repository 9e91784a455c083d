/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
    pub minor_ticks: Vec<f64>,
}

impl Axis {
    /// Linear axis over exactly `[min, max]` with "nice number" ticks inside it.
    pub fn linear(min: f64, max: f64, target_ticks: usize) -> Self {
        let (_, _, step) = nice_range(min, max, target_ticks);
        let first = (min / step).ceil() * step;
        let eps = step * 1e-6;

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut i = 0usize;
        loop {
            let v = first + i as f64 * step;
            if v > max + eps {
                break;
            }
            ticks.push(v);
            labels.push(format_tick(v, step));
            i += 1;
        }

        let minor_step = step / 5.0;
        let mut minor = Vec::new();
        let mut j = ((min / minor_step).ceil()) as i64;
        loop {
            let mv = j as f64 * minor_step;
            if mv > max + eps {
                break;
            }
            if !ticks.iter().any(|t| (t - mv).abs() < minor_step * 0.01) {
                minor.push(mv);
            }
            j += 1;
        }

        Self {
            min,
            max,
            log: false,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Logarithmic axis over exactly `[min, max]` with decade ticks inside it.
    ///
    /// Both limits must be positive; callers validate this.
    pub fn log(min: f64, max: f64) -> Self {
        let lo = min.log10().floor() as i32;
        let hi = max.log10().ceil() as i32;
        let span = (hi - lo).max(1);
        // Thin labels on very wide ranges, as matplotlib's LogLocator does.
        let label_every = ((span + 9) / 10).max(1);

        let mut ticks = Vec::new();
        let mut labels = Vec::new();
        let mut minor = Vec::new();
        for exp in lo..=hi {
            let v = 10.0_f64.powi(exp);
            if in_range(v, min, max) && exp.rem_euclid(label_every) == 0 {
                ticks.push(v);
                labels.push(format!("10^{{{exp}}}"));
            } else if in_range(v, min, max) {
                minor.push(v);
            }
            if span <= 12 {
                for m in 2..=9 {
                    let mv = m as f64 * v;
                    if in_range(mv, min, max) {
                        minor.push(mv);
                    }
                }
            }
        }

        Self {
            min,
            max,
            log: true,
            label: String::new(),
            tick_positions: ticks,
            tick_labels: labels,
            minor_ticks: minor,
        }
    }

    /// Auto-scale linear axis, expanding the data range to nice limits.
    pub fn auto_linear(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (nice_min, nice_max, _) = nice_range(data_min, data_max, target_ticks);
        Self::linear(nice_min, nice_max, target_ticks)
    }

    /// Auto-scale logarithmic axis to whole decades.
    pub fn auto_log(data_min: f64, data_max: f64) -> Self {
        let log_min = data_min.max(1e-20).log10().floor() as i32;
        let log_max = data_max.max(1e-20).log10().ceil().max(log_min as f64 + 1.0) as i32;
        Self::log(10.0_f64.powi(log_min), 10.0_f64.powi(log_max))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Whether `value` can be placed on this axis at all.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && (!self.log || value > 0.0)
    }

    /// Map a data value to pixel coordinate.
    pub fn data_to_pixel(&self, value: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = if self.log {
            let log_val = value.max(1e-300).ln();
            let log_min = self.min.max(1e-300).ln();
            let log_max = self.max.max(1e-300).ln();
            (log_val - log_min) / (log_max - log_min)
        } else {
            (value - self.min) / (self.max - self.min)
        };
        px_min + frac * (px_max - px_min)
    }

    /// Map pixel coordinate to data value (inverse).
    pub fn pixel_to_data(&self, px: f64, px_min: f64, px_max: f64) -> f64 {
        let frac = (px - px_min) / (px_max - px_min);
        if self.log {
            let log_min = self.min.max(1e-300).ln();
            let log_max = self.max.max(1e-300).ln();
            (log_min + frac * (log_max - log_min)).exp()
        } else {
            self.min + frac * (self.max - self.min)
        }
    }
}

fn in_range(v: f64, min: f64, max: f64) -> bool {
    v >= min * (1.0 - 1e-9) && v <= max * (1.0 + 1e-9)
}

/// "Nice numbers" algorithm for pleasant tick spacing.
fn nice_range(data_min: f64, data_max: f64, target_ticks: usize) -> (f64, f64, f64) {
    if (data_max - data_min).abs() < 1e-15 {
        return (data_min - 1.0, data_max + 1.0, 1.0);
    }
    let range = data_max - data_min;
    let rough_step = range / (target_ticks.max(2) - 1) as f64;
    let step = nice_step(rough_step);
    let nice_min = (data_min / step).floor() * step;
    let nice_max = (data_max / step).ceil() * step;
    (nice_min, nice_max, step)
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // Avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    if decimals == 0 { format!("{}", v.round() as i64) } else { format!("{v:.decimals$}") }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_keeps_limits() {
        let ax = Axis::linear(-0.5, 12.5, 8);
        assert_eq!(ax.min, -0.5);
        assert_eq!(ax.max, 12.5);
        assert!(ax.tick_positions.iter().all(|&t| (-0.5..=12.5).contains(&t)));
        assert_eq!(ax.tick_labels.first().map(String::as_str), Some("0"));
    }

    #[test]
    fn auto_linear_basic() {
        let ax = Axis::auto_linear(0.0, 10.0, 6);
        assert!(!ax.tick_positions.is_empty());
        assert!(ax.min <= 0.0);
        assert!(ax.max >= 10.0);
    }

    #[test]
    fn data_to_pixel_linear() {
        let ax = Axis::linear(0.0, 100.0, 5);
        assert_relative_eq!(ax.data_to_pixel(50.0, 0.0, 500.0), 250.0, epsilon = 1e-9);
    }

    #[test]
    fn log_ticks_inside_limits() {
        let ax = Axis::log(5e-2, 1e3);
        assert!(ax.log);
        let expected = [0.1, 1.0, 10.0, 100.0, 1000.0];
        assert_eq!(ax.tick_positions.len(), expected.len());
        for (t, e) in ax.tick_positions.iter().zip(expected) {
            assert_relative_eq!(*t, e, max_relative = 1e-12);
        }
        assert_eq!(ax.tick_labels[0], "10^{-1}");
        assert!(ax.minor_ticks.iter().all(|&m| m > 4.99e-2 && m < 1.001e3));
    }

    #[test]
    fn log_pixel_round_trip() {
        let ax = Axis::log(1.0, 1e4);
        let px = ax.data_to_pixel(100.0, 0.0, 400.0);
        assert_relative_eq!(px, 200.0, epsilon = 1e-9);
        assert_relative_eq!(ax.pixel_to_data(px, 0.0, 400.0), 100.0, max_relative = 1e-9);
    }

    #[test]
    fn wide_log_range_thins_labels() {
        let ax = Axis::log(5e-10, 1e2);
        assert!(ax.tick_positions.len() <= 11);
        assert!(!ax.accepts(0.0));
        assert!(ax.accepts(1e-3));
    }

    #[test]
    fn nice_step_values() {
        assert_relative_eq!(nice_step(3.2), 2.0);
        assert_relative_eq!(nice_step(0.7), 0.5);
        assert_relative_eq!(nice_step(15.0), 10.0);
        assert_relative_eq!(nice_step(4.5), 5.0);
        assert_relative_eq!(nice_step(1.2), 1.0);
    }
}

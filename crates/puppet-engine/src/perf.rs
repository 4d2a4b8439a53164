// perf.rs
//
// Frame timing measurements. Explicitly constructed with an injected
// clock and owned by the runner; no process-wide instance. The clock
// indirection exists so hosts can supply performance.now while tests
// supply a fake.

use std::collections::HashMap;

/// Frame budget for 60 Hz, in milliseconds.
const DEFAULT_BUDGET_MS: f64 = 16.7;

pub struct FrameProfiler {
    now: Box<dyn Fn() -> f64>,
    open: HashMap<String, f64>,
    metrics: HashMap<String, f64>,
    budget_ms: f64,
}

impl FrameProfiler {
    /// `now` returns a monotonic timestamp in milliseconds.
    pub fn new(now: Box<dyn Fn() -> f64>) -> Self {
        Self {
            now,
            open: HashMap::new(),
            metrics: HashMap::new(),
            budget_ms: DEFAULT_BUDGET_MS,
        }
    }

    pub fn set_budget_ms(&mut self, budget_ms: f64) {
        self.budget_ms = budget_ms;
    }

    /// Start measuring a named span.
    pub fn begin(&mut self, name: impl Into<String>) {
        let t = (self.now)();
        self.open.insert(name.into(), t);
    }

    /// Finish a span, record its duration, and return it. An `end`
    /// without a matching `begin` records nothing.
    pub fn end(&mut self, name: &str) -> Option<f64> {
        let start = self.open.remove(name)?;
        let duration = (self.now)() - start;
        self.metrics.insert(name.to_string(), duration);
        Some(duration)
    }

    /// Last recorded duration for a span.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// All recorded durations.
    pub fn report(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> =
            self.metrics.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Spans that blew the frame budget on their last measurement.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .metrics
            .iter()
            .filter(|(_, &ms)| ms > self.budget_ms)
            .map(|(name, ms)| {
                format!(
                    "{} took {:.2}ms (budget {:.1}ms)",
                    name, ms, self.budget_ms
                )
            })
            .collect();
        warnings.sort();
        warnings
    }

    /// Drop all recorded data, keeping the clock and budget.
    pub fn reset(&mut self) {
        self.open.clear();
        self.metrics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn fake_clock() -> (Rc<Cell<f64>>, FrameProfiler) {
        let time = Rc::new(Cell::new(0.0));
        let handle = Rc::clone(&time);
        let profiler = FrameProfiler::new(Box::new(move || handle.get()));
        (time, profiler)
    }

    #[test]
    fn measures_span_duration() {
        let (time, mut profiler) = fake_clock();
        profiler.begin("tick");
        time.set(12.5);
        let measured = profiler.end("tick").unwrap();
        assert!((measured - 12.5).abs() < 1e-9);
        assert_eq!(profiler.metric("tick"), Some(12.5));
    }

    #[test]
    fn end_without_begin_records_nothing() {
        let (_, mut profiler) = fake_clock();
        assert!(profiler.end("ghost").is_none());
        assert!(profiler.report().is_empty());
    }

    #[test]
    fn warnings_flag_budget_overruns() {
        let (time, mut profiler) = fake_clock();

        profiler.begin("tick");
        time.set(5.0);
        profiler.end("tick");
        assert!(profiler.warnings().is_empty());

        profiler.begin("tick");
        time.set(30.0);
        profiler.end("tick");
        let warnings = profiler.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("tick"));
    }

    #[test]
    fn reset_drops_metrics() {
        let (time, mut profiler) = fake_clock();
        profiler.begin("tick");
        time.set(1.0);
        profiler.end("tick");
        profiler.reset();
        assert!(profiler.report().is_empty());
    }
}

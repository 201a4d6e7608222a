use trackline_protocol::TraceEvent;

/// Anything with a start and an optional duration can be leveled.
///
/// A missing duration means an instantaneous event: it ends where it starts.
pub trait Interval {
    fn start(&self) -> f64;

    fn duration(&self) -> Option<f64>;

    fn end(&self) -> f64 {
        self.start() + self.duration().unwrap_or(0.0)
    }
}

impl Interval for TraceEvent {
    fn start(&self) -> f64 {
        self.ts
    }

    fn duration(&self) -> Option<f64> {
        self.dur
    }
}

impl<T: Interval + ?Sized> Interval for &T {
    fn start(&self) -> f64 {
        (**self).start()
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instants_end_where_they_start() {
        let mark = TraceEvent::instant("mark", 42.0);
        assert_eq!(mark.end(), 42.0);
        assert_eq!(TraceEvent::complete("task", 10.0, 5.0).end(), 15.0);
    }
}

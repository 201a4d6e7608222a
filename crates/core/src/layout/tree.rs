use super::interval::Interval;

/// Whether `events`, in start order, can be arranged into parent/child trees.
///
/// That fails only when two events cross:
///
/// ```text
/// |------- e1 ------|
///     |------- e2 --------|
/// ```
///
/// Neither can be the parent of the other. Events that never nest are fine;
/// they simply form separate trees.
pub fn can_build_trees<I: Interval>(events: impl IntoIterator<Item = I>) -> bool {
    let mut open_ends: Vec<f64> = Vec::new();
    for event in events {
        let start = event.start();
        let end = event.end();
        while open_ends.last().is_some_and(|&parent_end| start >= parent_end) {
            open_ends.pop();
        }
        if open_ends.last().is_some_and(|&parent_end| end > parent_end) {
            return false;
        }
        open_ends.push(end);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackline_protocol::TraceEvent;

    fn events(spans: &[(f64, f64)]) -> Vec<TraceEvent> {
        spans
            .iter()
            .map(|&(ts, dur)| TraceEvent::complete("e", ts, dur))
            .collect()
    }

    #[test]
    fn nested_and_disjoint_is_feasible() {
        assert!(can_build_trees(&events(&[(0.0, 10.0), (1.0, 5.0), (7.0, 2.0)])));
    }

    #[test]
    fn crossing_pair_is_not_feasible() {
        assert!(!can_build_trees(&events(&[(0.0, 10.0), (5.0, 10.0)])));
    }

    #[test]
    fn crossing_after_closed_sibling() {
        // (1,2) closes before (5,10) starts; (5,10) still crosses the root.
        assert!(!can_build_trees(&events(&[
            (0.0, 10.0),
            (1.0, 2.0),
            (5.0, 10.0)
        ])));
    }

    #[test]
    fn forest_of_disjoint_events() {
        assert!(can_build_trees(&events(&[(0.0, 1.0), (2.0, 1.0), (4.0, 1.0)])));
    }

    #[test]
    fn shared_end_is_containment() {
        assert!(can_build_trees(&events(&[(0.0, 10.0), (5.0, 5.0)])));
    }

    #[test]
    fn instants_are_always_contained() {
        let evs = vec![
            TraceEvent::complete("task", 0.0, 10.0),
            TraceEvent::instant("mark", 10.0),
            TraceEvent::instant("mark", 3.0),
        ];
        // Out-of-order input is accepted as-is.
        assert!(can_build_trees(&evs));
    }

    #[test]
    fn empty_is_feasible() {
        assert!(can_build_trees(Vec::<TraceEvent>::new()));
    }
}

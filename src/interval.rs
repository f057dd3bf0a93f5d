//! Time intervals and the endpoint selector used by the search primitives.
//!
//! Every interval carries a `start` and an `end` in seconds with `start <= end`. Zero-width
//! intervals are allowed (words of an episode's open-ended final line are stored that way).

use serde::Serialize;

/// Which endpoint of an interval a search compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// Anything with a start and an end time, in seconds.
pub trait Interval {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    /// The value of the selected endpoint.
    fn endpoint(&self, endpoint: Endpoint) -> f64 {
        match endpoint {
            Endpoint::Start => self.start(),
            Endpoint::End => self.end(),
        }
    }
}

/// A bare `[start, end]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl Span {
    pub fn new(start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            start_seconds,
            end_seconds,
        }
    }

    /// A zero-width span at `seconds`.
    pub fn point(seconds: f64) -> Self {
        Self::new(seconds, seconds)
    }

    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Move both endpoints inward by `epsilon`.
    ///
    /// Adjacent spans built from the same boundary value (`a.end == b.start`) no longer touch
    /// after shrinking, so a boundary-inclusive search at that value resolves to exactly one
    /// side. A span no wider than `2 * epsilon` collapses to its midpoint rather than inverting.
    pub fn shrink(self, epsilon: f64) -> Self {
        let width = self.duration();
        if width <= 2.0 * epsilon {
            return Self::point(self.start_seconds + width / 2.0);
        }

        Self::new(self.start_seconds + epsilon, self.end_seconds - epsilon)
    }
}

impl Interval for Span {
    fn start(&self) -> f64 {
        self.start_seconds
    }

    fn end(&self) -> f64 {
        self.end_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_selects_the_matching_field() {
        let span = Span::new(1.5, 4.0);
        assert_eq!(span.endpoint(Endpoint::Start), 1.5);
        assert_eq!(span.endpoint(Endpoint::End), 4.0);
    }

    #[test]
    fn shrink_moves_both_endpoints_inward() {
        let span = Span::new(4.0, 7.0).shrink(0.25);
        assert_eq!(span, Span::new(4.25, 6.75));
    }

    #[test]
    fn shrink_collapses_narrow_spans_to_their_midpoint() {
        let span = Span::new(2.0, 2.4).shrink(0.5);
        assert_eq!(span.start_seconds, span.end_seconds);
        assert!((span.start_seconds - 2.2).abs() < 1e-12);

        let point = Span::point(3.0).shrink(1e-10);
        assert_eq!(point, Span::point(3.0));
    }

    #[test]
    fn shrink_keeps_an_infinite_end() {
        let span = Span::new(10.0, f64::INFINITY).shrink(1e-10);
        assert!(span.start_seconds > 10.0);
        assert_eq!(span.end_seconds, f64::INFINITY);
    }
}

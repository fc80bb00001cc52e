/// A closed interval `[min, max]` produced by projecting a shape onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f64,
    pub max: f64,
}

impl Projection {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// True when the intervals share more than a single point.
    pub fn overlaps(&self, other: &Projection) -> bool {
        self.overlap(other) > 0.0
    }

    /// Length of the shared part of the two intervals. Negative values are
    /// the gap between disjoint intervals.
    pub fn overlap(&self, other: &Projection) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

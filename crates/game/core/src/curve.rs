//! Piecewise-linear float curves.
//!
//! Stand-in for authored animation curves: rotation rate over mapped speed,
//! and similar tuning data loaded from content files.

/// A single curve key.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Sorted keys with linear interpolation and clamped ends.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>"))]
pub struct FloatCurve {
    keys: Vec<CurveKey>,
}

impl FloatCurve {
    pub fn new(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        keys.into_iter()
            .map(|(time, value)| CurveKey { time, value })
            .collect::<Vec<_>>()
            .into()
    }

    /// A curve that evaluates to `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self::new([(0.0, value)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluates the curve at `time`. An empty curve yields `0.0`.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; guaranteed to exist and be > 0 here.
        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        a.value + (b.value - a.value) * ((time - a.time) / span)
    }
}

impl From<Vec<CurveKey>> for FloatCurve {
    fn from(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }
}

impl From<FloatCurve> for Vec<CurveKey> {
    fn from(curve: FloatCurve) -> Self {
        curve.keys
    }
}

use std::fmt;
use std::sync::Arc;

/// Where a force or moment component gets its value on each update.
#[derive(Clone)]
pub enum ValueSource {
    /// Fixed value, ignores the input.
    Constant(f64),
    /// Input multiplied by a gain.
    Scaled { gain: f64 },
    /// Arbitrary function of the input.
    Derived(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl ValueSource {
    pub fn derived(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Derived(Arc::new(f))
    }

    pub fn evaluate(&self, input: f64) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Scaled { gain } => gain * input,
            Self::Derived(f) => f(input),
        }
    }

    pub fn zero() -> Self {
        Self::Constant(0.0)
    }
}

impl Default for ValueSource {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Scaled { gain } => f.debug_struct("Scaled").field("gain", gain).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Evaluate three component sources against three inputs.
pub fn evaluate_components(sources: &[ValueSource; 3], inputs: [f64; 3]) -> [f64; 3] {
    [
        sources[0].evaluate(inputs[0]),
        sources[1].evaluate(inputs[1]),
        sources[2].evaluate(inputs[2]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants() {
        assert_eq!(ValueSource::Constant(3.0).evaluate(100.0), 3.0);
        assert_eq!(ValueSource::Scaled { gain: -2.0 }.evaluate(4.0), -8.0);
        let square = ValueSource::derived(|x| x * x);
        assert_eq!(square.evaluate(3.0), 9.0);
        assert_eq!(format!("{square:?}"), "Derived(..)");
    }

    #[test]
    fn test_component_evaluation() {
        let sources = [
            ValueSource::from(1.0),
            ValueSource::Scaled { gain: 10.0 },
            ValueSource::default(),
        ];
        assert_eq!(evaluate_components(&sources, [5.0, 0.5, 7.0]), [1.0, 5.0, 0.0]);
    }
}

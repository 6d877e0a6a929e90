//! Parameter introspection for discoverable processor parameters.
//!
//! [`ParameterInfo`] lets a control surface (CLI, GUI, hardware) enumerate a
//! processor's parameters, read their ranges and defaults, and set values by
//! index without knowing the concrete type. Each parameter is described by a
//! [`ParamDescriptor`].
//!
//! The system uses index-based access: indices are stable for the lifetime
//! of the processor instance, and implementations clamp incoming values to
//! the descriptor range so invalid configuration never reaches per-sample
//! code.
//!
//! Fully `no_std` compatible, no heap allocations.

/// Unit of a parameter value, used for display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    /// Decibels (dB) - for gain, threshold, and level parameters.
    Decibels,
    /// Milliseconds (ms) - for attack and release times.
    Milliseconds,
    /// Ratio (n:1) - for compression ratios.
    Ratio,
    /// Two-state switch stored as 0.0 / 1.0.
    Toggle,
    /// Discrete selector stored as an integer-valued float.
    Stepped,
}

impl ParamUnit {
    /// Unit suffix for display.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stretta_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Toggle.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
            ParamUnit::Toggle | ParamUnit::Stepped => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// Carries everything a control surface needs to render and validate one
/// parameter: display names, unit, range, default, and a recommended step
/// for encoder-style control.
///
/// The `short_name` should be 8 characters or less for hardware displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Threshold").
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value.
    pub min: f32,
    /// Maximum allowed value.
    pub max: f32,
    /// Default value when the processor is initialized.
    pub default: f32,
    /// Recommended increment for encoder-based control.
    pub step: f32,
}

impl ParamDescriptor {
    /// Descriptor for a dB-valued parameter (0.5 dB steps).
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
        }
    }

    /// Descriptor for a time parameter in milliseconds.
    pub const fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Milliseconds,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    /// Descriptor for a compression ratio.
    pub const fn ratio(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Ratio,
            min,
            max,
            default,
            step: 0.1,
        }
    }

    /// Descriptor for an on/off switch.
    pub const fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Toggle,
            min: 0.0,
            max: 1.0,
            default: if default_on { 1.0 } else { 0.0 },
            step: 1.0,
        }
    }

    /// Descriptor for a discrete selector with `count` choices.
    pub const fn stepped(
        name: &'static str,
        short_name: &'static str,
        count: u8,
        default: u8,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Stepped,
            min: 0.0,
            max: (count - 1) as f32,
            default: default as f32,
            step: 1.0,
        }
    }

    /// Clamp a value into this descriptor's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Trait for processors that expose introspectable parameters.
///
/// # Parameter Indexing
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the instance. Use [`param_count`](Self::param_count) to determine valid
/// indices; out-of-range indices are ignored (`set_param`) or return a
/// neutral value (`get_param` returns 0.0, `param_info` returns `None`).
///
/// # Thread Safety
///
/// This trait does not require thread safety; cross-thread parameter
/// exchange belongs in an atomic parameter store that calls into it from
/// one thread.
pub trait ParameterInfo {
    /// Number of parameters this processor exposes.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index` (0.0 if out of range).
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index`, clamping to the descriptor range.
    /// Out-of-range indices are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name)
                    || desc.short_name.eq_ignore_ascii_case(name)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_clamp() {
        let desc = ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -12.0);
        assert_eq!(desc.clamp(-80.0), -60.0);
        assert_eq!(desc.clamp(3.0), 0.0);
        assert_eq!(desc.clamp(-20.0), -20.0);
    }

    #[test]
    fn test_stepped_range() {
        let desc = ParamDescriptor::stepped("Mode", "Mode", 3, 2);
        assert_eq!(desc.min, 0.0);
        assert_eq!(desc.max, 2.0);
        assert_eq!(desc.default, 2.0);
    }

    #[test]
    fn test_toggle_defaults() {
        assert_eq!(ParamDescriptor::toggle("Analogue", "Analog", false).default, 0.0);
        assert_eq!(ParamDescriptor::toggle("Analogue", "Analog", true).default, 1.0);
    }

    #[test]
    fn test_find_param_by_name() {
        struct OneParam;
        impl ParameterInfo for OneParam {
            fn param_count(&self) -> usize {
                1
            }
            fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
                (index == 0)
                    .then(|| ParamDescriptor::ratio("Ratio", "Ratio", 1.0, 20.0, 4.0))
            }
            fn get_param(&self, _: usize) -> f32 {
                4.0
            }
            fn set_param(&mut self, _: usize, _: f32) {}
        }

        let p = OneParam;
        assert_eq!(p.find_param_by_name("ratio"), Some(0));
        assert_eq!(p.find_param_by_name("RATIO"), Some(0));
        assert_eq!(p.find_param_by_name("knee"), None);
    }
}

//! Animated effect parameters.
//!
//! A parameter is either static (one value) or driven by a sparse curve of
//! keyframes keyed by frame index. Curves are ordered maps, so keyframe
//! order is always by frame and writing to an existing frame overwrites it
//! (last write wins).
//!
//! Disabling animation discards the whole curve and collapses the parameter
//! back to its static value; re-enabling starts from an empty curve. The
//! disable-then-enable sequence is the idiom for replacing a curve outright.
//!
//! How the host interpolates between keyframes when rendering is not
//! modeled here; reads between keyframes hold the previous keyframe value.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::time::FrameIndex;

/// Deserialize a keyframe curve whose frame-index keys arrive as JSON
/// strings. Map keys are always strings in JSON, and the internally tagged
/// [`ParamValue`] enum buffers its content during deserialization, which
/// bypasses serde_json's built-in string-to-integer key conversion — so the
/// keys must be parsed back to [`FrameIndex`] explicitly.
fn deserialize_frame_keyed<'de, D, V>(deserializer: D) -> Result<BTreeMap<FrameIndex, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    use serde::de::{Error, MapAccess, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    struct FrameKeyedVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for FrameKeyedVisitor<V> {
        type Value = BTreeMap<FrameIndex, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map keyed by frame index")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = BTreeMap::new();
            while let Some(key) = map.next_key::<String>()? {
                let frame: FrameIndex = key.parse().map_err(A::Error::custom)?;
                out.insert(frame, map.next_value()?);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(FrameKeyedVisitor(PhantomData))
}

/// A 2D value (pixel position, corner point, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise scale, used for pixel-to-unit normalization.
    pub fn scaled(&self, sx: f64, sy: f64) -> Vec2 {
        Vec2 {
            x: self.x * sx,
            y: self.y * sy,
        }
    }
}

/// A scalar parameter value: static or keyframed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedScalar {
    animated: bool,
    static_value: f64,
    #[serde(default, deserialize_with = "deserialize_frame_keyed")]
    keyframes: BTreeMap<FrameIndex, f64>,
}

/// A 2D parameter value: static or keyframed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedVec2 {
    animated: bool,
    static_value: Vec2,
    #[serde(default, deserialize_with = "deserialize_frame_keyed")]
    keyframes: BTreeMap<FrameIndex, Vec2>,
}

macro_rules! animated_impl {
    ($ty:ident, $value:ty) => {
        impl $ty {
            /// A static (non-animated) parameter holding one value.
            pub fn with_value(value: $value) -> Self {
                Self {
                    animated: false,
                    static_value: value,
                    keyframes: BTreeMap::new(),
                }
            }

            pub fn is_animated(&self) -> bool {
                self.animated
            }

            /// Enable or disable animation. Disabling discards all keyframes.
            pub fn set_animated(&mut self, animated: bool) {
                if !animated {
                    self.keyframes.clear();
                }
                self.animated = animated;
            }

            /// Write a value at a frame: a keyframe when animated (creating
            /// or overwriting), the static value otherwise.
            pub fn set_at_frame(&mut self, frame: FrameIndex, value: $value) {
                if self.animated {
                    self.keyframes.insert(frame, value);
                } else {
                    self.static_value = value;
                }
            }

            /// Read the value effective at a frame: the keyframe at or
            /// nearest before the frame, or the static value.
            pub fn value_at_frame(&self, frame: FrameIndex) -> $value {
                if self.animated {
                    if let Some((_, v)) = self.keyframes.range(..=frame).next_back() {
                        return *v;
                    }
                }
                self.static_value
            }

            /// The static value (meaningful when not animated).
            pub fn static_value(&self) -> $value {
                self.static_value
            }

            /// The earliest keyframe, if any.
            pub fn first_keyframe(&self) -> Option<(FrameIndex, $value)> {
                self.keyframes.iter().next().map(|(f, v)| (*f, *v))
            }

            /// Keyframes in frame order.
            pub fn keyframes(&self) -> impl Iterator<Item = (FrameIndex, $value)> + '_ {
                self.keyframes.iter().map(|(f, v)| (*f, *v))
            }

            pub fn keyframe_count(&self) -> usize {
                self.keyframes.len()
            }
        }
    };
}

animated_impl!(AnimatedScalar, f64);
animated_impl!(AnimatedVec2, Vec2);

/// A discrete-choice parameter with an enumerated option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceParam {
    pub options: Vec<String>,
    pub selected: usize,
}

impl ChoiceParam {
    pub fn new(options: Vec<String>, selected: usize) -> Self {
        Self { options, selected }
    }

    /// Select an option by index; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.options.len() {
            self.selected = index;
        }
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected).map(String::as_str)
    }
}

/// Closed set of parameter kinds. Dispatch is by exhaustive match; the
/// engines always check the kind before touching a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamValue {
    Scalar(AnimatedScalar),
    Vector2(AnimatedVec2),
    Boolean { value: bool },
    Text { value: String },
    Choice(ChoiceParam),
}

impl ParamValue {
    /// Short kind label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Scalar(_) => "scalar",
            ParamValue::Vector2(_) => "vector2",
            ParamValue::Boolean { .. } => "boolean",
            ParamValue::Text { .. } => "text",
            ParamValue::Choice(_) => "choice",
        }
    }

    /// Whether the value carries an active keyframe curve.
    pub fn is_animated(&self) -> bool {
        match self {
            ParamValue::Scalar(s) => s.is_animated(),
            ParamValue::Vector2(v) => v.is_animated(),
            ParamValue::Boolean { .. } | ParamValue::Text { .. } | ParamValue::Choice(_) => false,
        }
    }
}

/// A named effect parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Host-assigned name; lookups are case-sensitive.
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Scalar(AnimatedScalar::with_value(value)),
        }
    }

    pub fn vector2(name: impl Into<String>, value: Vec2) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Vector2(AnimatedVec2::with_value(value)),
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Text {
                value: value.into(),
            },
        }
    }

    pub fn choice(name: impl Into<String>, options: Vec<String>, selected: usize) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::Choice(ChoiceParam::new(options, selected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_scalar_set_and_read() {
        let mut p = AnimatedScalar::with_value(1.0);
        assert!(!p.is_animated());
        p.set_at_frame(10, 2.5);
        assert_eq!(p.value_at_frame(0), 2.5);
        assert_eq!(p.keyframe_count(), 0);
    }

    #[test]
    fn test_animated_scalar_keyframes_ordered() {
        let mut p = AnimatedScalar::with_value(1.0);
        p.set_animated(true);
        p.set_at_frame(10, 1.5);
        p.set_at_frame(0, 0.5);
        p.set_at_frame(4, 1.0);
        let frames: Vec<_> = p.keyframes().map(|(f, _)| f).collect();
        assert_eq!(frames, vec![0, 4, 10]);
    }

    #[test]
    fn test_last_write_wins_per_frame() {
        let mut p = AnimatedScalar::with_value(0.0);
        p.set_animated(true);
        p.set_at_frame(12, 1.0);
        p.set_at_frame(12, 2.0);
        assert_eq!(p.keyframe_count(), 1);
        assert_eq!(p.value_at_frame(12), 2.0);
    }

    #[test]
    fn test_disable_animation_discards_curve() {
        let mut p = AnimatedScalar::with_value(1.0);
        p.set_animated(true);
        p.set_at_frame(0, 0.5);
        p.set_at_frame(5, 1.5);
        p.set_animated(false);
        assert_eq!(p.keyframe_count(), 0);
        assert_eq!(p.value_at_frame(5), 1.0);
    }

    #[test]
    fn test_value_at_frame_holds_previous_keyframe() {
        let mut p = AnimatedVec2::with_value(Vec2::default());
        p.set_animated(true);
        p.set_at_frame(0, Vec2::new(1.0, 1.0));
        p.set_at_frame(10, Vec2::new(2.0, 2.0));
        assert_eq!(p.value_at_frame(7), Vec2::new(1.0, 1.0));
        assert_eq!(p.value_at_frame(10), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_choice_select_ignores_out_of_range() {
        let mut c = ChoiceParam::new(vec!["on".into(), "fill".into(), "free".into()], 0);
        c.select(7);
        assert_eq!(c.selected, 0);
        c.select(2);
        assert_eq!(c.selected_option(), Some("free"));
    }

    #[test]
    fn test_vec2_scaled() {
        let v = Vec2::new(50.0, 20.0).scaled(1.0 / 200.0, 1.0 / 100.0);
        assert!((v.x - 0.25).abs() < 1e-9);
        assert!((v.y - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_param_value_serde_roundtrip() {
        let p = Parameter::vector2("CornerTL", Vec2::new(0.1, 0.2));
        let json = serde_json::to_string(&p).unwrap();
        let parsed: Parameter = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }
}

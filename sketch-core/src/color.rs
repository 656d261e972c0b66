use crate::util::{FiniteF32, FiniteF32Error};

/// A straight (not premultiplied) RGBA color, each channel nominally in `[0, 1]`.
///
/// Strokes carry their opacity separately as `line_alpha`, so the alpha channel here is the
/// color's own alpha and is multiplied with it at draw time.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Zeroable, Debug)]
pub struct Color([FiniteF32; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Create a color from straight channels. Channels are clamped to `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        let channel = |v: f32| FiniteF32::new(v).and_then(|v| FiniteF32::new(v.get().clamp(0.0, 1.0)));
        Ok(Self([channel(r)?, channel(g)?, channel(b)?, channel(a)?]))
    }
    pub fn from_array([r, g, b, a]: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Self::new(r, g, b, a)
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    /// Alpha of the color itself, before any stroke alpha is applied.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.0[3].get()
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
// Safety: FiniteF32 is NoUninit, arrays have no uninit bytes of their own.
unsafe impl bytemuck::NoUninit for Color {}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_array().serialize(serializer)
    }
}
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <[f32; 4]>::deserialize(deserializer)?;
        Self::from_array(raw).map_err(serde::de::Error::custom)
    }
}

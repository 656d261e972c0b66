/// How a stroke is composited onto the cache image.
#[derive(
    strum::AsRefStr,
    PartialEq,
    Eq,
    strum::EnumIter,
    Copy,
    Clone,
    Hash,
    Debug,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(u8)]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Clears the destination wherever the stroke covers, for eraser-type pens.
    Clear,
}

/// Transform applied to the content of a zoomable surface when it is drawn.
///
/// Scaling pivots around the center of the surface, and the translation is
/// applied after scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphicsLayer {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translation_x: f32,
    pub translation_y: f32,
}

impl GraphicsLayer {
    pub const IDENTITY: GraphicsLayer = GraphicsLayer {
        scale_x: 1.0,
        scale_y: 1.0,
        translation_x: 0.0,
        translation_y: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for GraphicsLayer {
    fn default() -> Self {
        Self::IDENTITY
    }
}

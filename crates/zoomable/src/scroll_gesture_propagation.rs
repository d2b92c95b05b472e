/// When a one-finger drag on zoomed content goes to an enclosing scrollable
/// instead of panning the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollGesturePropagation {
    /// The drag goes to the ancestor once the content rests against the edge
    /// it is dragged toward.
    #[default]
    ContentEdge,
    /// The drag goes to the ancestor whenever the content is not zoomed.
    NotZoomed,
}

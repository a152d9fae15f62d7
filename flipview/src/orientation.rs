//! Flip axis selection.

/// Axis along which drags drive the flip, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Pages rotate about the horizontal axis; vertical drags flip.
    #[default]
    Vertical,
    /// Pages rotate about the vertical axis; horizontal drags flip.
    Horizontal,
}

impl Orientation {
    /// Component of `(x, y)` along the flip axis.
    pub(crate) fn along(self, x: f32, y: f32) -> f32 {
        match self {
            Orientation::Vertical => y,
            Orientation::Horizontal => x,
        }
    }

    /// Component of `(x, y)` across the flip axis.
    pub(crate) fn across(self, x: f32, y: f32) -> f32 {
        match self {
            Orientation::Vertical => x,
            Orientation::Horizontal => y,
        }
    }

    /// Viewport extent along the flip axis.
    pub(crate) fn extent(self, width: f32, height: f32) -> f32 {
        self.along(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_components() {
        assert_eq!(Orientation::Vertical.along(3.0, 7.0), 7.0);
        assert_eq!(Orientation::Vertical.across(3.0, 7.0), 3.0);
        assert_eq!(Orientation::Horizontal.along(3.0, 7.0), 3.0);
        assert_eq!(Orientation::Horizontal.across(3.0, 7.0), 7.0);
        assert_eq!(Orientation::Horizontal.extent(800.0, 600.0), 800.0);
        assert_eq!(Orientation::Vertical.extent(800.0, 600.0), 600.0);
    }
}

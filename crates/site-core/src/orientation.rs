/// Device orientation as inferred from viewport proportions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Classify a viewport. Square viewports count as portrait.
    pub fn from_viewport(width: f32, height: f32) -> Self {
        if height < width {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    pub fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_viewport_is_landscape() {
        assert_eq!(Orientation::from_viewport(800.0, 600.0), Orientation::Landscape);
    }

    #[test]
    fn tall_and_square_viewports_are_portrait() {
        assert_eq!(Orientation::from_viewport(320.0, 568.0), Orientation::Portrait);
        assert_eq!(Orientation::from_viewport(500.0, 500.0), Orientation::Portrait);
    }

    #[test]
    fn labels_match_variants() {
        assert_eq!(Orientation::Landscape.label(), "landscape");
        assert_eq!(Orientation::Portrait.label(), "portrait");
    }
}

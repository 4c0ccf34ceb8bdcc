/// Remote pixel-buffer dimensions.
///
/// Source of truth for the screen's aspect ratio. Replaced wholesale on a
/// resize notification, never partially mutated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramebufferDescriptor {
    pub width: u32,
    pub height: u32,
}

/// Fallback dimensions when the remote session reports nonsense.
pub const FALLBACK_FRAMEBUFFER: FramebufferDescriptor = FramebufferDescriptor {
    width: 800,
    height: 600,
};

impl FramebufferDescriptor {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Replace zero dimensions with the 800x600 fallback.
    pub fn sanitized(self) -> Self {
        if self.width == 0 || self.height == 0 {
            FALLBACK_FRAMEBUFFER
        } else {
            self
        }
    }

    pub fn aspect(self) -> f64 {
        let s = self.sanitized();
        f64::from(s.width) / f64::from(s.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_FRAMEBUFFER, FramebufferDescriptor};

    #[test]
    fn zero_dimensions_fall_back() {
        assert_eq!(FramebufferDescriptor::new(0, 600).sanitized(), FALLBACK_FRAMEBUFFER);
        assert_eq!(FramebufferDescriptor::new(800, 0).sanitized(), FALLBACK_FRAMEBUFFER);
        let ok = FramebufferDescriptor::new(1920, 1080);
        assert_eq!(ok.sanitized(), ok);
    }

    #[test]
    fn aspect_matches_dimensions() {
        let fb = FramebufferDescriptor::new(800, 600);
        assert!((fb.aspect() - 800.0 / 600.0).abs() < 1e-12);
    }
}

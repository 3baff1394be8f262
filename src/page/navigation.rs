/// Viewport width below which outside interaction collapses the menu
pub const NAV_BREAKPOINT: u16 = 768;

/// Navigation menu visibility. Inert until wired to a page that has
/// navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavMenu {
    wired: bool,
    open: bool,
    breakpoint: u16,
}

impl Default for NavMenu {
    fn default() -> Self {
        Self::new(NAV_BREAKPOINT)
    }
}

impl NavMenu {
    pub fn new(breakpoint: u16) -> Self {
        Self {
            wired: false,
            open: false,
            breakpoint,
        }
    }

    pub fn wire(&mut self) {
        self.wired = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip visibility; returns the new state
    pub fn toggle(&mut self) -> bool {
        if self.wired {
            self.open = !self.open;
        }
        self.open
    }

    /// Interaction outside the menu. Returns whether it collapsed.
    pub fn outside_interaction(&mut self, viewport_width: u16) -> bool {
        if self.wired && self.open && viewport_width < self.breakpoint {
            self.open = false;
            return true;
        }
        false
    }
}

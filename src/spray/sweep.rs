/// Horizontal sweep direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SweepDirection {
    /// Nozzle moves from `x = 0` towards `x = width`.
    #[default]
    #[serde(rename = "ltr", alias = "left-to-right")]
    LeftToRight,
    /// Nozzle moves from `x = width` towards `x = 0`.
    #[serde(rename = "rtl", alias = "right-to-left")]
    RightToLeft,
}

impl SweepDirection {
    /// `+1.0` for left-to-right, `-1.0` for right-to-left.
    pub fn sign(self) -> f64 {
        match self {
            Self::LeftToRight => 1.0,
            Self::RightToLeft => -1.0,
        }
    }

    /// The other direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
        }
    }

    /// Boundary a sweep in this direction starts from, on a surface `width` wide.
    pub fn start_boundary(self, width: f64) -> f64 {
        match self {
            Self::LeftToRight => 0.0,
            Self::RightToLeft => width,
        }
    }

    /// Boundary a sweep in this direction ends at.
    pub fn end_boundary(self, width: f64) -> f64 {
        self.reversed().start_boundary(width)
    }
}

/// Result of advancing the nozzle by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Still inside the sweep.
    Moving,
    /// Hit the far boundary with looping enabled; direction flipped.
    Reversed,
    /// Hit the far boundary with looping disabled; the run should stop.
    Finished,
}

/// Nozzle position and motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    /// Current nozzle x in logical pixels.
    pub x: f64,
    /// Fixed nozzle y (vertical centre).
    pub y: f64,
    /// Current direction. May be overwritten at any time.
    pub direction: SweepDirection,
    speed: f64,
    looping: bool,
}

impl Sweep {
    /// Create a sweep parked at the left boundary.
    pub fn new(speed: f64, looping: bool) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            direction: SweepDirection::LeftToRight,
            speed,
            looping,
        }
    }

    /// Sweep speed in logical pixels per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the sweep bounces between boundaries.
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Park the nozzle at the start boundary of the current direction, vertically centred.
    pub fn park(&mut self, width: f64, height: f64) {
        self.x = self.direction.start_boundary(width);
        self.y = height * 0.5;
    }

    /// Move by `speed * dt` in the current direction and resolve boundary transitions.
    ///
    /// Whatever the overshoot, `x` ends inside `[0, width]`.
    pub fn advance(&mut self, dt: f64, width: f64) -> SweepOutcome {
        self.x += self.direction.sign() * self.speed * dt;

        let reached = match self.direction {
            SweepDirection::LeftToRight => self.x >= width,
            SweepDirection::RightToLeft => self.x <= 0.0,
        };

        let outcome = if !reached {
            SweepOutcome::Moving
        } else {
            self.x = self.direction.end_boundary(width);
            if self.looping {
                self.direction = self.direction.reversed();
                SweepOutcome::Reversed
            } else {
                SweepOutcome::Finished
            }
        };

        // Externally forced directions can leave the nozzle outside the surface after a resize.
        self.x = self.x.max(0.0).min(width);
        outcome
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spray/sweep.rs"]
mod tests;

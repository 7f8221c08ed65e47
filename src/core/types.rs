//! Value types passed from operational modes to the actuator layer.

/// One value per wheel of a four-wheeled chassis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelSet<T> {
    /// Front-left
    pub fl: T,
    /// Front-right
    pub fr: T,
    /// Rear-left
    pub rl: T,
    /// Rear-right
    pub rr: T,
}

impl<T: Copy> WheelSet<T> {
    pub const fn new(fl: T, fr: T, rl: T, rr: T) -> Self {
        Self { fl, fr, rl, rr }
    }

    /// Values in `[fl, fr, rl, rr]` order
    #[inline]
    pub fn to_array(self) -> [T; 4] {
        [self.fl, self.fr, self.rl, self.rr]
    }
}

/// Linear and angular velocity command (x, y, z components)
///
/// Linear in m/s, angular in rad/s, following the ROS `geometry_msgs/Twist`
/// convention.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Twist {
    pub linear: [f64; 3],
    pub angular: [f64; 3],
}

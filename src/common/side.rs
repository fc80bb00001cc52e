use crate::math::Vec2;

/// Which side of a collider a contact happened on, in screen terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Side whose outward direction best matches `direction`.
    /// Ties resolve in the order left, right, top, bottom.
    pub fn from_direction(direction: Vec2) -> Side {
        if direction == Vec2::ZERO || !direction.is_finite() {
            return Side::None;
        }
        let candidates = [
            (Vec2::LEFT, Side::Left),
            (Vec2::RIGHT, Side::Right),
            (Vec2::UP, Side::Top),
            (Vec2::DOWN, Side::Bottom),
        ];
        let mut best = Side::None;
        let mut best_dot = f64::NEG_INFINITY;
        for (axis, side) in candidates {
            let d = axis.dot(direction);
            if d > best_dot {
                best_dot = d;
                best = side;
            }
        }
        best
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::None => Side::None,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

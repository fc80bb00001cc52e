//! Defines physical material properties.

/// Surface response of a body during realistic solving.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Coefficient of restitution. Range [0, 1].
    /// The bouncier of the two participants wins.
    pub bounciness: f64,
    /// Coulomb friction coefficient. Range [0, infinity).
    /// The smaller of the two participants wins.
    pub friction: f64,
}

impl Material {
    /// Creates a new material, clamping both values into their valid ranges.
    pub fn new(bounciness: f64, friction: f64) -> Self {
        Material {
            bounciness: bounciness.clamp(0.0, 1.0),
            friction: friction.max(0.0),
        }
    }

    /// Restitution used for a contact between two materials.
    pub fn combined_bounciness(&self, other: &Material) -> f64 {
        self.bounciness.max(other.bounciness)
    }

    /// Friction used for a contact between two materials.
    pub fn combined_friction(&self, other: &Material) -> f64 {
        self.friction.min(other.friction)
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            bounciness: 0.2,
            friction: 0.99,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_clamps() {
        let m = Material::new(1.5, -2.0);
        assert_eq!(m.bounciness, 1.0);
        assert_eq!(m.friction, 0.0);
    }

    #[test]
    fn test_material_combination_rules() {
        let rubber = Material::new(0.8, 0.9);
        let ice = Material::new(0.1, 0.05);
        assert_eq!(rubber.combined_bounciness(&ice), 0.8);
        assert_eq!(rubber.combined_friction(&ice), 0.05);
        assert_eq!(ice.combined_friction(&rubber), 0.05);
    }
}

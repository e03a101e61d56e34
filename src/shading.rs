//! The shading-mode state machine and its shader source table.

use core::fmt;

/// GLSL sources for one shading mode, compiled and linked on activation.
pub struct ShaderPair {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// One of the three fixed visual styles applied to all drawn geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadeMode {
    SolidBlue,
    Gradient,
    SolidRed,
}

// Mode -> (vertex stage, fragment stage), indexed by discriminant. The
// renderer never branches on the mode; it only consumes the pair. Both flat
// modes share the plain passthrough vertex stage.
const SHADER_TABLE: [ShaderPair; ShadeMode::ALL.len()] = [
    ShaderPair {
        vertex: include_str!("shaders/solid.vert"),
        fragment: include_str!("shaders/solid_blue.frag"),
    },
    ShaderPair {
        vertex: include_str!("shaders/gradient.vert"),
        fragment: include_str!("shaders/gradient.frag"),
    },
    ShaderPair {
        vertex: include_str!("shaders/solid.vert"),
        fragment: include_str!("shaders/solid_red.frag"),
    },
];

impl ShadeMode {
    /// All modes, in toggle order.
    pub const ALL: [ShadeMode; 3] = [
        ShadeMode::SolidBlue,
        ShadeMode::Gradient,
        ShadeMode::SolidRed,
    ];

    /// Cyclic successor: SolidBlue -> Gradient -> SolidRed -> SolidBlue.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// The GLSL pair this mode renders with.
    pub fn sources(self) -> &'static ShaderPair {
        &SHADER_TABLE[self as usize]
    }
}

impl Default for ShadeMode {
    fn default() -> Self {
        ShadeMode::SolidBlue
    }
}

impl fmt::Display for ShadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SolidBlue => write!(f, "Solid Blue"),
            Self::Gradient => write!(f, "Gradient"),
            Self::SolidRed => write!(f, "Solid Red"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_mode_is_solid_blue() {
        assert_eq!(ShadeMode::default(), ShadeMode::SolidBlue);
    }

    #[test]
    fn toggling_cycles_blue_gradient_red() {
        let mode = ShadeMode::default().next();
        assert_eq!(mode, ShadeMode::Gradient);
        let mode = mode.next();
        assert_eq!(mode, ShadeMode::SolidRed);
        let mode = mode.next();
        assert_eq!(mode, ShadeMode::SolidBlue);
    }

    #[test]
    fn n_toggles_land_on_initial_plus_n_mod_three() {
        for start in ShadeMode::ALL {
            let mut mode = start;
            for n in 1..=9 {
                mode = mode.next();
                let expected = ShadeMode::ALL[(start as usize + n) % ShadeMode::ALL.len()];
                assert_eq!(mode, expected);
            }
        }
    }

    #[test]
    fn every_mode_declares_the_position_attribute() {
        for mode in ShadeMode::ALL {
            assert!(
                mode.sources().vertex.contains("in vec2 position"),
                "{} is missing the position attribute",
                mode
            );
        }
    }

    #[test]
    fn color_attribute_appears_only_in_the_gradient_pair() {
        for mode in ShadeMode::ALL {
            let declares_color = mode.sources().vertex.contains("in vec3 color");
            assert_eq!(declares_color, mode == ShadeMode::Gradient);
        }
    }

    #[test]
    fn flat_modes_share_a_vertex_stage_but_not_a_fragment_stage() {
        let blue = ShadeMode::SolidBlue.sources();
        let red = ShadeMode::SolidRed.sources();
        assert_eq!(blue.vertex, red.vertex);
        assert_ne!(blue.fragment, red.fragment);
        assert_ne!(blue.fragment, ShadeMode::Gradient.sources().fragment);
    }
}

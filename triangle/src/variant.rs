use clap::ValueEnum;
use harness::frame::{z_rotation, FrameLoop};
use harness::math::Vec3;

/// Which of the two triangle programs to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Triangle spun about Z through the `gWorld` uniform.
    Rotating,
    /// Triangle drawn where its vertices put it.
    Static,
}

const ROTATING_VERTICES: [Vec3; 3] = [
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

const STATIC_VERTICES: [Vec3; 3] = [
    Vec3::new(-0.75, -0.75, 0.0),
    Vec3::new(0.75, -0.75, 0.0),
    Vec3::new(0.0, 0.75, 0.75),
];

pub const WORLD_UNIFORM: &str = "gWorld";

impl Variant {
    pub fn vertices(self) -> &'static [Vec3] {
        match self {
            Variant::Rotating => &ROTATING_VERTICES,
            Variant::Static => &STATIC_VERTICES,
        }
    }

    pub fn clear_color(self) -> [f32; 3] {
        match self {
            Variant::Rotating => [0.0, 0.0, 0.0],
            Variant::Static => [0.0, 0.0, 0.4],
        }
    }

    pub fn vertex_shader(self) -> &'static str {
        match self {
            Variant::Rotating => concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/world.vert"),
            Variant::Static => concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/static.vert"),
        }
    }

    pub fn fragment_shader(self) -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/triangle.frag")
    }

    /// Name of the matrix uniform driven each frame, if any.
    pub fn world_uniform(self) -> Option<&'static str> {
        match self {
            Variant::Rotating => Some(WORLD_UNIFORM),
            Variant::Static => None,
        }
    }

    pub fn frame_loop(self, step: f64) -> FrameLoop {
        let frame_loop = FrameLoop::new(step);
        match self {
            Variant::Rotating => frame_loop.with_transform(z_rotation()),
            Variant::Static => frame_loop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn both_variants_draw_one_triangle() {
        assert_eq!(Variant::Rotating.vertices().len(), 3);
        assert_eq!(Variant::Static.vertices().len(), 3);
    }

    #[test]
    fn only_rotating_variant_uses_the_uniform() {
        assert_eq!(Variant::Rotating.world_uniform(), Some("gWorld"));
        assert_eq!(Variant::Static.world_uniform(), None);
    }

    #[test]
    fn bundled_shaders_exist() {
        for variant in [Variant::Rotating, Variant::Static] {
            assert!(Path::new(variant.vertex_shader()).is_file());
            assert!(Path::new(variant.fragment_shader()).is_file());
        }
    }

    #[test]
    fn world_shader_declares_the_uniform() {
        let code = std::fs::read_to_string(Variant::Rotating.vertex_shader()).unwrap();
        assert!(code.contains(&format!("uniform mat4 {WORLD_UNIFORM}")));
    }
}

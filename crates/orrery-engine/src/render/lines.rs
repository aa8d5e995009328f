//! CPU line tessellation for draw commands and the reference grid.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::paint::Color;

use super::list::{DrawCmd, DrawList};

/// Segments per great circle of a wire sphere.
pub const SPHERE_SEGMENTS: usize = 24;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x4  // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[inline]
pub fn push_line(out: &mut Vec<LineVertex>, a: Vec3, b: Vec3, color: Color) {
    let color = color.to_array();
    out.push(LineVertex { pos: a.to_array(), color });
    out.push(LineVertex { pos: b.to_array(), color });
}

/// Ground grid on the XZ plane centered at the origin.
///
/// `cells` lines are laid out in each direction (rounded down to an even count),
/// `spacing` world units apart. The two center lines use `axis_color`.
pub fn grid(out: &mut Vec<LineVertex>, cells: u32, spacing: f32, color: Color, axis_color: Color) {
    let half = (cells / 2) as i32;
    let extent = half as f32 * spacing;

    for i in -half..=half {
        let offset = i as f32 * spacing;
        let c = if i == 0 { axis_color } else { color };
        push_line(out, Vec3::new(offset, 0.0, -extent), Vec3::new(offset, 0.0, extent), c);
        push_line(out, Vec3::new(-extent, 0.0, offset), Vec3::new(extent, 0.0, offset), c);
    }
}

/// Appends the line geometry of one command.
pub fn tessellate(out: &mut Vec<LineVertex>, cmd: &DrawCmd) {
    match cmd {
        DrawCmd::Line { from, to, color } => push_line(out, *from, *to, *color),
        DrawCmd::Cube { transform, color } => wire_cube(out, transform, *color),
        DrawCmd::Sphere { transform, color } => wire_sphere(out, transform, *color),
    }
}

pub fn tessellate_list(out: &mut Vec<LineVertex>, list: &DrawList) {
    for cmd in list.items() {
        tessellate(out, cmd);
    }
}

fn wire_cube(out: &mut Vec<LineVertex>, transform: &Mat4, color: Color) {
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 3), (3, 2), (2, 0), // -z face
        (4, 5), (5, 7), (7, 6), (6, 4), // +z face
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];

    // Corner bits: x = bit 0, y = bit 1, z = bit 2.
    let corners: [Vec3; 8] = std::array::from_fn(|i| {
        let local = Vec3::new(
            if i & 1 == 0 { -0.5 } else { 0.5 },
            if i & 2 == 0 { -0.5 } else { 0.5 },
            if i & 4 == 0 { -0.5 } else { 0.5 },
        );
        transform.transform_point3(local)
    });

    for (a, b) in EDGES {
        push_line(out, corners[a], corners[b], color);
    }
}

fn wire_sphere(out: &mut Vec<LineVertex>, transform: &Mat4, color: Color) {
    let step = std::f32::consts::TAU / SPHERE_SEGMENTS as f32;
    let circles: [fn(f32, f32) -> Vec3; 3] = [
        |c, s| Vec3::new(c, s, 0.0),
        |c, s| Vec3::new(0.0, c, s),
        |c, s| Vec3::new(c, 0.0, s),
    ];

    for circle in circles {
        for i in 0..SPHERE_SEGMENTS {
            let a0 = i as f32 * step;
            let a1 = a0 + step;
            let p0 = transform.transform_point3(circle(a0.cos(), a0.sin()));
            let p1 = transform.transform_point3(circle(a1.cos(), a1.sin()));
            push_line(out, p0, p1, color);
        }
    }
}

//! The fixed scene: 19 clip-space vertices shared by four shapes, with one
//! RGB color per vertex for the gradient mode.

use bytemuck::{Pod, Zeroable};

/// A 2-D vertex position in clip space.
// Field reads happen GPU-side, through the byte cast at upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[allow(dead_code)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

/// Per-vertex RGB color, consumed by the gradient program only.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[allow(dead_code)]
pub struct VertexColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

const fn v(x: f32, y: f32) -> Vertex {
    Vertex { x, y }
}

const fn rgb(r: f32, g: f32, b: f32) -> VertexColor {
    VertexColor { r, g, b }
}

/// How one shape range is rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    TriangleList,
    TriangleStrip,
    TriangleFan,
    Polygon,
}

/// A contiguous sub-range of the vertex list drawn as one primitive batch.
pub struct ShapeRange {
    pub name: &'static str,
    pub first: i32,
    pub count: i32,
    pub primitive: Primitive,
}

#[rustfmt::skip]
pub const VERTEX_POSITIONS: [Vertex; 19] = [
    // triangle
    v(-1.0, 0.2), v(-0.6, 1.0), v(-0.2, 0.2),
    // quad, in strip order
    v(0.2, 0.2), v(1.0, 0.2), v(0.2, 0.8), v(1.0, 0.8),
    // fan
    v(0.6, -1.0), v(0.2, -0.8), v(0.3, -0.5), v(0.6, -0.3), v(0.89, -0.5), v(0.99, -0.8),
    // pentagon, closed by repeating its first vertex
    v(-1.0, -0.5), v(-0.57, -0.2), v(-0.14, -0.5), v(-0.3, -1.0), v(-0.83, -1.0), v(-1.0, -0.5),
];

/// One color per vertex, cycling a six-color palette across the whole list.
#[rustfmt::skip]
pub const VERTEX_COLORS: [VertexColor; 19] = [
    // triangle
    rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0),
    // quad
    rgb(1.0, 1.0, 0.0), rgb(1.0, 0.0, 1.0), rgb(0.0, 1.0, 1.0), rgb(1.0, 0.0, 0.0),
    // fan
    rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0), rgb(1.0, 1.0, 0.0), rgb(1.0, 0.0, 1.0), rgb(0.0, 1.0, 1.0), rgb(1.0, 0.0, 0.0),
    // pentagon
    rgb(0.0, 1.0, 0.0), rgb(0.0, 0.0, 1.0), rgb(1.0, 1.0, 0.0), rgb(1.0, 0.0, 1.0), rgb(0.0, 1.0, 1.0), rgb(1.0, 0.0, 0.0),
];

/// Shape ranges in draw order. The pentagon is fan-like data but is drawn
/// with the filled polygon primitive; that primitive choice is observable
/// behavior and stays.
pub const SHAPES: [ShapeRange; 4] = [
    ShapeRange { name: "triangle", first: 0, count: 3, primitive: Primitive::TriangleList },
    ShapeRange { name: "quad", first: 3, count: 4, primitive: Primitive::TriangleStrip },
    ShapeRange { name: "fan", first: 7, count: 6, primitive: Primitive::TriangleFan },
    ShapeRange { name: "pentagon", first: 13, count: 6, primitive: Primitive::Polygon },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_color_per_vertex() {
        assert_eq!(VERTEX_POSITIONS.len(), 19);
        assert_eq!(VERTEX_COLORS.len(), VERTEX_POSITIONS.len());
    }

    #[test]
    fn shapes_partition_the_vertex_list() {
        let mut next = 0;
        for shape in &SHAPES {
            assert_eq!(shape.first, next, "{} starts at the wrong index", shape.name);
            assert!(shape.count > 0);
            next = shape.first + shape.count;
        }
        assert_eq!(next as usize, VERTEX_POSITIONS.len());
    }

    #[test]
    fn each_range_keeps_its_primitive() {
        let expected = [
            ("triangle", 0, 3, Primitive::TriangleList),
            ("quad", 3, 4, Primitive::TriangleStrip),
            ("fan", 7, 6, Primitive::TriangleFan),
            ("pentagon", 13, 6, Primitive::Polygon),
        ];
        for (shape, (name, first, count, primitive)) in SHAPES.iter().zip(expected) {
            assert_eq!(shape.name, name);
            assert_eq!(shape.first, first);
            assert_eq!(shape.count, count);
            assert_eq!(shape.primitive, primitive);
        }
    }

    #[test]
    fn positions_stay_in_clip_space() {
        for vertex in &VERTEX_POSITIONS {
            assert!(vertex.x >= -1.0 && vertex.x <= 1.0);
            assert!(vertex.y >= -1.0 && vertex.y <= 1.0);
        }
    }

    #[test]
    fn colors_cycle_a_distinct_six_color_palette() {
        for i in 0..6 {
            for j in i + 1..6 {
                assert_ne!(VERTEX_COLORS[i], VERTEX_COLORS[j]);
            }
        }
        for (i, color) in VERTEX_COLORS.iter().enumerate() {
            assert_eq!(color, &VERTEX_COLORS[i % 6]);
            for channel in [color.r, color.g, color.b] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn pentagon_closes_on_its_first_vertex() {
        let pentagon = &SHAPES[3];
        let first = VERTEX_POSITIONS[pentagon.first as usize];
        let last = VERTEX_POSITIONS[(pentagon.first + pentagon.count - 1) as usize];
        assert_eq!(first, last);
    }
}

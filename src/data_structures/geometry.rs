//! Primitive shape descriptors and their tessellation.
//!
//! A [`Geometry`] is a small value describing a shape (cylinder, box, sphere,
//! circle or flat polygon). Meshes keep the descriptor and only turn it into
//! vertices and indices when uploaded, so every node owns its shape outright.
//!
//! Conventions: triangles are counter-clockwise when seen from the outside,
//! cylinders and spheres are parametrised with `x = r·sinθ`, `z = r·cosθ`, and
//! flat shapes lie in the XY plane facing +Z.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::model::{Aabb, MeshData, ModelVertex};

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
        theta_start: f32,
        theta_length: f32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Circle {
        radius: f32,
        segments: u32,
    },
    /// Flat polygon given by its corner positions, filled as a triangle fan.
    Polygon { vertices: Vec<[f32; 3]> },
}

impl Geometry {
    /// Closed cylinder spanning the full circle.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    ) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }

    /// Closed cylinder sector covering `theta_start..theta_start + theta_length`.
    pub fn cylinder_sector(
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        theta_start: f32,
        theta_length: f32,
    ) -> Self {
        Geometry::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments,
            height_segments,
            open_ended: false,
            theta_start,
            theta_length,
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Geometry::Box {
            width,
            height,
            depth,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn circle(radius: f32, segments: u32) -> Self {
        Geometry::Circle { radius, segments }
    }

    pub fn triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Self {
        Geometry::Polygon {
            vertices: vec![a, b, c],
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match self {
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
                theta_start,
                theta_length,
            } => cylinder(
                *radius_top,
                *radius_bottom,
                *height,
                (*radial_segments).max(3),
                (*height_segments).max(1),
                *open_ended,
                *theta_start,
                *theta_length,
            ),
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(*width, *height, *depth),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(*radius, (*width_segments).max(3), (*height_segments).max(2)),
            Geometry::Circle { radius, segments } => circle(*radius, (*segments).max(3)),
            Geometry::Polygon { vertices } => polygon(vertices),
        }
    }

    /// Local-space bounds of the tessellated shape.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.tessellate().bounds()
    }
}

#[allow(clippy::too_many_arguments)]
fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
    theta_start: f32,
    theta_length: f32,
) -> MeshData {
    let mut mesh = MeshData::default();
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    // Torso: a (height_segments + 1) x (radial_segments + 1) grid of vertices.
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    for y in 0..=height_segments {
        let v = y as f32 / height_segments as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(radial_segments as usize + 1);
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let theta = u * theta_length + theta_start;
            let (sin, cos) = theta.sin_cos();
            let normal = Vector3::new(sin, slope, cos).normalize();
            row.push(mesh.vertices.len() as u32);
            mesh.vertices.push(ModelVertex::new(
                [radius * sin, -v * height + half_height, radius * cos],
                normal.into(),
            ));
        }
        grid.push(row);
    }
    for x in 0..radial_segments as usize {
        for y in 0..height_segments as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];
            if radius_top > 0.0 || y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if radius_bottom > 0.0 || y != height_segments as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            cylinder_cap(&mut mesh, true, radius_top, half_height, radial_segments, theta_start, theta_length);
        }
        if radius_bottom > 0.0 {
            cylinder_cap(&mut mesh, false, radius_bottom, half_height, radial_segments, theta_start, theta_length);
        }
    }
    mesh
}

fn cylinder_cap(
    mesh: &mut MeshData,
    top: bool,
    radius: f32,
    half_height: f32,
    radial_segments: u32,
    theta_start: f32,
    theta_length: f32,
) {
    let sign = if top { 1.0 } else { -1.0 };
    let center_start = mesh.vertices.len() as u32;
    // One centre vertex per segment keeps the layout identical to the torso.
    for _ in 0..radial_segments {
        mesh.vertices
            .push(ModelVertex::new([0.0, half_height * sign, 0.0], [0.0, sign, 0.0]));
    }
    let ring_start = mesh.vertices.len() as u32;
    for x in 0..=radial_segments {
        let u = x as f32 / radial_segments as f32;
        let theta = u * theta_length + theta_start;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(ModelVertex::new(
            [radius * sin, half_height * sign, radius * cos],
            [0.0, sign, 0.0],
        ));
    }
    for x in 0..radial_segments {
        let c = center_start + x;
        let i = ring_start + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// Axis indices used to lay out one face of a box.
struct Face {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
}

fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (0, 1, 2);
    let faces = [
        Face { u: z, v: y, w: x, u_dir: -1.0, v_dir: -1.0, width: depth, height, depth: width },
        Face { u: z, v: y, w: x, u_dir: 1.0, v_dir: -1.0, width: depth, height, depth: -width },
        Face { u: x, v: z, w: y, u_dir: 1.0, v_dir: 1.0, width, height: depth, depth: height },
        Face { u: x, v: z, w: y, u_dir: 1.0, v_dir: -1.0, width, height: depth, depth: -height },
        Face { u: x, v: y, w: z, u_dir: 1.0, v_dir: -1.0, width, height, depth },
        Face { u: x, v: y, w: z, u_dir: -1.0, v_dir: -1.0, width, height, depth: -depth },
    ];
    let mut mesh = MeshData::default();
    for face in faces.iter() {
        let start = mesh.vertices.len() as u32;
        for iy in 0..2 {
            let py = iy as f32 * face.height - face.height / 2.0;
            for ix in 0..2 {
                let px = ix as f32 * face.width - face.width / 2.0;
                let mut position = [0.0; 3];
                position[face.u] = px * face.u_dir;
                position[face.v] = py * face.v_dir;
                position[face.w] = face.depth / 2.0;
                let mut normal = [0.0; 3];
                normal[face.w] = if face.depth > 0.0 { 1.0 } else { -1.0 };
                mesh.vertices.push(ModelVertex::new(position, normal));
            }
        }
        let (a, b, c, d) = (start, start + 2, start + 3, start + 1);
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }
    mesh
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;
            let position = Vector3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = if position.magnitude2() > 0.0 {
                position.normalize()
            } else {
                Vector3::unit_y()
            };
            row.push(mesh.vertices.len() as u32);
            mesh.vertices.push(ModelVertex::new(position.into(), normal.into()));
        }
        grid.push(row);
    }
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // The pole rows collapse to single points, skip their degenerate halves.
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn circle(radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    let normal = [0.0, 0.0, 1.0];
    mesh.vertices.push(ModelVertex::new([0.0; 3], normal));
    for s in 0..=segments {
        let theta = s as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices
            .push(ModelVertex::new([radius * cos, radius * sin, 0.0], normal));
    }
    for i in 1..=segments {
        mesh.indices.extend_from_slice(&[i, i + 1, 0]);
    }
    mesh
}

fn polygon(corners: &[[f32; 3]]) -> MeshData {
    let mut mesh = MeshData::default();
    if corners.len() < 3 {
        return mesh;
    }
    let p0 = Vector3::from(corners[0]);
    let p1 = Vector3::from(corners[1]);
    let p2 = Vector3::from(corners[2]);
    let cross = (p1 - p0).cross(p2 - p0);
    let normal = if cross.magnitude2() > 0.0 {
        cross.normalize()
    } else {
        Vector3::unit_z()
    };
    mesh.vertices = corners
        .iter()
        .map(|&corner| ModelVertex::new(corner, normal.into()))
        .collect();
    for i in 1..corners.len() as u32 - 1 {
        mesh.indices.extend_from_slice(&[0, i, i + 1]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_counts_follow_the_grid_layout() {
        let mesh = Geometry::cylinder(0.5, 0.5, 3.0, 12, 12).tessellate();
        // torso grid + (centres + ring) per cap
        assert_eq!(mesh.vertices.len(), 13 * 13 + 2 * (12 + 13));
        assert_eq!(mesh.triangle_count(), 12 * 12 * 2 + 2 * 12);
    }

    #[test]
    fn box_has_four_vertices_per_face() {
        let mesh = Geometry::cuboid(1.0, 2.0, 3.0).tessellate();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vector3::new(-0.5, -1.0, -1.5));
        assert_eq!(bounds.max, Vector3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn sphere_skips_pole_triangles() {
        let mesh = Geometry::sphere(1.2, 12, 12).tessellate();
        assert_eq!(mesh.vertices.len(), 13 * 13);
        assert_eq!(mesh.triangle_count(), 12 * 12 * 2 - 2 * 12);
    }

    #[test]
    fn circle_is_a_fan_around_its_centre() {
        let mesh = Geometry::circle(0.2, 12).tessellate();
        assert_eq!(mesh.vertices.len(), 14);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn half_cylinder_stays_on_its_side() {
        let right = Geometry::cylinder_sector(1.0, 3.0, 12, 1, 0.0, PI).bounding_box().unwrap();
        assert!(right.min.x > -1e-5);
        let left = Geometry::cylinder_sector(1.0, 3.0, 12, 1, PI, PI).bounding_box().unwrap();
        assert!(left.max.x < 1e-5);
    }

    #[test]
    fn counter_clockwise_triangle_faces_forward() {
        let mesh = Geometry::triangle([0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]).tessellate();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_polygon_is_empty() {
        let mesh = Geometry::Polygon { vertices: vec![[0.0; 3]; 2] }.tessellate();
        assert!(mesh.vertices.is_empty());
        assert!(mesh.bounds().is_none());
    }
}

//! Static lattice geometry: coordinate/index conversion, neighbour and edge lookup, and the
//! incidence tables (faces, up-edges, vertex-to-edges, syndrome/sweep vertex sets, logicals)
//! that every other module consumes.
//!
//! A single tagged [`Geometry`] struct covers all four code variants (`Family` x `Boundary`)
//! rather than a per-variant trait hierarchy: the toric and bounded neighbour relations differ
//! only in wraparound-vs-clip, so one parameterised implementation captures both.

use crate::util::{EdgeIndex, FaceIndex, GeometryError, GeometryResult, VertexIndex};
use std::collections::HashMap;

/// One of the seven edge directions; slot numbering is the fixed convention `7*v + slot`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Xyz,
    X,
    Xy,
    Y,
    Yz,
    Z,
    Xz,
}

impl Direction {
    fn slot(self) -> u8 {
        match self {
            Direction::Xyz => 0,
            Direction::X => 1,
            Direction::Xy => 2,
            Direction::Y => 3,
            Direction::Yz => 4,
            Direction::Z => 5,
            Direction::Xz => 6,
        }
    }
}

/// One of the eight sweep directions, also used to label up-edges found at a rhombic vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SweepDirection {
    Xyz,
    MinusXyz,
    Xy,
    MinusXy,
    Xz,
    MinusXz,
    Yz,
    MinusYz,
}

impl SweepDirection {
    pub const ALL: [SweepDirection; 8] = [
        SweepDirection::Xyz,
        SweepDirection::MinusXyz,
        SweepDirection::Xy,
        SweepDirection::MinusXy,
        SweepDirection::Xz,
        SweepDirection::MinusXz,
        SweepDirection::Yz,
        SweepDirection::MinusYz,
    ];

    /// the (direction, sign) pair this sweep direction names directly, used when it is itself
    /// tested as a candidate up-edge.
    fn as_diagonal(self) -> (Direction, i32) {
        match self {
            SweepDirection::Xyz => (Direction::Xyz, 1),
            SweepDirection::MinusXyz => (Direction::Xyz, -1),
            SweepDirection::Xy => (Direction::Xy, 1),
            SweepDirection::MinusXy => (Direction::Xy, -1),
            SweepDirection::Xz => (Direction::Xz, 1),
            SweepDirection::MinusXz => (Direction::Xz, -1),
            SweepDirection::Yz => (Direction::Yz, 1),
            SweepDirection::MinusYz => (Direction::Yz, -1),
        }
    }

    /// the three "orthogonal sibling" labels (e0, e1, e2) for a full rhombic vertex or cubic
    /// vertex sweeping in this direction.
    fn siblings(self) -> [(SweepDirection, i32); 3] {
        use SweepDirection::*;
        match self {
            Xyz => [(Xy, 1), (Yz, 1), (Xz, 1)],
            Xy => [(Xyz, 1), (MinusXz, 1), (MinusYz, 1)],
            Xz => [(Xyz, 1), (MinusXy, 1), (MinusYz, 1)],
            Yz => [(Xyz, 1), (MinusXy, 1), (MinusXz, 1)],
            MinusXyz => [(MinusXy, 1), (MinusYz, 1), (MinusXz, 1)],
            MinusXy => [(MinusXyz, 1), (Xz, 1), (Yz, 1)],
            MinusXz => [(MinusXyz, 1), (Xy, 1), (Yz, 1)],
            MinusYz => [(MinusXyz, 1), (Xy, 1), (Xz, 1)],
        }
    }

}

/// the cubic analogue: a sweep direction resolves to a signed (x, y, z) axis triple.
fn cubic_axis_triple(dir: SweepDirection) -> [(Direction, i32); 3] {
    use SweepDirection::*;
    let (base, negate) = match dir {
        Xyz => (Xyz, false),
        MinusXyz => (Xyz, true),
        Xy => (Xy, false),
        MinusXy => (Xy, true),
        Xz => (Xz, false),
        MinusXz => (Xz, true),
        Yz => (Yz, false),
        MinusYz => (Yz, true),
    };
    let (sx, sy, sz) = match base {
        Xyz => (1, 1, 1),
        Xy => (1, 1, -1),
        Xz => (1, -1, 1),
        Yz => (-1, 1, 1),
        _ => unreachable!(),
    };
    let flip = if negate { -1 } else { 1 };
    [(Direction::X, sx * flip), (Direction::Y, sy * flip), (Direction::Z, sz * flip)]
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Coordinate {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub w: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Rhombic,
    Cubic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Boundary {
    Toric,
    Bounded,
}

const RHOMBIC_FACE_TEMPLATES: [([Direction; 4], [i32; 4]); 6] = {
    use Direction::*;
    [
        ([Xyz, Yz, Yz, Xyz], [1, 1, 1, 1]),
        ([Xyz, Xz, Xz, Xyz], [1, 1, 1, 1]),
        ([Xyz, Xy, Xy, Xyz], [1, 1, 1, 1]),
        ([Xy, Xz, Xz, Xy], [1, -1, -1, 1]),
        ([Xy, Yz, Yz, Xy], [1, -1, -1, 1]),
        ([Xz, Yz, Yz, Xz], [1, -1, -1, 1]),
    ]
};

const CUBIC_FACE_TEMPLATES: [([Direction; 4], [i32; 4]); 3] = {
    use Direction::*;
    [
        ([X, Y, Y, X], [1, 1, 1, 1]),
        ([X, Z, Z, X], [1, 1, 1, 1]),
        ([Y, Z, Z, Y], [1, 1, 1, 1]),
    ]
};

/// Tagged-variant lattice geometry: one type for all four (family, boundary) combinations.
pub struct Geometry {
    pub family: Family,
    pub boundary: Boundary,
    pub l: usize,
    /// allocation size for `vertex_to_*`: `2*l^3` for rhombic, `l^3` for cubic.
    pub vertex_count: usize,
    pub face_to_vertices: Vec<[VertexIndex; 4]>,
    pub face_to_edges: Vec<[EdgeIndex; 4]>,
    pub vertex_to_faces: Vec<Vec<FaceIndex>>,
    pub vertex_to_edges: Vec<Vec<EdgeIndex>>,
    up_edges: HashMap<SweepDirection, Vec<Vec<EdgeIndex>>>,
    face_lookup: HashMap<[VertexIndex; 4], FaceIndex>,
}

impl Geometry {
    pub fn new(family: Family, boundary: Boundary, l: usize) -> GeometryResult<Geometry> {
        if l < 3 {
            return Err(GeometryError::InvalidArgument("l must be at least 3".into()));
        }
        if family == Family::Rhombic && boundary == Boundary::Toric && l % 2 != 0 {
            return Err(GeometryError::InvalidArgument("rhombic toric lattices require even l".into()));
        }
        if family == Family::Cubic && l <= 3 {
            return Err(GeometryError::InvalidArgument("cubic lattices require l > 3".into()));
        }
        let vertex_count = match family {
            Family::Rhombic => 2 * l * l * l,
            Family::Cubic => l * l * l,
        };
        let mut geometry = Geometry {
            family,
            boundary,
            l,
            vertex_count,
            face_to_vertices: Vec::new(),
            face_to_edges: Vec::new(),
            vertex_to_faces: vec![Vec::new(); vertex_count],
            vertex_to_edges: vec![Vec::new(); vertex_count],
            up_edges: HashMap::new(),
            face_lookup: HashMap::new(),
        };
        geometry.create_faces();
        geometry.create_up_edges_map();
        geometry.create_vertex_to_edges();
        Ok(geometry)
    }

    pub fn index_to_coordinate(&self, v: VertexIndex) -> GeometryResult<Coordinate> {
        if v >= self.vertex_count {
            return Err(GeometryError::InvalidArgument(format!("vertex index {v} out of range")));
        }
        let l = self.l;
        let l3 = l * l * l;
        let w = (v / l3) as u8;
        let rem = v % l3;
        let z = (rem / (l * l)) as i64;
        let y = ((rem / l) % l) as i64;
        let x = (rem % l) as i64;
        Ok(Coordinate { x, y, z, w })
    }

    pub fn coordinate_to_index(&self, c: Coordinate) -> GeometryResult<VertexIndex> {
        let l = self.l as i64;
        if c.x < 0 || c.x >= l || c.y < 0 || c.y >= l || c.z < 0 || c.z >= l {
            return Err(GeometryError::InvalidArgument(format!("coordinate out of range: {c:?}")));
        }
        if c.w > 1 || (self.family == Family::Cubic && c.w == 1) {
            return Err(GeometryError::InvalidArgument(format!("invalid sublattice w={}", c.w)));
        }
        let l3 = (self.l * self.l * self.l) as VertexIndex;
        Ok(c.w as VertexIndex * l3 + (c.z as VertexIndex) * (self.l * self.l) as VertexIndex + (c.y as VertexIndex) * self.l as VertexIndex + c.x as VertexIndex)
    }

    pub fn neighbour(&self, v: VertexIndex, dir: Direction, sign: i32) -> GeometryResult<VertexIndex> {
        if sign != 1 && sign != -1 {
            return Err(GeometryError::InvalidArgument("sign must be +1 or -1".into()));
        }
        let c = self.index_to_coordinate(v)?;
        let mut nc = c;
        match self.family {
            Family::Rhombic => {
                match dir {
                    Direction::Xy | Direction::Xz | Direction::Yz | Direction::Xyz => {}
                    _ => return Err(GeometryError::InvalidArgument(format!("{dir:?} is not a rhombic direction"))),
                }
                if c.w == 1 {
                    nc.w = 0;
                    match dir {
                        Direction::Xy => {
                            nc.x += (sign > 0) as i64;
                            nc.y += (sign > 0) as i64;
                            nc.z += (sign < 0) as i64;
                        }
                        Direction::Xz => {
                            nc.x += (sign > 0) as i64;
                            nc.z += (sign > 0) as i64;
                            nc.y += (sign < 0) as i64;
                        }
                        Direction::Yz => {
                            nc.y += (sign > 0) as i64;
                            nc.z += (sign > 0) as i64;
                            nc.x += (sign < 0) as i64;
                        }
                        Direction::Xyz => {
                            nc.x += (sign > 0) as i64;
                            nc.y += (sign > 0) as i64;
                            nc.z += (sign > 0) as i64;
                        }
                        _ => unreachable!(),
                    }
                } else {
                    nc.w = 1;
                    match dir {
                        Direction::Xy => {
                            nc.x -= (sign < 0) as i64;
                            nc.y -= (sign < 0) as i64;
                            nc.z -= (sign > 0) as i64;
                        }
                        Direction::Xz => {
                            nc.x -= (sign < 0) as i64;
                            nc.z -= (sign < 0) as i64;
                            nc.y -= (sign > 0) as i64;
                        }
                        Direction::Yz => {
                            nc.y -= (sign < 0) as i64;
                            nc.z -= (sign < 0) as i64;
                            nc.x -= (sign > 0) as i64;
                        }
                        Direction::Xyz => {
                            nc.x -= (sign < 0) as i64;
                            nc.y -= (sign < 0) as i64;
                            nc.z -= (sign < 0) as i64;
                        }
                        _ => unreachable!(),
                    }
                }
            }
            Family::Cubic => {
                if c.w == 1 {
                    return Err(GeometryError::InvalidArgument("cubic lattice has no w=1 vertices".into()));
                }
                match dir {
                    Direction::X => nc.x += sign as i64,
                    Direction::Y => nc.y += sign as i64,
                    Direction::Z => nc.z += sign as i64,
                    _ => return Err(GeometryError::InvalidArgument(format!("{dir:?} is not a cubic direction"))),
                }
            }
        }
        let l = self.l as i64;
        match self.boundary {
            Boundary::Toric => {
                nc.x = nc.x.rem_euclid(l);
                nc.y = nc.y.rem_euclid(l);
                nc.z = nc.z.rem_euclid(l);
            }
            Boundary::Bounded => {
                if nc.x < 0 || nc.x >= l || nc.y < 0 || nc.y >= l || nc.z < 0 || nc.z >= l {
                    return Err(GeometryError::OutOfLattice);
                }
            }
        }
        self.coordinate_to_index(nc)
    }

    pub fn edge_index(&self, v: VertexIndex, dir: Direction, sign: i32) -> GeometryResult<EdgeIndex> {
        if sign != 1 && sign != -1 {
            return Err(GeometryError::InvalidArgument("sign must be +1 or -1".into()));
        }
        let canonical = if sign < 0 { self.neighbour(v, dir, sign)? } else { v };
        Ok(7 * canonical as EdgeIndex + dir.slot() as EdgeIndex)
    }

    fn add_face(&self, v: VertexIndex, dirs: [Direction; 4], signs: [i32; 4]) -> GeometryResult<([VertexIndex; 4], [EdgeIndex; 4])> {
        let v1 = self.neighbour(v, dirs[0], signs[0])?;
        let v2 = self.neighbour(v, dirs[1], signs[1])?;
        let v3 = self.neighbour(v1, dirs[2], signs[2])?;
        let e0 = self.edge_index(v, dirs[0], signs[0])?;
        let e1 = self.edge_index(v, dirs[1], signs[1])?;
        let e2 = self.edge_index(v1, dirs[2], signs[2])?;
        let e3 = self.edge_index(v2, dirs[3], signs[3])?;
        let mut vertices = [v, v1, v2, v3];
        let mut edges = [e0, e1, e2, e3];
        vertices.sort_unstable();
        edges.sort_unstable();
        Ok((vertices, edges))
    }

    fn create_faces(&mut self) {
        match (self.family, self.boundary) {
            (Family::Rhombic, Boundary::Toric) => self.create_rhombic_toric_faces(),
            (Family::Rhombic, Boundary::Bounded) => self.create_rhombic_bounded_faces(),
            (Family::Cubic, _) => self.create_cubic_faces(),
        }
    }

    /// commits one candidate face if `v`'s neighbours under `dirs`/`signs` all lie inside the
    /// lattice; silently skips otherwise, the way the original's boundary-clamped `neighbour`
    /// throw is caught by a case split rather than a `try`.
    fn try_add_face(&mut self, v: VertexIndex, dirs: [Direction; 4], signs: [i32; 4], face_id: &mut FaceIndex) {
        if let Ok((vertices, edges)) = self.add_face(v, dirs, signs) {
            if self.face_lookup.contains_key(&vertices) {
                return;
            }
            self.face_to_vertices.push(vertices);
            self.face_to_edges.push(edges);
            for &vx in &vertices {
                self.vertex_to_faces[vx].push(*face_id);
            }
            self.face_lookup.insert(vertices, *face_id);
            *face_id += 1;
        }
    }

    fn create_rhombic_toric_faces(&mut self) {
        let l3 = self.l * self.l * self.l;
        let mut face_id: FaceIndex = 0;
        for v in 0..l3 {
            let c = self.index_to_coordinate(v).expect("w=0 vertex index always valid");
            if (c.x + c.y + c.z) % 2 != 0 {
                continue;
            }
            for &(dirs, signs) in &RHOMBIC_FACE_TEMPLATES {
                self.try_add_face(v, dirs, signs, &mut face_id);
            }
        }
    }

    fn create_cubic_faces(&mut self) {
        let l3 = self.l * self.l * self.l;
        let mut face_id: FaceIndex = 0;
        for v in 0..l3 {
            for &(dirs, signs) in &CUBIC_FACE_TEMPLATES {
                self.try_add_face(v, dirs, signs, &mut face_id);
            }
        }
    }

    /// hand-pruned odd-parity case split, ported vertex-by-vertex from the bounded rhombic
    /// lattice's own face constructor; the boundary handling here is not recoverable from a
    /// generic candidate scan (see the `geometry` ledger entry).
    fn create_rhombic_bounded_faces(&mut self) {
        use Direction::*;
        let l = self.l as i64;
        let l3 = self.l * self.l * self.l;
        let mut face_id: FaceIndex = 0;
        for v in 0..l3 {
            let c = self.index_to_coordinate(v).expect("w=0 vertex index always valid");
            if (c.x + c.y + c.z).rem_euclid(2) != 1 {
                continue;
            }
            if c.z == 0 {
                continue;
            } else if c.z % 2 == 1 {
                if c.y == 0 {
                    self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [1, 1, 1, 1], &mut face_id);
                } else if c.x == 0 {
                    self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [1, 1, 1, 1], &mut face_id);
                    if c.z != l - 1 {
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [1, 1, 1, 1], &mut face_id);
                    }
                    if c.z != 1 {
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [1, -1, -1, 1], &mut face_id);
                    }
                } else if c.x == l - 1 {
                    if c.y == l - 1 {
                        continue;
                    }
                    self.try_add_face(v, [Yz, Xz, Xz, Yz], [1, -1, -1, 1], &mut face_id);
                    if c.z != l - 1 {
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [-1, 1, 1, -1], &mut face_id);
                    }
                    if c.z != 1 {
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [-1, -1, -1, -1], &mut face_id);
                    }
                } else if c.y == l - 1 {
                    self.try_add_face(v, [Xz, Yz, Yz, Xz], [1, -1, -1, 1], &mut face_id);
                } else if c.x % 2 == 0 && c.y % 2 == 0 {
                    if c.z != l - 1 {
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [1, 1, 1, 1], &mut face_id);
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [-1, 1, 1, -1], &mut face_id);
                    }
                    if c.z != 1 {
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [1, -1, -1, 1], &mut face_id);
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [-1, -1, -1, -1], &mut face_id);
                    }
                    self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [1, 1, 1, 1], &mut face_id);
                    self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [-1, -1, -1, -1], &mut face_id);
                } else if c.x % 2 == 1 && c.y % 2 == 1 {
                    if c.z != l - 1 {
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [1, 1, 1, 1], &mut face_id);
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [-1, 1, 1, -1], &mut face_id);
                    }
                    if c.z != 1 {
                        self.try_add_face(v, [Xy, Yz, Yz, Xy], [1, -1, -1, 1], &mut face_id);
                        self.try_add_face(v, [Xyz, Xz, Xz, Xyz], [-1, -1, -1, -1], &mut face_id);
                    }
                    self.try_add_face(v, [Xz, Yz, Yz, Xz], [1, -1, -1, 1], &mut face_id);
                    self.try_add_face(v, [Xz, Yz, Yz, Xz], [-1, 1, 1, -1], &mut face_id);
                }
            } else if c.x == 0 {
                self.try_add_face(v, [Xz, Yz, Yz, Xz], [1, -1, -1, 1], &mut face_id);
            } else if c.y == 0 {
                if c.x == l - 1 {
                    continue;
                }
                self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [1, 1, 1, 1], &mut face_id);
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [1, 1, 1, 1], &mut face_id);
                self.try_add_face(v, [Xy, Xz, Xz, Xy], [1, -1, -1, 1], &mut face_id);
            } else if c.x == l - 1 {
                self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [-1, -1, -1, -1], &mut face_id);
            } else if c.y == l - 1 {
                self.try_add_face(v, [Xz, Yz, Yz, Xz], [1, -1, -1, 1], &mut face_id);
                self.try_add_face(v, [Xy, Xz, Xz, Xy], [-1, 1, 1, -1], &mut face_id);
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [-1, -1, -1, -1], &mut face_id);
            } else if c.x % 2 == 0 && c.y % 2 == 1 {
                self.try_add_face(v, [Xz, Xy, Xy, Xz], [1, -1, -1, 1], &mut face_id);
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [-1, -1, -1, -1], &mut face_id);
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [1, 1, 1, 1], &mut face_id);
                self.try_add_face(v, [Xz, Xy, Xy, Xz], [-1, 1, 1, -1], &mut face_id);
                self.try_add_face(v, [Xz, Yz, Yz, Xz], [1, -1, -1, 1], &mut face_id);
                self.try_add_face(v, [Xz, Yz, Yz, Xz], [-1, 1, 1, -1], &mut face_id);
            } else if c.x % 2 == 1 && c.y % 2 == 0 {
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [1, 1, 1, 1], &mut face_id);
                self.try_add_face(v, [Xz, Xy, Xy, Xz], [-1, 1, 1, -1], &mut face_id);
                self.try_add_face(v, [Xz, Xy, Xy, Xz], [1, -1, -1, 1], &mut face_id);
                self.try_add_face(v, [Xyz, Yz, Yz, Xyz], [-1, -1, -1, -1], &mut face_id);
                self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [1, 1, 1, 1], &mut face_id);
                self.try_add_face(v, [Xyz, Xy, Xy, Xyz], [-1, -1, -1, -1], &mut face_id);
            }
        }
    }

    /// whether a rhombic w=1 vertex of the given coordinate parity has 3 up-edges (`true`) or is
    /// "pointed" with none (`false`) for sweep direction `dir`.
    fn half_vertex_is_contentful(parity: i64, dir: SweepDirection) -> bool {
        use SweepDirection::*;
        if parity == 0 {
            matches!(dir, Xyz | MinusXy | MinusXz | MinusYz)
        } else {
            matches!(dir, MinusXyz | Xy | Xz | Yz)
        }
    }

    fn create_up_edges_map(&mut self) {
        for &dir in &SweepDirection::ALL {
            let mut table = vec![Vec::new(); self.vertex_count];
            match self.family {
                Family::Rhombic => {
                    for v in 0..self.vertex_count {
                        let c = match self.index_to_coordinate(v) {
                            Ok(c) => c,
                            Err(_) => continue,
                        };
                        let parity = (c.x + c.y + c.z).rem_euclid(2);
                        let mut candidates: Vec<(Direction, i32)> = Vec::new();
                        if c.w == 0 {
                            if parity != 0 {
                                continue;
                            }
                            candidates.push(dir.as_diagonal());
                            candidates.extend(dir.siblings().iter().map(|&(sib, _)| sib.as_diagonal()));
                        } else if Self::half_vertex_is_contentful(parity, dir) {
                            candidates.extend(dir.siblings().iter().map(|&(sib, _)| sib.as_diagonal()));
                        }
                        for (d, s) in candidates {
                            if let Ok(e) = self.edge_index(v, d, s) {
                                table[v].push(e);
                            }
                        }
                    }
                }
                Family::Cubic => {
                    let triple = cubic_axis_triple(dir);
                    for v in 0..self.vertex_count {
                        for &(d, s) in &triple {
                            if let Ok(e) = self.edge_index(v, d, s) {
                                table[v].push(e);
                            }
                        }
                    }
                }
            }
            self.up_edges.insert(dir, table);
        }
    }

    fn create_vertex_to_edges(&mut self) {
        match self.family {
            Family::Rhombic => {
                for v in 0..self.vertex_count {
                    let c = match self.index_to_coordinate(v) {
                        Ok(c) => c,
                        Err(_) => continue,
                    };
                    let parity = (c.x + c.y + c.z).rem_euclid(2);
                    let candidates: Vec<(Direction, i32)> = if c.w == 0 {
                        vec![
                            (Direction::Xyz, 1),
                            (Direction::Xyz, -1),
                            (Direction::Xy, 1),
                            (Direction::Xy, -1),
                            (Direction::Xz, 1),
                            (Direction::Xz, -1),
                            (Direction::Yz, 1),
                            (Direction::Yz, -1),
                        ]
                    } else if parity == 0 {
                        vec![(Direction::Xy, 1), (Direction::Xz, 1), (Direction::Yz, 1), (Direction::Xyz, -1)]
                    } else {
                        vec![(Direction::Xy, -1), (Direction::Xz, -1), (Direction::Yz, -1), (Direction::Xyz, 1)]
                    };
                    for (d, s) in candidates {
                        if let Ok(e) = self.edge_index(v, d, s) {
                            self.vertex_to_edges[v].push(e);
                        }
                    }
                }
            }
            Family::Cubic => {
                let candidates = [
                    (Direction::X, 1),
                    (Direction::X, -1),
                    (Direction::Y, 1),
                    (Direction::Y, -1),
                    (Direction::Z, 1),
                    (Direction::Z, -1),
                ];
                for v in 0..self.vertex_count {
                    for &(d, s) in &candidates {
                        if let Ok(e) = self.edge_index(v, d, s) {
                            self.vertex_to_edges[v].push(e);
                        }
                    }
                }
            }
        }
    }

    pub fn up_edges(&self, dir: SweepDirection, v: VertexIndex) -> &[EdgeIndex] {
        &self.up_edges[&dir][v]
    }

    pub fn find_face(&self, mut vertices: [VertexIndex; 4]) -> GeometryResult<FaceIndex> {
        vertices.sort_unstable();
        self.face_lookup.get(&vertices).copied().ok_or(GeometryError::NotAFace)
    }

    pub fn build_syndrome_indices(&self) -> Option<std::collections::HashSet<EdgeIndex>> {
        if self.boundary != Boundary::Bounded {
            return None;
        }
        let l = self.l;
        let mut indices = std::collections::HashSet::new();
        match self.family {
            Family::Rhombic => {
                for v in 0..l * l * l {
                    let c = self.index_to_coordinate(v).unwrap();
                    if c.z == 0 || c.y == 0 || c.y as usize == l - 1 {
                        continue;
                    }
                    let parity = (c.x + c.y + c.z).rem_euclid(2);
                    if parity != 1 {
                        continue;
                    }
                    let mut push = |d: Direction, s: i32| {
                        if let Ok(e) = self.edge_index(v, d, s) {
                            indices.insert(e);
                        }
                    };
                    if c.z == 1 {
                        if c.x != 0 {
                            push(Direction::Yz, 1);
                            push(Direction::Xy, -1);
                        }
                        if c.x as usize != l - 1 {
                            push(Direction::Xyz, 1);
                            push(Direction::Xz, 1);
                        }
                    } else if c.z as usize == l - 1 {
                        if c.x != 0 {
                            push(Direction::Xyz, -1);
                            push(Direction::Xz, -1);
                        }
                        if c.x as usize != l - 1 {
                            push(Direction::Yz, -1);
                            push(Direction::Xy, 1);
                        }
                    } else {
                        if c.x != 0 {
                            push(Direction::Xyz, -1);
                            push(Direction::Xy, -1);
                            push(Direction::Xz, -1);
                            push(Direction::Yz, 1);
                        }
                        if c.x as usize != l - 1 {
                            push(Direction::Xyz, 1);
                            push(Direction::Xy, 1);
                            push(Direction::Xz, 1);
                            push(Direction::Yz, -1);
                        }
                    }
                }
            }
            Family::Cubic => {
                for v in 0..l * l * l {
                    let c = self.index_to_coordinate(v).unwrap();
                    let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
                    if z < l - 2 && x > 0 && x < l - 1 && y > 0 && y < l - 1 {
                        if let Ok(e) = self.edge_index(v, Direction::Z, 1) {
                            indices.insert(e);
                        }
                    }
                    if z < l - 1 && x > 0 && x < l - 1 && y < l - 1 {
                        if let Ok(e) = self.edge_index(v, Direction::Y, 1) {
                            indices.insert(e);
                        }
                    }
                    if z < l - 1 && y > 0 && y < l - 1 && x < l - 1 {
                        if let Ok(e) = self.edge_index(v, Direction::X, 1) {
                            indices.insert(e);
                        }
                    }
                }
            }
        }
        Some(indices)
    }

    pub fn build_sweep_indices(&self) -> Vec<VertexIndex> {
        let l = self.l;
        match (self.family, self.boundary) {
            (Family::Rhombic, Boundary::Toric) => (0..self.vertex_count).collect(),
            (Family::Rhombic, Boundary::Bounded) => {
                let mut indices = Vec::new();
                for v in 0..2 * l * l * l {
                    let c = self.index_to_coordinate(v).unwrap();
                    let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
                    if c.w == 0 {
                        if (c.x + c.y + c.z) % 2 == 0 {
                            continue;
                        }
                        if z >= 1 && z <= l - 1 && y >= 1 && y <= l - 2 {
                            indices.push(v);
                        }
                    } else if z >= 1 && z <= l - 2 && x <= l - 2 && y <= l - 2 {
                        indices.push(v);
                    }
                }
                indices
            }
            (Family::Cubic, Boundary::Toric) => (0..self.vertex_count).collect(),
            (Family::Cubic, Boundary::Bounded) => {
                let mut indices = Vec::new();
                for v in 0..l * l * l {
                    let c = self.index_to_coordinate(v).unwrap();
                    let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
                    if x > 0 && x < l - 1 && y > 0 && y < l - 1 && z < l - 1 {
                        indices.push(v);
                    }
                }
                indices
            }
        }
    }

    /// returns (logicalZ1, logicalZ2, logicalZ3); the latter two are `None` for bounded variants.
    pub fn build_logicals(&self) -> GeometryResult<(Vec<FaceIndex>, Option<Vec<FaceIndex>>, Option<Vec<FaceIndex>>)> {
        match self.family {
            Family::Rhombic => self.build_rhombic_logicals(),
            Family::Cubic => self.build_cubic_logicals(),
        }
    }

    fn face_from(&self, v: VertexIndex, d0: Direction, s0: i32, d1: Direction, s1: i32) -> GeometryResult<FaceIndex> {
        let n = self.neighbour(v, d0, s0)?;
        let vertices = [v, n, self.neighbour(v, d1, s1)?, self.neighbour(n, d1, s1)?];
        self.find_face(vertices)
    }

    fn build_rhombic_logicals(&self) -> GeometryResult<(Vec<FaceIndex>, Option<Vec<FaceIndex>>, Option<Vec<FaceIndex>>)> {
        let l = self.l;
        if self.boundary == Boundary::Bounded {
            let mut logical_z1 = Vec::new();
            let mut i = 0;
            while i < l {
                let v = self.coordinate_to_index(Coordinate { x: i as i64, y: 0, z: 1, w: 0 })?;
                logical_z1.push(self.face_from(v, Direction::Xyz, 1, Direction::Xy, 1)?);
                if i != 0 {
                    let n = self.neighbour(v, Direction::Yz, 1)?;
                    let vertices = [v, n, self.neighbour(v, Direction::Xz, -1)?, self.neighbour(n, Direction::Xz, -1)?];
                    logical_z1.push(self.find_face(vertices)?);
                }
                i += 2;
            }
            Ok((logical_z1, None, None))
        } else {
            let mut logical_z1 = Vec::new();
            let mut logical_z2 = Vec::new();
            let mut logical_z3 = Vec::new();
            let mut i = 0;
            while i < l {
                let v = self.coordinate_to_index(Coordinate { x: i as i64, y: 0, z: 0, w: 0 })?;
                logical_z1.push(self.face_from(v, Direction::Xz, -1, Direction::Xyz, -1)?);
                logical_z1.push(self.face_from(v, Direction::Xy, 1, Direction::Yz, -1)?);
                let v2 = self.coordinate_to_index(Coordinate { x: 0, y: i as i64, z: 0, w: 0 })?;
                logical_z2.push(self.face_from(v2, Direction::Yz, -1, Direction::Xyz, -1)?);
                logical_z2.push(self.face_from(v2, Direction::Xy, 1, Direction::Xz, -1)?);
                let v3 = self.coordinate_to_index(Coordinate { x: 0, y: 0, z: i as i64, w: 0 })?;
                logical_z3.push(self.face_from(v3, Direction::Xz, -1, Direction::Xyz, -1)?);
                logical_z3.push(self.face_from(v3, Direction::Yz, 1, Direction::Xy, -1)?);
                i += 2;
            }
            Ok((logical_z1, Some(logical_z2), Some(logical_z3)))
        }
    }

    fn build_cubic_logicals(&self) -> GeometryResult<(Vec<FaceIndex>, Option<Vec<FaceIndex>>, Option<Vec<FaceIndex>>)> {
        let l = self.l;
        let mut logical_z1 = Vec::new();
        for i in 0..l - 1 {
            let v = self.coordinate_to_index(Coordinate { x: 0, y: 0, z: i as i64, w: 0 })?;
            logical_z1.push(self.face_from(v, Direction::X, 1, Direction::Y, 1)?);
        }
        if self.boundary == Boundary::Bounded {
            return Ok((logical_z1, None, None));
        }
        let mut logical_z2 = Vec::new();
        for i in 0..l - 1 {
            let v = self.coordinate_to_index(Coordinate { x: i as i64, y: 0, z: 0, w: 0 })?;
            logical_z2.push(self.face_from(v, Direction::Y, 1, Direction::Z, 1)?);
        }
        let mut logical_z3 = Vec::new();
        for i in 0..l - 1 {
            let v = self.coordinate_to_index(Coordinate { x: 0, y: i as i64, z: 0, w: 0 })?;
            logical_z3.push(self.face_from(v, Direction::X, 1, Direction::Z, 1)?);
        }
        Ok((logical_z1, Some(logical_z2), Some(logical_z3)))
    }
}

pub(crate) fn sweep_direction_siblings(dir: SweepDirection) -> [SweepDirection; 3] {
    let sibs = dir.siblings();
    [sibs[0].0, sibs[1].0, sibs[2].0]
}

pub(crate) fn cubic_axis_candidates(dir: SweepDirection) -> [(Direction, i32); 3] {
    cubic_axis_triple(dir)
}

impl Geometry {
    /// resolves a rhombic sweep-direction label to the edge it names at vertex `v`.
    pub(crate) fn rhombic_label_edge(&self, v: VertexIndex, label: SweepDirection) -> GeometryResult<EdgeIndex> {
        let (d, s) = label.as_diagonal();
        self.edge_index(v, d, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toric(l: usize) -> Geometry {
        Geometry::new(Family::Rhombic, Boundary::Toric, l).unwrap()
    }

    #[test]
    fn rhombic_toric_face_count() {
        let g = toric(4);
        assert_eq!(g.face_to_vertices.len(), 3 * 4 * 4 * 4);
    }

    #[test]
    fn cubic_toric_face_count() {
        let g = Geometry::new(Family::Cubic, Boundary::Toric, 6).unwrap();
        assert_eq!(g.face_to_vertices.len(), 3 * 6 * 6 * 6);
    }

    #[test]
    fn every_face_has_four_sorted_distinct_vertices_and_edges() {
        let g = toric(4);
        for (vertices, edges) in g.face_to_vertices.iter().zip(g.face_to_edges.iter()) {
            assert_eq!(vertices.len(), 4);
            assert_eq!(edges.len(), 4);
            assert!(vertices.windows(2).all(|w| w[0] < w[1]));
            assert!(edges.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn vertex_to_faces_arity_matches_vertex_type() {
        let g = toric(4);
        for v in 0..g.vertex_count {
            let count = g.vertex_to_faces[v].len();
            assert!(count == 0 || count == 6 || count == 12, "unexpected arity {count} at {v}");
        }
    }

    #[test]
    fn edge_index_agrees_from_both_endpoints() {
        let g = toric(4);
        for v in 0..g.vertex_count {
            if let Ok(n) = g.neighbour(v, Direction::Xy, 1) {
                let forward = g.edge_index(v, Direction::Xy, 1).unwrap();
                let backward = g.edge_index(n, Direction::Xy, -1).unwrap();
                assert_eq!(forward, backward);
            }
        }
    }

    #[test]
    fn rhombic_toric_logicals_are_distinct_valid_faces_of_expected_length() {
        let l = 4;
        let g = toric(l);
        let (z1, z2, z3) = g.build_logicals().unwrap();
        let z2 = z2.unwrap();
        let z3 = z3.unwrap();
        for logical in [&z1, &z2, &z3] {
            assert_eq!(logical.len(), l);
            for &face in logical.iter() {
                assert!(face < g.face_to_vertices.len());
            }
            let mut sorted = logical.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), logical.len(), "logical operator faces must be distinct");
        }
    }

    #[test]
    fn bounded_rhombic_face_count_matches_closed_form() {
        let l = 6;
        let g = Geometry::new(Family::Rhombic, Boundary::Bounded, l).unwrap();
        let n = l - 1;
        let expected = 3 * n * n * n + 2 * n - 4 * n * n;
        assert_eq!(g.face_to_vertices.len(), expected);
        for (vertices, edges) in g.face_to_vertices.iter().zip(g.face_to_edges.iter()) {
            assert!(vertices.windows(2).all(|w| w[0] < w[1]));
            assert!(edges.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn bounded_rhombic_face_count_smaller_than_toric() {
        let l = 6;
        let g = Geometry::new(Family::Rhombic, Boundary::Bounded, l).unwrap();
        assert!(g.face_to_vertices.len() < 3 * l * l * l);
    }
}

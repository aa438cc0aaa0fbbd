//! The sweep-rule cellular automaton step: one synchronous pass over a code's sweep vertex set
//! for a single direction, applying the full/half-vertex (rhombic) or CA (cubic) flip rule.

use crate::code::Code;
use crate::geometry::{cubic_axis_candidates, sweep_direction_siblings, Boundary, Direction, Family, SweepDirection};
use crate::util::{GeometryResult, VertexIndex};
use rand::Rng;

/// the six signed cubic axes, analogous to [`SweepDirection`] but for a lattice with no diagonal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisLabel {
    X,
    MinusX,
    Y,
    MinusY,
    Z,
    MinusZ,
}

fn axis_label(d: Direction, s: i32) -> AxisLabel {
    match (d, s) {
        (Direction::X, 1) => AxisLabel::X,
        (Direction::X, -1) => AxisLabel::MinusX,
        (Direction::Y, 1) => AxisLabel::Y,
        (Direction::Y, -1) => AxisLabel::MinusY,
        (Direction::Z, 1) => AxisLabel::Z,
        (Direction::Z, -1) => AxisLabel::MinusZ,
        _ => unreachable!("cubic axis candidates are always axis-aligned"),
    }
}

fn axis_direction_sign(label: AxisLabel) -> (Direction, i32) {
    match label {
        AxisLabel::X => (Direction::X, 1),
        AxisLabel::MinusX => (Direction::X, -1),
        AxisLabel::Y => (Direction::Y, 1),
        AxisLabel::MinusY => (Direction::Y, -1),
        AxisLabel::Z => (Direction::Z, 1),
        AxisLabel::MinusZ => (Direction::Z, -1),
    }
}

/// runs one synchronous sweep step over every vertex in `code.sweep_indices` for `direction`.
///
/// Non-extremal vertices are skipped unless `greedy` is set, in which case every vertex in the
/// sweep set is processed regardless of extremality. Panics on an invariant violation (more
/// up-edges in the syndrome than the rule can resolve, or a flip that doesn't correspond to a
/// face) since such a state means the incidence tables themselves are wrong.
pub fn sweep(code: &mut Code, direction: SweepDirection, greedy: bool) {
    code.clear_flip_bits();
    let vertices = code.sweep_indices.clone();
    for v in vertices {
        if !greedy && !code.check_extremal_vertex(v, direction) {
            continue;
        }
        match code.geometry.family {
            Family::Rhombic => sweep_rhombic_vertex(code, v, direction),
            Family::Cubic => sweep_cubic_vertex(code, v, direction),
        }
    }
    code.commit_flip_bits();
}

fn find_sweep_edges_rhombic(code: &Code, v: VertexIndex, direction: SweepDirection) -> Vec<SweepDirection> {
    let up = code.geometry.up_edges(direction, v);
    let mut labels = vec![direction];
    labels.extend(sweep_direction_siblings(direction));
    labels
        .into_iter()
        .filter(|&label| match code.geometry.rhombic_label_edge(v, label) {
            Ok(edge) => up.contains(&edge) && code.syndrome[edge],
            Err(_) => false,
        })
        .collect()
}

fn find_sweep_edges_cubic(code: &Code, v: VertexIndex, direction: SweepDirection) -> Vec<AxisLabel> {
    let up = code.geometry.up_edges(direction, v);
    cubic_axis_candidates(direction)
        .into_iter()
        .filter_map(|(d, s)| code.geometry.edge_index(v, d, s).ok().map(|e| (axis_label(d, s), e)))
        .filter(|&(_, edge)| up.contains(&edge) && code.syndrome[edge])
        .map(|(label, _)| label)
        .collect()
}

fn face_vertices(code: &Code, v: VertexIndex, d0: Direction, s0: i32, d1: Direction, s1: i32, d2: Direction, s2: i32) -> GeometryResult<[VertexIndex; 4]> {
    let v1 = code.geometry.neighbour(v, d0, s0)?;
    let v2 = code.geometry.neighbour(v, d1, s1)?;
    let v3 = code.geometry.neighbour(v1, d2, s2)?;
    Ok([v, v1, v2, v3])
}

fn sweep_rhombic_vertex(code: &mut Code, v: VertexIndex, direction: SweepDirection) {
    let edges = find_sweep_edges_rhombic(code, v, direction);
    if edges.is_empty() {
        return;
    }
    if edges.len() > 4 {
        panic!("vertex {v} has {} up-edges in the syndrome for direction {direction:?}, more than the rule can resolve", edges.len());
    }
    let coordinate = code.geometry.index_to_coordinate(v).expect("vertex in sweep_indices is always valid");
    if edges.len() == 1 && (code.geometry.boundary == Boundary::Toric || coordinate.w == 0) {
        return;
    }
    if coordinate.w == 0 {
        sweep_full_vertex(code, v, edges, direction);
    } else if code.geometry.boundary == Boundary::Bounded {
        sweep_half_vertex_boundary(code, v, edges, direction, coordinate);
    } else {
        sweep_half_vertex(code, v, edges, direction);
    }
}

fn flip(code: &mut Code, vertices: GeometryResult<[VertexIndex; 4]>) {
    let vertices = vertices.expect("face_vertices arguments are always in-lattice for a flip triggered by a real up-edge");
    code.local_flip(vertices).expect("up-edge geometry always names a real face");
}

fn label_as_direction_sign(label: SweepDirection) -> (Direction, i32) {
    use SweepDirection::*;
    match label {
        Xyz => (Direction::Xyz, 1),
        MinusXyz => (Direction::Xyz, -1),
        Xy => (Direction::Xy, 1),
        MinusXy => (Direction::Xy, -1),
        Xz => (Direction::Xz, 1),
        MinusXz => (Direction::Xz, -1),
        Yz => (Direction::Yz, 1),
        MinusYz => (Direction::Yz, -1),
    }
}

/// w=0 vertices carry their own direction `d` as a possible fourth up-edge alongside its three
/// siblings `[e0, e1, e2]`.
fn sweep_full_vertex(code: &mut Code, v: VertexIndex, edges: Vec<SweepDirection>, direction: SweepDirection) {
    let siblings = sweep_direction_siblings(direction);
    let (e0, e1, e2) = (siblings[0], siblings[1], siblings[2]);
    let has = |label: SweepDirection| edges.contains(&label);

    if edges.len() == 4 {
        flip_pair(code, v, direction, e0);
        flip_pair(code, v, direction, e1);
        flip_pair(code, v, direction, e2);
        return;
    }
    if has(direction) {
        let mut remaining: Vec<SweepDirection> = edges.into_iter().filter(|&l| l != direction).collect();
        if remaining.len() == 2 {
            let drop = code.rng.gen_range(0..2);
            remaining.remove(drop);
        }
        if let Some(&only) = remaining.first() {
            flip_pair(code, v, direction, only);
        }
        return;
    }
    let mut edges = edges;
    if edges.len() == 3 {
        let drop = code.rng.gen_range(0..3);
        edges.remove(drop);
    }
    // neither up-edge present matches `direction` itself here, so each of the two remaining
    // siblings gets its own (direction, sibling, sibling) flip, same shape as the 4-edge case.
    match (has_in(&edges, e0), has_in(&edges, e1), has_in(&edges, e2)) {
        (true, false, true) => {
            flip_pair(code, v, direction, e0);
            flip_pair(code, v, direction, e2);
        }
        (true, true, false) => {
            flip_pair(code, v, direction, e0);
            flip_pair(code, v, direction, e1);
        }
        (false, true, true) => {
            flip_pair(code, v, direction, e1);
            flip_pair(code, v, direction, e2);
        }
        _ => panic!("vertex {v} has an up-edge combination sweep_full_vertex cannot resolve for direction {direction:?}"),
    }
}

fn has_in(edges: &[SweepDirection], label: SweepDirection) -> bool {
    edges.contains(&label)
}

fn flip_pair(code: &mut Code, v: VertexIndex, a: SweepDirection, b: SweepDirection) {
    let (d0, s0) = label_as_direction_sign(a);
    let (d1, s1) = label_as_direction_sign(b);
    flip(code, face_vertices(code, v, d0, s0, d1, s1, d1, s1));
}

/// w=1 interior half-vertices only ever see the three siblings `[e0, e1, e2]`, never `d` itself.
fn sweep_half_vertex(code: &mut Code, v: VertexIndex, mut edges: Vec<SweepDirection>, direction: SweepDirection) {
    let siblings = sweep_direction_siblings(direction);
    let (e0, e1, e2) = (siblings[0], siblings[1], siblings[2]);
    if edges.len() == 3 {
        let drop = code.rng.gen_range(0..3);
        edges.remove(drop);
    }
    match (has_in(&edges, e0), has_in(&edges, e1), has_in(&edges, e2)) {
        (true, false, true) => flip_pair(code, v, e0, e2),
        (true, true, false) => flip_pair(code, v, e0, e1),
        (false, true, true) => flip_pair(code, v, e1, e2),
        _ => panic!("vertex {v} has an up-edge combination sweep_half_vertex cannot resolve for direction {direction:?}"),
    }
}

/// the single-up-edge case on specific bounded-rhombic boundary rows: four `(y, z)` locations,
/// each with two sub-cases keyed on which lone up-edge is present and the active sweep direction.
/// Any other edge count on a bounded half-vertex falls back to the interior rule.
fn sweep_half_vertex_boundary(code: &mut Code, v: VertexIndex, edges: Vec<SweepDirection>, direction: SweepDirection, c: crate::geometry::Coordinate) {
    use SweepDirection::*;
    if edges.len() != 1 {
        sweep_half_vertex(code, v, edges, direction);
        return;
    }
    let only = edges[0];
    let l = code.geometry.l as i64;
    let target = if c.y == 0 && c.z == 1 {
        match (only, direction) {
            (Xy, MinusYz) | (Xy, MinusXz) => Some((Xy, MinusXyz)),
            (MinusXz, Xy) | (MinusXz, MinusXyz) => Some((MinusXz, MinusYz)),
            _ => None,
        }
    } else if c.y == 0 && c.z == l - 2 {
        match (only, direction) {
            (Yz, MinusXy) | (Yz, Xyz) => Some((Yz, Xz)),
            (Xyz, Xz) | (Xyz, Yz) => Some((Xyz, MinusXy)),
            _ => None,
        }
    } else if c.y == l - 2 && c.z == 1 {
        match (only, direction) {
            (MinusXyz, MinusXz) | (MinusXyz, MinusYz) => Some((MinusXyz, Xy)),
            (MinusYz, Xy) | (MinusYz, MinusXyz) => Some((MinusXz, MinusYz)),
            _ => None,
        }
    } else if c.y == l - 2 && c.z == l - 2 {
        match (only, direction) {
            (Xz, MinusXy) | (Xz, Xyz) => Some((Xz, Yz)),
            (MinusXy, Xz) | (MinusXy, Yz) => Some((Xyz, MinusXy)),
            _ => None,
        }
    } else {
        None
    };
    if let Some((a, b)) = target {
        let (d0, s0) = label_as_direction_sign(a);
        let (d1, s1) = label_as_direction_sign(b);
        flip(code, face_vertices(code, v, d0, s0, d1, s1, d1, s1));
    }
}

fn sweep_cubic_vertex(code: &mut Code, v: VertexIndex, direction: SweepDirection) {
    let mut edges = find_sweep_edges_cubic(code, v, direction);
    if edges.is_empty() {
        return;
    }
    if edges.len() > 3 {
        panic!("vertex {v} has {} up-edges in the syndrome for direction {direction:?}, more than a cubic vertex has axes", edges.len());
    }
    if edges.len() == 3 {
        let drop = code.rng.gen_range(0..3);
        edges.remove(drop);
    }
    let triple = cubic_axis_candidates(direction).map(|(d, s)| axis_label(d, s));
    let (e0, e1, e2) = (triple[0], triple[1], triple[2]);
    let has = |label: AxisLabel| edges.contains(&label);
    let (d0, s0) = axis_direction_sign(e0);
    let (d1, s1) = axis_direction_sign(e1);
    let (d2, s2) = axis_direction_sign(e2);
    match (has(e0), has(e1), has(e2)) {
        (true, false, true) => {
            flip(code, face_vertices(code, v, d0, s0, d2, s2, d2, s2));
        }
        (true, true, false) => {
            flip(code, face_vertices(code, v, d0, s0, d1, s1, d1, s1));
        }
        (false, true, true) => {
            flip(code, face_vertices(code, v, d2, s2, d1, s1, d1, s1));
        }
        _ => panic!("vertex {v} has an up-edge combination the cellular automaton step cannot resolve for direction {direction:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;
    use crate::geometry::{Boundary, Family};

    #[test]
    fn sweep_with_no_syndrome_is_a_no_op() {
        let mut code = Code::new(Family::Rhombic, Boundary::Toric, 4, 0.0, 0.0, 1).unwrap();
        sweep(&mut code, SweepDirection::Xyz, false);
        assert!(code.error.is_empty());
    }

    #[test]
    fn single_face_error_eventually_clears_under_full_schedule() {
        let mut code = Code::new(Family::Cubic, Boundary::Toric, 6, 0.0, 0.0, 1).unwrap();
        code.set_error(0);
        code.calculate_syndrome();
        let schedule = [
            SweepDirection::Xyz,
            SweepDirection::Xy,
            SweepDirection::Xz,
            SweepDirection::Yz,
            SweepDirection::MinusXyz,
            SweepDirection::MinusXy,
            SweepDirection::MinusXz,
            SweepDirection::MinusYz,
        ];
        for _ in 0..4 {
            for &direction in &schedule {
                sweep(&mut code, direction, false);
                code.calculate_syndrome();
                if code.syndrome_is_clean() {
                    return;
                }
            }
        }
        assert!(code.syndrome_is_clean(), "single fault should clear well within a handful of full schedule passes");
    }

    #[test]
    fn bounded_rhombic_single_face_error_eventually_clears_under_full_schedule() {
        let mut code = Code::new(Family::Rhombic, Boundary::Bounded, 6, 0.0, 0.0, 1).unwrap();
        code.set_error(0);
        code.calculate_syndrome();
        let schedule = [
            SweepDirection::Xyz,
            SweepDirection::Xy,
            SweepDirection::Xz,
            SweepDirection::Yz,
            SweepDirection::MinusXyz,
            SweepDirection::MinusXy,
            SweepDirection::MinusXz,
            SweepDirection::MinusYz,
        ];
        for _ in 0..8 {
            for &direction in &schedule {
                sweep(&mut code, direction, false);
                code.calculate_syndrome();
                if code.syndrome_is_clean() {
                    return;
                }
            }
        }
        assert!(code.syndrome_is_clean(), "single fault on a bounded rhombic code should clear within a handful of full schedule passes");
    }
}

//! Mutable decoding state for one code instance: current error, syndrome, sweep scratch buffer,
//! and the logical operators used to judge whether a correction succeeded.

use crate::geometry::{Boundary, Family, Geometry};
use crate::util::{rng_from_seed, DeterministicRng, EdgeIndex, FaceIndex, GeometryError, GeometryResult, VertexIndex};
use std::collections::HashSet;

pub struct Code {
    pub geometry: Geometry,
    pub p: f64,
    pub q: f64,
    pub error: HashSet<FaceIndex>,
    pub syndrome: Vec<bool>,
    pub flip_bits: Vec<bool>,
    pub syndrome_indices: Option<HashSet<EdgeIndex>>,
    pub sweep_indices: Vec<VertexIndex>,
    pub logical_z1: Vec<FaceIndex>,
    pub logical_z2: Option<Vec<FaceIndex>>,
    pub logical_z3: Option<Vec<FaceIndex>>,
    pub rng: DeterministicRng,
}

impl Code {
    pub fn new(family: Family, boundary: Boundary, l: usize, p: f64, q: f64, seed: u64) -> GeometryResult<Code> {
        if !(0.0..=1.0).contains(&p) || !(0.0..=1.0).contains(&q) {
            return Err(GeometryError::InvalidArgument("p and q must lie in [0, 1]".into()));
        }
        let geometry = Geometry::new(family, boundary, l)?;
        let num_edges = 7 * geometry.vertex_count;
        let num_faces = geometry.face_to_vertices.len();
        let syndrome_indices = geometry.build_syndrome_indices();
        let sweep_indices = geometry.build_sweep_indices();
        let (logical_z1, logical_z2, logical_z3) = geometry.build_logicals()?;
        Ok(Code {
            geometry,
            p,
            q,
            error: HashSet::new(),
            syndrome: vec![false; num_edges],
            flip_bits: vec![false; num_faces],
            syndrome_indices,
            sweep_indices,
            logical_z1,
            logical_z2,
            logical_z3,
            rng: rng_from_seed(seed),
        })
    }

    pub fn clear_syndrome(&mut self) {
        self.syndrome.iter_mut().for_each(|b| *b = false);
    }

    pub fn clear_flip_bits(&mut self) {
        self.flip_bits.iter_mut().for_each(|b| *b = false);
    }

    pub fn set_error(&mut self, face: FaceIndex) {
        if !self.error.remove(&face) {
            self.error.insert(face);
        }
    }

    /// recomputes `syndrome` from scratch as the parity, per edge, of the faces in `error`
    /// touching it; on bounded lattices only edges in `syndrome_indices` are ever set.
    pub fn calculate_syndrome(&mut self) {
        self.clear_syndrome();
        for &face in &self.error {
            for &edge in &self.geometry.face_to_edges[face] {
                if let Some(indices) = &self.syndrome_indices {
                    if !indices.contains(&edge) {
                        continue;
                    }
                }
                self.syndrome[edge] ^= true;
            }
        }
    }

    /// whether vertex `v`'s syndrome-bearing edges are all up-edges for `direction`; vertices
    /// with no syndrome-bearing edges at all are vacuously non-extremal (there is nothing to sweep).
    pub fn check_extremal_vertex(&self, v: VertexIndex, direction: crate::geometry::SweepDirection) -> bool {
        let up = self.geometry.up_edges(direction, v);
        let mut edge_in_syndrome = false;
        for &edge in &self.geometry.vertex_to_edges[v] {
            if self.syndrome[edge] {
                edge_in_syndrome = true;
                if !up.contains(&edge) {
                    return false;
                }
            }
        }
        edge_in_syndrome
    }

    pub fn local_flip(&mut self, vertices: [VertexIndex; 4]) -> GeometryResult<()> {
        let face = self.geometry.find_face(vertices)?;
        self.flip_bits[face] ^= true;
        Ok(())
    }

    /// parity check over each logical operator family; bounded codes only carry `logical_z1`.
    pub fn check_correction(&self) -> bool {
        let parity_even = |faces: &[FaceIndex], error: &HashSet<FaceIndex>| {
            faces.iter().filter(|f| error.contains(f)).count() % 2 == 0
        };
        if !parity_even(&self.logical_z1, &self.error) {
            return false;
        }
        if let Some(z2) = &self.logical_z2 {
            if !parity_even(z2, &self.error) {
                return false;
            }
        }
        if let Some(z3) = &self.logical_z3 {
            if !parity_even(z3, &self.error) {
                return false;
            }
        }
        true
    }

    /// commits the scratch `flip_bits` buffer into `error`, the way a synchronous sweep pass
    /// applies every vertex's local flip at once rather than as it is computed.
    pub fn commit_flip_bits(&mut self) {
        for face in 0..self.flip_bits.len() {
            if self.flip_bits[face] {
                self.set_error(face);
            }
        }
        self.clear_flip_bits();
    }

    pub fn syndrome_is_clean(&self) -> bool {
        match &self.syndrome_indices {
            Some(indices) => indices.iter().all(|&e| !self.syndrome[e]),
            None => self.syndrome.iter().all(|&b| !b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Boundary, Family};

    #[test]
    fn fresh_code_has_clean_syndrome() {
        let code = Code::new(Family::Rhombic, Boundary::Toric, 4, 0.05, 0.0, 1).unwrap();
        assert!(code.syndrome.iter().all(|&b| !b));
        assert!(code.check_correction());
    }

    #[test]
    fn bounded_rhombic_code_has_clean_syndrome_and_single_logical_family() {
        let code = Code::new(Family::Rhombic, Boundary::Bounded, 6, 0.05, 0.0, 1).unwrap();
        assert!(code.syndrome_indices.is_some());
        assert!(code.logical_z2.is_none());
        assert!(code.logical_z3.is_none());
        assert!(!code.logical_z1.is_empty());
        assert!(code.syndrome_is_clean());
        assert!(code.check_correction());
    }

    #[test]
    fn rejects_out_of_range_probabilities() {
        assert!(Code::new(Family::Cubic, Boundary::Toric, 6, 1.5, 0.0, 1).is_err());
    }

    #[test]
    fn setting_error_twice_clears_it() {
        let mut code = Code::new(Family::Cubic, Boundary::Toric, 6, 0.0, 0.0, 1).unwrap();
        code.set_error(0);
        assert!(code.error.contains(&0));
        code.set_error(0);
        assert!(!code.error.contains(&0));
    }
}

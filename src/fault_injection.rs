//! Independent Bernoulli data/measurement error models, plus a pluggable correlated-error hook.

use crate::code::Code;
use crate::util::F64Rng;

/// a correlated error model couples the toggle of one face to others drawn with it.
///
/// Resolves the open question of what a "correlated" data-error model should mean: rather than
/// committing to one hardcoded correlation table, callers that want correlated errors supply an
/// implementation of this trait to [`generate_data_error`].
pub trait CorrelatedErrorModel {
    /// given that `face` was just toggled, return the additional faces to toggle alongside it.
    fn partners(&self, code: &Code, face: crate::util::FaceIndex) -> Vec<crate::util::FaceIndex>;
}

/// toggles a face together with its xyz-diagonal neighbour, when one exists.
pub struct DiagonalPairModel;

impl CorrelatedErrorModel for DiagonalPairModel {
    fn partners(&self, code: &Code, face: crate::util::FaceIndex) -> Vec<crate::util::FaceIndex> {
        let vertices = code.geometry.face_to_vertices[face];
        let mut partners = Vec::new();
        for &v in &vertices {
            if let Ok(n) = code.geometry.neighbour(v, crate::geometry::Direction::Xyz, 1) {
                let mut candidate = vertices;
                if let Some(slot) = candidate.iter().position(|&x| x == v) {
                    candidate[slot] = n;
                    if let Ok(partner_face) = code.geometry.find_face(candidate) {
                        partners.push(partner_face);
                    }
                }
            }
        }
        partners
    }
}

/// independently toggles each face in `error` with probability `code.p`; when `correlated` is
/// `Some`, every toggled face also toggles its model-chosen partners.
pub fn generate_data_error(code: &mut Code, correlated: Option<&dyn CorrelatedErrorModel>) {
    let num_faces = code.flip_bits.len();
    for face in 0..num_faces {
        if code.rng.next_f64() <= code.p {
            code.set_error(face);
            if let Some(model) = correlated {
                for partner in model.partners(code, face) {
                    code.set_error(partner);
                }
            }
        }
    }
}

/// independently flips each syndrome bit with probability `code.q`, over the edges that
/// actually carry syndrome information (all edges for toric codes, `syndrome_indices` for
/// bounded ones).
pub fn generate_meas_error(code: &mut Code) {
    match &code.syndrome_indices {
        Some(indices) => {
            let indices: Vec<_> = indices.iter().copied().collect();
            for edge in indices {
                if code.rng.next_f64() <= code.q {
                    code.syndrome[edge] ^= true;
                }
            }
        }
        None => {
            for edge in 0..code.syndrome.len() {
                if code.rng.next_f64() <= code.q {
                    code.syndrome[edge] ^= true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Boundary, Family};

    #[test]
    fn zero_probability_injects_nothing() {
        let mut code = Code::new(Family::Rhombic, Boundary::Toric, 4, 0.0, 0.0, 1).unwrap();
        generate_data_error(&mut code, None);
        assert!(code.error.is_empty());
        code.calculate_syndrome();
        generate_meas_error(&mut code);
        assert!(code.syndrome.iter().all(|&b| !b));
    }

    #[test]
    fn certain_probability_injects_every_face() {
        let mut code = Code::new(Family::Cubic, Boundary::Toric, 6, 1.0, 0.0, 1).unwrap();
        generate_data_error(&mut code, None);
        assert_eq!(code.error.len(), code.flip_bits.len());
    }

    #[test]
    fn bounded_rhombic_certain_probability_injects_every_face_and_flips_only_syndrome_edges() {
        let mut code = Code::new(Family::Rhombic, Boundary::Bounded, 6, 1.0, 1.0, 1).unwrap();
        generate_data_error(&mut code, None);
        assert_eq!(code.error.len(), code.flip_bits.len());
        code.calculate_syndrome();
        generate_meas_error(&mut code);
        let indices = code.syndrome_indices.as_ref().unwrap();
        for edge in 0..code.syndrome.len() {
            if !indices.contains(&edge) {
                assert!(!code.syndrome[edge], "edge {edge} outside syndrome_indices must stay clear");
            }
        }
    }
}

//! Exhaustive L2 index over fixed-dimension vectors.
//!
//! Vectors are stored row-major in one flat buffer; a vector's position is the
//! order in which it was added and is the join key callers use for metadata.

use lexaid_core::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    data: Vec<f32>,
}

/// A search hit: position in the index and squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

impl FlatIndex {
    pub fn new(dim: usize) -> Self { Self { dim, data: Vec::new() } }

    pub(crate) fn from_parts(dim: usize, data: Vec<f32>) -> Result<Self> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(Error::Operation(format!("{} values do not form {}-d vectors", data.len(), dim)));
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize { self.dim }

    /// Number of stored vectors.
    pub fn len(&self) -> usize { if self.dim == 0 { 0 } else { self.data.len() / self.dim } }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    pub(crate) fn raw(&self) -> &[f32] { &self.data }

    /// Appends one vector and returns its position.
    pub fn add(&mut self, vector: &[f32]) -> Result<usize> {
        if vector.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: vector.len() });
        }
        self.data.extend_from_slice(vector);
        Ok(self.len() - 1)
    }

    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    /// The `k` nearest vectors by ascending squared L2 distance; ties go to the lower position.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query.len() });
        }
        let mut hits: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, v)| Neighbor { position, distance: squared_l2(v, query) })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.position.cmp(&b.position)));
        hits.truncate(k);
        Ok(hits)
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

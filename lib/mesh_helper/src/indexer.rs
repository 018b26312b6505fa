//! Deduplicates (position index, normal) pairs into a packed vertex index
//! space.
//!
//! Model files usually index positions and normals separately, while a vertex
//! buffer needs one vertex per distinct combination. [`VertexIndexer`] hands
//! out packed indices in first-seen order. A position that shows up with more
//! than one normal keeps a chain of slots in a fixed arena; the chain links
//! are plain slot numbers, terminated by [`NO_NEXT`].

use std::collections::TryReserveError;

use log::{debug, trace};
use thiserror::Error;

/// Link value that terminates a collision chain.
pub const NO_NEXT: u32 = u32::MAX;

#[derive(Error, Debug)]
pub enum IndexerError {
  #[error("failed to allocate {capacity} vertex indexer slots")]
  Allocation {
    capacity: usize,
    #[source]
    source: TryReserveError,
  },
  #[error(
    "capacity {capacity} is smaller than the collision index start {collision_index_start}"
  )]
  CapacityBelowStart {
    collision_index_start: u32,
    capacity: u32,
  },
  #[error("{sparse_count} positions and {face_count} faces overflow a 32-bit capacity")]
  CapacityOverflow { sparse_count: u32, face_count: u32 },
}

/// Result of a single [`VertexIndexer::index_for`] query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexFor {
  /// Packed index to write into the index buffer.
  pub index: u32,
  /// `true` when `index` was assigned by this query, i.e. the caller still
  /// has to write the vertex attributes at `index`.
  pub new_vertex: bool,
}

#[derive(Clone, Copy, Debug)]
struct Record<N> {
  normal: Option<N>,
  next: u32,
}

impl<N> Record<N> {
  const EMPTY: Self = Record {
    normal: None,
    next: NO_NEXT,
  };
}

/// Number of slots that always suffices for a triangle mesh: every face
/// corner can add at most one collision slot.
pub fn worst_case_capacity(sparse_count: u32, face_count: u32) -> Option<u32> {
  face_count
    .checked_mul(3)
    .and_then(|corners| corners.checked_add(sparse_count))
}

fn allocate<T: Clone>(len: usize, value: T) -> Result<Vec<T>, IndexerError> {
  let mut slots = Vec::new();
  slots
    .try_reserve_exact(len)
    .map_err(|source| IndexerError::Allocation {
      capacity: len,
      source,
    })?;
  slots.resize(len, value);
  Ok(slots)
}

/// Fixed-capacity arena mapping (sparse position index, normal) pairs to
/// packed vertex indices.
///
/// Slots `0..collision_index_start` are the heads of the per-position chains.
/// Every later slot is handed out, in order, to the first occurrence of a
/// normal that a position did not have yet.
///
/// Normals are compared with `==`. For `f32` components that is exact
/// comparison: two normals that differ in the last bit are different
/// vertices.
#[derive(Clone, Debug)]
pub struct VertexIndexer<N = [f32; 3]> {
  records: Vec<Record<N>>,
  index_map: Vec<u32>,
  collision_index_start: u32,
  next_collision_index: u32,
  next_packed_index: u32,
}

impl<N: Copy + PartialEq> VertexIndexer<N> {
  /// Allocates `capacity` slots, the first `collision_index_start` of which
  /// are addressed directly by sparse index.
  pub fn new(
    collision_index_start: u32,
    capacity: u32,
  ) -> Result<Self, IndexerError> {
    if capacity < collision_index_start {
      return Err(IndexerError::CapacityBelowStart {
        collision_index_start,
        capacity,
      });
    }

    let records = allocate(capacity as usize, Record::EMPTY)?;
    let index_map = allocate(capacity as usize, 0)?;

    debug!(
      "Allocated vertex indexer: {collision_index_start} sparse slots, \
       capacity {capacity}"
    );

    Ok(Self {
      records,
      index_map,
      collision_index_start,
      next_collision_index: collision_index_start,
      next_packed_index: 0,
    })
  }

  /// Sizes the arena for a triangle mesh with `sparse_count` positions and
  /// `face_count` faces using [`worst_case_capacity`].
  pub fn for_mesh(
    sparse_count: u32,
    face_count: u32,
  ) -> Result<Self, IndexerError> {
    let capacity = worst_case_capacity(sparse_count, face_count).ok_or(
      IndexerError::CapacityOverflow {
        sparse_count,
        face_count,
      },
    )?;
    Self::new(sparse_count, capacity)
  }

  ///
  /// Returns the packed index for `sparse_index` paired with `normal`,
  /// assigning the next packed index if the pair has not been seen yet.
  ///
  /// # Panics
  ///
  /// Panics if `sparse_index` is not below the collision index start, or if
  /// a new collision slot is needed and the arena is full. Both mean the
  /// indexer was sized wrong for the mesh.
  ///
  pub fn index_for(&mut self, sparse_index: u32, normal: N) -> IndexFor {
    assert!(
      sparse_index < self.collision_index_start,
      "sparse index {sparse_index} is outside 0..{}",
      self.collision_index_start
    );

    let head = sparse_index as usize;
    if self.records[head].normal.is_none() {
      self.records[head].normal = Some(normal);
      return IndexFor {
        index: self.assign_packed_index(head),
        new_vertex: true,
      };
    }

    let mut tail = head;
    loop {
      let record = &self.records[tail];
      if record.normal == Some(normal) {
        return IndexFor {
          index: self.index_map[tail],
          new_vertex: false,
        };
      }
      if record.next == NO_NEXT {
        break;
      }
      tail = record.next as usize;
    }

    let slot = self.next_collision_index;
    assert!(
      (slot as usize) < self.records.len(),
      "vertex indexer capacity {} exceeded while adding a normal to sparse index {sparse_index}",
      self.records.len()
    );

    self.records[tail].next = slot;
    self.records[slot as usize].normal = Some(normal);
    self.next_collision_index += 1;
    trace!("Sparse index {sparse_index} collided, chained into slot {slot}");

    IndexFor {
      index: self.assign_packed_index(slot as usize),
      new_vertex: true,
    }
  }

  fn assign_packed_index(&mut self, slot: usize) -> u32 {
    let index = self.next_packed_index;
    self.index_map[slot] = index;
    self.next_packed_index += 1;
    index
  }
}

impl<N> VertexIndexer<N> {
  /// Number of distinct pairs seen so far, which is also the next packed
  /// index to be assigned.
  pub fn vertex_count(&self) -> u32 {
    self.next_packed_index
  }

  /// Number of collision slots in use.
  pub fn collision_count(&self) -> u32 {
    self.next_collision_index - self.collision_index_start
  }

  /// First slot used for collisions; sparse indices must stay below it.
  pub fn collision_index_start(&self) -> u32 {
    self.collision_index_start
  }

  /// Total number of slots, sparse heads included.
  pub fn capacity(&self) -> u32 {
    self.records.len() as u32
  }

  /// Iterates the chain of `sparse_index` as `(normal, packed index)` pairs,
  /// in the order the normals were first seen.
  pub fn chain(&self, sparse_index: u32) -> Chain<'_, N> {
    let start = match self.records.get(sparse_index as usize) {
      Some(Record {
        normal: Some(_), ..
      }) if sparse_index < self.collision_index_start => sparse_index,
      _ => NO_NEXT,
    };

    Chain {
      indexer: self,
      slot: start,
    }
  }
}

/// Iterator returned by [`VertexIndexer::chain`].
pub struct Chain<'a, N> {
  indexer: &'a VertexIndexer<N>,
  slot: u32,
}

impl<N: Copy> Iterator for Chain<'_, N> {
  type Item = (N, u32);

  fn next(&mut self) -> Option<Self::Item> {
    if self.slot == NO_NEXT {
      return None;
    }

    let slot = self.slot as usize;
    let record = &self.indexer.records[slot];
    self.slot = record.next;
    record.normal.map(|normal| (normal, self.indexer.index_map[slot]))
  }
}

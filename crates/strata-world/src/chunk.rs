//! A loaded chunk: its block data plus the mesh state machine.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use glam::UVec3;
use tracing::warn;

use strata_mesh::{MeshBuffers, MeshError};
use strata_voxel::{Block, ChunkBlocks, ChunkCoord};

/// A chunk resident in the world.
///
/// The mesh lifecycle is `clean -> dirty -> building -> clean`. An edit
/// while a build is in flight re-dirties the chunk; the stale result is
/// still applied when it arrives and the re-dirty triggers a fresh build,
/// so the last build always wins. Blocks are held behind an `Arc` with
/// copy-on-write edits, letting an in-flight build keep reading the
/// snapshot it was given. Mutation is expected from a single frame thread;
/// the map holding the chunk enforces exclusive access.
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Arc<ChunkBlocks>,
    dirty: bool,
    build_rx: Option<Receiver<Result<MeshBuffers, MeshError>>>,
    mesh: Option<Arc<MeshBuffers>>,
}

impl Chunk {
    /// Wraps freshly generated blocks; the chunk starts dirty so its first
    /// mesh build is scheduled on the next pass.
    pub fn new(coord: ChunkCoord, blocks: ChunkBlocks) -> Self {
        Self {
            coord,
            blocks: Arc::new(blocks),
            dirty: true,
            build_rx: None,
            mesh: None,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The current block snapshot.
    pub fn blocks(&self) -> &Arc<ChunkBlocks> {
        &self.blocks
    }

    /// The most recently completed mesh, if the chunk has visible geometry.
    pub fn mesh(&self) -> Option<Arc<MeshBuffers>> {
        self.mesh.clone()
    }

    /// True when the blocks have changed since the last scheduled build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True while a mesh build for this chunk is running or undelivered.
    pub fn build_in_flight(&self) -> bool {
        self.build_rx.is_some()
    }

    /// Writes one block and marks the chunk dirty.
    ///
    /// Copy-on-write: if a build task still holds the previous snapshot,
    /// the blocks are cloned so the task keeps reading unchanged data.
    pub fn set_block(&mut self, local: UVec3, block: Block) {
        Arc::make_mut(&mut self.blocks).set(local.x, local.y, local.z, block);
        self.dirty = true;
    }

    /// Claims a mesh build if the chunk is dirty and none is in flight.
    ///
    /// Returns the block snapshot to mesh and the channel the finished
    /// build must be sent on. The dirty flag clears now; an edit during
    /// the build sets it again.
    pub(crate) fn begin_build(
        &mut self,
    ) -> Option<(Arc<ChunkBlocks>, Sender<Result<MeshBuffers, MeshError>>)> {
        if !self.dirty || self.build_rx.is_some() {
            return None;
        }
        self.dirty = false;
        let (tx, rx) = bounded(1);
        self.build_rx = Some(rx);
        Some((Arc::clone(&self.blocks), tx))
    }

    /// Applies a finished mesh build if one has arrived. Non-blocking.
    ///
    /// Empty buffers clear the mesh (nothing to draw). A failed build is
    /// logged and the previous mesh stays. Returns true when the mesh
    /// changed.
    pub fn poll_mesh(&mut self) -> bool {
        let Some(rx) = &self.build_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(Ok(buffers)) => {
                self.build_rx = None;
                self.mesh = (!buffers.is_empty()).then(|| Arc::new(buffers));
                true
            }
            Ok(Err(err)) => {
                self.build_rx = None;
                warn!(coord = ?self.coord, %err, "mesh build failed, keeping previous mesh");
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // The worker dropped the channel without a result; only
                // happens when the pool shuts down mid-build.
                self.build_rx = None;
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

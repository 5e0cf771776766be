//! GPU-side geometry lifetime.
//!
//! The scene never talks to a graphics API directly. It uploads CPU meshes
//! through a [`GeometryBackend`] and must release a handle before replacing
//! it, otherwise the buffers behind it leak for the lifetime of the context.

use std::collections::HashSet;
use std::fmt;

use crate::error::BackendError;
use crate::shapes::mesh::MeshData;

pub trait GeometryBackend {
    type Handle: Clone + fmt::Debug;

    fn label(&self) -> &'static str;

    /// Copy `mesh` into GPU buffers.
    fn upload(&mut self, label: &str, mesh: &MeshData) -> Result<Self::Handle, BackendError>;

    /// Free the buffers behind `handle`. The handle must not be used afterwards.
    fn release(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum BackendEvent {
    Upload {
        id: GeometryId,
        label: String,
        vertex_count: usize,
        triangle_count: usize,
    },
    Release {
        id: GeometryId,
    },
}

/// Headless backend: hands out ids, keeps a copy of each uploaded mesh and
/// journals every upload and release in order.
#[derive(Default)]
pub struct NullBackend {
    next_id: u64,
    live: HashSet<GeometryId>,
    meshes: Vec<(GeometryId, MeshData)>,
    events: Vec<BackendEvent>,
    /// When set, the next upload fails with this message.
    pub fail_next_upload: Option<&'static str>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: GeometryId) -> bool {
        self.live.contains(&id)
    }

    /// The mesh uploaded under `id`, if it has not been released.
    pub fn mesh(&self, id: GeometryId) -> Option<&MeshData> {
        self.meshes
            .iter()
            .find(|(mesh_id, _)| *mesh_id == id)
            .map(|(_, mesh)| mesh)
    }
}

impl GeometryBackend for NullBackend {
    type Handle = GeometryId;

    fn label(&self) -> &'static str {
        "null"
    }

    fn upload(&mut self, label: &str, mesh: &MeshData) -> Result<GeometryId, BackendError> {
        if let Some(reason) = self.fail_next_upload.take() {
            return Err(BackendError::Allocation(reason));
        }
        self.next_id += 1;
        let id = GeometryId(self.next_id);
        self.live.insert(id);
        self.meshes.push((id, mesh.clone()));
        self.events.push(BackendEvent::Upload {
            id,
            label: label.to_owned(),
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
        });
        Ok(id)
    }

    fn release(&mut self, id: GeometryId) {
        if self.live.remove(&id) {
            self.meshes.retain(|(mesh_id, _)| *mesh_id != id);
        } else {
            log::warn!("release of unknown geometry {:?}", id);
        }
        self.events.push(BackendEvent::Release { id });
    }
}

// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Arena: bounded lifetimes for per-frame graphics resources.
//!
//! Drawing a retained scene with an immediate-mode backend creates many
//! short-lived backend objects: a path per shape, a paint per draw call, a clip
//! path per clip node. [`ResourceArena`] records every such object as it is
//! created and destroys them all in one batch at a well-defined point, which
//! for the frame lifecycle is the start of the next frame.
//!
//! Handles handed out by the arena carry the lifetime of the frame scope that
//! produced them, so holding one across a release point is rejected by the
//! borrow checker:
//!
//! ```compile_fail
//! # use canopy_arena::ResourceArena;
//! # use canopy_imaging::{PathDesc, ResourceBackend, ImagingBackend};
//! # fn demo<B: ImagingBackend>(backend: &mut B, desc: PathDesc) {
//! let mut arena = ResourceArena::new();
//! let path = arena.frame(backend).path(desc);
//! arena.release_all(backend); // error: `arena` is still borrowed by `path`
//! let _ = path.id();
//! # }
//! ```
//!
//! The brand covers the arena handles only. The raw backend ids they expose
//! through `id()` are plain `Copy` values that go stale at the next release.
//!
//! Resources that must outlive a frame (decoded images, for example) are
//! created directly through [`ResourceBackend`] and owned by whoever created
//! them.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use canopy_imaging::{PaintDesc, PaintId, PathDesc, PathId, ResourceBackend};

/// The kind and backend handle of an arena-owned resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArenaResource {
    /// A path created through [`FrameResources::path`].
    Path(PathId),
    /// A paint created through [`FrameResources::paint`].
    Paint(PaintId),
}

#[derive(Debug)]
struct Entry {
    resource: ArenaResource,
    deleted: bool,
}

/// A pending list of backend resources awaiting a batch release.
#[derive(Debug, Default)]
pub struct ResourceArena {
    pending: Vec<Entry>,
    total_released: usize,
}

impl ResourceArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an allocation scope on `backend`.
    ///
    /// Everything created through the returned [`FrameResources`] is appended
    /// to this arena's pending list.
    pub fn frame<'a, B: ResourceBackend + ?Sized>(
        &'a mut self,
        backend: &'a mut B,
    ) -> FrameResources<'a, B> {
        FrameResources {
            arena: self,
            backend,
        }
    }

    /// Destroy every pending resource and clear the list.
    ///
    /// Returns the number of resources destroyed by this call. Calling it again
    /// without new allocations destroys nothing and returns `0`.
    pub fn release_all<B: ResourceBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let mut released = 0;
        for entry in self.pending.iter_mut().filter(|entry| !entry.deleted) {
            match entry.resource {
                ArenaResource::Path(id) => backend.destroy_path(id),
                ArenaResource::Paint(id) => backend.destroy_paint(id),
            }
            entry.deleted = true;
            released += 1;
        }
        self.pending.clear();
        self.total_released += released;
        released
    }

    /// Number of resources awaiting release.
    pub fn pending_len(&self) -> usize {
        self.pending.iter().filter(|entry| !entry.deleted).count()
    }

    /// Returns `true` if nothing is awaiting release.
    pub fn is_empty(&self) -> bool {
        self.pending_len() == 0
    }

    /// Iterate over the resources awaiting release, in creation order.
    pub fn pending(&self) -> impl Iterator<Item = ArenaResource> + '_ {
        self.pending
            .iter()
            .filter(|entry| !entry.deleted)
            .map(|entry| entry.resource)
    }

    /// Number of resources released over the arena's lifetime.
    pub fn total_released(&self) -> usize {
        self.total_released
    }

    fn push(&mut self, resource: ArenaResource) {
        self.pending.push(Entry {
            resource,
            deleted: false,
        });
    }
}

/// Allocation scope tying a [`ResourceArena`] to a backend for one frame.
///
/// The scope also lends out the backend so the caller can issue draw
/// operations between allocations.
pub struct FrameResources<'a, B: ?Sized> {
    arena: &'a mut ResourceArena,
    backend: &'a mut B,
}

impl<B: ?Sized> fmt::Debug for FrameResources<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameResources")
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

impl<'a, B: ResourceBackend + ?Sized> FrameResources<'a, B> {
    /// Create a path owned by the arena.
    pub fn path(&mut self, desc: PathDesc) -> ArenaPath<'a> {
        let id = self.backend.create_path(desc);
        self.arena.push(ArenaResource::Path(id));
        ArenaPath {
            id,
            _frame: PhantomData,
        }
    }

    /// Create a paint owned by the arena.
    pub fn paint(&mut self, desc: PaintDesc) -> ArenaPaint<'a> {
        let id = self.backend.create_paint(desc);
        self.arena.push(ArenaResource::Paint(id));
        ArenaPaint {
            id,
            _frame: PhantomData,
        }
    }

    /// The backend this scope allocates from.
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }

    /// Number of resources awaiting release, including earlier frames'.
    pub fn pending_len(&self) -> usize {
        self.arena.pending_len()
    }
}

/// A path handle valid until the owning arena's next release.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArenaPath<'a> {
    id: PathId,
    _frame: PhantomData<&'a ()>,
}

impl ArenaPath<'_> {
    /// The backend handle, for building draw and state operations.
    ///
    /// The returned id is a plain value and is not tied to the frame borrow.
    /// It names a live path only until the arena's next
    /// [`release_all`](ResourceArena::release_all); after that the backend may
    /// hand the same slot to another resource.
    pub fn id(self) -> PathId {
        self.id
    }
}

/// A paint handle valid until the owning arena's next release.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArenaPaint<'a> {
    id: PaintId,
    _frame: PhantomData<&'a ()>,
}

impl ArenaPaint<'_> {
    /// The backend handle, for building draw operations.
    ///
    /// Like [`ArenaPath::id`], the id is only meaningful until the arena's
    /// next release.
    pub fn id(self) -> PaintId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_imaging::{DrawOp, ImagingBackend};
    use canopy_imaging_ref::{Event, RefBackend, Resource};
    use kurbo::{Rect, Shape};
    use peniko::Color;

    fn square() -> PathDesc {
        PathDesc::new(Rect::new(0., 0., 4., 4.).to_path(0.1))
    }

    #[test]
    fn release_destroys_everything_created_in_the_frame() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        let mut frame = arena.frame(&mut backend);
        let path = frame.path(square());
        let paint = frame.paint(PaintDesc::fill(Color::WHITE));
        frame.backend().draw(DrawOp::Path {
            path: path.id(),
            paint: paint.id(),
        });
        assert_eq!(frame.pending_len(), 2);

        assert_eq!(arena.release_all(&mut backend), 2);
        assert_eq!(backend.live_resources(), 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        {
            let mut frame = arena.frame(&mut backend);
            frame.path(square());
            frame.path(square());
            frame.paint(PaintDesc::fill(Color::BLACK));
        }

        assert_eq!(arena.release_all(&mut backend), 3);
        assert_eq!(arena.release_all(&mut backend), 0);
        assert_eq!(backend.destroyed(), 3);
        assert_eq!(arena.total_released(), 3);
    }

    #[test]
    fn release_order_follows_creation_order() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        let (path, paint) = {
            let mut frame = arena.frame(&mut backend);
            (frame.path(square()).id(), frame.paint(PaintDesc::fill(Color::WHITE)).id())
        };
        assert_eq!(
            arena.pending().collect::<Vec<_>>(),
            [ArenaResource::Path(path), ArenaResource::Paint(paint)]
        );

        backend.clear_events();
        arena.release_all(&mut backend);
        assert_eq!(
            backend.events(),
            [
                Event::Destroy(Resource::Path(path)),
                Event::Destroy(Resource::Paint(paint)),
            ]
        );
    }

    #[test]
    fn raw_ids_go_stale_at_release() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        let (path, paint) = {
            let mut frame = arena.frame(&mut backend);
            (frame.path(square()).id(), frame.paint(PaintDesc::fill(Color::WHITE)).id())
        };
        assert!(backend.path(path).is_some());
        assert!(backend.paint(paint).is_some());

        arena.release_all(&mut backend);
        assert!(backend.path(path).is_none());
        assert!(backend.paint(paint).is_none());
    }

    #[test]
    fn resources_created_outside_the_arena_survive_release() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        let long_lived = backend.create_path(square());
        arena.frame(&mut backend).path(square());
        arena.release_all(&mut backend);

        assert!(backend.path(long_lived).is_some());
        assert_eq!(backend.live_resources(), 1);
    }

    #[test]
    fn frames_accumulate_until_released() {
        let mut backend = RefBackend::new();
        let mut arena = ResourceArena::new();

        arena.frame(&mut backend).path(square());
        arena.frame(&mut backend).path(square());
        assert_eq!(arena.pending_len(), 2);
        assert_eq!(arena.release_all(&mut backend), 2);
    }
}

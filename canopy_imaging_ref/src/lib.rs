// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Imaging Reference Backend.
//!
//! This crate provides a small, stateful implementation of
//! [`ImagingBackend`] and [`ResourceBackend`]
//! for **IR recording and state tracing**.
//!
//! It does not rasterize. It exists so tests can assert on:
//! - the ops a frame emitted and the imaging state when each was applied,
//! - the order of resource creation, destruction, drawing and flushing,
//! - which resources are still alive after a frame.
//!
//! Text is measured with a fixed-advance approximation so layout that depends
//! on [`ImagingBackend::measure_text`] stays deterministic.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use canopy_imaging::{
    Affine, DrawOp, FlushError, ImageDesc, ImageId, ImagingBackend, ImagingOp, PaintDesc, PaintId,
    PathDesc, PathId, ResourceBackend, StateOp, TextMetrics, TextRun,
};

/// Horizontal advance per character, as a fraction of the font size.
pub const ADVANCE_PER_CHAR: f64 = 0.5;
/// Ascent as a fraction of the font size.
pub const ASCENT: f64 = 0.8;
/// Descent as a fraction of the font size.
pub const DESCENT: f64 = 0.2;

/// Snapshot of the current imaging state inside the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Number of active clips.
    pub clip_depth: u32,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clip_depth: 0,
        }
    }
}

/// A resource handle of any kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A path resource.
    Path(PathId),
    /// A paint resource.
    Paint(PaintId),
    /// An image resource.
    Image(ImageId),
}

/// Event recorded by the reference backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A resource was created.
    Create(Resource),
    /// A live resource was destroyed.
    Destroy(Resource),
    /// State operation and the resulting state snapshot.
    State {
        /// State operation that was applied.
        op: StateOp,
        /// Snapshot after applying the state operation.
        state: StateSnapshot,
    },
    /// Draw operation and the state snapshot used for drawing.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
    },
    /// The frame was presented (successfully or not).
    Flush {
        /// Whether the flush reported success.
        ok: bool,
    },
}

/// Simple reference implementation of the imaging backend.
///
/// Resource descriptors live in vectors keyed by their IDs. Destroying a
/// resource clears its slot; destroying it again is a no-op and is not
/// counted. Slots are never reused.
///
/// # Panics
///
/// Creating a resource panics once a kind has used up all `u32` ids. Ids are
/// never recycled, so a handle can never alias a different resource.
#[derive(Default, Debug)]
pub struct RefBackend {
    paths: Vec<Option<PathDesc>>,
    images: Vec<Option<(ImageDesc, Vec<u8>)>>,
    paints: Vec<Option<PaintDesc>>,

    events: Vec<Event>,
    ops: Vec<ImagingOp>,
    state: StateSnapshot,

    destroyed: usize,
    flushes: u32,
    failing_flushes: u32,
}

impl RefBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns a slice of raw imaging operations.
    pub fn ops(&self) -> &[ImagingOp] {
        &self.ops
    }

    /// Returns only the draw operations, in order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops.iter().filter_map(|op| match op {
            ImagingOp::Draw(draw) => Some(draw),
            ImagingOp::State(_) => None,
        })
    }

    /// Clears all recorded events and ops but keeps resources.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.ops.clear();
    }

    /// Current imaging state.
    pub fn state_snapshot(&self) -> &StateSnapshot {
        &self.state
    }

    /// Descriptor of a live path.
    pub fn path(&self, id: PathId) -> Option<&PathDesc> {
        self.paths.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Descriptor of a live paint.
    pub fn paint(&self, id: PaintId) -> Option<&PaintDesc> {
        self.paints.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Descriptor and pixels of a live image.
    pub fn image(&self, id: ImageId) -> Option<(&ImageDesc, &[u8])> {
        self.images
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .map(|(desc, pixels)| (desc, pixels.as_slice()))
    }

    /// Number of resources of every kind that have not been destroyed.
    pub fn live_resources(&self) -> usize {
        self.paths.iter().flatten().count()
            + self.paints.iter().flatten().count()
            + self.images.iter().flatten().count()
    }

    /// Number of distinct live resources that have been destroyed.
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Number of calls to [`ImagingBackend::flush`], including failed ones.
    pub fn flush_count(&self) -> u32 {
        self.flushes
    }

    /// Make the next `count` flushes fail.
    pub fn fail_next_flushes(&mut self, count: u32) {
        self.failing_flushes = count;
    }

    fn take_slot<T>(slots: &mut [Option<T>], idx: u32) -> bool {
        slots
            .get_mut(idx as usize)
            .and_then(Option::take)
            .is_some()
    }

    fn record_destroy(&mut self, was_live: bool, resource: Resource) {
        if was_live {
            self.destroyed += 1;
            self.events.push(Event::Destroy(resource));
        }
    }
}

fn next_id(allocated: usize) -> u32 {
    u32::try_from(allocated).expect("RefBackend: too many resources for a u32 id")
}

impl ResourceBackend for RefBackend {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id = PathId(next_id(self.paths.len()));
        self.paths.push(Some(desc));
        self.events.push(Event::Create(Resource::Path(id)));
        id
    }

    fn destroy_path(&mut self, id: PathId) {
        let was_live = Self::take_slot(&mut self.paths, id.0);
        self.record_destroy(was_live, Resource::Path(id));
    }

    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId {
        let id = ImageId(next_id(self.images.len()));
        self.images.push(Some((desc, pixels.to_vec())));
        self.events.push(Event::Create(Resource::Image(id)));
        id
    }

    fn destroy_image(&mut self, id: ImageId) {
        let was_live = Self::take_slot(&mut self.images, id.0);
        self.record_destroy(was_live, Resource::Image(id));
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = PaintId(next_id(self.paints.len()));
        self.paints.push(Some(desc));
        self.events.push(Event::Create(Resource::Paint(id)));
        id
    }

    fn destroy_paint(&mut self, id: PaintId) {
        let was_live = Self::take_slot(&mut self.paints, id.0);
        self.record_destroy(was_live, Resource::Paint(id));
    }
}

impl ImagingBackend for RefBackend {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::SetTransform(tx) => self.state.transform = *tx,
            StateOp::PushClip { .. } => self.state.clip_depth += 1,
            StateOp::PopClip => {
                // Unbalanced pops are tolerated so a broken frame can still be inspected.
                self.state.clip_depth = self.state.clip_depth.saturating_sub(1);
            }
        }

        self.ops.push(ImagingOp::State(op.clone()));
        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        self.ops.push(ImagingOp::Draw(op.clone()));
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
        });
    }

    fn measure_text(&mut self, run: &TextRun) -> TextMetrics {
        let size = run.font.size;
        TextMetrics {
            width: run.text.chars().count() as f64 * size * ADVANCE_PER_CHAR,
            ascent: size * ASCENT,
            descent: size * DESCENT,
        }
    }

    fn flush(&mut self) -> Result<(), FlushError> {
        self.flushes += 1;
        let result = if self.failing_flushes > 0 {
            self.failing_flushes -= 1;
            Err(FlushError::new(String::from("injected flush failure")))
        } else {
            Ok(())
        };
        self.events.push(Event::Flush { ok: result.is_ok() });
        result
    }
}

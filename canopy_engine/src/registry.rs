// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use canopy_imaging::{ImageAlphaType, ImageDesc, ImageFormat, ImageId, ResourceBackend};
use canopy_scene::DecodedImage;
use hashbrown::HashMap;

#[derive(Debug)]
struct Entry {
    // Held so the pointer key cannot be reused by another allocation.
    _image: Arc<DecodedImage>,
    id: ImageId,
    used: bool,
}

/// Backend image resources that live across frames.
///
/// Images are keyed by the identity of their [`Arc`], so a decoded image
/// handed out by the asset cache is uploaded once and reused every frame it
/// is drawn. An image not drawn during a frame is destroyed by the next
/// [`ImageRegistry::sweep`].
#[derive(Debug, Default)]
pub struct ImageRegistry {
    entries: HashMap<*const DecodedImage, Entry>,
}

impl ImageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backend image for `image`, uploading it on first use.
    pub fn register<B: ResourceBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        image: &Arc<DecodedImage>,
    ) -> ImageId {
        let entry = self.entries.entry(Arc::as_ptr(image)).or_insert_with(|| {
            let desc = ImageDesc {
                width: image.width,
                height: image.height,
                format: ImageFormat::Rgba8,
                alpha_type: ImageAlphaType::Alpha,
            };
            tracing::trace!(width = image.width, height = image.height, "uploading image");
            Entry {
                _image: image.clone(),
                id: backend.create_image(desc, &image.pixels),
                used: false,
            }
        });
        entry.used = true;
        entry.id
    }

    /// Destroy every image not registered since the previous sweep.
    ///
    /// Returns how many were destroyed.
    pub fn sweep<B: ResourceBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            if entry.used {
                entry.used = false;
                true
            } else {
                backend.destroy_image(entry.id);
                false
            }
        });
        before - self.entries.len()
    }

    /// Destroy every image. Returns how many were destroyed.
    pub fn release_all<B: ResourceBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            backend.destroy_image(entry.id);
        }
        count
    }

    /// Number of live images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no image is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `image` currently has a backend resource.
    pub fn contains(&self, image: &Arc<DecodedImage>) -> bool {
        self.entries.contains_key(&Arc::as_ptr(image))
    }
}

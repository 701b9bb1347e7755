// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_scene::DecodedImage;

use crate::{Decode, DecodeError};

/// Decodes PNG and JPEG bytes with the `image` crate.
///
/// Output is always straight-alpha RGBA8, whatever the source color type.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageDecoder;

impl Decode for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|err| DecodeError::Format(err.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Empty { width, height });
        }
        Ok(DecodedImage::new(width, height, rgba.into_raw()))
    }
}

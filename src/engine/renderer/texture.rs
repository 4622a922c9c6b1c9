// Offscreen render targets: allocation, drawing primitives and release

use glam::Vec2;
use image::imageops;
use log::warn;
use std::collections::HashMap;
use std::path::Path;

pub use image::{Rgba, RgbaImage};

/// Handle to a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(usize);

impl TextureHandle {
    pub fn id(&self) -> usize {
        self.0
    }
}

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render target errors
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Render target must not be empty, got {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },

    #[error("Unknown texture handle {0:?}")]
    UnknownHandle(TextureHandle),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Everything the sandbox needs from a texture allocator.
///
/// Pixel coordinates have their origin at the top-left corner with y pointing
/// down. Every target returned by `create_target` must eventually be handed
/// back to `release` exactly once.
pub trait TextureBackend {
    /// Allocate a transparent target
    fn create_target(&mut self, width: u32, height: u32) -> Result<TextureHandle, TextureError>;

    /// Free a target
    fn release(&mut self, handle: TextureHandle) -> Result<(), TextureError>;

    fn size(&self, handle: TextureHandle) -> Option<(u32, u32)>;

    /// Pixels of a target, for sampling and export
    fn image(&self, handle: TextureHandle) -> Option<&RgbaImage>;

    fn clear(&mut self, target: TextureHandle, color: Rgba<u8>) -> Result<(), TextureError>;

    /// Fill an axis-aligned rectangle, clipped to the target
    fn fill_rect(
        &mut self,
        target: TextureHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgba<u8>,
    ) -> Result<(), TextureError>;

    /// Fill the convex outline `points`, given in order (pixel space).
    /// Outlines with fewer than 3 points or no area draw nothing.
    fn fill_convex(
        &mut self,
        target: TextureHandle,
        points: &[Vec2],
        color: Rgba<u8>,
    ) -> Result<(), TextureError>;

    /// Copy `source` into `target` with their top-left corners aligned
    fn draw_texture(
        &mut self,
        target: TextureHandle,
        source: TextureHandle,
    ) -> Result<(), TextureError>;

    /// Number of targets currently allocated
    fn live_count(&self) -> usize;

    /// Release `handle`, logging instead of failing when it can't be
    fn discard(&mut self, handle: TextureHandle) {
        if let Err(err) = self.release(handle) {
            warn!("Failed to release texture {:?}: {}", handle, err);
        }
    }

    /// Write a target to disk as PNG
    fn export_png(&self, handle: TextureHandle, path: &Path) -> Result<(), TextureError> {
        let image = self.image(handle).ok_or(TextureError::UnknownHandle(handle))?;
        image.save(path)?;
        Ok(())
    }

    /// New target with the same size and contents as `source`
    fn duplicate(&mut self, source: TextureHandle) -> Result<TextureHandle, TextureError> {
        let (width, height) = self
            .size(source)
            .ok_or(TextureError::UnknownHandle(source))?;
        let copy = self.create_target(width, height)?;
        if let Err(err) = self.draw_texture(copy, source) {
            self.discard(copy);
            return Err(err);
        }
        Ok(copy)
    }
}

/// Outlines with less area than this, in square pixels, aren't filled
const MIN_FILL_AREA: f32 = 1e-3;

/// Signed area of an outline, positive when counter-clockwise in y-up terms
fn outline_area(points: &[Vec2]) -> f32 {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.perp_dot(*b))
        .sum::<f32>()
        / 2.0
}

/// Whether `point` is inside or on every edge of a convex outline wound the
/// way `winding` says
fn covers(points: &[Vec2], winding: f32, point: Vec2) -> bool {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .all(|(a, b)| winding * (*b - *a).perp_dot(point - *a) >= 0.0)
}

/// CPU-side render targets backed by RGBA images
#[derive(Debug, Default)]
pub struct TextureStore {
    targets: HashMap<TextureHandle, RgbaImage>,
    next_id: usize,
}

impl TextureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn target_mut(&mut self, handle: TextureHandle) -> Result<&mut RgbaImage, TextureError> {
        self.targets
            .get_mut(&handle)
            .ok_or(TextureError::UnknownHandle(handle))
    }
}

impl TextureBackend for TextureStore {
    fn create_target(&mut self, width: u32, height: u32) -> Result<TextureHandle, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyTarget { width, height });
        }

        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.targets.insert(handle, RgbaImage::new(width, height));
        Ok(handle)
    }

    fn release(&mut self, handle: TextureHandle) -> Result<(), TextureError> {
        self.targets
            .remove(&handle)
            .map(|_| ())
            .ok_or(TextureError::UnknownHandle(handle))
    }

    fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.targets.get(&handle).map(|image| image.dimensions())
    }

    fn image(&self, handle: TextureHandle) -> Option<&RgbaImage> {
        self.targets.get(&handle)
    }

    fn clear(&mut self, target: TextureHandle, color: Rgba<u8>) -> Result<(), TextureError> {
        for pixel in self.target_mut(target)?.pixels_mut() {
            *pixel = color;
        }
        Ok(())
    }

    fn fill_rect(
        &mut self,
        target: TextureHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Rgba<u8>,
    ) -> Result<(), TextureError> {
        let image = self.target_mut(target)?;
        let x_end = x.saturating_add(width).min(image.width());
        let y_end = y.saturating_add(height).min(image.height());

        for py in y..y_end {
            for px in x..x_end {
                image.put_pixel(px, py, color);
            }
        }
        Ok(())
    }

    fn fill_convex(
        &mut self,
        target: TextureHandle,
        points: &[Vec2],
        color: Rgba<u8>,
    ) -> Result<(), TextureError> {
        let image = self.target_mut(target)?;

        let winding = outline_area(points);
        if points.len() < 3 || winding.abs() <= MIN_FILL_AREA {
            return Ok(());
        }
        let winding = winding.signum();

        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(image.width());
        let y1 = (max.y.ceil().max(0.0) as u32).min(image.height());

        for py in y0..y1 {
            for px in x0..x1 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if covers(points, winding, center) {
                    image.put_pixel(px, py, color);
                }
            }
        }
        Ok(())
    }

    fn draw_texture(
        &mut self,
        target: TextureHandle,
        source: TextureHandle,
    ) -> Result<(), TextureError> {
        let source = self
            .targets
            .get(&source)
            .ok_or(TextureError::UnknownHandle(source))?
            .clone();
        imageops::replace(self.target_mut(target)?, &source, 0, 0);
        Ok(())
    }

    fn live_count(&self) -> usize {
        self.targets.len()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Store wrapper counting allocations and releases per handle
    #[derive(Debug, Default)]
    pub struct CountingBackend {
        inner: TextureStore,
        pub created: usize,
        releases: HashMap<TextureHandle, usize>,
    }

    impl CountingBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// How many times `handle` was handed to `release`
        pub fn release_count(&self, handle: TextureHandle) -> usize {
            self.releases.get(&handle).copied().unwrap_or(0)
        }

        pub fn total_releases(&self) -> usize {
            self.releases.values().sum()
        }

        /// Handles that were released more than once
        pub fn double_released(&self) -> Vec<TextureHandle> {
            self.releases
                .iter()
                .filter(|(_, count)| **count > 1)
                .map(|(handle, _)| *handle)
                .collect()
        }
    }

    impl TextureBackend for CountingBackend {
        fn create_target(
            &mut self,
            width: u32,
            height: u32,
        ) -> Result<TextureHandle, TextureError> {
            let handle = self.inner.create_target(width, height)?;
            self.created += 1;
            Ok(handle)
        }

        fn release(&mut self, handle: TextureHandle) -> Result<(), TextureError> {
            *self.releases.entry(handle).or_insert(0) += 1;
            self.inner.release(handle)
        }

        fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
            self.inner.size(handle)
        }

        fn image(&self, handle: TextureHandle) -> Option<&RgbaImage> {
            self.inner.image(handle)
        }

        fn clear(&mut self, target: TextureHandle, color: Rgba<u8>) -> Result<(), TextureError> {
            self.inner.clear(target, color)
        }

        fn fill_rect(
            &mut self,
            target: TextureHandle,
            x: u32,
            y: u32,
            width: u32,
            height: u32,
            color: Rgba<u8>,
        ) -> Result<(), TextureError> {
            self.inner.fill_rect(target, x, y, width, height, color)
        }

        fn fill_convex(
            &mut self,
            target: TextureHandle,
            points: &[Vec2],
            color: Rgba<u8>,
        ) -> Result<(), TextureError> {
            self.inner.fill_convex(target, points, color)
        }

        fn draw_texture(
            &mut self,
            target: TextureHandle,
            source: TextureHandle,
        ) -> Result<(), TextureError> {
            self.inner.draw_texture(target, source)
        }

        fn live_count(&self) -> usize {
            self.inner.live_count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_release() {
        let mut store = TextureStore::new();
        let handle = store.create_target(8, 4).unwrap();

        assert_eq!(store.size(handle), Some((8, 4)));
        assert_eq!(store.live_count(), 1);
        assert!(store.release(handle).is_ok());
        assert_eq!(store.live_count(), 0);
        assert!(matches!(
            store.release(handle),
            Err(TextureError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_empty_target_rejected() {
        let mut store = TextureStore::new();
        assert!(matches!(
            store.create_target(0, 10),
            Err(TextureError::EmptyTarget { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_new_target_is_transparent() {
        let mut store = TextureStore::new();
        let handle = store.create_target(2, 2).unwrap();
        assert_eq!(*store.image(handle).unwrap().get_pixel(1, 1), TRANSPARENT);
    }

    #[test]
    fn test_fill_rect_clips_to_target() {
        let mut store = TextureStore::new();
        let handle = store.create_target(4, 4).unwrap();
        store.fill_rect(handle, 2, 2, 10, 10, WHITE).unwrap();

        let image = store.image(handle).unwrap();
        assert_eq!(*image.get_pixel(3, 3), WHITE);
        assert_eq!(*image.get_pixel(1, 1), TRANSPARENT);
    }

    #[test]
    fn test_fill_convex_triangle() {
        let mut store = TextureStore::new();
        let handle = store.create_target(10, 10).unwrap();
        let triangle = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)];
        store.fill_convex(handle, &triangle, WHITE).unwrap();

        let image = store.image(handle).unwrap();
        assert_eq!(*image.get_pixel(1, 1), WHITE);
        assert_eq!(*image.get_pixel(9, 9), TRANSPARENT);
    }

    #[test]
    fn test_fill_convex_square_covers_every_pixel() {
        let mut store = TextureStore::new();
        let handle = store.create_target(100, 100).unwrap();
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        store.fill_convex(handle, &square, WHITE).unwrap();
        assert!(store.image(handle).unwrap().pixels().all(|p| *p == WHITE));

        // Same square, opposite winding
        store.clear(handle, TRANSPARENT).unwrap();
        let reversed: Vec<Vec2> = square.iter().rev().copied().collect();
        store.fill_convex(handle, &reversed, WHITE).unwrap();
        assert!(store.image(handle).unwrap().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_fill_convex_collinear_draws_nothing() {
        let mut store = TextureStore::new();
        let handle = store.create_target(4, 4).unwrap();
        let flat = [Vec2::ZERO, Vec2::new(2.0, 2.0), Vec2::new(4.0, 4.0)];
        store.fill_convex(handle, &flat, WHITE).unwrap();
        assert!(store.image(handle).unwrap().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_fill_convex_degenerate_draws_nothing() {
        let mut store = TextureStore::new();
        let handle = store.create_target(4, 4).unwrap();
        let line = [Vec2::ZERO, Vec2::new(4.0, 4.0)];
        store.fill_convex(handle, &line, WHITE).unwrap();
        assert!(store.image(handle).unwrap().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_discard_tolerates_unknown_handle() {
        let mut store = TextureStore::new();
        let handle = store.create_target(2, 2).unwrap();

        store.discard(handle);
        assert_eq!(store.live_count(), 0);
        // Second release only logs
        store.discard(handle);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_duplicate_copies_pixels() {
        let mut store = TextureStore::new();
        let source = store.create_target(3, 3).unwrap();
        store.clear(source, WHITE).unwrap();

        let copy = store.duplicate(source).unwrap();
        assert_ne!(copy, source);
        assert_eq!(store.size(copy), Some((3, 3)));
        assert_eq!(*store.image(copy).unwrap().get_pixel(2, 2), WHITE);

        // Independent storage
        store.clear(source, TRANSPARENT).unwrap();
        assert_eq!(*store.image(copy).unwrap().get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_error_display() {
        let err = TextureError::EmptyTarget {
            width: 0,
            height: 3,
        };
        assert_eq!(err.to_string(), "Render target must not be empty, got 0x3");
    }
}

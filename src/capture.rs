//! Screen capture: grabbing the rendered frame so an effect can reuse it.
//!
//! Capturing is asynchronous from the caller's point of view. An effect calls
//! [`ScreenCapture::request_current_frame`], the host copies the finished frame
//! at the end of that frame, and from the next frame on
//! [`ScreenCapture::has_new_frame`] reports `true` until someone takes it with
//! [`ScreenCapture::get_frame`].

use std::collections::HashMap;

use tracing::debug;

use crate::gpu::GpuContext;
use crate::render_target::RenderTarget;
use crate::texture::Texture;

/// Handle to a captured frame owned by the capture provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u32);

/// Host-side provider of captured frames.
pub trait ScreenCapture {
    /// Whether a captured frame is waiting to be taken.
    fn has_new_frame(&self) -> bool;

    /// Take the waiting frame, if any.
    fn get_frame(&mut self) -> Option<FrameId>;

    /// Ask for the frame currently being rendered to be captured.
    fn request_current_frame(&mut self);
}

/// GPU-backed capture provider.
///
/// Frames are copied out of the off-screen [`RenderTarget`] and kept until
/// [`FrameCapture::retain`] is told nothing refers to them any more.
pub struct FrameCapture {
    frames: HashMap<FrameId, Texture>,
    ready: Option<FrameId>,
    requested: bool,
    next_id: u32,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
            ready: None,
            requested: false,
            next_id: 0,
        }
    }

    /// Look up the texture for a captured frame.
    pub fn texture(&self, id: FrameId) -> Option<&Texture> {
        self.frames.get(&id)
    }

    pub(crate) fn textures(&self) -> impl Iterator<Item = (FrameId, &Texture)> {
        self.frames.iter().map(|(id, tex)| (*id, tex))
    }

    /// Record the copy for an outstanding request.
    ///
    /// Must be called after the frame has been fully drawn into `source` and
    /// before the encoder is submitted.
    pub fn finish_frame(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        source: &RenderTarget,
    ) {
        if !std::mem::take(&mut self.requested) {
            return;
        }

        let id = FrameId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let texture = Texture::copy_of(gpu, encoder, source, &format!("Captured Frame {}", id.0));
        debug!(frame = id.0, width = texture.width, height = texture.height, "frame captured");

        // An untaken previous capture is superseded
        if let Some(stale) = self.ready.replace(id) {
            self.frames.remove(&stale);
        }
        self.frames.insert(id, texture);
    }

    /// Drop every captured frame that is neither waiting nor listed in `live`.
    pub fn retain(&mut self, live: impl IntoIterator<Item = FrameId>) {
        let mut keep: Vec<FrameId> = live.into_iter().collect();
        keep.extend(self.ready);
        let before = self.frames.len();
        self.frames.retain(|id, _| keep.contains(id));
        if self.frames.len() != before {
            debug!(
                released = before - self.frames.len(),
                kept = self.frames.len(),
                "captured frames released"
            );
        }
    }
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenCapture for FrameCapture {
    fn has_new_frame(&self) -> bool {
        self.ready.is_some()
    }

    fn get_frame(&mut self) -> Option<FrameId> {
        self.ready.take()
    }

    fn request_current_frame(&mut self) {
        self.requested = true;
    }
}

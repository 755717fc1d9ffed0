//! view - Binds a particle field to the lifetime of the view hosting it
//!
//! Mounting acquires a resize subscription and a pending frame request from
//! the host. Both are handed back when the view is dropped, so an unmounted
//! background never keeps animating.

use rand::Rng;
use tracing::{debug, trace};

use crate::field::{FieldSettings, ParticleField, Viewport};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u32);

/// The window, canvas or display a background is drawn into.
pub trait Host {
    /// Current drawing surface, or `None` if it cannot be acquired.
    fn viewport(&self) -> Option<Viewport>;
    fn subscribe_resize(&mut self) -> Subscription;
    fn unsubscribe_resize(&mut self, subscription: Subscription);
    /// Ask for a callback on the next paint.
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

pub struct BackgroundView<'h, H: Host, const N: usize> {
    host: &'h mut H,
    field: ParticleField<N>,
    resize: Option<Subscription>,
    pending: Option<FrameRequest>,
}

impl<'h, H: Host, const N: usize> BackgroundView<'h, H, N> {
    /// Start animating on `host`. Without a drawing surface the background
    /// is silently skipped.
    pub fn mount<R: Rng + ?Sized>(
        host: &'h mut H,
        settings: FieldSettings,
        rng: &mut R,
    ) -> Option<Self> {
        let Some(viewport) = host.viewport() else {
            debug!("no drawing surface, background disabled");
            return None;
        };

        let field = ParticleField::new(viewport, settings, rng);
        let resize = host.subscribe_resize();
        let pending = host.request_frame();
        debug!(kind = settings.kind.name(), "background mounted");

        Some(Self {
            host,
            field,
            resize: Some(resize),
            pending: Some(pending),
        })
    }

    /// Paint callback: advance one frame and schedule the next.
    pub fn on_frame(&mut self) {
        self.pending = None;
        self.field.step();
        self.pending = Some(self.host.request_frame());
    }

    /// Resize callback. Ignored if the host lost its surface.
    pub fn on_resize(&mut self) {
        if let Some(viewport) = self.host.viewport() {
            self.field.resize(viewport);
        }
    }

    pub fn field(&self) -> &ParticleField<N> {
        &self.field
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }
}

impl<'h, H: Host, const N: usize> Drop for BackgroundView<'h, H, N> {
    fn drop(&mut self) {
        if let Some(request) = self.pending.take() {
            self.host.cancel_frame(request);
        }
        if let Some(subscription) = self.resize.take() {
            self.host.unsubscribe_resize(subscription);
        }
        trace!("background unmounted");
    }
}

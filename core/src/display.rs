use crate::framebuffer::Framebuffer;

/// Output device for finished frames.
pub trait Display {
    fn present(&mut self, framebuffer: &Framebuffer);
}

use careclip_core::types::Seconds;

// ---------------------------------------------------------------------------
// MediaSource
// ---------------------------------------------------------------------------

/// A time-seekable media source. Implementations wrap whatever actually
/// decodes frames; the driver only needs a clock it can read and position.
pub trait MediaSource {
    /// Total duration, once metadata has loaded.
    fn duration(&self) -> Option<Seconds>;
    /// Current absolute position.
    fn position(&self) -> Seconds;
    /// Position the play cursor, clamped to the media bounds.
    fn seek(&mut self, time: Seconds);
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
}

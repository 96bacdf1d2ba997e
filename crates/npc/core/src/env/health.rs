/// Health bookkeeping of the NPC, owned by the host's damage system.
pub trait HealthOracle {
    fn current(&self) -> f32;

    fn maximum(&self) -> f32;

    fn set_current(&mut self, value: f32);

    /// Returns true once the NPC has died.
    ///
    /// Hosts may report this edge-triggered; the controller latches it.
    fn is_dead(&self) -> bool {
        self.current() <= 0.0
    }
}

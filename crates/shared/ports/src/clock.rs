use vega_core::Timestamp;

/// Time source for evaluations and the capture schedule.
///
/// Every evaluation stamps itself and derives its trading day from one
/// `now()` reading, so substituting a controllable implementation keeps
/// session arithmetic deterministic under test.
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> Timestamp;
}

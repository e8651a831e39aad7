use super::OverlapAddEngine;

/// What the host is told about the delay a processor adds.
///
/// Hosts only re-query these after a reconfiguration, so implementors must keep them in step with
/// whatever was last committed, not with pending requests.
pub trait LatencyReporter {
    /// Samples between an input sample and its processed output ("initial delay").
    fn latency_samples(&self) -> usize;

    /// Samples of output that keep coming after the input stops.
    fn tail_samples(&self) -> usize {
        self.latency_samples()
    }
}

/// A windowing engine buffers exactly one frame; the tail is the same as the delay.
impl<T> LatencyReporter for OverlapAddEngine<T> {
    fn latency_samples(&self) -> usize {
        self.frame_size()
    }
}

use crate::graph::buffer::SampleBuffer;

/// A node that generates blocks on its own clock.
///
/// The engine pulls one block per render cycle. Sources in this crate never
/// run dry, so `None` is reserved for sources that genuinely end.
pub trait Source: Send {
    fn produce_next(&mut self) -> Option<SampleBuffer>;
}

/// A node that turns one block into one block, synchronously.
pub trait Processor: Send {
    fn process(&mut self, input: SampleBuffer) -> SampleBuffer;
}

/// Allow boxed sources to be used as sources (for dynamic dispatch)
impl Source for Box<dyn Source> {
    fn produce_next(&mut self) -> Option<SampleBuffer> {
        (**self).produce_next()
    }
}

impl Processor for Box<dyn Processor> {
    fn process(&mut self, input: SampleBuffer) -> SampleBuffer {
        (**self).process(input)
    }
}

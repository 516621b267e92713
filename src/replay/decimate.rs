//! Stream decimation utilities

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait to add decimation to any Stream
pub trait DecimateExt: Stream {
    /// Thin the stream to every `stride`-th item
    ///
    /// Yields the first item, then one item per `stride` consumed. Analysis
    /// consumers use this to drop a 50 Hz replay to a workable rate without
    /// re-timing it. A stride of 0 is treated as 1 (no thinning).
    fn decimate(self, stride: usize) -> Decimate<Self>
    where
        Self: Sized,
    {
        Decimate::new(self, stride)
    }
}

impl<T: Stream> DecimateExt for T {}

// Use pin_project_lite macro syntax
pin_project! {
    /// A stream combinator that keeps every n-th item
    pub struct Decimate<S> {
        #[pin]
        stream: S,
        stride: usize,
        offset: usize,
    }
}

impl<S: Stream> Decimate<S> {
    /// Create a new decimated stream
    pub fn new(stream: S, stride: usize) -> Self {
        Self { stream, stride: stride.max(1), offset: 0 }
    }
}

impl<S: Stream> Stream for Decimate<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(item) => {
                    let keep = *this.offset == 0;
                    *this.offset = (*this.offset + 1) % *this.stride;
                    if keep {
                        return Poll::Ready(Some(item));
                    }
                }
                None => return Poll::Ready(None),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.stream.size_hint();
        (lower / self.stride, upper.map(|u| u.div_ceil(self.stride)))
    }
}

use analytics::ChartConfig;

/// A surface that can display one chart configuration at a time.
///
/// `mount` hands back a handle to the live chart; the renderer returns it through
/// `release` before anything else is mounted.
pub trait ChartCanvas {
    type Handle;

    fn mount(&mut self, config: &ChartConfig) -> Self::Handle;

    fn release(&mut self, handle: Self::Handle);
}

/// Owns the live chart. At most one handle is alive at any moment.
pub struct ChartRenderer<C: ChartCanvas> {
    canvas: C,
    live: Option<C::Handle>,
}

impl<C: ChartCanvas> ChartRenderer<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas, live: None }
    }

    /// Releases the current chart, if any, then mounts `config`.
    pub fn render(&mut self, config: &ChartConfig) {
        if let Some(previous) = self.live.take() {
            self.canvas.release(previous);
        }
        self.live = Some(self.canvas.mount(config));
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }
}

impl<C: ChartCanvas> Drop for ChartRenderer<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.live.take() {
            self.canvas.release(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::build_chart_config;
    use core_types::ChartType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        mounted: usize,
        released: usize,
    }

    struct CountingCanvas(Rc<RefCell<Counts>>);

    impl ChartCanvas for CountingCanvas {
        type Handle = usize;

        fn mount(&mut self, _config: &ChartConfig) -> usize {
            let mut counts = self.0.borrow_mut();
            counts.mounted += 1;
            counts.mounted
        }

        fn release(&mut self, _handle: usize) {
            self.0.borrow_mut().released += 1;
        }
    }

    #[test]
    fn each_render_replaces_the_previous_chart() {
        let counts = Rc::new(RefCell::new(Counts::default()));
        let mut renderer = ChartRenderer::new(CountingCanvas(counts.clone()));
        let config = build_chart_config(&[], ChartType::Bar);

        assert!(!renderer.is_live());
        for _ in 0..3 {
            renderer.render(&config);
            let c = counts.borrow();
            assert_eq!(c.mounted - c.released, 1);
        }
        assert_eq!(counts.borrow().released, 2);

        drop(renderer);
        let c = counts.borrow();
        assert_eq!(c.mounted, c.released);
    }
}

//! View sinks: where the client pushes every state change.

use std::sync::Arc;

use spreadscope_fx::{ConverterView, SelectorOptions};
use spreadscope_spreads::{SpreadRenderer, SpreadView};

/// Receiver of every view the client produces.
///
/// Calls arrive from the polling task as well as from user events, so
/// implementations must not block.
pub trait ViewSink: Send + Sync {
    /// Asset selectors were (re)populated.
    fn selectors(&self, options: &SelectorOptions);

    /// Pair-rate label changed without a conversion.
    fn pair_rate(&self, rate: Option<f64>, label: &str);

    /// Converter panel after a user event or a failed load.
    fn converter(&self, view: &ConverterView);

    /// Spread table was re-rendered.
    fn spreads(&self, view: &SpreadView);
}

/// Default sink that logs views but doesn't display them.
pub struct LoggingSink;

impl ViewSink for LoggingSink {
    fn selectors(&self, options: &SelectorOptions) {
        tracing::info!(
            assets = options.assets.len(),
            from = ?options.from,
            to = ?options.to,
            "Selectors updated"
        );
    }

    fn pair_rate(&self, rate: Option<f64>, label: &str) {
        tracing::debug!(rate = ?rate, label = %label, "Pair rate updated");
    }

    fn converter(&self, view: &ConverterView) {
        match &view.error {
            Some(error) => tracing::info!(
                pair = %view.pair_label,
                error = %error,
                "Conversion unavailable"
            ),
            None => tracing::info!(
                pair = %view.pair_label,
                result = %view.result_label,
                "Conversion updated"
            ),
        }
    }

    fn spreads(&self, view: &SpreadView) {
        match view.placeholder() {
            Some(text) => tracing::info!(placeholder = %text, "Spreads updated"),
            None => tracing::info!(rows = view.rows().len(), "Spreads updated"),
        }
    }
}

/// Feeds spread renders from the presenter into a [`ViewSink`].
pub struct SinkRenderer {
    sink: Arc<dyn ViewSink>,
}

impl SinkRenderer {
    pub fn new(sink: Arc<dyn ViewSink>) -> Self {
        Self { sink }
    }
}

impl SpreadRenderer for SinkRenderer {
    fn render_spreads(&self, view: &SpreadView) {
        self.sink.spreads(view);
    }
}

/// Sink that forwards views to callback functions.
#[derive(Default)]
pub struct CallbackSink {
    on_selectors: Option<Box<dyn Fn(&SelectorOptions) + Send + Sync>>,
    on_converter: Option<Box<dyn Fn(&ConverterView) + Send + Sync>>,
    on_spreads: Option<Box<dyn Fn(&SpreadView) + Send + Sync>>,
}

impl CallbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_selectors<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SelectorOptions) + Send + Sync + 'static,
    {
        self.on_selectors = Some(Box::new(callback));
        self
    }

    pub fn on_converter<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ConverterView) + Send + Sync + 'static,
    {
        self.on_converter = Some(Box::new(callback));
        self
    }

    pub fn on_spreads<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SpreadView) + Send + Sync + 'static,
    {
        self.on_spreads = Some(Box::new(callback));
        self
    }
}

impl ViewSink for CallbackSink {
    fn selectors(&self, options: &SelectorOptions) {
        if let Some(callback) = &self.on_selectors {
            callback(options);
        }
    }

    fn pair_rate(&self, _rate: Option<f64>, _label: &str) {}

    fn converter(&self, view: &ConverterView) {
        if let Some(callback) = &self.on_converter {
            callback(view);
        }
    }

    fn spreads(&self, view: &SpreadView) {
        if let Some(callback) = &self.on_spreads {
            callback(view);
        }
    }
}

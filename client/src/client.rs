//! SpreadScope client: one converter panel and one spread table.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use spreadscope_common::{AssetSymbol, Result, SpreadRecord};
use spreadscope_fx::{Converter, ConverterView, RateProvider, SelectorOptions};
use spreadscope_spreads::{ApplyOutcome, SpreadPresenter, SpreadSource, SpreadView};

use crate::config::ClientConfig;
use crate::connection::ApiConnection;
use crate::handler::{SinkRenderer, ViewSink};
use crate::metrics::{ClientMetrics, MetricsSnapshot};

/// Drives the converter and the spread feed and reports every change to a
/// [`ViewSink`].
pub struct SpreadScopeClient {
    /// Configuration.
    config: ClientConfig,
    /// Source of the converter rate table.
    rates: Arc<dyn RateProvider>,
    /// Converter state.
    converter: Converter,
    /// Spread feed.
    presenter: Arc<SpreadPresenter>,
    /// Where views go.
    sink: Arc<dyn ViewSink>,
    /// Counters.
    metrics: ClientMetrics,
    /// Polling task, once started.
    polling: Mutex<Option<JoinHandle<()>>>,
}

impl SpreadScopeClient {
    /// Create a client over explicit data sources.
    pub fn new(
        config: ClientConfig,
        rates: Arc<dyn RateProvider>,
        spreads: Arc<dyn SpreadSource>,
        sink: Arc<dyn ViewSink>,
    ) -> Self {
        let presenter = Arc::new(SpreadPresenter::new(
            spreads,
            config.spread_query(),
            Arc::new(SinkRenderer::new(sink.clone())),
            config.locale,
        ));

        Self {
            converter: Converter::new(config.locale),
            config,
            rates,
            presenter,
            sink,
            metrics: ClientMetrics::new(),
            polling: Mutex::new(None),
        }
    }

    /// Create a client talking HTTP to the configured backend.
    pub fn connect(config: ClientConfig, sink: Arc<dyn ViewSink>) -> Result<Self> {
        config
            .validate()
            .map_err(spreadscope_common::SpreadScopeError::ConfigurationError)?;

        let connection = Arc::new(ApiConnection::new(&config)?);
        info!(api_base = %connection.api_base(), "Client configured");

        Ok(Self::new(config, connection.clone(), connection, sink))
    }

    /// Start spread polling and load the rate table.
    ///
    /// The two are independent: polling is already running when the rate
    /// load is awaited, and a failed load does not stop it. Returns whether
    /// the rate table loaded.
    #[instrument(skip(self))]
    pub async fn start(&self) -> bool {
        {
            let mut polling = self.polling.lock();
            if polling.is_none() {
                *polling = Some(self.presenter.spawn_polling(self.config.poll));
            }
        }
        self.load_rates().await
    }

    /// Stop the polling task.
    pub fn stop(&self) {
        if let Some(handle) = self.polling.lock().take() {
            handle.abort();
            info!("Spread polling stopped");
        }
    }

    /// Fetch the rate table and repopulate the selectors.
    #[instrument(skip(self), fields(provider = %self.rates.name()))]
    pub async fn load_rates(&self) -> bool {
        match self.rates.fetch_rates().await {
            Ok(table) => {
                let options = self.converter.install_table(table);
                self.metrics.rate_load(true);
                self.sink.selectors(&options);
                let (rate, label) = self.converter.pair_label();
                self.sink.pair_rate(rate, &label);
                true
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Rate table load failed");
                self.metrics.rate_load(false);
                let view = self.converter.mark_load_failed();
                self.sink.converter(&view);
                false
            }
        }
    }

    pub fn select_from(&self, asset: impl Into<AssetSymbol>) -> ConverterView {
        self.publish(self.converter.select_from(asset))
    }

    pub fn select_to(&self, asset: impl Into<AssetSymbol>) -> ConverterView {
        self.publish(self.converter.select_to(asset))
    }

    pub fn set_amount(&self, text: impl Into<String>) -> ConverterView {
        self.publish(self.converter.set_amount(text))
    }

    pub fn swap(&self) -> ConverterView {
        self.publish(self.converter.swap())
    }

    pub fn convert(&self) -> ConverterView {
        self.publish(self.converter.convert())
    }

    pub fn selectors(&self) -> SelectorOptions {
        self.converter.selectors()
    }

    pub fn set_filter(&self, text: impl Into<String>) -> SpreadView {
        self.presenter.set_filter(text)
    }

    /// Manual refresh, outside the polling timeline.
    pub async fn refresh_spreads(&self) -> ApplyOutcome {
        self.presenter.refresh().await
    }

    pub fn spread_view(&self) -> SpreadView {
        self.presenter.view()
    }

    pub fn spread_records(&self) -> Vec<SpreadRecord> {
        self.presenter.records()
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.presenter.stats())
    }

    fn publish(&self, view: ConverterView) -> ConverterView {
        self.metrics.conversion(view.is_ok());
        self.sink.converter(&view);
        view
    }
}

impl Drop for SpreadScopeClient {
    fn drop(&mut self) {
        if let Some(handle) = self.polling.get_mut().take() {
            handle.abort();
        }
    }
}

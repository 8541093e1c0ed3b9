//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use ped_agent::AgentStore;
use ped_core::{DiagnosticSink, LogSink};
use ped_journey::RoutingTable;
use ped_model::{OperationalModel, PedestrianModel};
use ped_spatial::{Geometry, NeighborhoodGrid};

use crate::{SimConfig, SimResult, Simulation, Trace};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: `dt`, seed, thread count, …
/// - an operational model: anything that converts into
///   [`OperationalModel`], with its profiles registered
/// - the [`Geometry`], from [`ped_spatial::GeometryBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method      | Default                                   |
/// |-------------|-------------------------------------------|
/// | `.sink(s)`  | [`LogSink`] (forwards to the `log` crate) |
/// | `.shared_sink(arc)` | same, keeping a handle to the sink |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, model, geometry)
///     .sink(NoopSink)
///     .build()?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    model:    OperationalModel,
    geometry: Geometry,
    sink:     Arc<dyn DiagnosticSink>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, model: impl Into<OperationalModel>, geometry: Geometry) -> Self {
        Self { config, model: model.into(), geometry, sink: Arc::new(LogSink) }
    }

    /// Route diagnostic events to `sink` instead of the `log` crate.
    pub fn sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Route diagnostic events to a sink the caller keeps a handle to.
    pub fn shared_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Validate the configuration, size the neighbour grid, and return a
    /// ready-to-run [`Simulation`] with no stages, journeys or agents.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;

        let cell_size = self.model.cutoff_radius() * self.config.neighbor_cell_factor;
        let grid = NeighborhoodGrid::new(cell_size)?;

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };
        #[cfg(not(feature = "parallel"))]
        if self.config.num_threads.is_some_and(|n| n > 1) {
            self.sink.debug("num_threads is ignored without the `parallel` feature");
        }

        self.sink.info(&format!(
            "simulation ready: {} model, dt = {} s, {} walls, grid cell {:.2} m",
            self.model.kind().as_str(),
            self.config.dt,
            self.geometry.walls().len(),
            cell_size,
        ));

        Ok(Simulation {
            clock:    self.config.make_clock(),
            routing:  RoutingTable::new(self.config.waiting_sets_start_active),
            config:   self.config,
            model:    self.model,
            geometry: self.geometry,
            agents:   AgentStore::new(),
            grid,
            sink:     self.sink,
            trace:    Trace::default(),
            removed:  Vec::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}

//!  Logging setup for voltaire binaries and tests.
//!
//!  The entry point is [`VoltaireTracer`], which installs a single stderr layer in one of the
//!  [`LogFormat`]s, filtered by a default directive, extra directives and `RUST_LOG`.
//!
//!  # Examples
//!
//!  ```
//!  use voltaire_tracing::{
//!      LayerInfo, VoltaireTracer, Tracer,
//!      tracing::level_filters::LevelFilter,
//!      LogFormat,
//!  };
//!
//!  fn main() -> eyre::Result<()> {
//!      let tracer = VoltaireTracer::new().with_stderr(LayerInfo::new(
//!          LogFormat::Json,
//!          LevelFilter::INFO.to_string(),
//!          "primitives::tx=debug".to_string(),
//!          None,
//!      ));
//!
//!      tracer.init()?;
//!
//!      Ok(())
//!  }
//!  ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

// Re-export our types
pub use formatter::{BoxedLayer, LogFormat};
pub use test_tracer::TestTracer;

mod formatter;
mod test_tracer;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

///  Tracer for application logging.
///
///  Holds the configuration of the stderr layer until [`Tracer::init`] installs it.
#[derive(Debug, Clone, Default)]
pub struct VoltaireTracer {
    stderr: LayerInfo,
}

impl VoltaireTracer {
    ///  Constructs a new `VoltaireTracer` with the default layer configuration.
    pub fn new() -> Self {
        Self::default()
    }

    ///  Sets a custom configuration for the output layer.
    ///
    ///  # Arguments
    ///  * `config` - The `LayerInfo` to use for the layer.
    pub fn with_stderr(mut self, config: LayerInfo) -> Self {
        self.stderr = config;
        self
    }
}

///  Configuration for a logging layer.
///
///  This struct holds configuration parameters for a tracing layer, including
///  the format, filtering directives, optional coloring, and directive.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    format: LogFormat,
    default_directive: String,
    filters: String,
    color: Option<String>,
}

impl LayerInfo {
    ///  Constructs a new `LayerInfo`.
    ///
    ///  # Arguments
    ///  * `format` - Specifies the format for log messages.
    ///  * `default_directive` - Directive applied when `RUST_LOG` is unset.
    ///  * `filters` - Comma separated extra directives, e.g. `primitives::tx=trace`.
    ///  * `color` - Optional color configuration for the log messages.
    pub const fn new(
        format: LogFormat,
        default_directive: String,
        filters: String,
        color: Option<String>,
    ) -> Self {
        Self { format, default_directive, filters, color }
    }
}

impl Default for LayerInfo {
    ///  By default, it uses terminal format, INFO level filter,
    ///  no additional filters, and colors enabled.
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_directive: LevelFilter::INFO.to_string(),
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// Trait defining a general interface for logging configuration.
///
/// Implementations install a global subscriber. Installing a second one is not an error.
pub trait Tracer {
    /// Initialize the logging configuration.
    fn init(self) -> eyre::Result<()>;
}

impl Tracer for VoltaireTracer {
    fn init(self) -> eyre::Result<()> {
        let filter =
            build_env_filter(Some(self.stderr.default_directive.parse()?), &self.stderr.filters)?;
        let layer = self.stderr.format.apply(filter, self.stderr.color);

        // The error is returned if the global default subscriber is already set,
        // so it's safe to ignore it
        let _ = tracing_subscriber::registry().with(layer).try_init().inspect_err(|e| {
            tracing::warn!(%e, "Tracing subscriber could not be initialized.")
        });
        Ok(())
    }
}

/// Builds an [`EnvFilter`] from `RUST_LOG`, the default directive and comma separated
/// `directives`.
///
/// Fails if any of the extra directives does not parse.
pub fn build_env_filter(
    default_directive: Option<Directive>,
    directives: &str,
) -> eyre::Result<EnvFilter> {
    let env_filter = if let Some(default_directive) = default_directive {
        EnvFilter::builder().with_default_directive(default_directive).from_env_lossy()
    } else {
        EnvFilter::builder().from_env_lossy()
    };

    directives
        .split(',')
        .filter(|directive| !directive.is_empty())
        .try_fold(env_filter, |env_filter, directive| {
            Ok(env_filter.add_directive(directive.parse()?))
        })
}

///  Initializes a tracing subscriber for tests.
///
///  The filter is configurable via `RUST_LOG`.
///
///  # Note
///
///  The subscriber will silently fail if it could not be installed.
pub fn init_test_tracing() {
    let _ = TestTracer::default().init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_filter_accepts_target_directives() {
        let filter =
            build_env_filter(Some(LevelFilter::WARN.into()), "primitives::tx=trace,,").unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn init_twice_is_fine() {
        init_test_tracing();
        init_test_tracing();
        tracing::debug!(target: "primitives::tx", "still alive");
    }
}

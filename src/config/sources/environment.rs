//! Environment source: SURFACE_<SECTION>__<KEY> variables.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add environment overrides, e.g. `SURFACE_MEMORY__TRIM_THRESHOLD=20`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("SURFACE")
            .separator("__")
            .try_parsing(true),
    )
}

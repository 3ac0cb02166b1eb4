/// Configuration of the enrichment components
///
/// - `tree`: hierarchical view over environment variables
/// - `configurator`: descriptor driven validation of one integration
/// - `descriptors`: validation contracts of the known integrations
/// - `settings`: typed integration settings built once per run
/// - `runtime`: process level settings (logging, HTTP transport)
pub mod configurator;
pub mod descriptors;
pub mod runtime;
pub mod settings;
pub mod tree;

pub use configurator::{configure, Descriptor, Param, Section, Setter, Validator};
pub use runtime::RuntimeConfig;
pub use settings::{CustomApiSettings, ExpanderKind, JiraSettings, Settings};
pub use tree::EnvTree;

//! Global constants used throughout partial-render.
//!
//! Defaults for partial resolution, engine wiring and configuration lookup.

use std::time::Duration;

/// Extension appended to every resolved partial path.
pub const PARTIAL_EXTENSION: &str = ".html";

/// Separator that replaces `_` in partial names when resolving paths.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Constructor name the bundled engine answers to.
pub const DEFAULT_VIEW_CONSTRUCTOR: &str = "Ractive";

/// Variable the construction call binds the view to.
pub const VIEW_BINDING: &str = "ractive";

/// Default bootstrap script resource, relative to the resource root.
pub const DEFAULT_BOOTSTRAP: &str = "ractive.js";

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = "partial-render.toml";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "PARTIAL_RENDER_CONFIG";

/// Deadline the CLI puts on a render when `engine_timeout_secs` is not set.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum Levenshtein distance, as a percentage of the requested name's length,
/// for a resource to be offered as a "did you mean" suggestion.
pub const SIMILARITY_THRESHOLD_PERCENT: usize = 34;

/// Maximum number of suggestions attached to a missing-resource error.
pub const MAX_SUGGESTIONS: usize = 3;

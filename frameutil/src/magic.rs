/// Maximum number of characters kept by [`crate::object::object_description`].
pub const DESCRIPTION_MAX_LEN: usize = 100;

/// Suffix appended to a description once it has been cut to [`DESCRIPTION_MAX_LEN`].
///
/// The marker always closes with `]`, whatever the shape of the described value.
pub const DESCRIPTION_TRUNCATION_MARKER: &str = " ... ]";

/// Name given to a property made from a callable without a name of its own (closure, function
/// pointer, boxed callable) when none is given explicitly.
pub const ANONYMOUS_CALLABLE_NAME: &str = "<anonymous>";

/// Name of the environment variable overriding [`DESCRIPTION_MAX_LEN`].
pub const ENV_DESCRIPTION_MAX_LEN: &str = "FRAMEUTIL_DESCRIPTION_MAX_LEN";

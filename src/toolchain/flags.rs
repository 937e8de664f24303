//! Host-flag translation for the nvcc command line
//!
//! nvcc compiles device code itself but forwards host code to the
//! underlying host compiler. Every host compiler flag must be individually
//! prefixed with the `-Xcompiler` wrapper marker - one marker per flag, not
//! one marker for the whole flag string. Strictness flags in the `pedantic`
//! family are silently dropped: nvcc's generated host code trips them and
//! produces noisy, irrelevant warnings.
//!
//! Translation is computed at command-construction time, never cached, so
//! flags appended to the configuration after registration still take
//! effect.

/// Marker prefixing each forwarded host compiler flag.
pub const WRAPPER_MARKER: &str = "-Xcompiler";

/// Flag category never forwarded to the host compiler.
pub const DISALLOWED_CATEGORY: &str = "pedantic";

/// Translate generic host compiler flags into nvcc's dialect.
///
/// Each surviving flag is preceded by its own [`WRAPPER_MARKER`]; flags in
/// the [`DISALLOWED_CATEGORY`] are dropped.
#[must_use]
pub fn wrap_host_flags<S: AsRef<str>>(flags: &[S]) -> Vec<String> {
    let mut wrapped = Vec::with_capacity(flags.len() * 2);
    for flag in flags {
        let flag = flag.as_ref();
        if flag.contains(DISALLOWED_CATEGORY) {
            continue;
        }
        wrapped.push(WRAPPER_MARKER.to_string());
        wrapped.push(flag.to_string());
    }
    wrapped
}

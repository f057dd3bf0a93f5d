use crate::output_type::OutputType;

/// Options that control how search results are written.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The binaries map their flags and query parameters into this type so that
/// other frontends (tests, batch jobs) can construct options programmatically.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    /// The desired output format for matched words.
    pub output_type: OutputType,
}
